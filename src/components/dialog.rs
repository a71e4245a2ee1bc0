// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Add/edit dialog shared by every collection screen.
//!
//! One model/update pair drives both variants. What differs between "add" and "edit" lives in
//! a [`DialogVariant`] value: how the draft is created and how the saved collection is rebuilt
//! around it.
//!
//! Lifecycle: `open` → `Idle` (valid or invalid) → `Submitting` → `Closed` on success, or back
//! to `Idle` with the classified error. Only one submit may be in flight per dialog.

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{FormError, TransportError};
use crate::logic::submit::Submittable;
use crate::logic::validation::{self, FieldErrors};
use crate::models::{Draft, FieldName, FormEntry};

/// Creates the draft for a freshly opened dialog from the saved collection and the target id.
pub type CreateDraftFn<E> = fn(&[E], Option<&<E as FormEntry>::Id>) -> Result<Draft<E>, FormError>;

/// Builds the collection to submit from the saved collection and the draft.
pub type BuildEntrySetFn<E> = fn(&[E], &E) -> Result<Vec<E>, FormError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantKind {
    Add,
    Edit,
}

/// Behaviour that distinguishes an add dialog from an edit dialog.
pub struct DialogVariant<E: FormEntry> {
    pub kind: VariantKind,
    pub title: &'static str,
    /// Notification text shown after a successful save.
    pub success_message: &'static str,
    pub create_draft: CreateDraftFn<E>,
    pub build_entry_set: BuildEntrySetFn<E>,
}

impl<E: FormEntry> Clone for DialogVariant<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: FormEntry> Copy for DialogVariant<E> {}

impl<E: FormEntry> std::fmt::Debug for DialogVariant<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogVariant")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl<E: FormEntry> PartialEq for DialogVariant<E> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.title == other.title
            && self.success_message == other.success_message
    }
}

impl<E: FormEntry> DialogVariant<E> {
    /// Default draft with a fresh id; the draft is appended on save.
    pub fn add(title: &'static str, success_message: &'static str) -> Self {
        Self {
            kind: VariantKind::Add,
            title,
            success_message,
            create_draft: add_draft::<E>,
            build_entry_set: append_entry::<E>,
        }
    }

    /// Draft copied from the target entry (identity field locked); replaces it on save.
    pub fn edit(title: &'static str, success_message: &'static str) -> Self {
        Self {
            kind: VariantKind::Edit,
            title,
            success_message,
            create_draft: edit_draft::<E>,
            build_entry_set: replace_entry::<E>,
        }
    }
}

fn add_draft<E: FormEntry>(saved: &[E], _target: Option<&E::Id>) -> Result<Draft<E>, FormError> {
    let mut entry = E::default_entry();
    entry.set_id(E::next_id(saved));
    Ok(Draft::new(entry))
}

fn edit_draft<E: FormEntry>(saved: &[E], target: Option<&E::Id>) -> Result<Draft<E>, FormError> {
    let id = target.ok_or(FormError::MissingTarget)?;
    let existing = saved
        .iter()
        .find(|entry| entry.id() == id)
        .ok_or_else(|| FormError::EntryNotFound { id: id.to_string() })?;
    Ok(Draft::create_from_existing(existing, true))
}

fn append_entry<E: FormEntry>(saved: &[E], draft: &E) -> Result<Vec<E>, FormError> {
    let mut entry = draft.clone();
    if saved.iter().any(|existing| existing.id() == entry.id()) {
        entry.set_id(E::next_id(saved));
    }
    let mut entries = saved.to_vec();
    entries.push(entry);
    Ok(entries)
}

fn replace_entry<E: FormEntry>(saved: &[E], draft: &E) -> Result<Vec<E>, FormError> {
    let position = saved
        .iter()
        .position(|existing| existing.id() == draft.id())
        .ok_or_else(|| FormError::EntryNotFound {
            id: draft.id().to_string(),
        })?;
    let mut entries = saved.to_vec();
    entries[position] = draft.clone();
    Ok(entries)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Closed,
}

/// State of one open dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct DialogModel<E: FormEntry> {
    session: Uuid,
    variant: DialogVariant<E>,
    saved: Vec<E>,
    draft: Draft<E>,
    required: Vec<E::Field>,
    errors: FieldErrors<E::Field>,
    form_valid: bool,
    phase: Phase,
}

impl<E: FormEntry> DialogModel<E> {
    /// Create the draft and run the initial validity check. No request is made.
    pub fn open(
        variant: DialogVariant<E>,
        saved: Vec<E>,
        target: Option<E::Id>,
    ) -> Result<Self, FormError> {
        let draft = (variant.create_draft)(&saved, target.as_ref())?;
        let required = validation::required_fields(draft.entry());
        let mut model = Self {
            session: Uuid::new_v4(),
            variant,
            saved,
            draft,
            required,
            errors: FieldErrors::new(),
            form_valid: false,
            phase: Phase::Idle,
        };
        model.refresh_validity();
        Ok(model)
    }

    /// Identifies this dialog instance; submit results for other sessions are stale.
    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn title(&self) -> &'static str {
        self.variant.title
    }

    pub fn variant(&self) -> &DialogVariant<E> {
        &self.variant
    }

    pub fn draft(&self) -> &Draft<E> {
        &self.draft
    }

    pub fn saved(&self) -> &[E] {
        &self.saved
    }

    pub fn required_fields(&self) -> &[E::Field] {
        &self.required
    }

    pub fn errors(&self) -> &FieldErrors<E::Field> {
        &self.errors
    }

    pub fn error(&self, field: E::Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether the save trigger should be enabled.
    pub fn is_form_valid(&self) -> bool {
        self.form_valid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Replace the collection the save is built from. The draft is left untouched.
    pub fn refresh_saved(&mut self, saved: Vec<E>) {
        self.saved = saved;
    }

    fn refresh_validity(&mut self) {
        self.form_valid =
            validation::is_form_valid(self.draft.entry(), &self.required) && self.errors.is_empty();
    }
}

/// Messages emitted by the dialog view or routed back from a submit.
#[derive(Clone, Debug, PartialEq)]
pub enum DialogMsg<E: FormEntry> {
    FieldChanged { field: E::Field, value: String },
    FieldBlurred(E::Field),
    SaveRequested,
    SubmitCompleted(Result<Value, TransportError>),
    Cancel,
}

/// Side effects requested by the dialog.
#[derive(Clone, Debug, PartialEq)]
pub enum DialogCommand<E: FormEntry> {
    /// Replace the remote collection with `entries`.
    Submit { session: Uuid, entries: Vec<E> },
}

/// Outcomes the owning screen has to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum DialogEvent {
    /// The update was accepted; the dialog is closed. `response` is the updated parent resource.
    Saved {
        response: Value,
        message: &'static str,
    },
    /// Error without a field to attach to; surface it globally. The dialog stays open.
    Failed { message: String },
    /// The user dismissed the dialog.
    Cancelled,
}

/// Apply a message to the dialog. Returns an event when the owner has to act.
pub fn update<E: Submittable>(
    model: &mut DialogModel<E>,
    msg: DialogMsg<E>,
    cmds: &mut Vec<DialogCommand<E>>,
) -> Option<DialogEvent> {
    if model.phase == Phase::Closed {
        debug!(session = %model.session, "Ignoring message for closed dialog");
        return None;
    }

    match msg {
        DialogMsg::FieldChanged { field, value } => {
            handle_change(model, field, value);
            None
        }
        DialogMsg::FieldBlurred(field) => {
            // Only fields the current discriminant requires can be "required".
            if model.required.contains(&field) && !model.draft.is_disabled(field) {
                model.errors = validation::validate_field(model.draft.entry(), &model.errors, field);
                model.refresh_validity();
            }
            None
        }
        DialogMsg::SaveRequested => handle_save(model, cmds),
        DialogMsg::SubmitCompleted(result) => handle_submit_result(model, result),
        DialogMsg::Cancel => {
            model.phase = Phase::Closed;
            Some(DialogEvent::Cancelled)
        }
    }
}

fn handle_change<E: FormEntry>(model: &mut DialogModel<E>, field: E::Field, value: String) {
    match model.draft.set_field(field, value) {
        Ok(draft) => {
            model.draft = draft;
            model.errors.remove(&field);
        }
        Err(err @ FormError::FieldDisabled { .. }) => {
            debug!(field = field.as_str(), error = %err, "Ignoring change to locked field");
            return;
        }
        Err(err) => {
            model.errors.insert(field, err.to_string());
        }
    }
    model.required = validation::required_fields(model.draft.entry());
    model.refresh_validity();
}

fn handle_save<E: FormEntry>(
    model: &mut DialogModel<E>,
    cmds: &mut Vec<DialogCommand<E>>,
) -> Option<DialogEvent> {
    if model.phase == Phase::Submitting {
        debug!(session = %model.session, "Submit already in flight; ignoring save");
        return None;
    }
    if !model.form_valid {
        debug!(session = %model.session, "Form is invalid; ignoring save");
        return None;
    }

    match (model.variant.build_entry_set)(&model.saved, model.draft.entry()) {
        Ok(entries) => {
            model.phase = Phase::Submitting;
            cmds.push(DialogCommand::Submit {
                session: model.session,
                entries,
            });
            None
        }
        Err(err) => {
            warn!(session = %model.session, error = %err, "Cannot build collection for save");
            Some(DialogEvent::Failed {
                message: err.to_string(),
            })
        }
    }
}

fn handle_submit_result<E: Submittable>(
    model: &mut DialogModel<E>,
    result: Result<Value, TransportError>,
) -> Option<DialogEvent> {
    if model.phase != Phase::Submitting {
        debug!(session = %model.session, "Discarding unexpected submit result");
        return None;
    }

    match result {
        Ok(response) => {
            model.phase = Phase::Closed;
            Some(DialogEvent::Saved {
                response,
                message: model.variant.success_message,
            })
        }
        Err(err) => {
            model.phase = Phase::Idle;
            let classified = E::classify_error(err.response_json());
            let field = classified
                .kind
                .target_field()
                .and_then(<E::Field as FieldName>::parse);
            match field {
                Some(field) => {
                    model.errors.insert(field, classified.message);
                    model.refresh_validity();
                    None
                }
                None => {
                    model.refresh_validity();
                    Some(DialogEvent::Failed {
                        message: classified.message,
                    })
                }
            }
        }
    }
}
