// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Saved collection plus the one dialog that may be open on top of it.
//!
//! Both settings pages embed this component. It routes dialog messages, deletes entries and
//! applies submit results. A dialog that is gone is never touched again, but a collection the
//! server confirmed for it still becomes the saved one.

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::components::PageEvent;
use crate::components::dialog::{self, DialogCommand, DialogEvent, DialogModel, DialogMsg, DialogVariant};
use crate::error::{FormError, TransportError};
use crate::logic::submit::Submittable;

/// User-facing texts of one collection page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    pub add_title: &'static str,
    pub edit_title: &'static str,
    pub added: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
    /// Shown when a stored or returned collection cannot be decoded.
    pub load_failed: &'static str,
}

/// Which action a submit result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOrigin {
    Dialog(Uuid),
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionModel<E: Submittable> {
    labels: Labels,
    saved: Vec<E>,
    dialog: Option<DialogModel<E>>,
    deleting: bool,
}

impl<E: Submittable> CollectionModel<E> {
    pub fn new(labels: Labels) -> Self {
        Self {
            labels,
            saved: Vec::new(),
            dialog: None,
            deleting: false,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn saved(&self) -> &[E] {
        &self.saved
    }

    pub fn dialog(&self) -> Option<&DialogModel<E>> {
        self.dialog.as_ref()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CollectionMsg<E: Submittable> {
    /// Replace the saved collection, e.g. after the owner fetched it.
    Loaded(Vec<E>),
    OpenAdd,
    OpenEdit(E::Id),
    Dialog(DialogMsg<E>),
    Delete(E::Id),
    SubmitCompleted {
        origin: SubmitOrigin,
        result: Result<Value, TransportError>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CollectionCommand<E: Submittable> {
    Submit {
        origin: SubmitOrigin,
        entries: Vec<E>,
    },
}

pub fn update<E: Submittable>(
    model: &mut CollectionModel<E>,
    msg: CollectionMsg<E>,
    cmds: &mut Vec<CollectionCommand<E>>,
) -> Option<PageEvent> {
    match msg {
        CollectionMsg::Loaded(entries) => {
            model.saved = entries;
            None
        }
        CollectionMsg::OpenAdd => {
            let variant = DialogVariant::add(model.labels.add_title, model.labels.added);
            open_dialog(model, variant, None)
        }
        CollectionMsg::OpenEdit(id) => {
            let variant = DialogVariant::edit(model.labels.edit_title, model.labels.updated);
            open_dialog(model, variant, Some(id))
        }
        CollectionMsg::Dialog(msg) => forward_to_dialog(model, msg, cmds),
        CollectionMsg::Delete(id) => handle_delete(model, id, cmds),
        CollectionMsg::SubmitCompleted { origin, result } => match origin {
            SubmitOrigin::Dialog(session) => {
                let current = model.dialog.as_ref().map(DialogModel::session);
                if current != Some(session) {
                    adopt_orphaned_save(model, session, result);
                    return None;
                }
                forward_to_dialog(model, DialogMsg::SubmitCompleted(result), cmds)
            }
            SubmitOrigin::Delete => handle_delete_result(model, result),
        },
    }
}

fn open_dialog<E: Submittable>(
    model: &mut CollectionModel<E>,
    variant: DialogVariant<E>,
    target: Option<E::Id>,
) -> Option<PageEvent> {
    if model.deleting {
        debug!(collection = E::COLLECTION, "Delete in flight; not opening dialog");
        return None;
    }
    if let Some(previous) = &model.dialog {
        debug!(session = %previous.session(), "Replacing open dialog");
    }
    match DialogModel::open(variant, model.saved.clone(), target) {
        Ok(dialog) => {
            model.dialog = Some(dialog);
            None
        }
        Err(err) => {
            warn!(collection = E::COLLECTION, error = %err, "Cannot open dialog");
            model.dialog = None;
            Some(PageEvent::error(err.to_string()))
        }
    }
}

fn forward_to_dialog<E: Submittable>(
    model: &mut CollectionModel<E>,
    msg: DialogMsg<E>,
    cmds: &mut Vec<CollectionCommand<E>>,
) -> Option<PageEvent> {
    let Some(dialog) = model.dialog.as_mut() else {
        debug!(collection = E::COLLECTION, "No dialog open; dropping message");
        return None;
    };

    // Build the submitted collection from what the server last confirmed.
    if matches!(msg, DialogMsg::SaveRequested) {
        dialog.refresh_saved(model.saved.clone());
    }

    let mut dialog_cmds = Vec::new();
    let event = dialog::update(dialog, msg, &mut dialog_cmds);
    for cmd in dialog_cmds {
        match cmd {
            DialogCommand::Submit { session, entries } => cmds.push(CollectionCommand::Submit {
                origin: SubmitOrigin::Dialog(session),
                entries,
            }),
        }
    }

    match event? {
        DialogEvent::Saved { response, message } => {
            model.dialog = None;
            Some(apply_saved(model, &response, message))
        }
        DialogEvent::Failed { message } => Some(PageEvent::error(message)),
        DialogEvent::Cancelled => {
            model.dialog = None;
            None
        }
    }
}

fn handle_delete<E: Submittable>(
    model: &mut CollectionModel<E>,
    id: E::Id,
    cmds: &mut Vec<CollectionCommand<E>>,
) -> Option<PageEvent> {
    if model.deleting {
        debug!(collection = E::COLLECTION, %id, "Delete already in flight; ignoring");
        return None;
    }
    if let Some(dialog) = &model.dialog {
        debug!(collection = E::COLLECTION, %id, session = %dialog.session(), "Dialog open; ignoring delete");
        return None;
    }
    if !model.saved.iter().any(|entry| entry.id() == &id) {
        return Some(PageEvent::error(
            FormError::EntryNotFound { id: id.to_string() }.to_string(),
        ));
    }

    let entries = model
        .saved
        .iter()
        .filter(|entry| entry.id() != &id)
        .cloned()
        .collect();
    model.deleting = true;
    cmds.push(CollectionCommand::Submit {
        origin: SubmitOrigin::Delete,
        entries,
    });
    None
}

fn handle_delete_result<E: Submittable>(
    model: &mut CollectionModel<E>,
    result: Result<Value, TransportError>,
) -> Option<PageEvent> {
    model.deleting = false;
    let deleted = model.labels.deleted;
    match result {
        Ok(response) => Some(apply_saved(model, &response, deleted)),
        Err(err) => {
            warn!(collection = E::COLLECTION, error = %err, "Delete rejected");
            Some(PageEvent::error(model.labels.delete_failed))
        }
    }
}

/// A dialog closed before its save completed. The server still replaced the collection, so a
/// successful response is adopted without notifying anyone.
fn adopt_orphaned_save<E: Submittable>(
    model: &mut CollectionModel<E>,
    session: Uuid,
    result: Result<Value, TransportError>,
) {
    let Ok(response) = result else {
        debug!(%session, collection = E::COLLECTION, "Discarding failure for closed dialog");
        return;
    };
    match E::decode_collection(&response) {
        Ok(entries) => {
            debug!(%session, collection = E::COLLECTION, entries = entries.len(), "Adopting save of closed dialog");
            model.saved = entries;
        }
        Err(err) => {
            warn!(%session, collection = E::COLLECTION, error = %err, "Cannot decode save of closed dialog");
        }
    }
}

/// Adopt the collection returned by the server.
fn apply_saved<E: Submittable>(
    model: &mut CollectionModel<E>,
    response: &Value,
    message: &'static str,
) -> PageEvent {
    match E::decode_collection(response) {
        Ok(entries) => {
            info!(collection = E::COLLECTION, entries = entries.len(), "Saved collection updated");
            model.saved = entries;
            PageEvent::info(message)
        }
        Err(err) => {
            warn!(collection = E::COLLECTION, error = %err, "Cannot decode saved collection");
            PageEvent::error(model.labels.load_failed)
        }
    }
}
