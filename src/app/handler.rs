//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user intents and
//! asynchronous completions, translating them into state changes and action
//! sequences. It is the only code that mutates [`AppState`].
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the front-end or from the worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` and `EditSession` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Search**: `Search`
//! - **Dialogs**: `OpenAdd`, `OpenEdit`, `OpenDelete`, `CloseModal`,
//!   `OpenImage`, `CloseImage`
//! - **Commands**: `SubmitAdd`, `SubmitEdit`, `ConfirmDelete`, `Reload`,
//!   `Refresh`
//! - **Images**: `ImageFromFile`, `ImageFromUrl`
//! - **Completions**: `ImageEncoded`, `StoreResponse`
//!
//! The cache only changes on a successful `StoreResponse`; there are no
//! optimistic updates.
//!
//! # Example
//!
//! ```
//! use roster::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::new();
//! let (render, actions) = handle_event(&mut state, Event::Reload)?;
//! assert!(!render);
//! assert!(matches!(actions.as_slice(), [Action::PostToStore(_)]));
//! # Ok::<(), roster::RosterError>(())
//! ```

use crate::app::session::{ImageTarget, ImageTicket};
use crate::app::{Action, AppState};
use crate::domain::{Employee, EmployeeId, Result};
use crate::worker::{StoreOutcome, StoreRequest, StoreResponse};

/// Events triggered by the user or by completed background work.
#[derive(Debug)]
pub enum Event {
    /// Replaces the active search query.
    Search(String),

    /// Re-fetches every record and reloads the cache, keeping the query.
    Reload,

    /// Re-fetches one record and writes it back into the cache.
    Refresh(EmployeeId),

    /// Opens the add dialog.
    OpenAdd,

    /// Opens the edit dialog over a copy of the record.
    OpenEdit(Employee),

    /// Opens the delete confirmation for the record.
    OpenDelete(Employee),

    /// Shows the image preview overlay.
    OpenImage {
        /// Image to show.
        url: String,
        /// Caption, usually the employee's name.
        name: Option<String>,
    },

    /// Hides the image preview overlay.
    CloseImage,

    /// Cancels the open dialog.
    CloseModal,

    /// Submits the add dialog.
    SubmitAdd(Employee),

    /// Submits the edit dialog.
    SubmitEdit(Employee),

    /// Confirms deletion. `None` is ignored.
    ConfirmDelete(Option<EmployeeId>),

    /// Attaches an image file; it is encoded to a data URL in the background.
    ImageFromFile {
        /// Raw file contents.
        bytes: Vec<u8>,
        /// Dialog slot the image is for.
        target: ImageTarget,
    },

    /// Attaches an image by URL. A blank value clears the slot.
    ImageFromUrl {
        /// URL as typed.
        value: String,
        /// Dialog slot the image is for.
        target: ImageTarget,
    },

    /// Completion of an [`Action::EncodeImage`].
    ImageEncoded {
        /// Ticket the encode was issued with.
        ticket: ImageTicket,
        /// The data URL, or why the bytes were rejected.
        result: Result<String>,
    },

    /// Completion of an [`Action::PostToStore`].
    StoreResponse(StoreResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// `(render, actions)`: whether anything visible changed, and the side effects
/// to run. Either may be empty.
///
/// # Errors
///
/// - [`RosterError::Validation`](crate::RosterError::Validation) when a submit
///   does not match the open dialog or an update has no id
/// - Any remote error carried by a failed `StoreResponse`
/// - [`RosterError::ImageDecode`](crate::RosterError::ImageDecode) from a
///   failed encode for the still-open dialog
///
/// In every error case the cache and the edit session are left unchanged.
pub fn handle_event(state: &mut AppState, event: Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();
    let epoch = state.session.epoch();

    match event {
        Event::Search(query) => {
            state.set_query(query);
            Ok((true, vec![]))
        }
        Event::Reload => Ok((false, vec![Action::PostToStore(StoreRequest::list(epoch))])),
        Event::Refresh(id) => Ok((
            false,
            vec![Action::PostToStore(StoreRequest::fetch_by_id(id, epoch))],
        )),
        Event::OpenAdd => {
            state.session.open_add();
            Ok((true, vec![]))
        }
        Event::OpenEdit(record) => {
            tracing::debug!(employee_id = ?record.id, "opening edit dialog");
            state.session.open_edit(&record);
            Ok((true, vec![]))
        }
        Event::OpenDelete(record) => {
            tracing::debug!(employee_id = ?record.id, "opening delete confirmation");
            state.session.open_delete(&record);
            Ok((true, vec![]))
        }
        Event::OpenImage { url, name } => {
            state.session.open_image(url, name);
            Ok((true, vec![]))
        }
        Event::CloseImage => {
            state.session.close_image();
            Ok((true, vec![]))
        }
        Event::CloseModal => {
            state.session.close();
            Ok((true, vec![]))
        }
        Event::SubmitAdd(payload) => {
            let payload = state.session.prepare_add(payload)?;
            tracing::debug!(name = %payload.name, image = payload.image_source().badge(), "submitting new employee");
            Ok((false, vec![Action::PostToStore(StoreRequest::create(payload, epoch))]))
        }
        Event::SubmitEdit(payload) => {
            let payload = state.session.prepare_edit(payload)?;
            tracing::debug!(employee_id = ?payload.id, "submitting employee update");
            Ok((false, vec![Action::PostToStore(StoreRequest::update(payload, epoch))]))
        }
        Event::ConfirmDelete(None) => {
            tracing::debug!("delete confirmed without an id, ignoring");
            Ok((false, vec![]))
        }
        Event::ConfirmDelete(Some(id)) => {
            tracing::debug!(employee_id = id, "delete confirmed");
            Ok((false, vec![Action::PostToStore(StoreRequest::delete(id, epoch))]))
        }
        Event::ImageFromFile { bytes, target } => {
            let Some(ticket) = state.session.image_ticket(target) else {
                tracing::debug!(image_target = ?target, "no dialog accepts this image, ignoring file");
                return Ok((false, vec![]));
            };
            tracing::debug!(image_target = ?target, size = bytes.len(), "encoding image file");
            Ok((false, vec![Action::EncodeImage { ticket, bytes }]))
        }
        Event::ImageFromUrl { value, target } => {
            let applied = state.session.set_image_from_url(&value, target);
            Ok((applied, vec![]))
        }
        Event::ImageEncoded { ticket, result } => match result {
            Ok(data_url) => Ok((state.session.apply_image(ticket, data_url), vec![])),
            Err(error) if ticket.epoch == epoch => {
                tracing::error!(error = %error, "image could not be attached");
                Err(error)
            }
            Err(error) => {
                tracing::debug!(error = %error, "ignoring failed encode for a closed dialog");
                Ok((false, vec![]))
            }
        },
        Event::StoreResponse(response) => handle_store_response(state, response),
    }
}

/// Applies a store completion to the cache and, if still current, the session.
fn handle_store_response(state: &mut AppState, response: StoreResponse) -> Result<(bool, Vec<Action>)> {
    let StoreResponse { request_id, origin, outcome } = response;

    match outcome {
        StoreOutcome::Listed(records) => {
            tracing::debug!(request_id = request_id, count = records.len(), "employees listed");
            state.load_employees(records);
            Ok((true, vec![]))
        }
        StoreOutcome::Created(record) => {
            tracing::debug!(request_id = request_id, employee_id = ?record.id, "employee created");
            let changed = state.insert_employee(record);
            let closed = state.session.finish(origin);
            Ok((changed || closed, vec![]))
        }
        StoreOutcome::Updated(record) => {
            tracing::debug!(request_id = request_id, employee_id = ?record.id, "employee updated");
            let changed = state.replace_employee(record);
            let closed = state.session.finish(origin);
            Ok((changed || closed, vec![]))
        }
        StoreOutcome::Deleted(id) => {
            tracing::debug!(request_id = request_id, employee_id = id, "employee deleted");
            let changed = state.remove_employee(id);
            let closed = state.session.finish(origin);
            Ok((changed || closed, vec![]))
        }
        StoreOutcome::Fetched(record) => {
            tracing::debug!(request_id = request_id, employee_id = ?record.id, "employee refreshed");
            Ok((state.replace_employee(record), vec![]))
        }
        StoreOutcome::Failed { op, error } => {
            tracing::error!(request_id = request_id, op = %op, error = %error, "store request failed");
            Err(error)
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Search(_) => "search",
        Event::Reload => "reload",
        Event::Refresh(_) => "refresh",
        Event::OpenAdd => "open_add",
        Event::OpenEdit(_) => "open_edit",
        Event::OpenDelete(_) => "open_delete",
        Event::OpenImage { .. } => "open_image",
        Event::CloseImage => "close_image",
        Event::CloseModal => "close_modal",
        Event::SubmitAdd(_) => "submit_add",
        Event::SubmitEdit(_) => "submit_edit",
        Event::ConfirmDelete(_) => "confirm_delete",
        Event::ImageFromFile { .. } => "image_from_file",
        Event::ImageFromUrl { .. } => "image_from_url",
        Event::ImageEncoded { .. } => "image_encoded",
        Event::StoreResponse(_) => "store_response",
    }
}
