//! Edit-session state machine for the modal workflow.
//!
//! This module defines the transient state behind the add, edit and delete
//! dialogs and the image preview overlay. At most one dialog is open at a
//! time; opening one replaces whatever was open before, it never merges.
//!
//! # State Machine
//!
//! ```text
//!            open_add / open_edit / open_delete
//!   Idle ───────────────────────────────────────► Adding | Editing | Deleting
//!    ▲                                                     │
//!    └──────── close  or  successful completion ───────────┘
//! ```
//!
//! The image preview is an overlay: `open_image` and `close_image` never touch
//! the underlying session.
//!
//! # Epochs
//!
//! Every open and close bumps a monotonically increasing epoch. Asynchronous
//! work (store calls, image encodes) records the epoch it was issued under,
//! and its completion only affects the session if the epoch still matches.
//! A late image decode can therefore never land in a dialog opened later.

use crate::domain::{Employee, Result, RosterError};

/// Which dialog an image attachment is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    /// The pending image of the add dialog.
    Add,
    /// The `image_url` of the record being edited.
    Edit,
}

/// Identifies the session an asynchronous image encode belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    /// Session epoch when the encode was requested.
    pub epoch: u64,
    /// Slot the encoded image is routed to.
    pub target: ImageTarget,
}

/// The open dialog, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No dialog open.
    #[default]
    Idle,

    /// Add dialog, with an optional attached image as a data or http(s) URL.
    Adding {
        /// Overrides the submitted payload's `image_url` when set.
        pending_image: Option<String>,
    },

    /// Edit dialog over a private copy of the record.
    Editing(Employee),

    /// Delete confirmation for a private copy of the record.
    Deleting(Employee),
}

/// The image preview overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub url: String,
    pub name: Option<String>,
}

/// Flattened view of the session for rendering and key hints.
///
/// The preview overlay wins over the dialog underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Adding,
    Editing,
    Deleting,
    ViewingImage,
}

/// Transient modal state plus its epoch counter.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    session: Session,
    preview: Option<ImagePreview>,
    epoch: u64,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the add dialog with no pending image.
    pub fn open_add(&mut self) {
        self.transition(Session::Adding { pending_image: None });
    }

    /// Opens the edit dialog over a copy of `record`.
    pub fn open_edit(&mut self, record: &Employee) {
        self.transition(Session::Editing(record.clone()));
    }

    /// Opens the delete confirmation for a copy of `record`.
    pub fn open_delete(&mut self, record: &Employee) {
        self.transition(Session::Deleting(record.clone()));
    }

    /// Cancels whatever dialog is open and returns to `Idle`.
    pub fn close(&mut self) {
        self.transition(Session::Idle);
    }

    /// Shows the image preview overlay.
    pub fn open_image(&mut self, url: impl Into<String>, name: Option<String>) {
        let url = url.into();
        tracing::debug!(image = %crate::domain::ImageSource::classify(&url).badge(), "image preview opened");
        self.preview = Some(ImagePreview { url, name });
    }

    pub fn close_image(&mut self) {
        self.preview = None;
    }

    fn transition(&mut self, next: Session) {
        self.epoch += 1;
        tracing::debug!(
            epoch = self.epoch,
            from = ?mode_of(&self.session),
            to = ?mode_of(&next),
            "edit session transition"
        );
        self.session = next;
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        if self.preview.is_some() {
            return SessionMode::ViewingImage;
        }
        mode_of(&self.session)
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.session, Session::Idle)
    }

    /// The pending image of an open add dialog.
    #[must_use]
    pub fn pending_image(&self) -> Option<&str> {
        match &self.session {
            Session::Adding { pending_image } => pending_image.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&Employee> {
        match &self.session {
            Session::Editing(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub const fn deleting(&self) -> Option<&Employee> {
        match &self.session {
            Session::Deleting(record) => Some(record),
            _ => None,
        }
    }

    /// Builds the create payload for the add dialog.
    ///
    /// A pending image overrides `payload.image_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] if no add dialog is open or the
    /// payload already carries an id.
    pub fn prepare_add(&self, mut payload: Employee) -> Result<Employee> {
        let Session::Adding { pending_image } = &self.session else {
            return Err(RosterError::Validation("no add dialog is open".to_string()));
        };
        if let Some(id) = payload.id {
            return Err(RosterError::Validation(format!("new employee must not carry an id, got {id}")));
        }

        if let Some(image) = pending_image {
            payload.image_url = Some(image.clone());
        }
        Ok(payload)
    }

    /// Builds the update payload for the edit dialog.
    ///
    /// The edited record's `image_url`, if set, overrides the payload's. A
    /// payload without id takes the edited record's id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] if no edit dialog is open or if
    /// neither the payload nor the edited record carries an id.
    pub fn prepare_edit(&self, mut payload: Employee) -> Result<Employee> {
        let Session::Editing(record) = &self.session else {
            return Err(RosterError::Validation("no edit dialog is open".to_string()));
        };

        if record.image_url.is_some() {
            payload.image_url.clone_from(&record.image_url);
        }
        if payload.id.is_none() {
            payload.id = record.id;
        }
        if payload.id.is_none() {
            return Err(RosterError::Validation("employee to update has no id".to_string()));
        }
        Ok(payload)
    }

    /// Issues a ticket for an image encode aimed at `target`.
    ///
    /// Returns `None` when the open dialog does not accept that target.
    #[must_use]
    pub const fn image_ticket(&self, target: ImageTarget) -> Option<ImageTicket> {
        if self.accepts(target) {
            Some(ImageTicket {
                epoch: self.epoch,
                target,
            })
        } else {
            None
        }
    }

    /// Routes an encoded image to its slot if the ticket is still current.
    ///
    /// Returns `true` if the image was applied.
    pub fn apply_image(&mut self, ticket: ImageTicket, data_url: String) -> bool {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "dropping image from a closed session"
            );
            return false;
        }
        self.set_image(ticket.target, Some(data_url))
    }

    /// Sets an image slot from a URL typed by the user. A blank value clears it.
    ///
    /// Returns `true` if the open dialog accepted the target.
    pub fn set_image_from_url(&mut self, value: &str, target: ImageTarget) -> bool {
        let value = value.trim();
        let image = (!value.is_empty()).then(|| value.to_string());
        self.set_image(target, image)
    }

    fn set_image(&mut self, target: ImageTarget, image: Option<String>) -> bool {
        match (&mut self.session, target) {
            (Session::Adding { pending_image }, ImageTarget::Add) => {
                *pending_image = image;
                true
            }
            (Session::Editing(record), ImageTarget::Edit) => {
                record.image_url = image;
                true
            }
            _ => {
                tracing::debug!(image_target = ?target, mode = ?mode_of(&self.session), "image target does not match open dialog");
                false
            }
        }
    }

    const fn accepts(&self, target: ImageTarget) -> bool {
        matches!(
            (&self.session, target),
            (Session::Adding { .. }, ImageTarget::Add) | (Session::Editing(_), ImageTarget::Edit)
        )
    }

    /// Returns to `Idle` after a successful store call issued at `origin_epoch`.
    ///
    /// A session reopened since then is left alone. Returns `true` if the
    /// session was closed.
    pub fn finish(&mut self, origin_epoch: u64) -> bool {
        if origin_epoch == self.epoch && !self.is_idle() {
            self.close();
            true
        } else {
            false
        }
    }
}

const fn mode_of(session: &Session) -> SessionMode {
    match session {
        Session::Idle => SessionMode::Idle,
        Session::Adding { .. } => SessionMode::Adding,
        Session::Editing(_) => SessionMode::Editing,
        Session::Deleting(_) => SessionMode::Deleting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Employee {
        Employee::new("Ann Lee")
            .with_id(1)
            .with_email("ann@corp.io")
            .with_image_url("https://cdn.corp.io/ann.png")
    }

    #[test]
    fn opening_replaces_previous_session_and_bumps_epoch() {
        let mut session = EditSession::new();
        assert_eq!(session.mode(), SessionMode::Idle);

        session.open_add();
        let add_epoch = session.epoch();
        session.open_edit(&ann());
        assert!(session.epoch() > add_epoch);
        assert_eq!(session.mode(), SessionMode::Editing);
        assert!(session.pending_image().is_none());

        session.open_delete(&ann());
        assert!(session.editing().is_none());
        assert_eq!(session.deleting().and_then(|e| e.id), Some(1));
    }

    #[test]
    fn editing_copy_is_independent_of_source() {
        let mut source = ann();
        let mut session = EditSession::new();
        session.open_edit(&source);

        source.name = "Changed".to_string();
        assert_eq!(session.editing().map(|e| e.name.as_str()), Some("Ann Lee"));

        assert!(session.set_image_from_url("https://x.io/b.png", ImageTarget::Edit));
        assert_eq!(source.image_url.as_deref(), Some("https://cdn.corp.io/ann.png"));
    }

    #[test]
    fn image_overlay_keeps_underlying_session() {
        let mut session = EditSession::new();
        session.open_edit(&ann());
        let epoch = session.epoch();

        session.open_image("https://cdn.corp.io/ann.png", Some("Ann Lee".to_string()));
        assert_eq!(session.mode(), SessionMode::ViewingImage);
        assert_eq!(session.epoch(), epoch);

        session.close_image();
        assert_eq!(session.mode(), SessionMode::Editing);
    }

    #[test]
    fn prepare_add_prefers_pending_image() {
        let mut session = EditSession::new();
        session.open_add();
        let payload = Employee::new("X").with_image_url("https://typed.io/x.png");

        let unchanged = session.prepare_add(payload.clone()).unwrap();
        assert_eq!(unchanged.image_url.as_deref(), Some("https://typed.io/x.png"));

        assert!(session.set_image_from_url("data:image/png;base64,AAAA", ImageTarget::Add));
        let merged = session.prepare_add(payload).unwrap();
        assert_eq!(merged.image_url.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn prepare_add_rejects_payload_with_id() {
        let mut session = EditSession::new();
        session.open_add();
        let err = session.prepare_add(Employee::new("X").with_id(1)).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }

    #[test]
    fn prepare_edit_fills_id_and_image_from_record() {
        let mut session = EditSession::new();
        session.open_edit(&ann());

        let payload = Employee::new("Ann Q. Lee").with_image_url("https://ignored.io/a.png");
        let prepared = session.prepare_edit(payload).unwrap();
        assert_eq!(prepared.id, Some(1));
        assert_eq!(prepared.image_url.as_deref(), Some("https://cdn.corp.io/ann.png"));
        assert_eq!(prepared.name, "Ann Q. Lee");
    }

    #[test]
    fn prepare_edit_without_any_id_is_rejected() {
        let mut session = EditSession::new();
        session.open_edit(&Employee::new("Unsaved"));
        let err = session.prepare_edit(Employee::new("Unsaved")).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }

    #[test]
    fn prepare_requires_matching_dialog() {
        let session = EditSession::new();
        assert!(session.prepare_add(Employee::new("X")).is_err());
        assert!(session.prepare_edit(Employee::new("X").with_id(1)).is_err());
    }

    #[test]
    fn late_image_for_reopened_session_is_dropped() {
        let mut session = EditSession::new();
        session.open_edit(&ann());
        let ticket = session.image_ticket(ImageTarget::Edit).unwrap();

        session.close();
        session.open_edit(&ann());

        assert!(!session.apply_image(ticket, "data:image/png;base64,AAAA".to_string()));
        assert_eq!(
            session.editing().and_then(|e| e.image_url.as_deref()),
            Some("https://cdn.corp.io/ann.png")
        );
    }

    #[test]
    fn image_ticket_requires_matching_target() {
        let mut session = EditSession::new();
        assert!(session.image_ticket(ImageTarget::Add).is_none());

        session.open_add();
        assert!(session.image_ticket(ImageTarget::Edit).is_none());
        let ticket = session.image_ticket(ImageTarget::Add).unwrap();
        assert!(session.apply_image(ticket, "data:image/gif;base64,R0lG".to_string()));
        assert_eq!(session.pending_image(), Some("data:image/gif;base64,R0lG"));
    }

    #[test]
    fn blank_url_clears_slot() {
        let mut session = EditSession::new();
        session.open_edit(&ann());
        assert!(session.set_image_from_url("   ", ImageTarget::Edit));
        assert_eq!(session.editing().and_then(|e| e.image_url.clone()), None);
    }

    #[test]
    fn finish_only_closes_the_originating_session() {
        let mut session = EditSession::new();
        session.open_add();
        let origin = session.epoch();

        session.open_edit(&ann());
        assert!(!session.finish(origin));
        assert_eq!(session.mode(), SessionMode::Editing);

        let current = session.epoch();
        assert!(session.finish(current));
        assert!(session.is_idle());
    }
}
