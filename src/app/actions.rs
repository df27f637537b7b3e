//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, the imperative commands produced by
//! the event handler. Actions are the boundary between pure state transitions
//! and effectful work: remote store calls and image decoding both run on the
//! tokio runtime and report back as events.
//!
//! # Example
//!
//! ```
//! use roster::app::Action;
//! use roster::worker::StoreRequest;
//!
//! let actions = vec![Action::PostToStore(StoreRequest::list(0))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::app::session::ImageTicket;
use crate::worker::StoreRequest;

/// Commands to be executed by the runtime.
///
/// Produced by [`handle_event`](crate::app::handle_event) and executed by
/// [`StoreWorker::execute`](crate::worker::StoreWorker::execute).
#[derive(Debug, Clone)]
pub enum Action {
    /// Runs a remote store operation.
    ///
    /// The completion comes back as
    /// [`Event::StoreResponse`](crate::app::Event::StoreResponse).
    PostToStore(StoreRequest),

    /// Encodes raw image bytes into a data URL off the event loop.
    ///
    /// The completion comes back as
    /// [`Event::ImageEncoded`](crate::app::Event::ImageEncoded) carrying the
    /// same ticket.
    EncodeImage {
        /// Session epoch and slot the result belongs to.
        ticket: ImageTicket,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
}
