//! Application layer coordinating state, events, and actions.
//!
//! This module is the client-side core: it sits between the front-end
//! (main.rs) and the remote store, and implements the event-driven loop that
//! keeps the employee cache, the search view and the edit dialogs consistent.
//!
//! # Architecture
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └────── Store / Image Completions ─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`cache`]: Ordered, id-keyed employee collection
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`publisher`]: Replay-latest stream of the filtered view
//! - [`search`]: Substring search with name-prefix ranking
//! - [`session`]: Edit-session state machine for the dialogs
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod cache;
pub mod handler;
pub mod publisher;
pub mod search;
pub mod session;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use session::{EditSession, ImageTarget, ImageTicket, Session, SessionMode};
pub use state::AppState;
