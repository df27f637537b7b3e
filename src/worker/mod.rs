//! Background work for store calls and image encoding.
//!
//! Everything that may block (network round-trips, file writes, image
//! decoding) runs here, on the tokio runtime, and reports back to the event
//! loop as events.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with span propagation
//! - `handler`: [`StoreWorker`] and action execution
//! - `image`: Image bytes to data URL encoding

pub mod handler;
pub mod image;
pub mod messages;

pub use handler::StoreWorker;
pub use messages::{OpKind, StoreOp, StoreOutcome, StoreRequest, StoreResponse};
