//! User interface rendering layer.
//!
//! This module turns view models into ANSI-styled text for the terminal
//! front-end.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`helpers`]: Shared rendering utilities (highlighting, padding)

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, ModalInfo, SearchBarInfo, UIViewModel,
};
