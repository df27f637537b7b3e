//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves where roster keeps its configuration, offline store
//! and logs, and expands user-typed paths.

pub mod paths;

pub use paths::{config_file, data_dir, expand_tilde};
