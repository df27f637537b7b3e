//! Store adapters for the employee service.
//!
//! # Modules
//!
//! - `backend`: The [`EmployeeStore`] trait
//! - `http`: REST client for the remote service
//! - `json`: Offline JSON file store with the same semantics

pub mod backend;
pub mod http;
pub mod json;

pub use backend::EmployeeStore;
pub use http::HttpEmployeeStore;
pub use json::JsonEmployeeStore;
