//! Domain layer for the roster client.
//!
//! This module contains the core domain types, independent of the HTTP
//! transport, the terminal front-end or the async runtime.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`employee`]: Employee record and image source classification
//!
//! # Examples
//!
//! ```
//! use roster::domain::{Employee, Result};
//!
//! fn draft() -> Result<Employee> {
//!     Ok(Employee::new("Ann Lee").with_email("ann@example.com"))
//! }
//! ```

pub mod employee;
pub mod error;

pub use employee::{Employee, EmployeeId, ImageSource};
pub use error::{Result, RosterError};
