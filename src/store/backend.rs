//! Remote store abstraction.
//!
//! This module defines the [`EmployeeStore`] trait over the five CRUD calls of
//! the employee service. The worker only ever talks to a `dyn EmployeeStore`,
//! so the HTTP client and the offline JSON file are interchangeable.

use crate::domain::{Employee, EmployeeId, Result};
use async_trait::async_trait;

/// Asynchronous CRUD access to employee records.
///
/// Failures are reported with the remote error classes:
/// [`Transport`](crate::RosterError::Transport),
/// [`NotFound`](crate::RosterError::NotFound) and
/// [`Validation`](crate::RosterError::Validation).
///
/// # Implementations
///
/// - [`HttpEmployeeStore`](super::HttpEmployeeStore): the remote REST service
/// - [`JsonEmployeeStore`](super::JsonEmployeeStore): a local JSON file
///
/// # Examples
///
/// ```no_run
/// use roster::store::{EmployeeStore, JsonEmployeeStore};
///
/// # async fn demo() -> roster::Result<()> {
/// let store = JsonEmployeeStore::open("/tmp/employees.json")?;
/// let everyone = store.list().await?;
/// println!("{} employees", everyone.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fetches every record, in store order.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the store cannot be reached or answers badly.
    async fn list(&self) -> Result<Vec<Employee>>;

    /// Persists a new record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the payload is rejected.
    async fn create(&self, employee: Employee) -> Result<Employee>;

    /// Overwrites the record with `employee.id` and returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the payload has no id or is rejected, and
    /// `NotFound` if no record has that id.
    async fn update(&self, employee: Employee) -> Result<Employee>;

    /// Removes the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has that id.
    async fn delete(&self, id: EmployeeId) -> Result<()>;

    /// Fetches the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has that id.
    async fn fetch_by_id(&self, id: EmployeeId) -> Result<Employee>;
}
