//! Store request and response types exchanged with the worker.
//!
//! This module defines the protocol between the single-writer event loop and
//! the [`StoreWorker`](super::StoreWorker) that runs remote calls on the tokio
//! runtime. Each request carries the id of the edit-session epoch it was issued
//! under, so that its completion can tell whether the dialog it belongs to is
//! still open, and the tracing span it was issued from, so that worker logs
//! nest under the event that caused them.

use crate::domain::{Employee, EmployeeId, RosterError};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Macro to generate builder methods for `StoreRequest` operations.
///
/// Generates convenience constructors that stamp a fresh request id and
/// capture the current span.
macro_rules! store_request_builders {
    (
        $(
            $builder_name:ident($variant:ident $(( $field:ident: $ty:ty ))?)
        ),* $(,)?
    ) => {
        impl StoreRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request issued at session epoch `origin`")]
                #[must_use]
                pub fn $builder_name($($field: $ty,)? origin: u64) -> Self {
                    Self::new(StoreOp::$variant $(($field))?, origin)
                }
            )*
        }
    };
}

store_request_builders! {
    list(List),
    create(Create(employee: Employee)),
    update(Update(employee: Employee)),
    delete(Delete(id: EmployeeId)),
    fetch_by_id(FetchById(id: EmployeeId)),
}

/// Remote operations the worker knows how to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// Fetch every record.
    List,
    /// Persist a new record; the store assigns the id.
    Create(Employee),
    /// Overwrite an existing record by id.
    Update(Employee),
    /// Remove a record by id.
    Delete(EmployeeId),
    /// Fetch one record by id.
    FetchById(EmployeeId),
}

impl StoreOp {
    /// Short operation name for logs and error reports.
    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            Self::List => OpKind::List,
            Self::Create(_) => OpKind::Create,
            Self::Update(_) => OpKind::Update,
            Self::Delete(_) => OpKind::Delete,
            Self::FetchById(_) => OpKind::FetchById,
        }
    }
}

/// Discriminant of [`StoreOp`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    List,
    Create,
    Update,
    Delete,
    FetchById,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::FetchById => "fetch_by_id",
        };
        f.write_str(name)
    }
}

/// A request posted to the worker.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    /// Process-unique id, echoed in the response.
    pub id: u64,

    /// Edit-session epoch when the request was issued.
    pub origin: u64,

    /// The operation to run.
    pub op: StoreOp,

    /// Span active when the request was issued; worker spans are its children.
    pub span: tracing::Span,
}

impl StoreRequest {
    /// Creates a request with a fresh id, capturing the current span.
    #[must_use]
    pub fn new(op: StoreOp, origin: u64) -> Self {
        let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(request_id = id, op = %op.kind(), origin_epoch = origin, "store request issued");
        Self {
            id,
            origin,
            op,
            span: tracing::Span::current(),
        }
    }
}

/// The worker's answer to a [`StoreRequest`].
#[derive(Debug)]
pub struct StoreResponse {
    /// Id of the request this answers.
    pub request_id: u64,

    /// Edit-session epoch copied from the request.
    pub origin: u64,

    pub outcome: StoreOutcome,
}

/// Result of a store operation.
#[derive(Debug)]
pub enum StoreOutcome {
    /// All records, in server order.
    Listed(Vec<Employee>),

    /// The record as created, carrying its new id.
    Created(Employee),

    /// The record as stored after the update.
    Updated(Employee),

    /// The id that was deleted.
    Deleted(EmployeeId),

    /// A freshly fetched single record.
    Fetched(Employee),

    /// The operation failed; nothing in the cache or session should change.
    Failed {
        /// Which operation failed.
        op: OpKind,

        /// Why it failed.
        error: RosterError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_stamp_unique_ids_and_origin() {
        let first = StoreRequest::list(3);
        let second = StoreRequest::delete(7, 4);

        assert_ne!(first.id, second.id);
        assert_eq!(first.origin, 3);
        assert_eq!(first.op, StoreOp::List);
        assert_eq!(second.op, StoreOp::Delete(7));
        assert_eq!(second.op.kind().to_string(), "delete");
    }

    #[test]
    fn create_builder_keeps_payload() {
        let request = StoreRequest::create(Employee::new("Ann"), 1);
        assert!(matches!(request.op, StoreOp::Create(ref e) if e.name == "Ann"));
        assert_eq!(request.op.kind(), OpKind::Create);
    }
}
