//! Worker implementation for asynchronous store calls and image encoding.
//!
//! This module runs every [`Action`] produced by the event handler on the tokio
//! runtime, so the single-writer event loop never blocks on the network or on
//! image decoding. Each completion is sent back to the loop as an [`Event`].
//!
//! In-flight work is never cancelled: closing a dialog does not abort the
//! request it issued. The edit session's epoch decides what a late completion
//! may still change.

use crate::app::{Action, Event};
use crate::domain::Result;
use crate::store::EmployeeStore;
use crate::worker::image::encode_data_url;
use crate::worker::{StoreOp, StoreOutcome, StoreRequest, StoreResponse};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Executes actions against an [`EmployeeStore`].
///
/// Cheap to clone; clones share the store and the event channel.
#[derive(Clone)]
pub struct StoreWorker {
    store: Arc<dyn EmployeeStore>,
    events: UnboundedSender<Event>,
}

impl StoreWorker {
    /// Creates a worker reporting completions to `events`.
    pub fn new(store: Arc<dyn EmployeeStore>, events: UnboundedSender<Event>) -> Self {
        Self { store, events }
    }

    /// Spawns the task for `action` and returns its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&self, action: Action) -> JoinHandle<()> {
        match action {
            Action::PostToStore(request) => {
                let worker = self.clone();
                let span = tracing::debug_span!(
                    parent: &request.span,
                    "store_request",
                    request_id = request.id,
                    op = %request.op.kind()
                );
                tokio::spawn(
                    async move {
                        let response = worker.handle_message(request).await;
                        worker.send(Event::StoreResponse(response));
                    }
                    .instrument(span),
                )
            }
            Action::EncodeImage { ticket, bytes } => {
                let events = self.events.clone();
                let span = tracing::debug_span!("encode_image", epoch = ticket.epoch, size = bytes.len());
                tokio::spawn(
                    async move {
                        let result = tokio::task::spawn_blocking(move || encode_data_url(&bytes))
                            .await
                            .unwrap_or_else(|e| {
                                Err(crate::RosterError::Worker(format!("image encoder panicked: {e}")))
                            });
                        if events.send(Event::ImageEncoded { ticket, result }).is_err() {
                            tracing::debug!("event loop gone, dropping encoded image");
                        }
                    }
                    .instrument(span),
                )
            }
        }
    }

    /// Runs one store request to completion.
    ///
    /// Never fails: errors become [`StoreOutcome::Failed`].
    pub async fn handle_message(&self, request: StoreRequest) -> StoreResponse {
        let StoreRequest { id, origin, op, .. } = request;
        let kind = op.kind();

        let outcome = match op {
            StoreOp::List => Self::handle_store_result(kind, self.store.list().await, StoreOutcome::Listed),
            StoreOp::Create(employee) => {
                Self::handle_store_result(kind, self.store.create(employee).await, StoreOutcome::Created)
            }
            StoreOp::Update(employee) => {
                Self::handle_store_result(kind, self.store.update(employee).await, StoreOutcome::Updated)
            }
            StoreOp::Delete(employee_id) => Self::handle_store_result(
                kind,
                self.store.delete(employee_id).await,
                |()| StoreOutcome::Deleted(employee_id),
            ),
            StoreOp::FetchById(employee_id) => {
                Self::handle_store_result(kind, self.store.fetch_by_id(employee_id).await, StoreOutcome::Fetched)
            }
        };

        StoreResponse {
            request_id: id,
            origin,
            outcome,
        }
    }

    /// Helper for handling store results with consistent logging.
    fn handle_store_result<T, F>(op: crate::worker::OpKind, result: Result<T>, on_success: F) -> StoreOutcome
    where
        F: FnOnce(T) -> StoreOutcome,
    {
        match result {
            Ok(value) => {
                tracing::debug!(op = %op, "store operation successful");
                on_success(value)
            }
            Err(error) => {
                tracing::debug!(op = %op, error = %error, "store operation failed");
                StoreOutcome::Failed { op, error }
            }
        }
    }

    fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            tracing::debug!("event loop gone, dropping completion");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::{ImageTarget, ImageTicket};
    use crate::domain::{Employee, EmployeeId, RosterError};
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    /// Store that lists one record and refuses everything else.
    struct OneRecordStore;

    #[async_trait]
    impl EmployeeStore for OneRecordStore {
        async fn list(&self) -> Result<Vec<Employee>> {
            Ok(vec![Employee::new("Ann").with_id(1)])
        }
        async fn create(&self, _employee: Employee) -> Result<Employee> {
            Err(RosterError::Validation("name required".into()))
        }
        async fn update(&self, _employee: Employee) -> Result<Employee> {
            Err(RosterError::Transport("timeout".into()))
        }
        async fn delete(&self, _id: EmployeeId) -> Result<()> {
            Ok(())
        }
        async fn fetch_by_id(&self, id: EmployeeId) -> Result<Employee> {
            Err(RosterError::NotFound(format!("employee {id}")))
        }
    }

    fn worker() -> (StoreWorker, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (StoreWorker::new(Arc::new(OneRecordStore), tx), rx)
    }

    #[tokio::test]
    async fn successful_calls_map_to_outcomes() {
        let (worker, _rx) = worker();

        let listed = worker.handle_message(StoreRequest::list(4)).await;
        assert_eq!(listed.origin, 4);
        assert!(matches!(listed.outcome, StoreOutcome::Listed(ref v) if v.len() == 1));

        let deleted = worker.handle_message(StoreRequest::delete(9, 0)).await;
        assert!(matches!(deleted.outcome, StoreOutcome::Deleted(9)));
    }

    #[tokio::test]
    async fn failures_keep_error_class() {
        let (worker, _rx) = worker();

        let response = worker.handle_message(StoreRequest::create(Employee::new(""), 0)).await;
        assert!(matches!(
            response.outcome,
            StoreOutcome::Failed { op: crate::worker::OpKind::Create, error: RosterError::Validation(_) }
        ));

        let response = worker.handle_message(StoreRequest::fetch_by_id(3, 0)).await;
        assert!(matches!(
            response.outcome,
            StoreOutcome::Failed { error: RosterError::NotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn execute_reports_back_over_channel() {
        let (worker, mut rx) = worker();
        let request = StoreRequest::list(0);
        let request_id = request.id;

        worker.execute(Action::PostToStore(request)).await.unwrap();

        match rx.recv().await {
            Some(Event::StoreResponse(response)) => assert_eq!(response.request_id, request_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn encode_failure_is_reported_with_ticket() {
        let (worker, mut rx) = worker();
        let ticket = ImageTicket {
            epoch: 2,
            target: ImageTarget::Edit,
        };

        worker
            .execute(Action::EncodeImage {
                ticket,
                bytes: b"nope".to_vec(),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::ImageEncoded { ticket: got, result }) => {
                assert_eq!(got, ticket);
                assert!(matches!(result, Err(RosterError::ImageDecode(_))));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
