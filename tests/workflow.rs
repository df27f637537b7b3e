//! End-to-end flows through the event handler, the worker and a real store.

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use roster::app::SessionMode;
use roster::store::{EmployeeStore, JsonEmployeeStore};
use roster::worker::StoreWorker;
use roster::{handle_event, Action, AppState, Employee, EmployeeId, Event, ImageTarget, Result, RosterError};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver};

struct Harness {
    state: AppState,
    worker: StoreWorker,
    events: UnboundedReceiver<Event>,
}

impl Harness {
    fn new(store: Arc<dyn EmployeeStore>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            worker: StoreWorker::new(store, tx),
            events,
        }
    }

    /// Handles `event` and waits for every action it starts to complete.
    async fn send(&mut self, event: Event) -> Result<Vec<Event>> {
        let (_, actions) = handle_event(&mut self.state, event)?;
        let mut completions = Vec::new();
        for action in actions {
            self.worker.execute(action).await.unwrap();
            completions.push(self.events.recv().await.unwrap());
        }
        Ok(completions)
    }

    /// Handles `event`, then feeds every completion back through the handler.
    async fn run(&mut self, event: Event) -> Result<()> {
        for completion in self.send(event).await? {
            handle_event(&mut self.state, completion)?;
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.state.view().iter().map(|e| e.name.clone()).collect()
    }
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(3, 3, Rgb([10, 120, 220]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn json_store(dir: &tempfile::TempDir) -> Arc<dyn EmployeeStore> {
    Arc::new(JsonEmployeeStore::open(dir.path().join("employees.json")).unwrap())
}

/// Store with fixed records whose updates fail with a scripted error.
struct ScriptedStore {
    records: Vec<Employee>,
    update_error: Mutex<Option<RosterError>>,
}

#[async_trait]
impl EmployeeStore for ScriptedStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.records.clone())
    }
    async fn create(&self, employee: Employee) -> Result<Employee> {
        Ok(employee.with_id(100))
    }
    async fn update(&self, employee: Employee) -> Result<Employee> {
        match self.update_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(employee),
        }
    }
    async fn delete(&self, _id: EmployeeId) -> Result<()> {
        Ok(())
    }
    async fn fetch_by_id(&self, id: EmployeeId) -> Result<Employee> {
        self.records
            .iter()
            .find(|e| e.id == Some(id))
            .cloned()
            .ok_or_else(|| RosterError::NotFound(format!("employee {id}")))
    }
}

#[tokio::test]
async fn search_ranks_prefix_matches_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));

    for name in ["Bob Ann", "Ann Lee", "Cid"] {
        h.run(Event::OpenAdd).await.unwrap();
        h.run(Event::SubmitAdd(Employee::new(name))).await.unwrap();
    }
    assert_eq!(h.names(), ["Bob Ann", "Ann Lee", "Cid"]);

    h.run(Event::Search("ann".into())).await.unwrap();
    assert_eq!(h.names(), ["Ann Lee", "Bob Ann"]);

    h.run(Event::Search("  ".into())).await.unwrap();
    assert_eq!(h.names().len(), 3);
}

#[tokio::test]
async fn reload_reads_back_what_was_stored() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));
    h.run(Event::OpenAdd).await.unwrap();
    h.run(Event::SubmitAdd(Employee::new("Ann Lee").with_email("ann@corp.io")))
        .await
        .unwrap();

    let mut fresh = Harness::new(json_store(&dir));
    fresh.run(Event::Reload).await.unwrap();
    let view = fresh.state.view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].email, "ann@corp.io");
    assert!(view[0].employee_code.is_some());
}

#[tokio::test]
async fn add_with_image_stores_data_url_and_closes_dialog() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));

    h.run(Event::OpenAdd).await.unwrap();
    h.run(Event::ImageFromFile {
        bytes: png_bytes(),
        target: ImageTarget::Add,
    })
    .await
    .unwrap();
    let pending = h.state.session().pending_image().unwrap().to_string();
    assert!(pending.starts_with("data:image/png;base64,"));

    h.run(Event::SubmitAdd(Employee::new("Dee"))).await.unwrap();

    assert!(h.state.session().is_idle());
    let view = h.state.view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].image_url.as_deref(), Some(pending.as_str()));
}

#[tokio::test]
async fn failed_edit_keeps_session_and_cache() {
    let ann = Employee::new("Ann Lee").with_id(1).with_email("ann@corp.io");
    let store = ScriptedStore {
        records: vec![ann.clone()],
        update_error: Mutex::new(Some(RosterError::Transport("connection reset".into()))),
    };
    let mut h = Harness::new(Arc::new(store));
    h.run(Event::Reload).await.unwrap();

    h.run(Event::OpenEdit(ann.clone())).await.unwrap();
    let mut changed = ann.clone();
    changed.name = "Ann Smith".to_string();

    let err = h.run(Event::SubmitEdit(changed.clone())).await.unwrap_err();
    assert!(matches!(err, RosterError::Transport(_)));
    assert_eq!(h.state.session().mode(), SessionMode::Editing);
    assert_eq!(h.names(), ["Ann Lee"]);

    // The scripted failure is spent; a retry goes through.
    h.run(Event::SubmitEdit(changed)).await.unwrap();
    assert!(h.state.session().is_idle());
    assert_eq!(h.names(), ["Ann Smith"]);
}

#[tokio::test]
async fn late_image_is_ignored_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));

    h.run(Event::OpenAdd).await.unwrap();
    let (_, actions) = handle_event(
        &mut h.state,
        Event::ImageFromFile {
            bytes: png_bytes(),
            target: ImageTarget::Add,
        },
    )
    .unwrap();

    // The dialog is replaced before the encode finishes.
    h.run(Event::CloseModal).await.unwrap();
    h.run(Event::OpenAdd).await.unwrap();

    for action in actions {
        assert!(matches!(action, Action::EncodeImage { .. }));
        h.worker.execute(action).await.unwrap();
        let completion = h.events.recv().await.unwrap();
        let (render, _) = handle_event(&mut h.state, completion).unwrap();
        assert!(!render);
    }
    assert_eq!(h.state.session().pending_image(), None);
}

#[tokio::test]
async fn delete_and_refresh_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));
    for name in ["Ann", "Bob"] {
        h.run(Event::OpenAdd).await.unwrap();
        h.run(Event::SubmitAdd(Employee::new(name))).await.unwrap();
    }
    let bob = h.state.view()[1].clone();

    h.run(Event::OpenDelete(bob.clone())).await.unwrap();
    h.run(Event::ConfirmDelete(bob.id)).await.unwrap();
    assert_eq!(h.names(), ["Ann"]);
    assert!(h.state.session().is_idle());

    let err = h.run(Event::Refresh(bob.id.unwrap())).await.unwrap_err();
    assert!(matches!(err, RosterError::NotFound(_)));
}

#[tokio::test]
async fn subscribers_see_latest_view() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(json_store(&dir));
    let mut sub = h.state.subscribe();
    assert!(sub.current().is_empty());

    h.run(Event::OpenAdd).await.unwrap();
    h.run(Event::SubmitAdd(Employee::new("Ann"))).await.unwrap();

    assert!(sub.has_changed());
    assert_eq!(sub.current().len(), 1);

    // A late subscriber gets the current view immediately.
    let mut late = h.state.subscribe();
    assert_eq!(late.current()[0].name, "Ann");
}
