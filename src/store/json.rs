//! JSON file-based employee store.
//!
//! This module provides an offline [`EmployeeStore`] with the same semantics
//! as the remote service, persisted to a human-readable JSON file. It uses
//! atomic file writes (write-to-temp + rename) so a crash never leaves a
//! half-written file behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: served from memory, the file is loaded once on open
//! - **Write**: O(n), the whole dataset is serialized on every mutation
//! - **Best for**: small directories and demos without a running service

use crate::domain::{Employee, EmployeeId, Result, RosterError};
use crate::store::EmployeeStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the file format for future migrations.
    version: u32,

    /// Id handed to the next created record.
    next_id: EmployeeId,

    /// Records in creation order.
    #[serde(default)]
    employees: Vec<Employee>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            next_id: 1,
            employees: Vec::new(),
        }
    }
}

/// JSON file employee store.
///
/// The dataset lives in memory behind an async mutex and is written back after
/// every successful mutation. Ids are assigned sequentially and never reused;
/// every created record gets a random `employeeCode`.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "next_id": 3,
///   "employees": [
///     {
///       "id": 1,
///       "name": "Ann Lee",
///       "email": "ann@corp.io",
///       "jobTitle": "Engineer",
///       "employeeCode": "5f0c7c1e-8f6b-4f0e-9a57-0f4e7d3c2b1a"
///     }
///   ]
/// }
/// ```
#[derive(Debug)]
pub struct JsonEmployeeStore {
    file_path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonEmployeeStore {
    /// Creates or opens a JSON store at `file_path`.
    ///
    /// If the file exists its records are loaded, otherwise the store starts
    /// empty. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but cannot be read
    /// - The file contains invalid JSON ([`RosterError::Storage`])
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON employee store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(
            version = data.version,
            employees = data.employees.len(),
            next_id = data.next_id,
            "store opened"
        );

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let mut data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| RosterError::Storage(format!("failed to parse {}: {e}", path.display())))?;

        // A hand-edited file may carry ids past the counter.
        let max_id = data.employees.iter().filter_map(|e| e.id).max().unwrap_or(0);
        if data.next_id <= max_id {
            tracing::warn!(next_id = data.next_id, max_id = max_id, "id counter behind stored ids, advancing");
            data.next_id = max_id + 1;
        }

        Ok(data)
    }

    /// Writes `data` to a temporary sibling file, then renames it into place.
    async fn save(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| RosterError::Storage(format!("failed to serialize store: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.file_path).await?;

        tracing::debug!(employees = data.employees.len(), "store saved");
        Ok(())
    }
}

fn not_found(id: EmployeeId) -> RosterError {
    RosterError::NotFound(format!("employee {id}"))
}

#[async_trait]
impl EmployeeStore for JsonEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>> {
        let data = self.data.lock().await;
        tracing::debug!(count = data.employees.len(), "listed employees");
        Ok(data.employees.clone())
    }

    async fn create(&self, mut employee: Employee) -> Result<Employee> {
        if employee.id.is_some() {
            return Err(RosterError::Validation("new employee must not carry an id".to_string()));
        }

        let mut data = self.data.lock().await;
        let mut next = data.clone();

        employee.id = Some(next.next_id);
        employee.employee_code = Some(Uuid::new_v4().to_string());
        next.next_id += 1;
        next.employees.push(employee.clone());

        self.save(&next).await?;
        *data = next;

        tracing::debug!(employee_id = ?employee.id, "employee created");
        Ok(employee)
    }

    async fn update(&self, employee: Employee) -> Result<Employee> {
        let Some(id) = employee.id else {
            return Err(RosterError::Validation("employee to update has no id".to_string()));
        };
        let mut data = self.data.lock().await;
        let slot = data
            .employees
            .iter()
            .position(|e| e.id == Some(id))
            .ok_or_else(|| not_found(id))?;

        let mut next = data.clone();
        let stored = &mut next.employees[slot];
        // The code is server-owned; a payload cannot change or drop it.
        let employee_code = stored.employee_code.take();
        *stored = Employee {
            employee_code,
            ..employee
        };
        let updated = stored.clone();

        self.save(&next).await?;
        *data = next;

        tracing::debug!(employee_id = id, "employee updated");
        Ok(updated)
    }

    async fn delete(&self, id: EmployeeId) -> Result<()> {
        let mut data = self.data.lock().await;
        if !data.employees.iter().any(|e| e.id == Some(id)) {
            return Err(not_found(id));
        }

        let mut next = data.clone();
        next.employees.retain(|e| e.id != Some(id));

        self.save(&next).await?;
        *data = next;

        tracing::debug!(employee_id = id, "employee deleted");
        Ok(())
    }

    async fn fetch_by_id(&self, id: EmployeeId) -> Result<Employee> {
        let data = self.data.lock().await;
        data.employees
            .iter()
            .find(|e| e.id == Some(id))
            .cloned()
            .ok_or_else(|| not_found(id))
    }
}
