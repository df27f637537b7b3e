//! Roster: an employee directory client with a local cache and ranked search.
//!
//! Roster is the client-side core of an employee CRUD front-end:
//! - An authoritative in-memory cache of employee records, kept in sync with
//!   create, update and delete results from a remote service
//! - Ranked substring search over that cache without a server round-trip
//! - A replay-latest view stream the UI binds to
//! - A modal edit-session state machine, including image attachments encoded
//!   as data URLs

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal front-end (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, edit sessions                    │
//! │  - Cache, search, view publisher                    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Store Layer   │   │ Worker Layer  │
//! │ (ui/)         │   │ (store/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - HTTP client │   │ - Store calls │
//! │ - Highlights  │   │ - JSON file   │   │ - Image encode│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Employee model (domain/employee)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - Rolling JSON log file                            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (Employee, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`store`]: Remote and offline employee stores
//! - [`worker`]: Background execution of store calls and image encodes
//! - [`ui`]: Terminal rendering
//! - [`observability`]: Logging setup
//!
//! # Configuration
//!
//! Settings are read from `~/.config/roster/config.toml`:
//!
//! ```toml
//! api_url = "http://localhost:8080"
//! timeout_secs = 30
//! # local_store = "~/.local/share/roster/employees.json"
//! trace_level = "info"
//! ```
//!
//! then overridden by `ROSTER_*` environment variables (`ROSTER_API_URL`,
//! `ROSTER_TIMEOUT_SECS`, `ROSTER_LOCAL_STORE`, `ROSTER_TRACE_LEVEL`,
//! `ROSTER_LOG_DIR`) and finally by command-line flags.
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`):
//!    - Load and validate configuration
//!    - Initialize tracing
//!    - Build the store and the [`worker::StoreWorker`]
//!    - Post the initial `Reload`
//!
//! 2. **Event loop**:
//!    - User commands become [`Event`]s
//!    - [`handle_event`] mutates [`AppState`] and returns [`Action`]s
//!    - The worker runs actions and sends completions back as events
//!
//! 3. **Rendering**:
//!    - Compute the view model from state
//!    - Render header, search bar, table, dialog and footer
//!
//! # Examples
//!
//! ```
//! use roster::{handle_event, initialize, Action, Config, Employee, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! let (_, actions) = handle_event(&mut state, Event::OpenAdd)?;
//! assert!(actions.is_empty());
//!
//! let (_, actions) = handle_event(&mut state, Event::SubmitAdd(Employee::new("Ann Lee")))?;
//! assert!(matches!(actions.as_slice(), [Action::PostToStore(_)]));
//! # Ok::<(), roster::RosterError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## No Optimistic Updates
//!
//! The cache changes only after the store confirmed an operation. A failed call
//! leaves both the cache and the open dialog exactly as they were.
//!
//! ## Epoch-Guarded Completions
//!
//! Store calls and image encodes record the edit-session epoch they were issued
//! under. A completion that arrives after its dialog was closed or replaced
//! still updates the cache, but never touches the newer dialog.
//!
//! ## Last Write Wins
//!
//! There is no conflict detection: two clients editing the same record both
//! succeed and the later update is what the store keeps.

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod store;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, ImageTarget};
pub use domain::{Employee, EmployeeId, Result, RosterError};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use store::{EmployeeStore, HttpEmployeeStore, JsonEmployeeStore};

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "ROSTER_";

/// Client configuration.
///
/// # Example
///
/// ```toml
/// api_url = "https://hr.example.com/api"
/// timeout_secs = 10
/// trace_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the employee service.
    ///
    /// Must be http or https. Default: `"http://localhost:8080"`
    pub api_url: String,

    /// Per-request timeout in seconds. Default: 30
    pub timeout_secs: u64,

    /// Use this JSON file as the store instead of the remote service.
    pub local_store: Option<PathBuf>,

    /// Tracing level for the log file.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for log files. Default: `<data dir>/roster/logs`
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            local_store: None,
            trace_level: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Io`] if the file exists but cannot be read, and
    /// [`RosterError::Config`] if it is not valid TOML or has unknown keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = ?path, "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|e| RosterError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| RosterError::Config(e.to_string()))
    }

    /// Applies `key = value` overrides on top of this configuration.
    ///
    /// # Parameters
    ///
    /// * `overrides` - Map of lower-case configuration keys to raw values
    ///
    /// # Parsing Rules
    ///
    /// - `api_url`: String, taken as-is
    /// - `timeout_secs`: String → `u64` (kept unchanged on parse error)
    /// - `local_store`, `log_dir`: String → `PathBuf`, with `~` expanded
    /// - `trace_level`: String → `Option<String>`
    ///
    /// Empty values and unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use roster::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://hr.example.com".to_string());
    /// map.insert("timeout_secs".to_string(), "5".to_string());
    ///
    /// let config = Config::default().apply_overrides(&map);
    /// assert_eq!(config.api_url, "https://hr.example.com");
    /// assert_eq!(config.timeout_secs, 5);
    /// ```
    #[must_use]
    pub fn apply_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            overrides
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
        };

        if let Some(api_url) = value("api_url") {
            self.api_url = api_url.to_string();
        }
        if let Some(timeout) = value("timeout_secs") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(e) => tracing::warn!(value = %timeout, error = %e, "ignoring invalid timeout_secs"),
            }
        }
        if let Some(path) = value("local_store") {
            self.local_store = Some(infrastructure::expand_tilde(path));
        }
        if let Some(level) = value("trace_level") {
            self.trace_level = Some(level.to_string());
        }
        if let Some(path) = value("log_dir") {
            self.log_dir = Some(infrastructure::expand_tilde(path));
        }

        self
    }

    /// Collects `ROSTER_*` environment variables as override keys.
    ///
    /// `ROSTER_API_URL=...` becomes `api_url = ...`.
    #[must_use]
    pub fn env_overrides() -> BTreeMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] if `api_url` is not an http(s) URL or
    /// the timeout is zero. The URL is not checked when a local store is set.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(RosterError::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.local_store.is_some() {
            return Ok(());
        }

        let url = url::Url::parse(&self.api_url)
            .map_err(|e| RosterError::Config(format!("invalid api_url {:?}: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RosterError::Config(format!(
                "api_url must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved log directory.
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| infrastructure::data_dir().join("logs"))
    }

    /// Builds the store this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be opened or the HTTP client
    /// cannot be built.
    pub fn build_store(&self) -> Result<Arc<dyn EmployeeStore>> {
        if let Some(path) = &self.local_store {
            tracing::info!(path = ?path, "using local JSON store");
            return Ok(Arc::new(JsonEmployeeStore::open(path.clone())?));
        }

        tracing::info!(api_url = %self.api_url, "using remote employee service");
        Ok(Arc::new(HttpEmployeeStore::new(&self.api_url, self.timeout())?))
    }
}

/// Initializes the client state.
///
/// Creates an empty [`AppState`]: no records, blank query, no dialog open. The
/// cache is populated by the first `Reload`.
///
/// # Parameters
///
/// * `config` - Client configuration
///
/// # Example
///
/// ```
/// use roster::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.view().is_empty());
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        api_url = %config.api_url,
        local_store = ?config.local_store,
        "initializing roster"
    );
    AppState::new()
}
