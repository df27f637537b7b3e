//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container of the client.
//! It owns the employee cache, the active query, the edit session and the view
//! publisher, and keeps the published view consistent with the first two.
//!
//! # Architecture
//!
//! `AppState` separates core data (cache, query) from derived state (the
//! filtered view). Every mutation of core data goes through a method here that
//! ends in `refresh_view`, so the published view always equals
//! `search(cache, query)`.
//!
//! # Example
//!
//! ```
//! use roster::app::AppState;
//! use roster::Employee;
//!
//! let mut state = AppState::new();
//! state.load_employees(vec![
//!     Employee::new("Bob Ann").with_id(2),
//!     Employee::new("Ann Lee").with_id(1),
//! ]);
//! state.set_query("ann");
//! assert_eq!(state.view()[0].name, "Ann Lee");
//! ```

use super::cache::EmployeeCache;
use super::publisher::{EmployeeView, ViewPublisher, ViewSubscription};
use super::search::{match_ranges, search};
use super::session::{EditSession, SessionMode};
use crate::domain::{Employee, EmployeeId};
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FooterInfo, HeaderInfo, ModalInfo, SearchBarInfo, UIViewModel,
};

/// Central application state container.
///
/// Owned by a single task and mutated only by
/// [`handle_event`](crate::app::handle_event).
#[derive(Debug, Default)]
pub struct AppState {
    /// Authoritative records, in server order.
    cache: EmployeeCache,

    /// Active search query, kept verbatim until the user edits it.
    query: String,

    /// Open dialog and its epoch.
    pub session: EditSession,

    /// Replay-latest stream of `search(cache, query)`.
    publisher: ViewPublisher,
}

impl AppState {
    /// Creates an empty state: no records, blank query, no dialog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cache(&self) -> &EmployeeCache {
        &self.cache
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    /// Latest published view.
    #[must_use]
    pub fn view(&self) -> EmployeeView {
        self.publisher.current()
    }

    /// Subscribes to view updates; the current view is available immediately.
    #[must_use]
    pub fn subscribe(&self) -> ViewSubscription {
        self.publisher.subscribe()
    }

    /// Replaces the active query and republishes.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        tracing::trace!(query = %self.query, "search query updated");
        self.refresh_view();
    }

    /// Replaces the cache with a fresh listing, keeping the query.
    pub fn load_employees(&mut self, records: Vec<Employee>) {
        self.cache.load(records);
        self.refresh_view();
    }

    /// Appends a created record and republishes the view.
    ///
    /// Returns `true` if the cache changed.
    pub fn insert_employee(&mut self, record: Employee) -> bool {
        let changed = self.cache.insert(record);
        self.refresh_view();
        changed
    }

    /// Writes back an updated record and republishes the view, even on a miss.
    ///
    /// Returns `true` if the cache changed.
    pub fn replace_employee(&mut self, record: Employee) -> bool {
        let changed = self.cache.replace(record);
        self.refresh_view();
        changed
    }

    /// Drops a deleted record and republishes the view, even on a miss.
    ///
    /// Returns `true` if the cache changed.
    pub fn remove_employee(&mut self, id: EmployeeId) -> bool {
        let changed = self.cache.remove(id);
        self.refresh_view();
        changed
    }

    /// Recomputes and publishes `search(cache, query)`.
    fn refresh_view(&self) {
        let view = search(self.cache.all(), &self.query);
        tracing::debug!(
            total = self.cache.len(),
            visible = view.len(),
            "view refreshed"
        );
        self.publisher.publish(view);
    }

    /// Computes a renderable view model for a terminal `cols` wide.
    ///
    /// # Parameters
    ///
    /// * `cols` - Terminal width in character cells, used to size the table
    ///
    /// # Returns
    ///
    /// A [`UIViewModel`] with one row per visible record, highlight ranges for
    /// the active query, and the open dialog, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use roster::app::AppState;
    ///
    /// let state = AppState::new();
    /// let viewmodel = state.compute_viewmodel(80);
    /// assert!(viewmodel.empty_state.is_some());
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self, cols: usize) -> UIViewModel {
        let view = self.view();
        let widths = ColumnWidths::for_terminal(cols);

        let display_items: Vec<DisplayItem> = view
            .iter()
            .map(|employee| self.compute_display_item(employee, &widths))
            .collect();

        let empty_state = display_items.is_empty().then(|| self.compute_empty_state());

        UIViewModel {
            display_items,
            header: HeaderInfo {
                title: format!(" Employees ({}/{}) ", view.len(), self.cache.len()),
            },
            search_bar: (!self.query.trim().is_empty()).then(|| SearchBarInfo {
                query: self.query.clone(),
            }),
            modal: self.compute_modal(),
            footer: self.compute_footer(),
            empty_state,
        }
    }

    fn compute_display_item(&self, employee: &Employee, widths: &ColumnWidths) -> DisplayItem {
        let name = truncate(&employee.name, widths.name);
        DisplayItem {
            id: employee.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            name_highlights: clip_ranges(match_ranges(&employee.name, &self.query), &name),
            email: truncate(&employee.email, widths.email),
            job_title: truncate(&employee.job_title, widths.job_title),
            image_badge: employee.image_source().badge(),
            name,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        if self.cache.is_empty() {
            EmptyState {
                message: "No employees yet".to_string(),
                subtitle: "Use `new` to add one, or `reload` to fetch again".to_string(),
            }
        } else {
            EmptyState {
                message: format!("No employee matches \"{}\"", self.query.trim()),
                subtitle: "Use `find` with no query to show everyone".to_string(),
            }
        }
    }

    fn compute_modal(&self) -> Option<ModalInfo> {
        if let Some(preview) = self.session.preview() {
            return Some(ModalInfo {
                title: preview.name.clone().unwrap_or_else(|| "Image".to_string()),
                lines: vec![preview.url.clone()],
            });
        }

        match self.session.mode() {
            SessionMode::Idle | SessionMode::ViewingImage => None,
            SessionMode::Adding => Some(ModalInfo {
                title: "New employee".to_string(),
                lines: vec![format!(
                    "image: {}",
                    self.session.pending_image().map_or("(none)", describe_image)
                )],
            }),
            SessionMode::Editing => self.session.editing().map(|record| ModalInfo {
                title: format!("Edit {}", record.name),
                lines: record_lines(record),
            }),
            SessionMode::Deleting => self.session.deleting().map(|record| ModalInfo {
                title: format!("Delete {}?", record.name),
                lines: record_lines(record),
            }),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.session.mode() {
            SessionMode::Idle => "find QUERY  new  edit ID  delete ID  show ID  reload  help  quit",
            SessionMode::Adding => "save name=.. email=.. job=..  photo PATH  photo-url URL  cancel",
            SessionMode::Editing => "save [name=..] [email=..] [job=..]  photo PATH  photo-url URL  cancel",
            SessionMode::Deleting => "confirm  cancel",
            SessionMode::ViewingImage => "hide",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

struct ColumnWidths {
    name: usize,
    email: usize,
    job_title: usize,
}

impl ColumnWidths {
    /// Splits the space left after the id and badge columns 2:2:1.
    fn for_terminal(cols: usize) -> Self {
        const FIXED: usize = 6 + 7 + 8;
        let flexible = cols.saturating_sub(FIXED).max(15);
        Self {
            name: flexible * 2 / 5,
            email: flexible * 2 / 5,
            job_title: flexible / 5,
        }
    }
}

/// Truncates to `max` characters, ending in "..." when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Drops highlight ranges that fall in the truncated tail of `shown`.
fn clip_ranges(ranges: Vec<(usize, usize)>, shown: &str) -> Vec<(usize, usize)> {
    let limit = if shown.ends_with("...") {
        shown.chars().count().saturating_sub(3)
    } else {
        shown.chars().count()
    };
    ranges
        .into_iter()
        .filter(|(start, _)| *start < limit)
        .map(|(start, end)| (start, end.min(limit)))
        .collect()
}

fn describe_image(url: &str) -> &str {
    if url.starts_with("data:") {
        "(inline image attached)"
    } else {
        url
    }
}

fn record_lines(record: &Employee) -> Vec<String> {
    vec![
        format!("id:    {}", record.id.map_or_else(|| "-".to_string(), |id| id.to_string())),
        format!("email: {}", record.email),
        format!("job:   {}", record.job_title),
        format!("image: {}", record.image_url.as_deref().map_or("(none)", describe_image)),
    ]
}
