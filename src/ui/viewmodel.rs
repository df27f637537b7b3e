//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They contain
//! no business logic, only display-ready data: truncated text, highlight
//! ranges and image badges.
//!
//! # Example
//!
//! ```
//! use roster::ui::viewmodel::{DisplayItem, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     display_items: vec![DisplayItem {
//!         id: "1".to_string(),
//!         name: "Ann Lee".to_string(),
//!         name_highlights: vec![(0, 3)],
//!         email: "ann@corp.io".to_string(),
//!         job_title: "Engineer".to_string(),
//!         image_badge: "url",
//!     }],
//!     header: HeaderInfo { title: " Employees (1/1) ".to_string() },
//!     search_bar: None,
//!     modal: None,
//!     footer: FooterInfo { keybindings: "quit".to_string() },
//!     empty_state: None,
//! };
//! assert_eq!(vm.display_items.len(), 1);
//! ```

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// One row per visible employee, in view order.
    pub display_items: Vec<DisplayItem>,

    /// Title with visible and total counts.
    pub header: HeaderInfo,

    /// Present while a non-blank query is active.
    pub search_bar: Option<SearchBarInfo>,

    /// The open dialog or image preview, if any.
    pub modal: Option<ModalInfo>,

    /// Commands available in the current mode.
    pub footer: FooterInfo,

    /// Shown instead of the table when no row is visible.
    pub empty_state: Option<EmptyState>,
}

/// Display information for a single employee row.
#[derive(Debug, Clone)]
pub struct DisplayItem {
    /// Store id, or `-` for a record without one.
    pub id: String,

    /// Name, truncated to the column width.
    pub name: String,

    /// Character ranges of `name` matching the query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub name_highlights: Vec<(usize, usize)>,

    pub email: String,

    pub job_title: String,

    /// Short image label: `-`, `url`, `inline` or `?`.
    pub image_badge: &'static str,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Command hints for the current mode.
    pub keybindings: String,
}

/// Dialog panel display information.
#[derive(Debug, Clone)]
pub struct ModalInfo {
    pub title: String,
    pub lines: Vec<String>,
}

/// Empty state message display information.
///
/// Differs between an empty directory and a query that matches nobody.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message (e.g., "No employees yet").
    pub message: String,

    /// Secondary hint.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Current search query text.
    pub query: String,
}
