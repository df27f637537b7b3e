//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Layout**: Header, search bar, table or empty state, dialog, footer
//!
//! Output is a single string; the front-end writes it to the terminal.

use crate::app::AppState;
use crate::ui::helpers::{pad, render_highlighted_text, styled, BOLD, DIM};
use crate::ui::viewmodel::{DisplayItem, UIViewModel};
use std::fmt::Write as _;

/// Renders the client UI for a terminal `cols` wide.
///
/// # Example
///
/// ```
/// use roster::app::AppState;
/// use roster::ui::render;
///
/// let state = AppState::new();
/// let screen = render(&state, 80);
/// assert!(screen.contains("No employees yet"));
/// ```
#[must_use]
pub fn render(state: &AppState, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(cols);
    render_viewmodel(&viewmodel, cols)
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, cols: usize) -> String {
    let mut out = String::new();
    let rule = "─".repeat(cols.max(20));

    let _ = writeln!(out, "{}", styled(BOLD, &vm.header.title));
    if let Some(search) = &vm.search_bar {
        let _ = writeln!(out, "search: {}", search.query);
    }
    let _ = writeln!(out, "{rule}");

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "  {}", empty.message);
        let _ = writeln!(out, "  {}", styled(DIM, &empty.subtitle));
    } else {
        render_table(&mut out, &vm.display_items);
    }

    if let Some(modal) = &vm.modal {
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{}", styled(BOLD, &format!("[ {} ]", modal.title)));
        for line in &modal.lines {
            let _ = writeln!(out, "  {line}");
        }
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", styled(DIM, &vm.footer.keybindings));
    out
}

fn render_table(out: &mut String, items: &[DisplayItem]) {
    let id_w = column_width(items, "ID", |i| i.id.as_str());
    let name_w = column_width(items, "NAME", |i| i.name.as_str());
    let email_w = column_width(items, "EMAIL", |i| i.email.as_str());
    let job_w = column_width(items, "JOB", |i| i.job_title.as_str());

    let _ = writeln!(
        out,
        "{}",
        styled(
            DIM,
            &format!(
                "{} {} {} {} IMG",
                pad("ID", id_w),
                pad("NAME", name_w),
                pad("EMAIL", email_w),
                pad("JOB", job_w)
            )
        )
    );

    for item in items {
        let name_padding = " ".repeat(name_w.saturating_sub(item.name.chars().count()));
        let _ = writeln!(
            out,
            "{} {}{} {} {} {}",
            pad(&item.id, id_w),
            render_highlighted_text(&item.name, &item.name_highlights),
            name_padding,
            pad(&item.email, email_w),
            pad(&item.job_title, job_w),
            item.image_badge
        );
    }
}

/// Widest value of a column, in characters, including its label.
fn column_width(items: &[DisplayItem], label: &str, field: fn(&DisplayItem) -> &str) -> usize {
    items
        .iter()
        .map(|item| field(item).chars().count())
        .fold(label.chars().count(), usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;
    use crate::ui::helpers::HIGHLIGHT;

    #[test]
    fn renders_rows_with_highlights_and_footer() {
        let mut state = AppState::new();
        state.load_employees(vec![
            Employee::new("Ann Lee").with_id(1).with_image_url("https://cdn.io/a.png"),
            Employee::new("Bob Ann").with_id(2),
        ]);
        state.set_query("ann");

        let screen = render(&state, 80);
        assert!(screen.contains("Employees (2/2)"));
        assert!(screen.contains("search: ann"));
        assert!(screen.contains(&format!("{HIGHLIGHT}Ann")));
        assert!(screen.contains("url"));
        assert!(screen.contains("quit"));
    }

    #[test]
    fn renders_open_dialog() {
        let mut state = AppState::new();
        state.session.open_add();
        let screen = render(&state, 60);
        assert!(screen.contains("[ New employee ]"));
        assert!(screen.contains("image: (none)"));
    }
}
