//! Shared rendering utilities.
//!
//! Low-level text helpers: ANSI styling, width-aware padding and match
//! highlighting. All functions return strings instead of printing, so the
//! renderer decides where output goes.
//!
//! Ranges and widths are in characters, not bytes.

/// Bold text.
pub const BOLD: &str = "\u{1b}[1m";
/// Dimmed text.
pub const DIM: &str = "\u{1b}[2m";
/// Match highlight: black on yellow.
pub const HIGHLIGHT: &str = "\u{1b}[30;43m";
/// Clears all styling.
pub const RESET: &str = "\u{1b}[0m";

/// Wraps `text` in `style` and a reset.
#[must_use]
pub fn styled(style: &str, text: &str) -> String {
    format!("{style}{text}{RESET}")
}

/// Pads `text` with spaces to `width` characters.
#[must_use]
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

/// Renders text with highlighted character ranges for query matches.
///
/// # Parameters
///
/// * `text` - The text to render
/// * `ranges` - Character index ranges to highlight `(start, end)` (inclusive start, exclusive end)
///
/// Ranges must be sorted and non-overlapping; ranges past the end of `text`
/// are clipped.
///
/// # Example
///
/// ```
/// use roster::ui::helpers::{render_highlighted_text, HIGHLIGHT, RESET};
///
/// let out = render_highlighted_text("Ann Lee", &[(0, 3)]);
/// assert_eq!(out, format!("{HIGHLIGHT}Ann{RESET} Lee"));
/// ```
#[must_use]
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 12);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(HIGHLIGHT);
        out.extend(&chars[start..end]);
        out.push_str(RESET);

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}
