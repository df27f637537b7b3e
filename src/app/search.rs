//! Local search and ranking over the employee cache.
//!
//! Searching never touches the network: it is a pure function of the cached
//! records and the query string, recomputed whenever either changes.
//!
//! # Algorithm
//!
//! 1. **Normalize**: trim whitespace and lower-case the query. An empty
//!    normalized query returns the records unchanged, in cache order.
//! 2. **Filter**: keep a record if its lower-cased `name`, `email` or
//!    `job_title` contains the query as a substring.
//! 3. **Rank**: stable-sort so that records whose name *starts with* the query
//!    come first. Records in the same class keep their cache order.
//!
//! There are exactly two rank classes; no numeric score is computed.

use crate::domain::Employee;

/// Trims and lower-cases a raw query string.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Filters and ranks `all` for `query`.
///
/// # Examples
///
/// ```
/// use roster::app::search::search;
/// use roster::Employee;
///
/// let all = vec![
///     Employee::new("Bob Ann").with_id(2),
///     Employee::new("Ann Lee").with_id(1),
///     Employee::new("Cid").with_id(3),
/// ];
///
/// let names: Vec<_> = search(&all, " ANN ").into_iter().map(|e| e.name).collect();
/// assert_eq!(names, ["Ann Lee", "Bob Ann"]);
/// assert_eq!(search(&all, "   "), all);
/// ```
#[must_use]
pub fn search(all: &[Employee], query: &str) -> Vec<Employee> {
    let needle = normalize_query(query);

    let _span = tracing::debug_span!("search",
        total_employees = all.len(),
        query_len = needle.len()
    ).entered();

    if needle.is_empty() {
        return all.to_vec();
    }

    let mut ranked: Vec<(bool, &Employee)> = all
        .iter()
        .filter(|employee| matches(employee, &needle))
        .map(|employee| (employee.name.to_lowercase().starts_with(&needle), employee))
        .collect();

    // `sort_by_key` is stable, so cache order survives inside each class.
    ranked.sort_by_key(|(name_prefix, _)| !name_prefix);

    tracing::debug!(matched = ranked.len(), "search applied");

    ranked.into_iter().map(|(_, employee)| employee.clone()).collect()
}

/// Returns `true` if any searchable field contains the normalized needle.
fn matches(employee: &Employee, needle: &str) -> bool {
    [&employee.name, &employee.email, &employee.job_title]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Computes character ranges of every case-insensitive occurrence of `query`
/// in `text`, for match highlighting.
///
/// Ranges are `(start, end)` character indices with exclusive end, merged
/// when adjacent. Returns an empty vector for a blank query.
///
/// Lower-casing can change the length of some characters, so matching is done
/// on the lower-cased text and only used when both sides keep the same
/// character count; otherwise no ranges are reported.
#[must_use]
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = normalize_query(query).chars().collect();
    if needle.is_empty() {
        return vec![];
    }

    let haystack: Vec<char> = text.to_lowercase().chars().collect();
    if haystack.len() != text.chars().count() || needle.len() > haystack.len() {
        return vec![];
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            let end = start + needle.len();
            match ranges.last_mut() {
                Some(last) if last.1 == start => last.1 = end,
                _ => ranges.push((start, end)),
            }
            start = end;
        } else {
            start += 1;
        }
    }

    ranges
}
