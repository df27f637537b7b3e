//! The in-memory employee cache.
//!
//! [`EmployeeCache`] is the single source of truth for the records the client
//! knows about. It is only ever written from store-result handlers, after the
//! corresponding remote call succeeded; nothing here is optimistic.
//!
//! Order matters: it is the order the server listed the records in, with
//! creates appended and updates written back in place.

use crate::domain::{Employee, EmployeeId};

/// Ordered collection of employee records, keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeCache {
    employees: Vec<Employee>,
}

impl EmployeeCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            employees: Vec::new(),
        }
    }

    /// Replaces the whole cache with `records`.
    pub fn load(&mut self, records: Vec<Employee>) {
        tracing::debug!(count = records.len(), "cache loaded");
        self.employees = records;
    }

    /// Appends a freshly created record.
    ///
    /// A record without an id is rejected so that no unsaved record ever
    /// enters the cache. If the id is already present the entry is replaced in
    /// place instead, keeping one record per id.
    ///
    /// Returns `true` if the cache changed.
    pub fn insert(&mut self, record: Employee) -> bool {
        let Some(id) = record.id else {
            tracing::warn!(name = %record.name, "refusing to cache a record without id");
            return false;
        };

        if let Some(slot) = self.position(id) {
            tracing::warn!(employee_id = id, "insert of existing id, replacing in place");
            self.employees[slot] = record;
        } else {
            self.employees.push(record);
        }
        true
    }

    /// Overwrites the record with the same id, preserving its position.
    ///
    /// A miss is tolerated: it means the record vanished in a concurrent
    /// reload. Returns `true` if a record was replaced.
    pub fn replace(&mut self, record: Employee) -> bool {
        let slot = record.id.and_then(|id| self.position(id));
        match slot {
            Some(slot) => {
                self.employees[slot] = record;
                true
            }
            None => {
                tracing::debug!(employee_id = ?record.id, "replace missed, cache unchanged");
                false
            }
        }
    }

    /// Drops the record with `id`. Returns `true` if one was removed.
    pub fn remove(&mut self, id: EmployeeId) -> bool {
        match self.position(id) {
            Some(slot) => {
                self.employees.remove(slot);
                true
            }
            None => {
                tracing::debug!(employee_id = id, "remove missed, cache unchanged");
                false
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == Some(id))
    }

    #[must_use]
    pub fn all(&self) -> &[Employee] {
        &self.employees
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    fn position(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_of(names: &[(i64, &str)]) -> EmployeeCache {
        let mut cache = EmployeeCache::new();
        cache.load(
            names
                .iter()
                .map(|(id, name)| Employee::new(*name).with_id(*id))
                .collect(),
        );
        cache
    }

    fn ids(cache: &EmployeeCache) -> Vec<i64> {
        cache.all().iter().filter_map(|e| e.id).collect()
    }

    #[test]
    fn insert_then_replace_keeps_length_and_updates_fields() {
        let mut cache = cache_of(&[(1, "Ann"), (2, "Bob")]);
        assert!(cache.insert(Employee::new("Cid").with_id(3)));
        assert_eq!(cache.len(), 3);

        assert!(cache.replace(Employee::new("Cid Moe").with_id(3).with_email("cid@x.io")));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(3).map(|e| e.email.as_str()), Some("cid@x.io"));
        assert_eq!(ids(&cache), vec![1, 2, 3]);
    }

    #[test]
    fn replace_preserves_position() {
        let mut cache = cache_of(&[(1, "Ann"), (2, "Bob"), (3, "Cid")]);
        assert!(cache.replace(Employee::new("Bobby").with_id(2)));
        assert_eq!(cache.all()[1].name, "Bobby");
        assert_eq!(ids(&cache), vec![1, 2, 3]);
    }

    #[test]
    fn replace_unknown_id_is_noop() {
        let mut cache = cache_of(&[(1, "Ann")]);
        let before = cache.clone();
        assert!(!cache.replace(Employee::new("Ghost").with_id(99)));
        assert!(!cache.replace(Employee::new("No id")));
        assert_eq!(cache, before);
    }

    #[test]
    fn remove_known_id_shifts_nothing_else() {
        let mut cache = cache_of(&[(1, "Ann"), (2, "Bob"), (3, "Cid")]);
        assert!(cache.remove(2));
        assert_eq!(ids(&cache), vec![1, 3]);

        let before = cache.clone();
        assert!(!cache.remove(42));
        assert_eq!(cache, before);
    }

    #[test]
    fn insert_without_id_is_rejected() {
        let mut cache = cache_of(&[(1, "Ann")]);
        assert!(!cache.insert(Employee::new("Draft")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_with_duplicate_id_keeps_one_record() {
        let mut cache = cache_of(&[(1, "Ann"), (2, "Bob")]);
        assert!(cache.insert(Employee::new("Ann Lee").with_id(1)));
        assert_eq!(ids(&cache), vec![1, 2]);
        assert_eq!(cache.all()[0].name, "Ann Lee");
    }
}
