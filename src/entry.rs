//! A named collection of [`crate::field::Field`]s, addressed by a unique id.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TresorError};
use crate::field::Field;

/// Entry exclusively owns every byte of its id, field keys, and field
/// values — nothing else in the store aliases this memory.
///
/// Invariants upheld by every mutating method on this type:
/// `modified_at >= created_at` and `accessed_at >= created_at`, and at most
/// one [`Field`] per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub(crate) id: Vec<u8>,
    pub(crate) created_at: i64,
    pub(crate) modified_at: i64,
    pub(crate) accessed_at: i64,
    pub(crate) fields: Vec<Field>,
}

impl Entry {
    pub(crate) fn new(id: Vec<u8>, now: i64) -> Self {
        Self {
            id,
            created_at: now,
            modified_at: now,
            accessed_at: now,
            fields: Vec::new(),
        }
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    pub fn accessed_at(&self) -> i64 {
        self.accessed_at
    }

    /// Fields in insertion order, as they will be written to the wire.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn position_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key() == key)
    }

    /// Appends a new field. Fails with [`TresorError::Duplicate`] if `key`
    /// is already present. On success bumps `modified_at`.
    pub fn add_field(&mut self, key: &str, value: &[u8], now: i64) -> Result<()> {
        if self.position_of(key).is_some() {
            return Err(TresorError::Duplicate);
        }
        self.fields.push(Field::new(key.to_string(), value.to_vec()));
        self.modified_at = now;
        tracing::debug!(field_count = self.fields.len(), "field added to entry");
        Ok(())
    }

    /// Returns the value for `key`, bumping `accessed_at` to
    /// `max(accessed_at, now)` on success. See spec §9 open question on
    /// timestamp semantics: this library funnels every read through this
    /// method, so `accessed_at` is authoritative, not best-effort.
    pub fn get_field(&mut self, key: &str, now: i64) -> Result<&[u8]> {
        let idx = self.position_of(key).ok_or(TresorError::NotFound)?;
        self.accessed_at = self.accessed_at.max(now);
        Ok(self.fields[idx].value())
    }

    /// Replaces the value of an existing field. Fails with
    /// [`TresorError::NotFound`] when absent. The superseded bytes are
    /// zeroed before being released. Bumps `modified_at`.
    pub fn update_field(&mut self, key: &str, value: &[u8], now: i64) -> Result<()> {
        let idx = self.position_of(key).ok_or(TresorError::NotFound)?;
        self.fields[idx].replace_value(value.to_vec());
        self.modified_at = now;
        Ok(())
    }

    /// Removes a field by key, zeroing its value. Fails with
    /// [`TresorError::NotFound`] if absent.
    pub fn remove_field(&mut self, key: &str) -> Result<()> {
        let idx = self.position_of(key).ok_or(TresorError::NotFound)?;
        self.fields.remove(idx);
        Ok(())
    }

    /// True iff the entry has a field with exactly this key and value —
    /// the predicate used by [`crate::store::Store::get_entries`] filters.
    pub(crate) fn matches_filter(&self, key: &str, value: &[u8]) -> bool {
        self.fields
            .iter()
            .any(|f| f.key() == key && f.value() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_field_rejects_duplicate_key() {
        let mut e = Entry::new(vec![1], 100);
        e.add_field("k", b"v1", 100).unwrap();
        let err = e.add_field("k", b"v2", 101).unwrap_err();
        assert!(matches!(err, TresorError::Duplicate));
    }

    #[test]
    fn get_field_bumps_accessed_at_but_not_past_provided_now() {
        let mut e = Entry::new(vec![1], 100);
        e.add_field("k", b"v", 100).unwrap();
        assert_eq!(e.accessed_at(), 100);
        e.get_field("k", 50).unwrap();
        assert_eq!(e.accessed_at(), 100, "now older than accessed_at must not roll it back");
        e.get_field("k", 200).unwrap();
        assert_eq!(e.accessed_at(), 200);
    }

    #[test]
    fn update_field_not_found_on_absent_key() {
        let mut e = Entry::new(vec![1], 100);
        let err = e.update_field("missing", b"v", 101).unwrap_err();
        assert!(matches!(err, TresorError::NotFound));
    }

    #[test]
    fn remove_field_not_found_on_absent_key() {
        let mut e = Entry::new(vec![1], 100);
        let err = e.remove_field("missing").unwrap_err();
        assert!(matches!(err, TresorError::NotFound));
    }

    #[test]
    fn fields_retain_insertion_order() {
        let mut e = Entry::new(vec![1], 100);
        e.add_field("b", b"1", 100).unwrap();
        e.add_field("a", b"2", 100).unwrap();
        let keys: Vec<&str> = e.fields().iter().map(Field::key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn timestamps_never_precede_created_at() {
        let mut e = Entry::new(vec![1], 500);
        e.add_field("k", b"v", 500).unwrap();
        assert!(e.modified_at() >= e.created_at());
        assert!(e.accessed_at() >= e.created_at());
    }
}
