//! The secret payload — the part of a Tresor blob the AEAD cipher protects.

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::{Result, TresorError};

/// `generator` identifies the producing library (free text, for
/// diagnostics); `name` is the caller-chosen store name. Entry ids are
/// pairwise distinct — enforced by every mutating method that touches
/// `entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    pub(crate) generator: String,
    pub(crate) name: String,
    pub(crate) created_at: i64,
    pub(crate) modified_at: i64,
    pub(crate) entries: Vec<Entry>,
}

impl Data {
    pub(crate) fn new(generator: String, name: String, now: i64) -> Self {
        Self {
            generator,
            name,
            created_at: now,
            modified_at: now,
            entries: Vec::new(),
        }
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn position_of(&self, id: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// On a duplicate id, hands `entry` straight back to the caller rather
    /// than dropping it — the insertion never took place, so the caller
    /// keeps ownership (spec §4.2).
    pub(crate) fn add_entry(&mut self, entry: Entry, now: i64) -> std::result::Result<(), Entry> {
        if self.position_of(entry.id()).is_some() {
            return Err(entry);
        }
        self.entries.push(entry);
        self.modified_at = now;
        Ok(())
    }

    pub(crate) fn get_entry_mut(&mut self, id: &[u8]) -> Result<&mut Entry> {
        let idx = self.position_of(id).ok_or(TresorError::NotFound)?;
        Ok(&mut self.entries[idx])
    }

    pub(crate) fn remove_entry(&mut self, id: &[u8], now: i64) -> Result<Entry> {
        let idx = self.position_of(id).ok_or(TresorError::NotFound)?;
        let entry = self.entries.remove(idx);
        self.modified_at = now;
        Ok(entry)
    }

    pub(crate) fn entries_matching(&self, filters: &[(&str, &[u8])]) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| filters.iter().all(|(k, v)| e.matches_filter(k, v)))
            .collect()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| TresorError::BadPayload(e.to_string()))?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let data: Self =
            ciborium::from_reader(bytes).map_err(|e| TresorError::BadPayload(e.to_string()))?;
        data.check_invariants()?;
        Ok(data)
    }

    fn check_invariants(&self) -> Result<()> {
        let mut seen: Vec<&[u8]> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if seen.contains(&entry.id()) {
                return Err(TresorError::BadPayload(
                    "duplicate entry id in decoded payload".to_string(),
                ));
            }
            seen.push(entry.id());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_entry_rejects_duplicate_id_and_hands_it_back() {
        let mut data = Data::new("tresor".into(), "db".into(), 0);
        data.add_entry(Entry::new(vec![1], 0), 0).unwrap();
        let returned = data.add_entry(Entry::new(vec![1], 1), 1).unwrap_err();
        assert_eq!(returned.id(), &[1]);
        assert_eq!(data.entries().len(), 1, "duplicate insert must not mutate");
    }

    #[test]
    fn encode_decode_round_trips() {
        let mut data = Data::new("tresor".into(), "db".into(), 0);
        let mut entry = Entry::new(vec![1, 2, 3], 0);
        entry.add_field("k", b"v", 0).unwrap();
        data.add_entry(entry, 0).unwrap();

        let bytes = data.encode().unwrap();
        let decoded = Data::decode(&bytes).unwrap();
        assert_eq!(decoded.name(), "db");
        assert_eq!(decoded.entries().len(), 1);
        assert_eq!(decoded.entries()[0].fields()[0].value(), b"v");
    }

    #[test]
    fn entries_matching_respects_all_filters_and_order() {
        let mut data = Data::new("tresor".into(), "db".into(), 0);
        for (id, ty) in [(1u8, "Passkey"), (2, "Password"), (3, "Passkey")] {
            let mut e = Entry::new(vec![id], 0);
            e.add_field("Type", ty.as_bytes(), 0).unwrap();
            data.add_entry(e, 0).unwrap();
        }
        let matches = data.entries_matching(&[("Type", b"Passkey")]);
        let ids: Vec<u8> = matches.iter().map(|e| e.id()[0]).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
