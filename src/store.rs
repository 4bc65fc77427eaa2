//! The top-level facade: composes [`OuterHeader`] and [`Data`], owns the
//! injected RNG and clock, and exposes entry CRUD plus filter queries.

use std::io::Write;

use crate::clock::Clock;
use crate::codec;
use crate::data::Data;
use crate::entry::Entry;
use crate::error::Result;
use crate::header::{CipherId, CompressionId, KdfId, OuterHeader};
use crate::rng::RandomSource;

/// A Tresor store. Not safe for concurrent mutation (spec §5) — a `Store`
/// is meant to be owned by a single caller at a time.
pub struct Store {
    pub(crate) header: OuterHeader,
    pub(crate) data: Data,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) clock: Box<dyn Clock>,
}

impl Store {
    /// Creates a fresh, empty store. Does not seal or persist anything.
    pub fn new(
        generator: &str,
        name: &str,
        cipher: CipherId,
        compression: CompressionId,
        kdf: KdfId,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let now = clock.now_millis();
        let store = Self {
            header: OuterHeader::new(cipher, compression, kdf),
            data: Data::new(generator.to_string(), name.to_string(), now),
            rng,
            clock,
        };
        tracing::debug!(name, "store created");
        store
    }

    /// The current reading of the Store's own injected clock. Entry
    /// mutators (`add_field`/`get_field`/`update_field`) take an explicit
    /// `now: i64` (spec §4.1); a caller holding a `&mut Entry` via
    /// [`Store::get_entry`] reads this to stay on the Store's own clock
    /// rather than inventing a timestamp, so determinism under a fixed
    /// injected clock (spec §3, §9) isn't lost once an entry handle
    /// leaves the Store.
    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Constructs a detached [`Entry`] owned by the caller, with all three
    /// timestamps set to now. Does not insert it — call [`Store::add_entry`]
    /// to do that.
    pub fn create_entry(&self, id: &[u8]) -> Entry {
        Entry::new(id.to_vec(), self.now())
    }

    /// Inserts `entry`. If an entry with the same id already exists, the
    /// insertion does not happen and `entry` is handed straight back as
    /// `Err(entry)` — the caller keeps ownership (spec §4.2's Duplicate
    /// outcome).
    pub fn add_entry(&mut self, entry: Entry) -> std::result::Result<(), Entry> {
        let now = self.now();
        self.data.add_entry(entry, now)
    }

    /// A mutable handle to the entry with matching id, or `NotFound`.
    /// Does not update any timestamp.
    pub fn get_entry(&mut self, id: &[u8]) -> Result<&mut Entry> {
        self.data.get_entry_mut(id)
    }

    /// Removes and destroys the entry with matching id, zeroing all of its
    /// field values in the process (each [`crate::field::Field`] zeroes on
    /// drop).
    pub fn remove_entry(&mut self, id: &[u8]) -> Result<()> {
        let now = self.now();
        self.data.remove_entry(id, now)?;
        Ok(())
    }

    /// Entries whose fields satisfy every `(key, value)` filter, in
    /// insertion order. An empty filter list returns every entry.
    pub fn get_entries(&self, filters: &[(&str, &[u8])]) -> Vec<&Entry> {
        self.data.entries_matching(filters)
    }

    pub fn name(&self) -> &str {
        self.data.name()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn header(&self) -> &OuterHeader {
        &self.header
    }

    /// Seals the store: derives a fresh key from `password`, generates a
    /// fresh IV, serializes and encrypts the payload, and writes the full
    /// envelope to `writer`. See [`codec::seal`] for the exact procedure.
    pub fn seal(&mut self, writer: &mut dyn Write, password: &str) -> Result<()> {
        codec::seal(self, writer, password)
    }

    /// Parses `blob`, derives the key from `password` using the header's
    /// own KDF parameters, authenticates, and decrypts. See [`codec::open`].
    pub fn open(
        blob: &[u8],
        password: &str,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Result<Store> {
        codec::open(blob, password, rng, clock)
    }
}
