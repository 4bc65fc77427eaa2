//! Tresor — an embeddable encrypted secret store.
//!
//! A [`Store`] holds a collection of [`Entry`] values, each a set of typed
//! [`Field`]s addressed by a stable id, and persists the whole collection
//! as one self-describing, authenticated-encrypted blob protected by a
//! password-derived key ([`Store::seal`] / [`Store::open`]).
//!
//! Out of scope, per the design this crate follows: the C-ABI shim, file
//! I/O and path resolution, any CLI, and logging configuration (callers
//! wire up their own `tracing` subscriber) — all external collaborators.

pub mod clock;
mod codec;
mod crypto;
pub mod data;
pub mod entry;
pub mod error;
pub mod field;
pub mod header;
pub mod rng;
mod store;

pub use clock::{Clock, FakeClock, SystemClock};
pub use data::Data;
pub use entry::Entry;
pub use error::{Result, TresorError};
pub use field::Field;
pub use header::{Argon2Params, CipherId, CompressionId, KdfId, OuterHeader};
pub use rng::{OsRandom, RandomSource, SeededRandom};
pub use store::Store;
