//! Injectable random-bytes source. Used to seed KDF salts and cipher IVs so
//! that sealing can be made bit-for-bit deterministic under test (spec §3,
//! §8 "determinism under fixed randomness").

use rand::RngCore;

/// A source of random bytes. One method, by design.
pub trait RandomSource {
    fn fill_bytes(&mut self, out: &mut [u8]);
}

/// The default source, backed by the OS CSPRNG via [`rand::rngs::ThreadRng`].
#[derive(Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, out: &mut [u8]) {
        rand::thread_rng().fill_bytes(out);
    }
}

/// A deterministic source: wraps any `rand` RNG (typically a seeded
/// `StdRng`) behind the one-method [`RandomSource`] interface. Useful for
/// tests and for embedded hosts that need reproducible sealing.
pub struct SeededRandom<R: RngCore>(pub R);

impl<R: RngCore> RandomSource for SeededRandom<R> {
    fn fill_bytes(&mut self, out: &mut [u8]) {
        self.0.fill_bytes(out);
    }
}
