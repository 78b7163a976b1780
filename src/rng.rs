//! The two sources of randomness in a FLAK battle.
//!
//! The `Lcg` drives every decision inside the deterministic simulation tick
//! and must reproduce bit-identical sequences given the same seed. The
//! `CaptorRng` trait is a *different* generator used only by host-side
//! adjudication (`Algorithm::find_captor`), which is explicitly not part of
//! the replayed sequence.

use rand::random_range;

/// 32-bit linear-congruential generator: `s <- 0x8088405*s + 1`, returning
/// `(s >> 16) * max >> 16`. This is the only randomness source consumed by
/// the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn seed(&self) -> u32 {
        self.state
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Returns a value in `[0, max)`.
    pub fn next(&mut self, max: u16) -> u16 {
        self.state = self.state.wrapping_mul(0x8088405).wrapping_add(1);
        (((self.state >> 16) as u64 * max as u64) >> 16) as u16
    }
}

/// Host-side random source, used only by `find_captor`. Kept as a trait so
/// tests can supply a deterministic stub instead of real randomness.
pub trait CaptorRng {
    /// Returns an index in `[0, len)`. `len` is always > 0.
    fn pick(&mut self, len: usize) -> usize;
}

/// Default `CaptorRng` backed by the process-wide thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadCaptorRng;

impl CaptorRng for ThreadCaptorRng {
    fn pick(&mut self, len: usize) -> usize {
        random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_is_deterministic_for_same_seed() {
        let mut a = Lcg::new(0x6D3D7AC9);
        let mut b = Lcg::new(0x6D3D7AC9);
        let seq_a: Vec<u16> = (0..16).map(|_| a.next(1000)).collect();
        let seq_b: Vec<u16> = (0..16).map(|_| b.next(1000)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn lcg_bounds_output() {
        let mut r = Lcg::new(1);
        for _ in 0..100 {
            assert!(r.next(7) < 7);
        }
    }

    struct StubCaptorRng(usize);
    impl CaptorRng for StubCaptorRng {
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn captor_rng_stub_is_injectable() {
        let mut stub = StubCaptorRng(2);
        assert_eq!(stub.pick(5), 2);
    }
}
