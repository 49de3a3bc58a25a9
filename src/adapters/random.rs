//! Non-cryptographic random source.
//!
//! xorshift64* seeded from the standard library's per-process `RandomState`
//! entropy.  Good enough for choosing constellations and sparkle patterns.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use crate::app::ports::RandomPort;

pub struct HashRng {
    state: u64,
}

impl HashRng {
    /// Seed from process entropy.
    pub fn new() -> Self {
        let seed = RandomState::new().build_hasher().finish();
        Self::with_seed(seed)
    }

    /// Deterministic sequence (the all-zero state is avoided).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl Default for HashRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for HashRng {
    fn unit(&mut self) -> f32 {
        // 24 high bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    fn index(&mut self, len: usize) -> usize {
        ((self.next_u64() >> 32) * len as u64 >> 32) as usize
    }
}
