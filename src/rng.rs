//! Seeded xorshift32 stream. Every random draw in a match (names, roles, bot
//! choices, hints, chatter) comes from one `Xorshift32`, so a seed plus the
//! intent sequence replays a match exactly.

use rand::{Error, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Substituted for a zero seed, which would otherwise lock the stream at 0.
    pub const DEFAULT_SEED: u32 = 1;

    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { Self::DEFAULT_SEED } else { seed };
        Self { state }
    }

    #[inline]
    fn step(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Next float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / TWO_POW_32
    }

    /// `floor(next_f64() * n)`; `n` must be non-zero.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        let i = (self.next_f64() * n as f64) as usize;
        i.min(n - 1)
    }

    /// Uniform element, `None` (and no draw) on an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() { return None; }
        let i = self.below(items.len());
        items.get(i)
    }

    /// Fisher-Yates, walking from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// Seed for a fresh match: wall clock mixed with the roster size.
pub fn derive_seed(now_ms: u64, player_count: usize) -> u32 {
    let mix = (player_count as u64).wrapping_mul(2_654_435_761);
    (now_ms ^ mix) as u32
}

impl RngCore for Xorshift32 {
    fn next_u32(&mut self) -> u32 { self.step() }

    fn next_u64(&mut self) -> u64 {
        let lo = self.step() as u64;
        let hi = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xorshift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self { Self::new(u32::from_le_bytes(seed)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Xorshift32::new(42);
        let mut b = Xorshift32::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn zero_seed_is_coerced() {
        let mut zero = Xorshift32::new(0);
        let mut one = Xorshift32::new(Xorshift32::DEFAULT_SEED);
        assert_eq!(zero, one);
        let v = zero.next_f64();
        assert!(v > 0.0);
        assert_eq!(v.to_bits(), one.next_f64().to_bits());
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = Xorshift32::new(0xDEAD_BEEF);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn first_value_for_seed_one() {
        // 1 ^ 1<<13 = 0x2001; ^ >>17 leaves it; ^ <<5 = 0x42021
        let mut rng = Xorshift32::new(1);
        assert_eq!(rng.next_u32(), 0x0004_2021);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Xorshift32::new(7);
        let mut ids: Vec<u32> = (0..12).collect();
        rng.shuffle(&mut ids);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn choose_on_empty_does_not_draw() {
        let mut rng = Xorshift32::new(9);
        let before = rng.clone();
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng, before);
    }

    #[test]
    fn works_through_rand_traits() {
        let mut rng = Xorshift32::from_seed(5u32.to_le_bytes());
        for _ in 0..100 {
            let v: u8 = rng.gen_range(1..=6);
            assert!((1..=6).contains(&v));
        }
    }

    #[test]
    fn derived_seed_depends_on_roster_size() {
        assert_ne!(derive_seed(1_000, 6), derive_seed(1_000, 7));
    }
}
