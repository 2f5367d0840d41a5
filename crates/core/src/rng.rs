//! RNG module - practice seeds and random level picks
//!
//! Level boards are never random: they come from the seed string. Randomness is
//! only used to mint practice seeds and to pick a level to replay, and it uses a
//! small LCG so those choices are reproducible from a numeric seed.

/// Characters a practice seed is drawn from (base58, the alphabet of the
/// published level seeds).
pub const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of generated practice seeds (matches the published level seeds).
pub const PRACTICE_SEED_LEN: usize = 88;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (to resume the same sequence later)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// A fresh base58 practice seed of [`PRACTICE_SEED_LEN`] characters.
    ///
    /// ```
    /// use card_crush_core::SimpleRng;
    ///
    /// let mut a = SimpleRng::new(7);
    /// let mut b = SimpleRng::new(7);
    /// assert_eq!(a.practice_seed(), b.practice_seed());
    /// ```
    pub fn practice_seed(&mut self) -> String {
        self.seed_of_len(PRACTICE_SEED_LEN)
    }

    /// A base58 seed of `len` characters (empty when `len == 0`).
    pub fn seed_of_len(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| {
                let idx = self.next_range(BASE58_ALPHABET.len() as u32) as usize;
                BASE58_ALPHABET[idx] as char
            })
            .collect()
    }

    /// Pick one element uniformly, or None for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_range(items.len() as u32) as usize;
        items.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_remapped() {
        let mut zero = SimpleRng::new(0);
        let mut one = SimpleRng::new(1);
        assert_eq!(zero.next_u32(), one.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_range(58) < 58);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_practice_seed_is_base58() {
        let mut rng = SimpleRng::new(4242);
        let seed = rng.practice_seed();
        assert_eq!(seed.len(), PRACTICE_SEED_LEN);
        assert!(seed.bytes().all(|b| BASE58_ALPHABET.contains(&b)));
        // No ambiguous glyphs
        assert!(!seed.contains(['0', 'O', 'I', 'l']));
    }

    #[test]
    fn test_pick() {
        let mut rng = SimpleRng::new(3);
        let empty: [&str; 0] = [];
        assert_eq!(rng.pick(&empty), None);

        let items = ["a", "b", "c"];
        for _ in 0..20 {
            assert!(items.contains(rng.pick(&items).unwrap()));
        }
    }
}
