use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::cell::RefCell;

/// Move labels used when generating random lines.
///
/// The labels only need to look like SAN; the tree engine never checks
/// legality, so any label can follow any other.
pub const SAMPLE_MOVES: [&str; 12] = [
    "e4", "e5", "d4", "d5", "Nf3", "Nc6", "c4", "c5", "Bb5", "a6", "Nc3", "Nf6",
];

/// A fuzzer for generating random move lines and edit scripts.
///
/// Uses the xoshiro256** PRNG for reproducible random sequences when seeded.
///
/// # Examples
///
/// ```
/// use chess_tree_util::Fuzzer;
///
/// let fuzzer = Fuzzer::from_u64(7);
///
/// let n = fuzzer.random_int(1, 10);
/// assert!(n >= 1 && n <= 10);
///
/// let line = fuzzer.random_line(4);
/// assert!(line.len() <= 4);
/// ```
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: RefCell<Xoshiro256StarStar>,
}

impl Fuzzer {
    /// Create a new fuzzer with an optional seed.
    ///
    /// If no seed is provided, a random seed will be generated using `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });

        Self {
            seed,
            rng: RefCell::new(Xoshiro256StarStar::from_seed(seed)),
        }
    }

    /// Create a fuzzer whose seed is derived from a single integer.
    ///
    /// Convenient for property tests, where the framework hands out `u64`s.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for chunk in bytes.chunks_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self::new(Some(bytes))
    }

    /// Generate a random integer in the range [min, max] (inclusive).
    pub fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng.borrow_mut().gen_range(min..=max)
    }

    /// Generate a random index in the range [0, len).
    pub fn random_index(&self, len: usize) -> usize {
        self.rng.borrow_mut().gen_range(0..len)
    }

    /// Pick a random element from a slice.
    pub fn pick<'a, T>(&self, elements: &'a [T]) -> &'a T {
        &elements[self.random_index(elements.len())]
    }

    /// Repeat a callback `times` times and collect results.
    pub fn repeat<T, F>(&self, times: usize, mut callback: F) -> Vec<T>
    where
        F: FnMut() -> T,
    {
        (0..times).map(|_| callback()).collect()
    }

    /// Generate a random boolean with the given probability of being true.
    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng.borrow_mut().gen_bool(probability)
    }

    /// Generate a line of up to `max_len` moves drawn from [`SAMPLE_MOVES`].
    pub fn random_line(&self, max_len: usize) -> Vec<String> {
        let len = self.random_index(max_len + 1);
        self.repeat(len, || self.pick(&SAMPLE_MOVES).to_string())
    }

    /// Pick a random prefix of `line`, possibly empty, possibly all of it.
    pub fn random_prefix<'a, T>(&self, line: &'a [T]) -> &'a [T] {
        &line[..self.random_index(line.len() + 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_int_stays_in_range() {
        let fuzzer = Fuzzer::new(None);

        for _ in 0..100 {
            let n = fuzzer.random_int(1, 10);
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn pick_returns_an_element() {
        let fuzzer = Fuzzer::new(None);
        let choices = vec!["a", "b", "c"];

        for _ in 0..100 {
            let picked = fuzzer.pick(&choices);
            assert!(choices.contains(picked));
        }
    }

    #[test]
    fn seeded_fuzzers_are_reproducible() {
        let fuzzer1 = Fuzzer::from_u64(42);
        let fuzzer2 = Fuzzer::from_u64(42);

        for _ in 0..10 {
            assert_eq!(fuzzer1.random_line(6), fuzzer2.random_line(6));
        }
    }

    #[test]
    fn random_line_uses_sample_moves() {
        let fuzzer = Fuzzer::from_u64(3);

        for _ in 0..50 {
            let line = fuzzer.random_line(5);
            assert!(line.len() <= 5);
            assert!(line.iter().all(|mv| SAMPLE_MOVES.contains(&mv.as_str())));
        }
    }

    #[test]
    fn random_prefix_is_a_prefix() {
        let fuzzer = Fuzzer::from_u64(9);
        let line = vec![1, 2, 3, 4];

        for _ in 0..50 {
            let prefix = fuzzer.random_prefix(&line);
            assert!(line.starts_with(prefix));
        }
    }

    #[test]
    fn random_bool_produces_both_values() {
        let fuzzer = Fuzzer::from_u64(11);
        let values = fuzzer.repeat(100, || fuzzer.random_bool(0.5));

        assert!(values.iter().any(|v| *v));
        assert!(values.iter().any(|v| !*v));
    }
}
