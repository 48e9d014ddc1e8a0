//! Random completion of manual picks into a full draw.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::models::{in_pool, DrawResult, DRAW_SIZE, NUMBER_MAX, NUMBER_MIN, PICK_LIMIT};

/// Complete `picks` into a sorted six-number draw.
///
/// The remaining pool (every number of `1..=45` not already picked) is
/// shuffled uniformly and its head fills the free slots.
///
/// # Panics
///
/// Panics when more than five numbers are passed, when a pick lies outside
/// the pool, or when a pick repeats. All mean the caller skipped selection
/// validation.
pub fn generate<R: Rng + ?Sized>(picks: &[u8], rng: &mut R) -> DrawResult {
    assert!(
        picks.len() <= PICK_LIMIT,
        "draw requested with {} picks, at most {PICK_LIMIT} allowed",
        picks.len()
    );
    assert!(
        picks.iter().all(|value| in_pool(*value)),
        "draw requested with picks outside the pool: {picks:?}"
    );

    let mut pool: Vec<u8> = (NUMBER_MIN..=NUMBER_MAX)
        .filter(|value| !picks.contains(value))
        .collect();
    assert_eq!(
        pool.len(),
        usize::from(NUMBER_MAX) - picks.len(),
        "draw requested with duplicate picks: {picks:?}"
    );
    pool.shuffle(rng);

    let mut numbers = [0u8; DRAW_SIZE];
    let fill = DRAW_SIZE - picks.len();
    numbers[..picks.len()].copy_from_slice(picks);
    numbers[picks.len()..].copy_from_slice(&pool[..fill]);
    DrawResult::from_unsorted(numbers)
}

/// Owns the random source used for draws.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    seed: Option<u64>,
    rng: StdRng,
}

impl DrawEngine {
    /// Engine seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine producing a reproducible sequence of draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded engine when `seed` is set, entropy otherwise.
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Seed the engine was built from, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Complete `picks` into a draw using this engine's random source.
    pub fn generate(&mut self, picks: &[u8]) -> DrawResult {
        generate(picks, &mut self.rng)
    }
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::from_entropy()
    }
}
