/// Presentation order.
///
/// Answer options and battle hands are shown in a shuffled order. The
/// permutation is a pure function of `(len, seed)` so a session can be
/// replayed, and so tests can check that game logic does not care about it.
/// Callers derive per-use seeds with `wrapping_add`; `StdRng::seed_from_u64`
/// scrambles neighbouring seeds on its own.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A permutation of `0..len`, deterministic for a given seed.
pub fn shuffled(len: usize, seed: u64) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_a_permutation() {
        for seed in 0..20 {
            let mut p = shuffled(7, seed);
            p.sort_unstable();
            assert_eq!(p, (0..7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn deterministic_per_seed() {
        assert_eq!(shuffled(6, 42), shuffled(6, 42));
    }

    #[test]
    fn empty_and_single() {
        assert!(shuffled(0, 1).is_empty());
        assert_eq!(shuffled(1, 1), vec![0]);
    }

    #[test]
    fn neighbouring_seeds_differ() {
        assert_ne!(shuffled(8, 7), shuffled(8, 8));
    }
}
