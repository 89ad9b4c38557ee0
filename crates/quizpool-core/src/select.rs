//! Pool item selection.
//!
//! Chooses which children of a pool are presented in a session. The random
//! source is injected by the caller so selection is reproducible given a
//! fixed seed; nothing here touches a global RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ConfigError;

/// Choose the presentation order for a pool's children.
///
/// Returns indices into the original child list:
/// - `select == 0` keeps all children;
/// - `select == k > 0` draws exactly `k` distinct children uniformly at
///   random without replacement (weights never affect selection probability);
/// - without `shuffle`, the chosen subset keeps its original relative order;
///   with `shuffle`, it is randomly permuted.
///
/// Selection is atomic: either a valid subset is produced or a `ConfigError`
/// is returned and the pool is left uncomposed.
pub fn select_order<R: Rng + ?Sized>(
    pool: &str,
    len: usize,
    select: usize,
    shuffle: bool,
    rng: &mut R,
) -> Result<Vec<usize>, ConfigError> {
    if select > len {
        return Err(ConfigError::SelectTooLarge {
            pool: pool.to_string(),
            select,
            available: len,
        });
    }

    let mut chosen: Vec<usize> = if select == 0 {
        (0..len).collect()
    } else {
        let mut drawn = rand::seq::index::sample(rng, len, select).into_vec();
        // sample() yields indices in sampling order, not positional order
        drawn.sort_unstable();
        drawn
    };

    if shuffle {
        chosen.shuffle(rng);
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn select_zero_keeps_all_in_order() {
        let order = select_order("p", 5, 0, false, &mut rng(1)).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn select_k_returns_exactly_k_distinct() {
        for seed in 0..50 {
            let order = select_order("p", 10, 4, false, &mut rng(seed)).unwrap();
            assert_eq!(order.len(), 4);
            let mut dedup = order.clone();
            dedup.dedup();
            assert_eq!(dedup.len(), 4, "indices must be distinct: {order:?}");
            assert!(order.iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn unshuffled_subset_keeps_original_relative_order() {
        for seed in 0..50 {
            let order = select_order("p", 10, 5, false, &mut rng(seed)).unwrap();
            assert!(order.windows(2).all(|w| w[0] < w[1]), "not sorted: {order:?}");
        }
    }

    #[test]
    fn shuffle_permutes_full_child_set() {
        let order = select_order("p", 20, 0, true, &mut rng(7)).unwrap();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
        // With 20 items the identity permutation is astronomically unlikely.
        assert_ne!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn select_greater_than_len_fails() {
        let err = select_order("algebra", 2, 3, false, &mut rng(0)).unwrap_err();
        match err {
            ConfigError::SelectTooLarge {
                pool,
                select,
                available,
            } => {
                assert_eq!(pool, "algebra");
                assert_eq!(select, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = select_order("p", 10, 3, true, &mut rng(42)).unwrap();
        let b = select_order("p", 10, 3, true, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }
}
