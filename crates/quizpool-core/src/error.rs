//! Composition error types.
//!
//! A quiz definition that violates a composition invariant is rejected as a
//! whole: the tree is never partially composed. These errors carry enough
//! context to point at the offending pool without string matching.

use thiserror::Error;

/// Errors raised while composing a quiz tree from its raw definition.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `select` asks for more items than the pool contains.
    #[error("pool '{pool}': select is {select} but only {available} items exist")]
    SelectTooLarge {
        pool: String,
        select: usize,
        available: usize,
    },

    /// With `select > 0`, every item must have the same effective max score,
    /// otherwise the pool total would depend on which subset was drawn.
    #[error(
        "pool '{pool}': select > 0 requires equal max scores across items \
         (found {left} and {right})"
    )]
    UnequalMaxScore { pool: String, left: f64, right: f64 },

    /// A weight key does not parse as a child index.
    #[error("pool '{pool}': weight key '{key}' is not a valid item index")]
    InvalidWeightKey { pool: String, key: String },

    /// A weight key references a child index that does not exist.
    #[error("pool '{pool}': weight index {index} out of range (pool has {len} items)")]
    WeightIndexOutOfRange {
        pool: String,
        index: usize,
        len: usize,
    },

    /// Weights must be strictly positive.
    #[error("pool '{pool}': weight for item {index} must be positive, got {weight}")]
    NonPositiveWeight {
        pool: String,
        index: usize,
        weight: f64,
    },

    /// Two nodes resolved to the same path. Paths are the sole identifier
    /// correlating a running exercise frame with its UI control.
    #[error("duplicate path '{path}' in quiz tree")]
    DuplicatePath { path: String },
}
