//! Quiz tree composition.
//!
//! Turns a raw definition into the immutable session tree: derives paths,
//! resolves weights, enforces the composition invariants, and applies
//! selection/shuffle per pool. Fails fast — the tree is never partially
//! composed.

use std::collections::HashSet;

use rand::Rng;

use crate::error::ConfigError;
use crate::model::{Exercise, Node, Pool};
use crate::parser::{RawExercise, RawNode, RawPool};
use crate::select::select_order;

/// Tolerance for comparing max scores, which are sums of f64 weights.
const SCORE_EPSILON: f64 = 1e-9;

/// Compose a raw quiz into a session tree.
///
/// The random source drives subset selection and shuffling; a seeded RNG
/// yields a reproducible session.
pub fn compose<R: Rng + ?Sized>(raw: &RawPool, rng: &mut R) -> Result<Node, ConfigError> {
    let name = raw.title.clone().unwrap_or_else(|| "quiz".to_string());
    let mut seen = HashSet::new();
    compose_pool(raw, &name, name.clone(), rng, &mut seen)
}

fn compose_pool<R: Rng + ?Sized>(
    raw: &RawPool,
    name: &str,
    path: String,
    rng: &mut R,
    seen: &mut HashSet<String>,
) -> Result<Node, ConfigError> {
    if !seen.insert(path.clone()) {
        return Err(ConfigError::DuplicatePath { path });
    }

    let len = raw.items.len();
    let weights = resolve_weights(raw, name, len)?;

    // Compose the full child set first: invariants are checked against every
    // configured child, not just the drawn subset.
    let mut children = Vec::with_capacity(len);
    let mut pool_ordinal = 0usize;
    for item in &raw.items {
        let child = match item {
            RawNode::Exercise(e) => compose_exercise(e, &path, seen)?,
            RawNode::Pool(p) => {
                let child_name = p
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("{pool_ordinal}_subquiz"));
                pool_ordinal += 1;
                compose_pool(p, &child_name, format!("{path}/{child_name}"), rng, seen)?
            }
        };
        children.push(child);
    }

    if raw.select > 0 {
        check_equal_max_scores(name, &children, &weights)?;
    }

    let order = select_order(name, len, raw.select, raw.shuffle, rng)?;
    if raw.select > 0 || raw.shuffle {
        tracing::debug!(pool = %path, chosen = order.len(), of = len, "pool selection applied");
    }

    let mut items = Vec::with_capacity(order.len());
    let mut item_weights = Vec::with_capacity(order.len());
    for &i in &order {
        items.push(children[i].clone());
        item_weights.push(weights[i]);
    }

    Ok(Node::Pool(Pool {
        name: name.to_string(),
        title: raw.title.clone(),
        path,
        select: raw.select,
        shuffle: raw.shuffle,
        navigation: raw.navigation,
        weights: item_weights,
        items,
    }))
}

fn compose_exercise(
    raw: &RawExercise,
    parent_path: &str,
    seen: &mut HashSet<String>,
) -> Result<Node, ConfigError> {
    let path = format!("{parent_path}/{}", raw.name);
    if !seen.insert(path.clone()) {
        return Err(ConfigError::DuplicatePath { path });
    }
    Ok(Node::Exercise(Exercise {
        name: raw.name.clone(),
        path,
        module: raw
            .module
            .clone()
            .unwrap_or_else(|| raw.name.to_lowercase()),
        max_score: raw.max_score,
    }))
}

/// Resolve the string-keyed weight table into one weight per child.
fn resolve_weights(raw: &RawPool, pool: &str, len: usize) -> Result<Vec<f64>, ConfigError> {
    let mut weights = vec![1.0; len];
    for (key, &value) in &raw.weights {
        let index: usize = key.parse().map_err(|_| ConfigError::InvalidWeightKey {
            pool: pool.to_string(),
            key: key.clone(),
        })?;
        if index >= len {
            return Err(ConfigError::WeightIndexOutOfRange {
                pool: pool.to_string(),
                index,
                len,
            });
        }
        if value <= 0.0 {
            return Err(ConfigError::NonPositiveWeight {
                pool: pool.to_string(),
                index,
                weight: value,
            });
        }
        weights[index] = value;
    }
    Ok(weights)
}

/// With `select > 0` every child must contribute the same effective max
/// score, so the pool total cannot depend on which subset was drawn.
fn check_equal_max_scores(
    pool: &str,
    children: &[Node],
    weights: &[f64],
) -> Result<(), ConfigError> {
    let mut effective = children
        .iter()
        .zip(weights)
        .map(|(child, w)| child.max_achievable() * w);

    let Some(first) = effective.next() else {
        return Ok(());
    };
    for score in effective {
        if (score - first).abs() > SCORE_EPSILON {
            return Err(ConfigError::UnequalMaxScore {
                pool: pool.to_string(),
                left: first,
                right: score,
            });
        }
    }
    Ok(())
}
