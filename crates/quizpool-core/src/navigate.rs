//! Navigation state: per-pool unlocking of items.
//!
//! Each pool gates its direct children as `free` (everything available) or
//! `sequential` (strict unlock-on-submit order). A nested pool counts as a
//! single unit for gating: it is submitted only once every leaf beneath it
//! has reported at least one result.

use std::collections::{HashMap, HashSet};

use crate::model::{NavigationMode, Node};

/// State of one direct child of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Locked,
    Unlocked,
    Submitted,
}

/// Result of submitting a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The submission was recorded (or was already recorded). Carries the
    /// paths of children that just transitioned from locked to unlocked.
    Accepted { newly_unlocked: Vec<String> },
    /// The leaf is locked by a sequential ancestor, or unknown. No state
    /// changed; this is a UI guard, not an error.
    Rejected,
}

/// One gated pool: its navigation mode plus, per direct child, the set of
/// leaves that must report before the child counts as submitted.
#[derive(Debug)]
struct PoolGate {
    navigation: NavigationMode,
    children: Vec<GatedChild>,
}

#[derive(Debug)]
struct GatedChild {
    path: String,
    leaves: Vec<String>,
}

/// Tracks which leaves have reported and enforces unlock order.
///
/// Owned per session; mutation happens only through [`submit`](Self::submit).
#[derive(Debug)]
pub struct NavigationController {
    /// Pool path -> gate, in depth-first order.
    gates: Vec<(String, PoolGate)>,
    gate_index: HashMap<String, usize>,
    /// Leaf path -> (gate index, child index) for every ancestor pool.
    ancestry: HashMap<String, Vec<(usize, usize)>>,
    submitted: HashSet<String>,
    leaf_count: usize,
}

impl NavigationController {
    pub fn new(root: &Node) -> Self {
        let mut controller = NavigationController {
            gates: Vec::new(),
            gate_index: HashMap::new(),
            ancestry: HashMap::new(),
            submitted: HashSet::new(),
            leaf_count: root.leaves().len(),
        };
        controller.index_pool(root);
        controller
    }

    fn index_pool(&mut self, node: &Node) {
        let Node::Pool(pool) = node else {
            return;
        };

        let gate_idx = self.gates.len();
        let children = pool
            .items
            .iter()
            .map(|child| GatedChild {
                path: child.path().to_string(),
                leaves: child.leaves().iter().map(|e| e.path.clone()).collect(),
            })
            .collect();
        self.gates.push((
            pool.path.clone(),
            PoolGate {
                navigation: pool.navigation,
                children,
            },
        ));
        self.gate_index.insert(pool.path.clone(), gate_idx);

        for (child_idx, child) in pool.items.iter().enumerate() {
            for leaf in child.leaves() {
                self.ancestry
                    .entry(leaf.path.clone())
                    .or_default()
                    .push((gate_idx, child_idx));
            }
            self.index_pool(child);
        }
    }

    /// Record a result report for a leaf.
    ///
    /// Rejected when any sequential ancestor does not currently have the
    /// leaf's containing child unlocked. Re-submitting an already submitted
    /// leaf is accepted without further unlocks, so processing a repeated
    /// result message is idempotent.
    pub fn submit(&mut self, leaf: &str) -> SubmitOutcome {
        let Some(chain) = self.ancestry.get(leaf) else {
            return SubmitOutcome::Rejected;
        };

        if self.submitted.contains(leaf) {
            return SubmitOutcome::Accepted {
                newly_unlocked: Vec::new(),
            };
        }

        for &(gate_idx, child_idx) in chain {
            let gate = &self.gates[gate_idx].1;
            if gate.navigation == NavigationMode::Sequential
                && self.child_state(gate, child_idx) == ItemState::Locked
            {
                return SubmitOutcome::Rejected;
            }
        }

        let before = self.unlocked_paths();
        self.submitted.insert(leaf.to_string());
        let mut newly_unlocked: Vec<String> = self
            .unlocked_paths()
            .into_iter()
            .filter(|p| !before.contains(p))
            .collect();
        newly_unlocked.sort();

        SubmitOutcome::Accepted { newly_unlocked }
    }

    /// Whether a leaf has reported at least one result.
    pub fn is_submitted(&self, leaf: &str) -> bool {
        self.submitted.contains(leaf)
    }

    /// Terminal state: every leaf has reported.
    pub fn is_complete(&self) -> bool {
        self.submitted.len() == self.leaf_count
    }

    /// States of a pool's direct children, in presentation order.
    pub fn pool_states(&self, pool_path: &str) -> Option<Vec<(String, ItemState)>> {
        let &idx = self.gate_index.get(pool_path)?;
        let gate = &self.gates[idx].1;
        Some(
            (0..gate.children.len())
                .map(|i| (gate.children[i].path.clone(), self.child_state(gate, i)))
                .collect(),
        )
    }

    fn child_state(&self, gate: &PoolGate, child_idx: usize) -> ItemState {
        if self.child_submitted(gate, child_idx) {
            return ItemState::Submitted;
        }
        match gate.navigation {
            NavigationMode::Free => ItemState::Unlocked,
            NavigationMode::Sequential => {
                let all_prior_submitted =
                    (0..child_idx).all(|i| self.child_submitted(gate, i));
                if all_prior_submitted {
                    ItemState::Unlocked
                } else {
                    ItemState::Locked
                }
            }
        }
    }

    fn child_submitted(&self, gate: &PoolGate, child_idx: usize) -> bool {
        // A child with no leaves is submitted from the start; an empty
        // subpool must never block its sequential siblings.
        let leaves = &gate.children[child_idx].leaves;
        leaves.iter().all(|l| self.submitted.contains(l))
    }

    fn unlocked_paths(&self) -> HashSet<String> {
        let mut unlocked = HashSet::new();
        for (_, gate) in &self.gates {
            for i in 0..gate.children.len() {
                if self.child_state(gate, i) == ItemState::Unlocked {
                    unlocked.insert(gate.children[i].path.clone());
                }
            }
        }
        unlocked
    }
}
