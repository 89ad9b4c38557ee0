//! Composed quiz tree model.
//!
//! A quiz is a tree of pools and exercises. The composed tree is immutable
//! for the lifetime of a session and doubles as the wire shape of the
//! `/structure` endpoint: nodes serialize with an internal `type` tag as
//! either `{"type": "pool", ...}` or `{"type": "exercise", ...}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a pool unlocks its direct children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Every item is available from the start.
    #[default]
    Free,
    /// Items unlock one at a time, in order, as the previous one is submitted.
    Sequential,
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::Free => write!(f, "free"),
            NavigationMode::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for NavigationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(NavigationMode::Free),
            "sequential" => Ok(NavigationMode::Sequential),
            other => Err(format!("unknown navigation mode: {other}")),
        }
    }
}

/// A node of the composed quiz tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Pool(Pool),
    Exercise(Exercise),
}

/// A leaf exercise: one externally rendered, independently scored unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Short display name.
    pub name: String,
    /// Unique identifier derived from the tree position. Used both as the
    /// frame URL suffix and as the UI element key.
    pub path: String,
    /// Source module the generated notebook imports the exercise from.
    pub module: String,
    /// Maximum achievable score.
    pub max_score: f64,
}

/// A named group of child nodes with selection and navigation attributes.
///
/// `items` holds the children chosen for this session, already selected and
/// ordered; `weights` is aligned with `items` (one resolved weight per child).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    /// Name used as the path component for this pool.
    pub name: String,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Unique identifier derived from the tree position.
    pub path: String,
    /// How many items were drawn from the full child set (0 = all).
    #[serde(default)]
    pub select: usize,
    /// Whether the chosen items were shuffled.
    #[serde(default)]
    pub shuffle: bool,
    /// Unlocking discipline for direct children.
    #[serde(default)]
    pub navigation: NavigationMode,
    /// Resolved score weights, one per chosen child.
    #[serde(default)]
    pub weights: Vec<f64>,
    /// The chosen children, in presentation order.
    pub items: Vec<Node>,
}

impl Node {
    /// Path of this node (unique across the tree).
    pub fn path(&self) -> &str {
        match self {
            Node::Pool(p) => &p.path,
            Node::Exercise(e) => &e.path,
        }
    }

    /// Name used as this node's path component.
    pub fn name(&self) -> &str {
        match self {
            Node::Pool(p) => &p.name,
            Node::Exercise(e) => &e.name,
        }
    }

    /// Display label: a pool prefers its title, an exercise its name.
    pub fn label(&self) -> &str {
        match self {
            Node::Pool(p) => p.title.as_deref().unwrap_or(&p.name),
            Node::Exercise(e) => &e.name,
        }
    }

    /// Depth-first traversal yielding every node with its depth, root first.
    ///
    /// This is the only way other components observe the tree; there is no
    /// structural mutation after composition.
    pub fn traverse(&self) -> Vec<(&Node, usize)> {
        let mut out = Vec::new();
        self.collect(0, &mut out);
        out
    }

    fn collect<'a>(&'a self, depth: usize, out: &mut Vec<(&'a Node, usize)>) {
        out.push((self, depth));
        if let Node::Pool(p) = self {
            for child in &p.items {
                child.collect(depth + 1, out);
            }
        }
    }

    /// All exercise leaves beneath (or at) this node, in depth-first order.
    pub fn leaves(&self) -> Vec<&Exercise> {
        self.traverse()
            .into_iter()
            .filter_map(|(node, _)| match node {
                Node::Exercise(e) => Some(e),
                Node::Pool(_) => None,
            })
            .collect()
    }

    /// Maximum achievable score of this subtree, weights applied.
    pub fn max_achievable(&self) -> f64 {
        match self {
            Node::Exercise(e) => e.max_score,
            Node::Pool(p) => p
                .items
                .iter()
                .zip(weights_or_default(&p.weights, p.items.len()))
                .map(|(child, w)| child.max_achievable() * w)
                .sum(),
        }
    }
}

fn weights_or_default(weights: &[f64], len: usize) -> impl Iterator<Item = f64> + '_ {
    (0..len).map(move |i| weights.get(i).copied().unwrap_or(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str, path: &str, max_score: f64) -> Node {
        Node::Exercise(Exercise {
            name: name.into(),
            path: path.into(),
            module: name.to_lowercase(),
            max_score,
        })
    }

    fn pool(name: &str, path: &str, items: Vec<Node>, weights: Vec<f64>) -> Node {
        Node::Pool(Pool {
            name: name.into(),
            title: None,
            path: path.into(),
            select: 0,
            shuffle: false,
            navigation: NavigationMode::Free,
            weights,
            items,
        })
    }

    #[test]
    fn navigation_mode_display_and_parse() {
        assert_eq!(NavigationMode::Free.to_string(), "free");
        assert_eq!(
            "sequential".parse::<NavigationMode>().unwrap(),
            NavigationMode::Sequential
        );
        assert_eq!(
            "Free".parse::<NavigationMode>().unwrap(),
            NavigationMode::Free
        );
        assert!("random".parse::<NavigationMode>().is_err());
    }

    #[test]
    fn traverse_is_depth_first_with_depths() {
        let tree = pool(
            "quiz",
            "quiz",
            vec![
                exercise("A", "quiz/A", 1.0),
                pool(
                    "sub",
                    "quiz/sub",
                    vec![exercise("B", "quiz/sub/B", 1.0)],
                    vec![],
                ),
            ],
            vec![],
        );

        let visited: Vec<(&str, usize)> = tree
            .traverse()
            .into_iter()
            .map(|(n, d)| (n.path(), d))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("quiz", 0),
                ("quiz/A", 1),
                ("quiz/sub", 1),
                ("quiz/sub/B", 2),
            ]
        );
    }

    #[test]
    fn leaves_in_order() {
        let tree = pool(
            "quiz",
            "quiz",
            vec![
                exercise("A", "quiz/A", 1.0),
                pool(
                    "sub",
                    "quiz/sub",
                    vec![exercise("B", "quiz/sub/B", 1.0)],
                    vec![],
                ),
                exercise("C", "quiz/C", 1.0),
            ],
            vec![],
        );
        let paths: Vec<&str> = tree.leaves().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["quiz/A", "quiz/sub/B", "quiz/C"]);
    }

    #[test]
    fn max_achievable_applies_weights() {
        let tree = pool(
            "quiz",
            "quiz",
            vec![exercise("A", "quiz/A", 10.0), exercise("B", "quiz/B", 5.0)],
            vec![1.0, 2.0],
        );
        assert!((tree.max_achievable() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn node_serializes_with_type_tag() {
        let tree = pool("quiz", "quiz", vec![exercise("A", "quiz/A", 1.0)], vec![]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], "pool");
        assert_eq!(json["items"][0]["type"], "exercise");
        assert_eq!(json["items"][0]["name"], "A");
        assert_eq!(json["items"][0]["path"], "quiz/A");
    }
}
