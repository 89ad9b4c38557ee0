//! TOML quiz-definition parser.
//!
//! Loads raw quiz trees from TOML files and runs non-fatal validation.
//! The raw tree is the input of `compose`; hard invariants (weight domain,
//! max-score equality, select range) are enforced there.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::NavigationMode;

/// A raw quiz tree node, exactly as written in the definition file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawNode {
    Pool(RawPool),
    Exercise(RawExercise),
}

/// A raw exercise entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExercise {
    /// Short display name; also the path component.
    pub name: String,
    /// Source module the generated notebook imports the exercise from.
    /// Defaults to the lowercased name.
    #[serde(default)]
    pub module: Option<String>,
    /// Maximum achievable score.
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

fn default_max_score() -> f64 {
    1.0
}

/// A raw pool entry. The top level of a quiz file is itself a pool.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPool {
    /// Display title; also the default path component.
    #[serde(default)]
    pub title: Option<String>,
    /// Number of items to draw (0 = all).
    #[serde(default)]
    pub select: usize,
    /// Whether to shuffle the chosen items.
    #[serde(default)]
    pub shuffle: bool,
    /// Unlocking discipline for direct children.
    #[serde(default)]
    pub navigation: NavigationMode,
    /// Score weights keyed by child index (TOML keys are strings).
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    /// Child nodes, in definition order.
    #[serde(default)]
    pub items: Vec<RawNode>,
}

/// Parse a quiz definition file into a raw tree.
pub fn parse_quiz(path: &Path) -> Result<RawPool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz definition: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a quiz definition from a TOML string (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<RawPool> {
    let raw: RawPool = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(raw)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Title or name of the node the warning refers to, if any.
    pub node: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a raw quiz for common issues that are legal but suspicious.
pub fn validate_quiz(root: &RawPool) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    validate_pool(root, &mut warnings);
    warnings
}

fn validate_pool(pool: &RawPool, warnings: &mut Vec<ValidationWarning>) {
    let label = pool.title.clone();

    if pool.items.is_empty() {
        warnings.push(ValidationWarning {
            node: label.clone(),
            message: "pool has no items".into(),
        });
    }

    if pool.shuffle && pool.items.len() <= 1 {
        warnings.push(ValidationWarning {
            node: label.clone(),
            message: "shuffle has no effect on a pool with at most one item".into(),
        });
    }

    for item in &pool.items {
        match item {
            RawNode::Exercise(e) => {
                if e.module.is_none() {
                    warnings.push(ValidationWarning {
                        node: Some(e.name.clone()),
                        message: format!(
                            "no module given, notebook will import from '{}'",
                            e.name.to_lowercase()
                        ),
                    });
                }
            }
            RawNode::Pool(p) => validate_pool(p, warnings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
title = "Sample Quiz"
navigation = "free"

[[items]]
type = "exercise"
name = "Einstein"
module = "mytask"
max_score = 10.0

[[items]]
type = "pool"
title = "Algebra"
select = 1
navigation = "sequential"

[items.weights]
0 = 2.0

[[items.items]]
type = "exercise"
name = "Factorisation"
module = "examples"
max_score = 5.0

[[items.items]]
type = "exercise"
name = "QuadraticEquation"
module = "templates"
max_score = 10.0
"#;

    #[test]
    fn parse_valid_quiz() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.title.as_deref(), Some("Sample Quiz"));
        assert_eq!(quiz.navigation, NavigationMode::Free);
        assert_eq!(quiz.items.len(), 2);

        match &quiz.items[1] {
            RawNode::Pool(p) => {
                assert_eq!(p.select, 1);
                assert_eq!(p.navigation, NavigationMode::Sequential);
                assert_eq!(p.weights.get("0").copied(), Some(2.0));
                assert_eq!(p.items.len(), 2);
            }
            other => panic!("expected pool, got {other:?}"),
        }
    }

    #[test]
    fn parse_minimal_defaults() {
        let toml = r#"
[[items]]
type = "exercise"
name = "FortyTwo"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        assert_eq!(quiz.select, 0);
        assert!(!quiz.shuffle);
        assert_eq!(quiz.navigation, NavigationMode::Free);
        match &quiz.items[0] {
            RawNode::Exercise(e) => {
                assert!(e.module.is_none());
                assert_eq!(e.max_score, 1.0);
            }
            other => panic!("expected exercise, got {other:?}"),
        }
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_quiz_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn parse_missing_file() {
        assert!(parse_quiz(&PathBuf::from("does-not-exist.toml")).is_err());
    }

    #[test]
    fn validate_warns_on_empty_pool() {
        let toml = r#"
title = "Empty"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("no items")));
    }

    #[test]
    fn validate_warns_on_missing_module() {
        let toml = r#"
[[items]]
type = "exercise"
name = "Orphan"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("quiz.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("no module")));
        assert_eq!(warnings[0].node.as_deref(), Some("Orphan"));
    }

    #[test]
    fn validate_clean_quiz_has_no_warnings() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("quiz.toml")).unwrap();
        assert!(validate_quiz(&quiz).is_empty());
    }
}
