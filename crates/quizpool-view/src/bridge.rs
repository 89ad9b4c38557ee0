//! Result bridge: cross-frame score messages and the score store.
//!
//! Exercise frames post untyped JSON to the parent window. The bridge
//! parses that into an exhaustively matched message kind — anything that is
//! not a well-formed result report becomes `Unrecognized` instead of
//! silently falling through — and owns the per-path score records.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::render::Styling;

/// A message received from an exercise frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FrameMessage {
    /// A score report: `{ "type": "results", "id": ..., "score": ...,
    /// "maxScore": ... }`.
    Results {
        id: String,
        score: f64,
        #[serde(rename = "maxScore")]
        max_score: f64,
    },
    /// Any other or malformed shape. Explicitly ignored.
    #[serde(other)]
    Unrecognized,
}

impl FrameMessage {
    /// Parse an arbitrary JSON value. Never fails: shapes that do not match
    /// the protocol come back as [`FrameMessage::Unrecognized`].
    pub fn parse(value: &Value) -> FrameMessage {
        serde_json::from_value(value.clone()).unwrap_or(FrameMessage::Unrecognized)
    }
}

/// The latest reported score for one exercise. Exists only after the first
/// report; overwritten on every subsequent report; never persisted beyond
/// the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub score: f64,
    pub max_score: f64,
}

impl ScoreRecord {
    /// Achieved fraction of the max score. A zero (or negative) max score
    /// counts as 0 rather than dividing by zero.
    pub fn percentage(&self) -> f64 {
        if self.max_score <= 0.0 {
            0.0
        } else {
            self.score / self.max_score
        }
    }

    /// Pass styling at 50% or better.
    pub fn styling(&self) -> Styling {
        if self.percentage() >= 0.5 {
            Styling::Pass
        } else {
            Styling::Fail
        }
    }

    /// Display label for a control: `name (score/maxScore)`.
    pub fn label(&self, name: &str) -> String {
        format!(
            "{name} ({}/{})",
            format_score(self.score),
            format_score(self.max_score)
        )
    }
}

/// Owns the path -> score map. The sole writer of score records.
#[derive(Debug, Default)]
pub struct ResultBridge {
    scores: HashMap<String, ScoreRecord>,
}

impl ResultBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest report for a path. Last received wins.
    ///
    /// Reports are clamped into `0 <= score <= max_score` before storage;
    /// the map never holds a score outside that range.
    pub fn record(&mut self, path: &str, score: f64, max_score: f64) -> ScoreRecord {
        let max_score = max_score.max(0.0);
        let record = ScoreRecord {
            score: score.clamp(0.0, max_score),
            max_score,
        };
        self.scores.insert(path.to_string(), record);
        record
    }

    /// The latest record for a path, if any report has arrived.
    pub fn score(&self, path: &str) -> Option<ScoreRecord> {
        self.scores.get(path).copied()
    }
}

/// Render a score without a trailing `.0` when it is integral.
fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_results_message() {
        let msg = FrameMessage::parse(&json!({
            "type": "results",
            "id": "Q/A",
            "score": 3,
            "maxScore": 5
        }));
        assert_eq!(
            msg,
            FrameMessage::Results {
                id: "Q/A".into(),
                score: 3.0,
                max_score: 5.0
            }
        );
    }

    #[test]
    fn parse_other_type_is_unrecognized() {
        let msg = FrameMessage::parse(&json!({ "type": "resize", "height": 300 }));
        assert_eq!(msg, FrameMessage::Unrecognized);
    }

    #[test]
    fn parse_malformed_results_is_unrecognized() {
        // Right tag, wrong field types.
        let msg = FrameMessage::parse(&json!({
            "type": "results",
            "id": "Q/A",
            "score": "three",
            "maxScore": 5
        }));
        assert_eq!(msg, FrameMessage::Unrecognized);
        assert_eq!(
            FrameMessage::parse(&json!("just a string")),
            FrameMessage::Unrecognized
        );
    }

    #[test]
    fn percentage_guards_zero_max_score() {
        let record = ScoreRecord {
            score: 3.0,
            max_score: 0.0,
        };
        assert_eq!(record.percentage(), 0.0);
        assert_eq!(record.styling(), Styling::Fail);
    }

    #[test]
    fn styling_threshold_is_half() {
        let pass = ScoreRecord {
            score: 3.0,
            max_score: 5.0,
        };
        let fail = ScoreRecord {
            score: 4.0,
            max_score: 10.0,
        };
        assert_eq!(pass.styling(), Styling::Pass);
        assert_eq!(fail.styling(), Styling::Fail);
    }

    #[test]
    fn label_shows_literal_score_pair() {
        let record = ScoreRecord {
            score: 3.0,
            max_score: 5.0,
        };
        assert_eq!(record.label("A"), "A (3/5)");

        let fractional = ScoreRecord {
            score: 2.5,
            max_score: 5.0,
        };
        assert_eq!(fractional.label("B"), "B (2.5/5)");
    }

    #[test]
    fn out_of_range_reports_are_clamped() {
        let mut bridge = ResultBridge::new();

        let over = bridge.record("Q/A", 7.0, 5.0);
        assert_eq!(over.score, 5.0);
        assert_eq!(over.label("A"), "A (5/5)");

        let negative = bridge.record("Q/A", -1.0, 5.0);
        assert_eq!(negative.score, 0.0);
        assert_eq!(negative.styling(), Styling::Fail);

        let negative_max = bridge.record("Q/A", 3.0, -2.0);
        assert_eq!(negative_max.max_score, 0.0);
        assert_eq!(negative_max.score, 0.0);
    }

    #[test]
    fn latest_report_wins() {
        let mut bridge = ResultBridge::new();
        bridge.record("Q/A", 1.0, 5.0);
        bridge.record("Q/A", 4.0, 5.0);
        let record = bridge.score("Q/A").unwrap();
        assert_eq!(record.score, 4.0);
        assert!(bridge.score("Q/B").is_none());
    }
}
