//! Session: the client-side event loop over one rendered quiz.
//!
//! Single-threaded and event-driven: the only inputs are control clicks and
//! inbound frame messages, each handled to completion before the next, so
//! the score map and navigation state need no locking. A frame that never
//! reports simply leaves its control unscored — an accepted steady state.

use quizpool_core::model::Node;
use quizpool_core::navigate::{NavigationController, SubmitOutcome};
use serde_json::Value;

use crate::bridge::{FrameMessage, ResultBridge};
use crate::render::{render, FrameSet, ListView};

/// What handling one inbound event amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The result was recorded and the control repainted; sequential
    /// siblings may have been unlocked.
    Scored {
        path: String,
        newly_unlocked: Vec<String>,
    },
    /// A sequential ancestor keeps the leaf locked; nothing changed.
    RejectedLocked { path: String },
    /// No control exists for the reported id; logged, nothing changed.
    UnknownTarget { id: String },
    /// The message did not match the result protocol.
    Ignored,
}

/// One rendered quiz session: view model, score store, navigation state.
pub struct Session {
    list: ListView,
    frames: FrameSet,
    bridge: ResultBridge,
    navigation: NavigationController,
}

impl Session {
    /// Render the composed tree once and set up the event handlers.
    pub fn new(root: &Node, frame_base: &str) -> Self {
        let (list, frames) = render(root, frame_base);
        Session {
            list,
            frames,
            bridge: ResultBridge::new(),
            navigation: NavigationController::new(root),
        }
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn bridge(&self) -> &ResultBridge {
        &self.bridge
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    /// A control was clicked: make its frame the visible one.
    pub fn select_control(&mut self, path: &str) -> bool {
        self.frames.show(path)
    }

    /// Handle one inbound cross-frame message.
    ///
    /// Messages arrive unordered, any number of times per path; the latest
    /// report wins and processing the same message twice yields the same
    /// final state. Navigation is consulted before any UI update.
    pub fn handle_message(&mut self, raw: &Value) -> EventOutcome {
        let FrameMessage::Results {
            id,
            score,
            max_score,
        } = FrameMessage::parse(raw)
        else {
            tracing::debug!("ignoring non-result frame message");
            return EventOutcome::Ignored;
        };

        if self.list.control(&id).is_none() {
            tracing::warn!(id = %id, "result message for unknown control");
            return EventOutcome::UnknownTarget { id };
        }

        let newly_unlocked = match self.navigation.submit(&id) {
            SubmitOutcome::Accepted { newly_unlocked } => newly_unlocked,
            SubmitOutcome::Rejected => {
                tracing::debug!(id = %id, "result for locked exercise rejected");
                return EventOutcome::RejectedLocked { path: id };
            }
        };

        let record = self.bridge.record(&id, score, max_score);
        let control = self
            .list
            .control_mut(&id)
            .expect("control presence checked above");
        control.label = record.label(&control.name);
        control.styling = record.styling();

        tracing::info!(
            path = %id,
            score,
            max_score,
            percentage = record.percentage(),
            "result recorded"
        );

        EventOutcome::Scored {
            path: id,
            newly_unlocked,
        }
    }
}
