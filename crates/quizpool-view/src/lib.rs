//! quizpool-view — Tree rendering and result aggregation.
//!
//! Materializes the composed quiz tree into a view model (a nested item
//! list plus one display frame per exercise) and processes the cross-frame
//! result messages that drive live pass/fail scoring.

pub mod bridge;
pub mod render;
pub mod session;
