//! quizpool-core — Quiz tree model, composition, selection, and navigation.
//!
//! This crate defines the fundamental data model and session-composition
//! logic that the rest of the quizpool system builds on.

pub mod compose;
pub mod error;
pub mod model;
pub mod navigate;
pub mod parser;
pub mod select;
