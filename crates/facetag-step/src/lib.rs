#![warn(missing_docs)]

//! STEP (ISO 10303-21) entity-graph parsing and face-name injection for the
//! facetag labeling pipeline.
//!
//! This crate handles the file side of labeling: [`EntityGraph::parse`]
//! builds an id → record map from the clear-text entity encoding
//! (`#<id> = KEYWORD(<args>)`, continuation lines indicated by leading
//! whitespace) and extracts the authoritative face order from the shell
//! record(s); [`inject_labels`] rewrites exactly the name field of each
//! shell-referenced face record, preserving every other byte of the file.
//!
//! The crate performs no I/O: callers own reading and writing the file, so
//! the all-or-nothing write contract lives in one place.

mod error;
mod graph;
mod inject;

pub use error::StepError;
pub use graph::{EntityGraph, EntityRecord};
pub use inject::inject_labels;
