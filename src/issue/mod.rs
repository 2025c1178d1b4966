//! Issue payload document handling
//!
//! An issue is a JSON object whose recognized keys follow a fixed canonical
//! order on the wire and on disk. This module wraps that document in
//! [`IssuePayload`], which validates the top-level shape at the boundary,
//! merges extracted facets additively, enforces the canonical key order,
//! and strips empty fields before persistence or transmission.

mod files;
mod payload;

pub use files::{read_dataset_lines, read_issue, write_dataset_file, write_issue};
pub use payload::{CANONICAL_KEYS, FACETS_KEY, IssuePayload};
