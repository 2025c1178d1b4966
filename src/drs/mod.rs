//! Dataset identifier parsing and facet extraction
//!
//! This module implements the DRS (Data Reference Syntax) engine: it turns a
//! project's declarative identifier template into a compiled matching
//! expression, validates and normalizes raw dataset identifier lists, and
//! extracts named facets from individual identifiers.
//!
//! # Implementation Model
//!
//! The pipeline runs entirely in memory, with no I/O:
//!
//! 1. [`normalize_datasets`] validates a raw identifier list all-or-nothing,
//!    strips the trailing version markers, and deduplicates the result into
//!    [`VersionedDataset`] pairs.
//! 2. [`translate_template`] converts a `%(name)s` template plus per-project
//!    override rules into a named-capture regular expression string.
//! 3. [`PatternCache`] compiles that expression at most once per project.
//! 4. [`extract_facets`] applies the compiled expression to a lower-cased
//!    identifier and returns the captured facet map.

mod extract;
mod normalize;
mod template;

pub use extract::{PatternCache, extract_facets};
pub use normalize::{VersionedDataset, dataset_lines, normalize_datasets};
pub use template::translate_template;
