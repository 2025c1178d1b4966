//! Per-project configuration fetch and caching
//!
//! Each project publishes an `esg.<project>.ini` configuration file in a
//! remote repository. The `dataset_id` option of its `[project:<name>]`
//! section is the declarative identifier template, and `*_pattern` options
//! override the capture expression of individual placeholders.
//!
//! [`ConfigProvider`] hands out [`ProjectPattern`] values, reading a
//! time-bounded local cache first and falling back to a remote fetch
//! through the repository's contents API.

mod pattern;
mod provider;

pub use pattern::ProjectPattern;
pub use provider::{ConfigCache, ConfigProvider, DEFAULT_CONFIG_API, DEFAULT_CONFIG_TTL};
