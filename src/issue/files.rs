//! Issue JSON document and flat dataset file I/O.

use super::IssuePayload;
use crate::errors::IssueError;
use camino::Utf8Path;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};

const LOG_TARGET: &str = "     issue";

/// Read and validate the issue JSON document at `path`.
///
/// # Errors
///
/// Returns [`IssueError::FileAccess`] if the file cannot be read and
/// [`IssueError::MalformedIssueDocument`] if its content is not a JSON
/// object.
pub fn read_issue(path: &Utf8Path) -> Result<IssuePayload, IssueError> {
    let text = fs::read_to_string(path).map_err(|e| IssueError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let value = serde_json::from_str(&text).map_err(|e| IssueError::MalformedIssueDocument {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    IssuePayload::from_value(value, path.as_str())
}

/// Write the issue document to `path`, canonical keys first and any
/// unrecognized keys after them.
///
/// # Errors
///
/// Returns [`IssueError::FileAccess`] on any I/O failure.
pub fn write_issue(path: &Utf8Path, payload: &IssuePayload) -> Result<(), IssueError> {
    let ordered = payload.ordered_full();
    let file_access = |e: std::io::Error| IssueError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(file_access)?;
    }
    let file = File::create(path).map_err(file_access)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ordered).map_err(|e| IssueError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    writer.flush().map_err(file_access)?;
    log::debug!(target: LOG_TARGET, "wrote issue document to {path}");
    Ok(())
}

/// Read the flat dataset file: one identifier per line, blank lines and
/// surrounding whitespace ignored.
///
/// # Errors
///
/// Returns [`IssueError::FileAccess`] if the file cannot be read.
pub fn read_dataset_lines(path: &Utf8Path) -> Result<Vec<String>, IssueError> {
    let text = fs::read_to_string(path).map_err(|e| IssueError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rewrite the flat dataset file with uniform `id#version` lines, keeping
/// the user-visible file consistent with the validation result. Rewriting
/// an already-normalized file reproduces the same set of lines.
///
/// # Errors
///
/// Returns [`IssueError::FileAccess`] on any I/O failure.
pub fn write_dataset_file(path: &Utf8Path, lines: &[String]) -> Result<(), IssueError> {
    let file_access = |e: std::io::Error| IssueError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(file_access)?;
    }
    let file = File::create(path).map_err(file_access)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}").map_err(file_access)?;
    }
    writer.flush().map_err(file_access)?;
    log::info!(target: LOG_TARGET, "dataset file rearranged: {} entries in {path}", lines.len());
    Ok(())
}
