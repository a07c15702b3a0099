// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Writing rendered sessions to disk.
//!
//! Output files are named after the session's first message:
//! `<date>_<snippet>.md`, where the date is the first ten characters of the
//! first message's timestamp and the snippet is the start of its text. Both
//! parts have characters that are unsafe in file names replaced or removed,
//! so the name is always a single path component. When a session would
//! reuse the name of a file already in the output directory, a numeric
//! suffix (`_2`, `_3`, ...) is added instead.

use crate::model::{Message, char_prefix};
use crate::renderer::{ExportHeader, render_markdown};
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Number of characters of the first message used in the file name.
pub const SNIPPET_CHARS: usize = 20;

/// File name used when there is no message to name the file after.
const UNTITLED: &str = "untitled.md";

/// Error type for export failures.
#[derive(Debug, Snafu)]
pub enum ExportError {
    /// The output directory could not be created.
    #[snafu(display("failed to create output directory {}: {source}", path.display()))]
    CreateDir {
        /// The directory being created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Builds the output file name for a session.
///
/// ```
/// use chat2md::export::export_filename;
/// use chat2md::model::{Message, Role};
///
/// let first = Message::new(Role::User, "Fix src/main.rs: why?", "2025-02-03T04:05:06Z").unwrap();
/// assert_eq!(export_filename(&[first]), "2025-02-03_Fix src_main.rs why.md");
/// ```
#[must_use]
pub fn export_filename(messages: &[Message]) -> String {
    let Some(first) = messages.first() else {
        return UNTITLED.to_owned();
    };
    format!(
        "{}_{}.md",
        sanitize_snippet(first.time_prefix(10)),
        sanitize_snippet(char_prefix(&first.text, SNIPPET_CHARS))
    )
}

/// Returns `filename`, or the first `<stem>_<n>.md` for n = 2, 3, ...
/// that does not exist yet in `dir`.
fn available_filename(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_owned();
    }
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}.md");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Makes a text fragment safe to use in a file name.
///
/// Path separators become `_`, characters reserved on Windows are removed,
/// and control characters such as newlines become spaces.
#[must_use]
pub fn sanitize_snippet(snippet: &str) -> String {
    snippet
        .chars()
        .filter(|c| !matches!(*c, ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

/// Writes `markdown` to `dir/filename`, creating `dir` if needed.
///
/// An existing file with the same name is overwritten.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot
/// be written.
pub fn write_output(markdown: &str, dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).context(CreateDirSnafu { path: dir })?;
    let path = dir.join(filename);
    std::fs::write(&path, markdown).context(WriteSnafu { path: &path })?;
    Ok(path)
}

/// Renders a session and writes it into `dir`.
///
/// Returns `Ok(None)` without touching the file system when there are no
/// messages to export, otherwise the path of the written file. Existing
/// files are never replaced; a colliding name gets a numeric suffix.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn export_session(
    messages: &[Message],
    header: &ExportHeader,
    dir: &Path,
) -> Result<Option<PathBuf>, ExportError> {
    if messages.is_empty() {
        return Ok(None);
    }

    let markdown = render_markdown(messages, header);
    let filename = available_filename(dir, &export_filename(messages));
    let path = write_output(&markdown, dir, &filename)?;
    info!(path = %path.display(), messages = messages.len(), "exported session");
    Ok(Some(path))
}
