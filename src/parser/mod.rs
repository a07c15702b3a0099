// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Session parsers, one per source application.
//!
//! A parser reads one session file and produces the ordered list of
//! [`Message`]s it contains. Parsing is best-effort: malformed records are
//! skipped, and sources that cannot be understood at all produce a pair of
//! placeholder messages instead of an error. Only a failure to read a
//! session that the parser does support is reported as an error.
//!
//! - [`claude`]: Claude Code line-delimited JSON transcripts
//! - [`document`]: whole-document JSON exports (GPT, Gemini, Doubao)
//! - [`stub`]: messaging apps whose storage is not readable yet

pub mod claude;
pub mod document;
pub mod stub;

use crate::app::App;
use crate::model::{Message, Role};
use chrono::Local;
use snafu::prelude::*;
use std::path::{Path, PathBuf};

/// Error type for session parsing failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    /// The session file could not be read.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    Read {
        /// The session file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Options that control which records a parser keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep assistant messages that consist only of a tool call.
    pub include_tools: bool,

    /// Accepted for command-line compatibility. No parser reads media yet.
    pub include_media: bool,
}

/// Reads one session file of a particular application.
pub trait ChatParser {
    /// Parses the session stored at `path` into ordered messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read by a parser that
    /// supports its format. Parsers for unsupported formats return
    /// placeholder messages instead.
    fn parse_session(&self, path: &Path, opts: &ParseOptions) -> Result<Vec<Message>, ParseError>;
}

/// Builds the two messages shown in place of a session that cannot be parsed.
///
/// `requirement` completes the sentence "parsing needs ...".
pub(crate) fn placeholder(app: App, requirement: &str) -> Vec<Message> {
    let now = Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();
    let name = app.display_name();

    vec![
        Message {
            role: Role::User,
            text: format!("{name} chat log parsing is under development..."),
            time: now.clone(),
        },
        Message {
            role: Role::SystemNotice,
            text: format!(
                "{name} chat log parsing needs {requirement}, which this version does not support yet."
            ),
            time: now,
        },
    ]
}

/// Navigates a JSON path and returns the string value at the end.
pub(crate) fn get_str<'a>(value: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}
