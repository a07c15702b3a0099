// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Claude Code session transcripts.
//!
//! Claude Code writes each session as a JSONL file under
//! `~/.claude/projects/<project>/`. Every line is an independent record;
//! conversation records look like:
//!
//! ```json
//! {"type": "user", "timestamp": "2025-01-01T10:00:00Z",
//!  "message": {"role": "user", "content": "Hello"}}
//! ```
//!
//! Other record types (summaries, file snapshots, system events) are
//! ignored, as are lines that are not valid JSON or not valid UTF-8.
//!
//! # Example
//!
//! ```
//! use chat2md::model::Role;
//! use chat2md::parser::claude::parse_session_str;
//!
//! let log = r#"{"type":"user","message":{"role":"user","content":"Hi"},"timestamp":"t1"}
//! not json
//! {"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Hello!"}]},"timestamp":"t2"}"#;
//!
//! let messages = parse_session_str(log, false);
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[1].role, Role::Assistant);
//! assert_eq!(messages[1].text, "Hello!");
//! ```

use super::{ChatParser, ParseError, ParseOptions, ReadSnafu};
use crate::content::{Content, TOOL_CALL_PREFIX, normalize};
use crate::model::{Message, Role};
use serde::Deserialize;
use serde_json::Value;
use snafu::prelude::*;
use std::path::Path;
use tracing::debug;

/// Parser for Claude Code JSONL transcripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeCodeParser;

impl ChatParser for ClaudeCodeParser {
    fn parse_session(&self, path: &Path, opts: &ParseOptions) -> Result<Vec<Message>, ParseError> {
        let source = std::fs::read(path).context(ReadSnafu { path })?;
        let messages = parse_session_bytes(&source, opts.include_tools);
        debug!(path = %path.display(), messages = messages.len(), "parsed Claude Code session");
        Ok(messages)
    }
}

/// One line of a transcript.
///
/// Only the fields needed to build a [`Message`] are read; everything else
/// in the record is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptRecord {
    /// Record type, e.g. `user`, `assistant` or `summary`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Timestamp as written by the provider.
    #[serde(default)]
    pub timestamp: Option<Value>,

    /// The chat message carried by conversation records.
    #[serde(default)]
    pub message: Option<TranscriptMessage>,
}

/// The `message` object of a transcript record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptMessage {
    /// Author role, `user` or `assistant`.
    #[serde(default)]
    pub role: Option<String>,

    /// Message body, a string or a list of content blocks.
    #[serde(default)]
    pub content: Option<Content>,
}

/// Parses a whole transcript, one record per line.
///
/// Lines that are blank, not valid JSON, or not a user/assistant message
/// are skipped without affecting the lines after them. The output keeps
/// the input order.
#[must_use]
pub fn parse_session_str(source: &str, include_tools: bool) -> Vec<Message> {
    parse_session_bytes(source.as_bytes(), include_tools)
}

/// Parses a transcript read straight from disk.
///
/// Lines are decoded one at a time, so a line with invalid UTF-8 is
/// skipped like any other malformed line.
#[must_use]
pub fn parse_session_bytes(source: &[u8], include_tools: bool) -> Vec<Message> {
    source
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
        .filter_map(|record| parse_record(&record, include_tools))
        .collect()
}

fn parse_line(line_number: usize, line: &[u8]) -> Option<TranscriptRecord> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(record) => Some(record),
        Err(err) => {
            debug!(line = line_number, error = %err, "skipping malformed transcript line");
            None
        }
    }
}

/// Converts one transcript record into a message.
///
/// Returns `None` unless the record is a user record with role `user` or
/// an assistant record with role `assistant` whose content yields text.
/// Assistant records consisting only of a tool call are dropped unless
/// `include_tools` is set.
#[must_use]
pub fn parse_record(record: &TranscriptRecord, include_tools: bool) -> Option<Message> {
    let message = record.message.as_ref()?;

    let role = match (record.kind.as_deref(), message.role.as_deref()) {
        (Some("user"), Some("user")) => Role::User,
        (Some("assistant"), Some("assistant")) => Role::Assistant,
        _ => return None,
    };

    let text = message.content.as_ref().map(normalize).unwrap_or_default();

    if role == Role::Assistant && !include_tools && text.starts_with(TOOL_CALL_PREFIX) {
        return None;
    }

    Message::new(role, text, record_time(record))
}

fn record_time(record: &TranscriptRecord) -> String {
    match &record.timestamp {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, role: &str, content: &str) -> String {
        format!(
            r#"{{"type":"{kind}","timestamp":"2025-01-02T03:04:05.000Z","message":{{"role":"{role}","content":{content}}}}}"#
        )
    }

    fn tool_call() -> &'static str {
        r#"[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"ls"}}]"#
    }

    #[test]
    fn parses_user_and_assistant_messages() {
        let log = [
            record("user", "user", r#""What is Rust?""#),
            record("assistant", "assistant", r#"[{"type":"text","text":"A language."}]"#),
        ]
        .join("\n");

        let messages = parse_session_str(&log, false);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].text, "What is Rust?");
        assert_eq!(messages[0].time, "2025-01-02T03:04:05.000Z");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].text, "A language.");
    }

    #[test]
    fn skips_mismatched_type_and_role() {
        let log = [
            record("user", "assistant", r#""mismatch""#),
            record("assistant", "user", r#""mismatch""#),
            record("system", "system", r#""system""#),
        ]
        .join("\n");

        assert!(parse_session_str(&log, true).is_empty());
    }

    #[test]
    fn skips_records_without_text() {
        let log = [
            record("user", "user", r#""   ""#),
            record("assistant", "assistant", "[]"),
            r#"{"type":"user","message":{"role":"user"}}"#.to_owned(),
        ]
        .join("\n");

        assert!(parse_session_str(&log, false).is_empty());
    }

    #[test]
    fn drops_pure_tool_calls_by_default() {
        let log = record("assistant", "assistant", tool_call());
        assert!(parse_session_str(&log, false).is_empty());
    }

    #[test]
    fn keeps_pure_tool_calls_when_requested() {
        let log = record("assistant", "assistant", tool_call());
        let messages = parse_session_str(&log, true);

        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.starts_with("[Tool call: Bash]"));
    }

    #[test]
    fn keeps_tool_calls_that_follow_prose() {
        let content = r#"[{"type":"text","text":"Listing files."},{"type":"tool_use","name":"Bash","input":{}}]"#;
        let log = record("assistant", "assistant", content);
        let messages = parse_session_str(&log, false);

        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.starts_with("Listing files."));
    }

    #[test]
    fn user_tool_results_are_kept() {
        let content = r#"[{"type":"tool_result","tool_use_id":"t1","content":"file.txt"}]"#;
        let log = record("user", "user", content);
        let messages = parse_session_str(&log, false);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "[Tool result]\nfile.txt");
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut log = record("user", "user", r#""first""#).into_bytes();
        log.extend_from_slice(b"\n\xff\xfe garbage\n");
        log.extend_from_slice(record("assistant", "assistant", r#""third""#).as_bytes());

        let texts: Vec<_> = parse_session_bytes(&log, false)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["first", "third"]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let log = format!(
            "{}\r\n{}\r\n",
            record("user", "user", r#""one""#),
            record("assistant", "assistant", r#""two""#)
        );
        assert_eq!(parse_session_str(&log, false).len(), 2);
    }

    #[test]
    fn numeric_timestamps_become_text() {
        let log = r#"{"type":"user","timestamp":1735689600,"message":{"role":"user","content":"hi"}}"#;
        let messages = parse_session_str(log, false);

        assert_eq!(messages[0].time, "1735689600");
    }

    #[test]
    fn malformed_line_does_not_stop_parsing() {
        let log = [
            record("user", "user", r#""one""#),
            record("assistant", "assistant", r#""two""#),
            "{not json".to_owned(),
            record("user", "user", r#""four""#),
            record("assistant", "assistant", r#""five""#),
        ]
        .join("\n");

        let texts: Vec<_> = parse_session_str(&log, false)
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["one", "two", "four", "five"]);
    }

    #[test]
    fn ignores_blank_and_non_object_lines() {
        let log = format!("\n   \n[1,2]\n\"str\"\n{}\n", record("user", "user", r#""kept""#));
        let messages = parse_session_str(&log, false);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "kept");
    }

    #[test]
    fn missing_timestamp_is_empty() {
        let log = r#"{"type":"user","message":{"role":"user","content":"hi"}}"#;
        let messages = parse_session_str(log, false);
        assert_eq!(messages[0].time, "");
    }

    #[test]
    fn numeric_timestamp_is_kept_as_text() {
        let log = r#"{"type":"user","timestamp":1733356800,"message":{"role":"user","content":"hi"}}"#;
        let messages = parse_session_str(log, false);
        assert_eq!(messages[0].time, "1733356800");
    }

    #[test]
    fn empty_source_yields_no_messages() {
        assert!(parse_session_str("", false).is_empty());
    }

    #[test]
    fn reports_missing_file() {
        let err = ClaudeCodeParser
            .parse_session(Path::new("/nonexistent/session.jsonl"), &ParseOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/session.jsonl"));
    }
}
