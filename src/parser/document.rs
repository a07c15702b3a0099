// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Whole-document JSON exports.
//!
//! Chat assistants such as GPT, Gemini, and Doubao have no single export
//! format; this parser accepts the common shape of an object holding a
//! `messages` or `conversations` array, or a bare array, of
//! `{role, content, created | timestamp}` objects. Files it cannot read
//! produce placeholder messages.

use super::{ChatParser, ParseError, ParseOptions, get_str, placeholder};
use crate::app::App;
use crate::model::{Message, Role};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Epoch values at or above this are taken to be milliseconds.
const MILLIS_THRESHOLD: f64 = 1e11;

const UNSUPPORTED: &str = "access to a specific storage format";

/// Parser for JSON documents holding a list of role/content messages.
#[derive(Debug, Clone, Copy)]
pub struct DocumentParser {
    app: App,
    assistant_roles: &'static [&'static str],
}

impl DocumentParser {
    /// Creates a parser for `app` that maps `assistant_roles` to
    /// [`Role::Assistant`]. The `user` role always maps to [`Role::User`].
    #[must_use]
    pub const fn new(app: App, assistant_roles: &'static [&'static str]) -> Self {
        Self {
            app,
            assistant_roles,
        }
    }

    /// Parses a JSON document held in memory.
    ///
    /// Returns `None` when the text is not JSON or contains no message
    /// array. Array elements that are not role/content messages are
    /// skipped.
    #[must_use]
    pub fn parse_document_str(&self, source: &str) -> Option<Vec<Message>> {
        let doc: Value = match serde_json::from_str(source) {
            Ok(doc) => doc,
            Err(err) => {
                debug!(app = %self.app, error = %err, "document is not valid JSON");
                return None;
            }
        };

        // An object without a message array is an unsupported layout, not an
        // empty conversation; the caller exports the placeholder pair for it.
        let items = doc
            .get("messages")
            .or_else(|| doc.get("conversations"))
            .unwrap_or(&doc)
            .as_array()?;

        Some(items.iter().filter_map(|item| self.parse_item(item)).collect())
    }

    fn parse_item(&self, item: &Value) -> Option<Message> {
        let role = get_str(item, &["role"]).unwrap_or_default();
        let role = if role == "user" {
            Role::User
        } else if self.assistant_roles.iter().any(|r| *r == role) {
            Role::Assistant
        } else {
            return None;
        };

        let text = get_str(item, &["content"])?.trim();
        Message::new(role, text, item_time(item))
    }
}

impl ChatParser for DocumentParser {
    fn parse_session(&self, path: &Path, _opts: &ParseOptions) -> Result<Vec<Message>, ParseError> {
        let parsed = match std::fs::read_to_string(path) {
            Ok(source) => self.parse_document_str(&source),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "failed to read document");
                None
            }
        };

        Ok(parsed.unwrap_or_else(|| {
            warn!(
                app = %self.app,
                path = %path.display(),
                "unsupported session format, exporting placeholder"
            );
            placeholder(self.app, UNSUPPORTED)
        }))
    }
}

/// Picks `created` when it is set, otherwise `timestamp`.
fn item_time(item: &Value) -> String {
    let value = item
        .get("created")
        .filter(|created| is_set(created))
        .or_else(|| item.get("timestamp"));

    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(format_epoch)
            .unwrap_or_else(|| n.to_string()),
        _ => String::new(),
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Formats Unix epoch seconds (or milliseconds) as a local ISO timestamp.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_epoch(epoch: f64) -> Option<String> {
    let secs = if epoch.abs() >= MILLIS_THRESHOLD {
        epoch / 1000.0
    } else {
        epoch
    };
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;

    DateTime::from_timestamp(whole as i64, nanos).map(|dt| {
        dt.with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    })
}
