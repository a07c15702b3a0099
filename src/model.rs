// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Normalized message model shared by every session parser.
//!
//! Parsers convert provider-specific records into a flat sequence of
//! [`Message`] values; the renderer only ever sees this model.

/// The semantic role of a message.
///
/// The display label for a role varies per source application (see
/// [`App::role_label`](crate::app::App::role_label)), but the tag itself is
/// stable across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A message written by the human.
    User,
    /// A message produced by the assistant or chat partner.
    Assistant,
    /// A notice generated by this tool, such as an "unsupported" placeholder.
    SystemNotice,
}

/// A single normalized chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who sent the message.
    pub role: Role,

    /// Flattened display text. Never empty.
    pub text: String,

    /// Opaque timestamp string, usually ISO-8601. May be empty.
    pub time: String,
}

impl Message {
    /// Creates a message, returning `None` when `text` is empty.
    ///
    /// Parsers go through this constructor so that a message with no
    /// displayable text can never reach the renderer.
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>, time: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            role,
            text,
            time: time.into(),
        })
    }

    /// Returns the first `n` characters of the timestamp.
    ///
    /// Used for the `YYYY-MM-DD` date prefix of ISO timestamps. Shorter
    /// timestamps are returned whole.
    #[must_use]
    pub fn time_prefix(&self, n: usize) -> &str {
        char_prefix(&self.time, n)
    }

    /// Returns the `HH:MM` part of an ISO timestamp (characters 11 to 16).
    ///
    /// Returns an empty string unless the timestamp is longer than 16
    /// characters.
    #[must_use]
    pub fn time_of_day(&self) -> &str {
        if self.time.chars().count() <= 16 {
            return "";
        }
        let start = byte_offset(&self.time, 11);
        let end = byte_offset(&self.time, 16);
        &self.time[start..end]
    }
}

/// Returns the prefix of `s` holding at most `n` characters.
pub(crate) fn char_prefix(s: &str, n: usize) -> &str {
    &s[..byte_offset(s, n)]
}

/// Byte offset of the `n`th character, clamped to the string length.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}
