// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for normalized chat sessions.
//!
//! This module turns a list of [`Message`]s into a readable Markdown
//! document. It only formats; all text extraction happens in the parsers.
//!
//! # Output Format
//!
//! The rendered Markdown includes:
//! - A top-level `# <App> Chat Log` heading
//! - A metadata list: export time, conversation dates, message count, and
//!   the source file when known
//! - One `## <role> <HH:MM>` section per message, separated by horizontal
//!   rules
//!
//! # Example
//!
//! ```
//! use chat2md::app::App;
//! use chat2md::model::{Message, Role};
//! use chat2md::renderer::{ExportHeader, render_markdown};
//!
//! let messages = vec![
//!     Message::new(Role::User, "Hello!", "2025-01-02T09:30:00.000Z").unwrap(),
//!     Message::new(Role::Assistant, "Hi there!", "2025-01-02T09:30:05.000Z").unwrap(),
//! ];
//!
//! let markdown = render_markdown(&messages, &ExportHeader::new(App::Claude));
//!
//! assert!(markdown.starts_with("# Claude Code Chat Log"));
//! assert!(markdown.contains("## 🧑 User 09:30\n\nHello!"));
//! assert!(markdown.contains("## 🤖 Claude 09:30\n\nHi there!"));
//! ```

use crate::app::App;
use crate::model::Message;
use chrono::{Local, NaiveDateTime};
use std::fmt::Write;
use std::path::Path;

/// Shown in place of a date when there are no messages.
const UNKNOWN_DATE: &str = "unknown";

/// Metadata printed at the top of an exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportHeader {
    /// The application the session came from.
    pub app: App,

    /// When the export was made.
    pub exported_at: NaiveDateTime,

    /// File name of the session source, if known.
    pub source: Option<String>,
}

impl ExportHeader {
    /// Creates a header for `app`, stamped with the current local time.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app,
            exported_at: Local::now().naive_local(),
            source: None,
        }
    }

    /// Records the file name of the session source.
    #[must_use]
    pub fn with_source(mut self, path: &Path) -> Self {
        self.source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self
    }
}

/// Renders a session as a Markdown document.
///
/// # Arguments
///
/// * `messages` - The session's messages, in display order
/// * `header` - Metadata for the document heading
///
/// # Returns
///
/// A `String` containing the complete Markdown document, with one section
/// per message.
#[must_use]
pub fn render_markdown(messages: &[Message], header: &ExportHeader) -> String {
    let mut out = String::new();
    render_header(&mut out, messages, header);

    for msg in messages {
        render_message(&mut out, msg, header.app);
    }

    out
}

fn render_header(out: &mut String, messages: &[Message], header: &ExportHeader) {
    let first = messages.first().map_or(UNKNOWN_DATE, |m| m.time_prefix(10));
    let last = messages.last().map_or(UNKNOWN_DATE, |m| m.time_prefix(10));

    writeln!(out, "# {} Chat Log\n", header.app.display_name()).unwrap();
    writeln!(
        out,
        "- Exported: {}",
        header.exported_at.format("%Y-%m-%d %H:%M")
    )
    .unwrap();
    writeln!(out, "- Conversation dates: {first} ~ {last}").unwrap();
    writeln!(out, "- Messages: {}", messages.len()).unwrap();
    if let Some(source) = &header.source {
        writeln!(out, "- Source: `{}`", source.replace('`', "'")).unwrap();
    }
    writeln!(out, "\n---\n").unwrap();
}

fn render_message(out: &mut String, msg: &Message, app: App) {
    let heading = format!("## {} {}", app.role_label(msg.role), msg.time_of_day());
    writeln!(out, "{}\n", heading.trim_end()).unwrap();
    writeln!(out, "{}\n", msg.text).unwrap();
    writeln!(out, "---\n").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::NaiveDate;

    fn msg(role: Role, text: &str, time: &str) -> Message {
        Message::new(role, text, time).unwrap()
    }

    fn fixed_header(app: App) -> ExportHeader {
        ExportHeader {
            app,
            exported_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            source: None,
        }
    }

    #[test]
    fn renders_document_header() {
        let messages = vec![
            msg(Role::User, "start", "2025-05-30T08:00:00Z"),
            msg(Role::Assistant, "end", "2025-05-31T09:00:00Z"),
        ];
        let output = render_markdown(&messages, &fixed_header(App::Claude));

        assert!(output.starts_with("# Claude Code Chat Log\n\n"));
        assert!(output.contains("- Exported: 2025-06-01 14:05\n"));
        assert!(output.contains("- Conversation dates: 2025-05-30 ~ 2025-05-31\n"));
        assert!(output.contains("- Messages: 2\n"));
        assert!(!output.contains("- Source:"));
    }

    #[test]
    fn renders_source_file_name() {
        let header = fixed_header(App::Claude).with_source(Path::new("/tmp/proj/abc.jsonl"));
        let output = render_markdown(&[msg(Role::User, "x", "")], &header);

        assert!(output.contains("- Source: `abc.jsonl`\n"));
    }

    #[test]
    fn renders_one_section_per_message_in_order() {
        let messages = vec![
            msg(Role::User, "first", "2025-01-01T10:00:00.000Z"),
            msg(Role::Assistant, "second", "2025-01-01T10:01:00.000Z"),
            msg(Role::User, "third", "2025-01-01T10:02:00.000Z"),
        ];
        let output = render_markdown(&messages, &fixed_header(App::Claude));

        assert_eq!(output.matches("\n## ").count(), 3);
        let first = output.find("first").unwrap();
        let second = output.find("second").unwrap();
        let third = output.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn section_layout() {
        let output = render_markdown(
            &[msg(Role::User, "Hello", "2025-01-01T10:42:00.000Z")],
            &fixed_header(App::Claude),
        );

        assert!(output.ends_with("---\n\n## 🧑 User 10:42\n\nHello\n\n---\n\n"));
    }

    #[test]
    fn omits_time_for_short_timestamps() {
        let output = render_markdown(
            &[msg(Role::Assistant, "Hi", "2025-01-01")],
            &fixed_header(App::Gemini),
        );

        assert!(output.contains("## 🤖 Gemini\n\nHi\n"));
        assert!(output.contains("- Conversation dates: 2025-01-01 ~ 2025-01-01\n"));
    }

    #[test]
    fn labels_system_notices() {
        let output = render_markdown(
            &[msg(Role::SystemNotice, "not supported", "")],
            &fixed_header(App::Qq),
        );

        assert!(output.starts_with("# QQ Chat Log"));
        assert!(output.contains("## 🤖 System\n\nnot supported"));
    }

    #[test]
    fn empty_session_has_unknown_dates() {
        let output = render_markdown(&[], &fixed_header(App::Claude));

        assert!(output.contains("- Conversation dates: unknown ~ unknown\n"));
        assert!(output.contains("- Messages: 0\n"));
        assert!(!output.contains("\n## "));
    }

    #[test]
    fn keeps_message_text_verbatim() {
        let text = "<tag>\n```rust\nfn main() {}\n```";
        let output = render_markdown(&[msg(Role::User, text, "")], &fixed_header(App::Claude));
        assert!(output.contains(text));
    }
}
