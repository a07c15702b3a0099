// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Registry of supported chat applications.
//!
//! Each [`App`] knows its display name, how to label message roles, where
//! its sessions are stored, and which parser reads them.
//!
//! ```
//! use chat2md::app::App;
//!
//! let app: App = "Claude".parse().unwrap();
//! assert_eq!(app, App::Claude);
//! assert_eq!(app.display_name(), "Claude Code");
//!
//! assert!("icq".parse::<App>().is_err());
//! ```

use crate::model::Role;
use crate::parser::{ChatParser, claude::ClaudeCodeParser, document::DocumentParser, stub::StubParser};
use snafu::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Error returned when an application identifier has no registered parser.
#[derive(Debug, Snafu)]
pub enum LookupError {
    /// The identifier does not name a supported application.
    #[snafu(display(
        "unsupported chat application: {name} (expected one of: {})",
        App::keys().join(", ")
    ))]
    UnknownApp {
        /// The identifier that was requested.
        name: String,
    },
}

/// A chat application whose sessions can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum App {
    /// Claude Code (line-delimited JSON transcripts).
    Claude,
    /// WeChat desktop (not yet supported).
    WeChat,
    /// QQ desktop (not yet supported).
    Qq,
    /// Slack desktop (not yet supported).
    Slack,
    /// Discord desktop (not yet supported).
    Discord,
    /// `ChatGPT` JSON exports.
    Gpt,
    /// Gemini JSON exports.
    Gemini,
    /// Doubao JSON exports.
    Doubao,
}

impl App {
    /// Every registered application, in listing order.
    pub const ALL: [Self; 8] = [
        Self::Claude,
        Self::WeChat,
        Self::Qq,
        Self::Slack,
        Self::Discord,
        Self::Gpt,
        Self::Gemini,
        Self::Doubao,
    ];

    /// The identifier accepted on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::WeChat => "wechat",
            Self::Qq => "qq",
            Self::Slack => "slack",
            Self::Discord => "discord",
            Self::Gpt => "gpt",
            Self::Gemini => "gemini",
            Self::Doubao => "doubao",
        }
    }

    /// All identifiers accepted on the command line.
    #[must_use]
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|app| app.key()).collect()
    }

    /// Human-readable application name used in document titles.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::WeChat => "WeChat",
            Self::Qq => "QQ",
            Self::Slack => "Slack",
            Self::Discord => "Discord",
            Self::Gpt => "GPT",
            Self::Gemini => "Gemini",
            Self::Doubao => "Doubao",
        }
    }

    const fn assistant_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            other => other.display_name(),
        }
    }

    /// Section label for a message role in this application's exports.
    #[must_use]
    pub fn role_label(self, role: Role) -> String {
        match role {
            Role::User => "🧑 User".to_owned(),
            Role::Assistant => format!("🤖 {}", self.assistant_name()),
            Role::SystemNotice => "🤖 System".to_owned(),
        }
    }

    /// Creates the parser that reads this application's session files.
    #[must_use]
    pub fn parser(self) -> Box<dyn ChatParser> {
        match self {
            Self::Claude => Box::new(ClaudeCodeParser),
            Self::Gpt => Box::new(DocumentParser::new(self, &["assistant", "system"])),
            Self::Gemini => Box::new(DocumentParser::new(self, &["model", "assistant"])),
            Self::Doubao => Box::new(DocumentParser::new(self, &["assistant", "model"])),
            Self::WeChat | Self::Qq => Box::new(StubParser::new(self, "database")),
            Self::Slack | Self::Discord => Box::new(StubParser::new(self, "API")),
        }
    }

    /// Candidate storage roots under `home`, in lookup order.
    ///
    /// Discovery uses the first candidate that exists.
    #[must_use]
    pub fn storage_roots(self, home: &Path) -> Vec<PathBuf> {
        let candidates: &[&str] = match self {
            Self::Claude => &[".claude/projects"],
            Self::WeChat => &["Documents/WeChat Files"],
            Self::Qq => &["Library/Containers/com.tencent.qq/Data/Library/Application Support/QQ"],
            Self::Slack => &["Library/Application Support/Slack"],
            Self::Discord => &["Library/Application Support/discord"],
            Self::Gpt => &[
                "Library/Application Support/OpenAI",
                ".openai",
                "Documents/OpenAI",
                "AppData/Roaming/OpenAI",
            ],
            Self::Gemini => &[
                "Library/Application Support/Google/Gemini",
                ".gemini",
                "Documents/Google/Gemini",
                "AppData/Roaming/Google/Gemini",
            ],
            Self::Doubao => &[
                "Library/Application Support/Doubao",
                ".doubao",
                "Documents/Doubao",
                "AppData/Roaming/Doubao",
            ],
        };
        candidates.iter().map(|rel| home.join(rel)).collect()
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for App {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|app| app.key() == wanted)
            .context(UnknownAppSnafu { name: s })
    }
}
