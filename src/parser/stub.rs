// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Parsers for messaging apps whose history cannot be read yet.
//!
//! WeChat and QQ keep history in encrypted local databases, and Slack and
//! Discord only expose it through their APIs. Until those are supported,
//! every session exports as a pair of placeholder messages.

use super::{ChatParser, ParseError, ParseOptions, placeholder};
use crate::app::App;
use crate::model::Message;
use std::path::Path;
use tracing::info;

/// Parser that always returns placeholder messages.
#[derive(Debug, Clone, Copy)]
pub struct StubParser {
    app: App,
    backend: &'static str,
}

impl StubParser {
    /// Creates a stub for `app`, whose history lives behind `backend`
    /// (for example `"database"` or `"API"`).
    #[must_use]
    pub const fn new(app: App, backend: &'static str) -> Self {
        Self { app, backend }
    }
}

impl ChatParser for StubParser {
    fn parse_session(&self, path: &Path, _opts: &ParseOptions) -> Result<Vec<Message>, ParseError> {
        info!(app = %self.app, path = %path.display(), "parser not implemented, exporting placeholder");
        let requirement = format!("access to the {} {}", self.app.display_name(), self.backend);
        Ok(placeholder(self.app, &requirement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn returns_placeholder_naming_backend() {
        let messages = StubParser::new(App::Discord, "API")
            .parse_session(Path::new("anything"), &ParseOptions::default())
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(
            messages[1].text,
            "Discord chat log parsing needs access to the Discord API, which this version does not support yet."
        );
    }

    #[test]
    fn registry_uses_database_for_wechat() {
        let messages = App::WeChat
            .parser()
            .parse_session(Path::new("anything"), &ParseOptions::default())
            .unwrap();
        assert!(messages[1].text.contains("WeChat database"));
    }
}
