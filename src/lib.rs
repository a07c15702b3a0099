// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Export chat session logs to Markdown.
//!
//! This crate discovers chat sessions stored by assistant tools and
//! messaging apps, parses their JSON records into a normalized message
//! model, and renders each session as a readable Markdown document.
//!
//! # Overview
//!
//! 1. [`discovery`] finds session files for an [`app::App`]
//! 2. A [`parser::ChatParser`] reads one session into [`model::Message`]s,
//!    using [`content::normalize`] to flatten structured message bodies
//! 3. [`renderer`] formats the messages and [`export`] writes the file
//!
//! # Example
//!
//! ```
//! use chat2md::app::App;
//! use chat2md::parser::claude::parse_session_str;
//! use chat2md::renderer::{ExportHeader, render_markdown};
//!
//! let log = r#"{"type":"user","timestamp":"2025-01-02T09:30:00Z","message":{"role":"user","content":"Hello"}}"#;
//! let messages = parse_session_str(log, false);
//!
//! let markdown = render_markdown(&messages, &ExportHeader::new(App::Claude));
//! assert!(markdown.contains("## 🧑 User 09:30"));
//! ```
//!
//! # Modules
//!
//! - [`app`]: supported applications and the parser registry
//! - [`content`]: flattening of message payloads into display text
//! - [`discovery`]: locating session files on disk
//! - [`export`]: output file naming and writing
//! - [`model`]: the normalized message model
//! - [`parser`]: per-application session parsers
//! - [`renderer`]: Markdown generation

#![deny(missing_docs)]

pub mod app;
pub mod content;
pub mod discovery;
pub mod export;
pub mod model;
pub mod parser;
pub mod renderer;
