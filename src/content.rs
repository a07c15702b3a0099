// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Flattening of provider message payloads into display text.
//!
//! Assistant transcripts store a message body either as a plain string or as
//! an ordered list of typed blocks (`text`, `tool_use`, `tool_result`). Tool
//! results may themselves wrap further content, so the conversion is
//! recursive.
//!
//! # Example
//!
//! ```
//! use chat2md::content::{Content, normalize};
//!
//! let content: Content = serde_json::from_str(r#"[
//!     {"type": "text", "text": "  Reading the file.  "},
//!     {"type": "tool_use", "name": "Read", "input": {"path": "a.rs"}}
//! ]"#).unwrap();
//!
//! assert_eq!(
//!     normalize(&content),
//!     "Reading the file.\n\n[Tool call: Read]\nParameters: {\"path\":\"a.rs\"}"
//! );
//! ```

use crate::model::char_prefix;
use serde::Deserialize;
use serde_json::Value;

/// Prefix that starts every rendered tool invocation.
///
/// An assistant message whose text starts with this prefix consists of a
/// tool call only, with no accompanying prose.
pub const TOOL_CALL_PREFIX: &str = "[Tool call";

/// Header line that starts every rendered tool result.
pub const TOOL_RESULT_HEADER: &str = "[Tool result]";

/// Tool name used when a `tool_use` block has none.
pub const UNKNOWN_TOOL: &str = "unknown tool";

/// Maximum number of characters of serialized tool parameters.
pub const TOOL_INPUT_LIMIT: usize = 200;

/// Maximum number of characters of tool result text.
pub const TOOL_RESULT_LIMIT: usize = 500;

/// Appended to tool parameters cut at [`TOOL_INPUT_LIMIT`].
pub const TOOL_INPUT_ELLIPSIS: &str = "...";

/// Appended to tool results cut at [`TOOL_RESULT_LIMIT`].
pub const TOOL_RESULT_TRUNCATED: &str = "\n...(truncated)";

/// The body of a message, in one of the three shapes providers use.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// A plain string.
    Text(String),

    /// An ordered sequence of structured blocks.
    Blocks(Vec<Block>),

    /// Any other JSON value. Rendered through its string representation.
    Other(Value),
}

/// A structured content block, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Natural-language text.
    Text(String),

    /// A tool invocation made by the assistant.
    ToolUse {
        /// The tool name, if the block carries one.
        name: Option<String>,
        /// The invocation parameters.
        input: Value,
    },

    /// The output of a tool, which may itself be structured.
    ToolResult {
        /// The wrapped result content.
        content: Content,
    },

    /// An unrecognized block type or a non-object element.
    ///
    /// Kept so that new block types added by providers are skipped
    /// instead of failing the whole message.
    Unknown,
}

impl From<&Value> for Content {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::Blocks(items.iter().map(Block::from).collect()),
            other => Self::Other(other.clone()),
        }
    }
}

impl From<&Value> for Block {
    fn from(value: &Value) -> Self {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Self::Unknown;
        };

        match kind {
            "text" => value
                .get("text")
                .and_then(Value::as_str)
                .map_or(Self::Unknown, |text| Self::Text(text.to_owned())),
            "tool_use" => Self::ToolUse {
                name: value.get("name").and_then(Value::as_str).map(str::to_owned),
                input: value
                    .get("input")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            },
            "tool_result" => Self::ToolResult {
                content: value
                    .get("content")
                    .map_or_else(|| Content::Text(String::new()), Content::from),
            },
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from(&value))
    }
}

/// Flattens message content into a single display string.
///
/// - A plain string is returned trimmed.
/// - Blocks are rendered in order and the non-empty results are joined
///   with a blank line. The result is empty if no block yields text.
/// - Any other value is returned as its string representation.
///
/// This function never fails; unrecognized blocks are skipped.
#[must_use]
pub fn normalize(content: &Content) -> String {
    match content {
        Content::Text(text) => text.trim().to_owned(),
        Content::Blocks(blocks) => blocks
            .iter()
            .map(render_block)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
        Content::Other(value) => display_value(value),
    }
}

/// Shorthand for normalizing a raw JSON value.
#[must_use]
pub fn normalize_value(value: &Value) -> String {
    normalize(&Content::from(value))
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Text(text) => text.trim().to_owned(),
        Block::ToolUse { name, input } => {
            // Display of a Value is compact JSON; object keys come out sorted.
            let params = truncate(&input.to_string(), TOOL_INPUT_LIMIT, TOOL_INPUT_ELLIPSIS);
            format!(
                "{TOOL_CALL_PREFIX}: {}]\nParameters: {params}",
                name.as_deref().unwrap_or(UNKNOWN_TOOL)
            )
        }
        Block::ToolResult { content } => {
            let text = truncate(&normalize(content), TOOL_RESULT_LIMIT, TOOL_RESULT_TRUNCATED);
            format!("{TOOL_RESULT_HEADER}\n{text}")
        }
        Block::Unknown => String::new(),
    }
}

/// Cuts `s` to `limit` characters and appends `suffix` if it was longer.
fn truncate(s: &str, limit: usize, suffix: &str) -> String {
    if s.chars().count() > limit {
        format!("{}{suffix}", char_prefix(s, limit))
    } else {
        s.to_owned()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
