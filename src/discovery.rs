// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Locating session files on local storage.
//!
//! Each application keeps its history in a different layout:
//!
//! - Claude Code: one directory per project, holding `*.jsonl` sessions
//! - GPT, Gemini, Doubao: loose `.json`/`.jsonl` files anywhere below the
//!   storage root, each treated as its own session
//! - WeChat, QQ, Slack, Discord: one directory per account, listed but
//!   not yet readable

use crate::app::App;
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Error type for session discovery failures.
#[derive(Debug, Snafu)]
pub enum DiscoveryError {
    /// A storage directory exists but could not be listed.
    #[snafu(display("failed to list {}: {source}", path.display()))]
    ReadDir {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// A named group of sessions, such as a project or an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGroup {
    /// Human-readable group name.
    pub name: String,

    /// Location of the group on disk.
    pub path: PathBuf,

    /// Session files in the group, sorted by path.
    pub sessions: Vec<PathBuf>,
}

enum Layout {
    ProjectDirs,
    FileTree,
    AccountDirs,
}

const fn layout(app: App) -> Layout {
    match app {
        App::Claude => Layout::ProjectDirs,
        App::Gpt | App::Gemini | App::Doubao => Layout::FileTree,
        App::WeChat | App::Qq | App::Slack | App::Discord => Layout::AccountDirs,
    }
}

/// Lists the session groups of `app` stored under `home`.
///
/// Returns an empty list when none of the application's storage roots
/// exist. Groups are sorted by name.
///
/// # Errors
///
/// Returns an error if the storage root or a project directory exists but
/// cannot be listed.
pub fn discover_sessions(app: App, home: &Path) -> Result<Vec<SessionGroup>, DiscoveryError> {
    let Some(root) = app.storage_roots(home).into_iter().find(|p| p.is_dir()) else {
        debug!(app = %app, "no storage root found");
        return Ok(Vec::new());
    };
    debug!(app = %app, root = %root.display(), "discovering sessions");

    let mut groups = match layout(app) {
        Layout::ProjectDirs => project_groups(&root)?,
        Layout::FileTree => file_groups(&root),
        Layout::AccountDirs => subdirectories(&root)?
            .into_iter()
            .map(|path| SessionGroup {
                name: file_name(&path),
                path,
                sessions: Vec::new(),
            })
            .collect(),
    };

    groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(groups)
}

fn project_groups(root: &Path) -> Result<Vec<SessionGroup>, DiscoveryError> {
    subdirectories(root)?
        .into_iter()
        .map(|dir| -> Result<SessionGroup, DiscoveryError> {
            let mut sessions: Vec<PathBuf> = std::fs::read_dir(&dir)
                .context(ReadDirSnafu { path: &dir })?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_extension(path, &["jsonl"]))
                .collect();
            sessions.sort();

            Ok(SessionGroup {
                name: project_name(&file_name(&dir)),
                path: dir,
                sessions,
            })
        })
        .collect()
}

fn file_groups(root: &Path) -> Vec<SessionGroup> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), &["json", "jsonl"]))
        .map(|entry| {
            let path = entry.into_path();
            SessionGroup {
                name: file_name(&path),
                sessions: vec![path.clone()],
                path,
            }
        })
        .collect()
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    Ok(std::fs::read_dir(dir)
        .context(ReadDirSnafu { path: dir })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect())
}

/// Turns a Claude Code project directory name back into a readable path.
///
/// Claude Code encodes `/home/me/proj` as `-home-me-proj`. The encoding is
/// lossy (hyphens in the original path also decode to `/`).
#[must_use]
pub fn project_name(dir_name: &str) -> String {
    let readable = dir_name.replace(['-', '\\'], "/");
    readable
        .strip_prefix('/')
        .map_or_else(|| readable.clone(), str::to_owned)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| *wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn decodes_project_names() {
        assert_eq!(project_name("-home-me-proj"), "home/me/proj");
        assert_eq!(project_name("C:\\Users\\me"), "C:/Users/me");
        assert_eq!(project_name("plain"), "plain");
    }

    #[test]
    fn missing_root_yields_no_groups() {
        let home = tempfile::tempdir().unwrap();
        for app in App::ALL {
            assert!(discover_sessions(app, home.path()).unwrap().is_empty());
        }
    }

    #[test]
    fn lists_claude_projects_with_jsonl_sessions() {
        let home = tempfile::tempdir().unwrap();
        let projects = home.path().join(".claude/projects");
        let beta = projects.join("-work-beta");
        let alpha = projects.join("-work-alpha");
        fs::create_dir_all(&beta).unwrap();
        fs::create_dir_all(&alpha).unwrap();
        fs::write(alpha.join("b.jsonl"), "").unwrap();
        fs::write(alpha.join("a.jsonl"), "").unwrap();
        fs::write(alpha.join("notes.txt"), "").unwrap();
        fs::write(projects.join("stray.jsonl"), "").unwrap();

        let groups = discover_sessions(App::Claude, home.path()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "work/alpha");
        assert_eq!(groups[0].path, alpha);
        assert_eq!(
            groups[0].sessions,
            vec![alpha.join("a.jsonl"), alpha.join("b.jsonl")]
        );
        assert_eq!(groups[1].name, "work/beta");
        assert!(groups[1].sessions.is_empty());
    }

    #[test]
    fn walks_document_roots_recursively() {
        let home = tempfile::tempdir().unwrap();
        let root = home.path().join(".gemini");
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("one.json"), "[]").unwrap();
        fs::write(root.join("nested/deeper/two.jsonl"), "").unwrap();
        fs::write(root.join("nested/ignore.md"), "").unwrap();

        let groups = discover_sessions(App::Gemini, home.path()).unwrap();

        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["one.json", "two.jsonl"]);
        assert_eq!(groups[1].sessions, vec![root.join("nested/deeper/two.jsonl")]);
    }

    #[test]
    fn prefers_first_existing_candidate_root() {
        let home = tempfile::tempdir().unwrap();
        fs::create_dir_all(home.path().join(".openai")).unwrap();
        fs::write(home.path().join(".openai/late.json"), "[]").unwrap();
        let first = home.path().join("Library/Application Support/OpenAI");
        fs::create_dir_all(&first).unwrap();
        fs::write(first.join("early.json"), "[]").unwrap();

        let groups = discover_sessions(App::Gpt, home.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "early.json");
    }

    #[test]
    fn lists_account_directories_without_sessions() {
        let home = tempfile::tempdir().unwrap();
        let root = home.path().join("Documents/WeChat Files");
        fs::create_dir_all(root.join("wxid_abc")).unwrap();
        fs::write(root.join("config.ini"), "").unwrap();

        let groups = discover_sessions(App::WeChat, home.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "wxid_abc");
        assert!(groups[0].sessions.is_empty());
    }
}
