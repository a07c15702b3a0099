// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for chat2md.
//!
//! This binary provides the `chat2md` command for exporting chat sessions
//! of a supported application to Markdown files.

use chat2md::app::{self, App};
use chat2md::discovery::{self, SessionGroup};
use chat2md::export::{self, export_filename};
use chat2md::parser::{self, ChatParser, ParseOptions};
use chat2md::renderer::ExportHeader;
use lexopt::prelude::*;
use snafu::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "CHAT2MD_LOG";

struct Cli {
    app: String,
    output: PathBuf,
    session: Option<PathBuf>,
    include_tools: bool,
    include_media: bool,
    quiet: bool,
    dry_run: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("{source}"))]
    UnknownApp { source: app::LookupError },

    #[snafu(display("could not determine the home directory"))]
    NoHomeDir,

    #[snafu(display("{source}"))]
    Discover { source: discovery::DiscoveryError },

    #[snafu(display("{source}"))]
    ParseSession { source: parser::ParseError },

    #[snafu(display("{source}"))]
    Export { source: export::ExportError },

    #[snafu(display("failed to read selection: {source}"))]
    Prompt { source: std::io::Error },
}

fn print_help() {
    println!(
        "\
{name} {version}
Export chat session logs to Markdown

Usage: {name} [OPTIONS] <APP> <OUTPUT_DIR>

Arguments:
  <APP>         Chat application: {apps}
  <OUTPUT_DIR>  Directory to write Markdown files to

Options:
      --session <PATH>  Export this session file instead of choosing from a list
      --tools           Include messages that only contain a tool call
      --media           Include media files (reserved, currently ignored)
  -q, --quiet           Suppress progress messages
  -n, --dry-run         Show what would be written without writing
  -h, --help            Print help
  -V, --version         Print version

Environment:
  {log_env}           Log filter, e.g. debug (default: warn)",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        apps = App::keys().join(", "),
        log_env = LOG_ENV,
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut positional: Vec<String> = Vec::new();
    let mut session: Option<PathBuf> = None;
    let mut include_tools = false;
    let mut include_media = false;
    let mut quiet = false;
    let mut dry_run = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Long("session") => session = Some(parser.value()?.into()),
            Long("tools") => include_tools = true,
            Long("media") => include_media = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if positional.len() < 2 => positional.push(val.string()?),
            _ => return Err(arg.unexpected()),
        }
    }

    let mut positional = positional.into_iter();
    let app = positional.next().ok_or("missing required argument: <APP>")?;
    let output = positional
        .next()
        .ok_or("missing required argument: <OUTPUT_DIR>")?
        .into();

    Ok(Cli {
        app,
        output,
        session,
        include_tools,
        include_media,
        quiet,
        dry_run,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Error> {
    init_tracing();
    let cli = parse_args().context(ParseArgsSnafu)?;

    // Resolve the application before touching the file system
    let app: App = cli.app.parse().context(UnknownAppSnafu)?;
    let parser = app.parser();
    let opts = ParseOptions {
        include_tools: cli.include_tools,
        include_media: cli.include_media,
    };

    if let Some(session) = &cli.session {
        export_one(app, parser.as_ref(), session, &opts, &cli)?;
        return Ok(());
    }

    let home = dirs::home_dir().context(NoHomeDirSnafu)?;
    let groups = discovery::discover_sessions(app, &home).context(DiscoverSnafu)?;

    if groups.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!("Your {} sessions:", app.display_name());
    for (i, group) in groups.iter().enumerate() {
        println!("{}. {}", i + 1, group.name);
        println!("   Sessions: {}", group.sessions.len());
        println!();
    }

    let Some(group) = prompt_selection(&groups)? else {
        return Ok(());
    };

    for session in &group.sessions {
        export_one(app, parser.as_ref(), session, &opts, &cli)?;
    }

    println!("\nExport complete! Exported {} sessions", group.sessions.len());
    Ok(())
}

/// Asks the user to pick a group by its 1-based number.
///
/// Returns `None` after telling the user when the answer is not usable.
fn prompt_selection(groups: &[SessionGroup]) -> Result<Option<&SessionGroup>, Error> {
    print!("Enter the number of the project to export (e.g. 1): ");
    std::io::stdout().flush().context(PromptSnafu)?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer).context(PromptSnafu)?;

    let Ok(choice) = answer.trim().parse::<usize>() else {
        println!("Please enter a valid number.");
        return Ok(None);
    };

    let group = choice.checked_sub(1).and_then(|index| groups.get(index));
    if group.is_none() {
        println!("Invalid selection.");
    }
    Ok(group)
}

/// Parses one session file and writes it to the output directory.
fn export_one(
    app: App,
    parser: &dyn ChatParser,
    session: &Path,
    opts: &ParseOptions,
    cli: &Cli,
) -> Result<(), Error> {
    let messages = parser
        .parse_session(session, opts)
        .context(ParseSessionSnafu)?;

    if messages.is_empty() {
        println!("No messages to export.");
        return Ok(());
    }

    if cli.dry_run {
        eprintln!(
            "Would write {} ({} messages)",
            cli.output.join(export_filename(&messages)).display(),
            messages.len()
        );
        return Ok(());
    }

    let header = ExportHeader::new(app).with_source(session);
    if let Some(path) =
        export::export_session(&messages, &header, &cli.output).context(ExportSnafu)?
        && !cli.quiet
    {
        eprintln!("Exported {} messages -> {}", messages.len(), path.display());
    }
    Ok(())
}
