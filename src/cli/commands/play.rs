//! Play command - Drive a session with line-based commands
//!
//! Each input line is one command:
//!
//! ```text
//! train
//! step
//! reset
//! toggle <row> <col>
//! goal <row> <col>
//! click <x> <y> [left|right]
//! snapshot
//! quit
//! ```
//!
//! `click` takes pixel coordinates; a left click toggles an obstacle and a
//! right click moves the goal. Blank lines and lines starting with `#` are
//! skipped. Every command produces one JSON line on the output.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::{open_session, save_table};
use crate::{
    cli::config::SessionArgs,
    grid::Cell,
    session::{Command, CommandOutcome, Point, Session, Snapshot},
};

#[derive(Parser, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Initial Q-table (JSON); an unreadable file means an all-zero table
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Save the Q-table here when the script ends
    #[arg(long)]
    pub save_table: Option<PathBuf>,
}

/// One parsed input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayInput {
    Command(Command),
    Snapshot,
    Quit,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PlayRecord<'a> {
    Outcome {
        line: usize,
        input: &'a str,
        outcome: CommandOutcome,
        snapshot: Snapshot,
    },
    Snapshot {
        line: usize,
        snapshot: Snapshot,
    },
    Error {
        line: usize,
        input: &'a str,
        message: String,
    },
}

fn parse_number<T: std::str::FromStr>(token: Option<&str>, name: &str) -> std::result::Result<T, String> {
    let token = token.ok_or_else(|| format!("missing {name}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid {name} '{token}'"))
}

/// Parse one input line; `Ok(None)` for blank lines and comments
pub fn parse_line(line: &str) -> std::result::Result<Option<PlayInput>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };
    let input = match keyword.to_ascii_lowercase().as_str() {
        "train" => PlayInput::Command(Command::Train),
        "step" => PlayInput::Command(Command::StepAgent),
        "reset" => PlayInput::Command(Command::ResetSession),
        "toggle" | "goal" => {
            let row = parse_number(tokens.next(), "row")?;
            let col = parse_number(tokens.next(), "column")?;
            let at = Point::Cell(Cell::new(row, col));
            if keyword.eq_ignore_ascii_case("toggle") {
                PlayInput::Command(Command::ToggleObstacleAt { at })
            } else {
                PlayInput::Command(Command::SetGoalAt { at })
            }
        }
        "click" => {
            let x = parse_number(tokens.next(), "x")?;
            let y = parse_number(tokens.next(), "y")?;
            let at = Point::Pixel { x, y };
            match tokens.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("left") => PlayInput::Command(Command::ToggleObstacleAt { at }),
                Some("right") => PlayInput::Command(Command::SetGoalAt { at }),
                Some(other) => return Err(format!("unknown button '{other}'")),
            }
        }
        "snapshot" => PlayInput::Snapshot,
        "quit" | "exit" => PlayInput::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };

    if let Some(extra) = tokens.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(Some(input))
}

/// Run every command from `reader` against `session`, writing JSON lines
///
/// Unparseable lines are reported and skipped. Returns the number of
/// commands dispatched to the session.
pub fn run_script<R, W>(session: &mut Session, reader: R, mut writer: W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut dispatched = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read command")?;
        let number = idx + 1;

        let record = match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(PlayInput::Quit)) => break,
            Ok(Some(PlayInput::Snapshot)) => PlayRecord::Snapshot {
                line: number,
                snapshot: session.snapshot(),
            },
            Ok(Some(PlayInput::Command(command))) => {
                let outcome = session.handle(command)?;
                dispatched += 1;
                PlayRecord::Outcome {
                    line: number,
                    input: line.trim(),
                    outcome,
                    snapshot: session.snapshot(),
                }
            }
            Err(message) => PlayRecord::Error {
                line: number,
                input: line.trim(),
                message,
            },
        };

        serde_json::to_writer(&mut writer, &record)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(dispatched)
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.session.to_config()?;
    let mut session = open_session(config, args.table.as_deref())?;

    let stdout = io::stdout();
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            run_script(&mut session, BufReader::new(file), stdout.lock())?;
        }
        None => {
            run_script(&mut session, io::stdin().lock(), stdout.lock())?;
        }
    }

    if let Some(path) = &args.save_table {
        save_table(&session, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  "), Ok(None));
        assert_eq!(parse_line("# comment"), Ok(None));
        assert_eq!(
            parse_line("step"),
            Ok(Some(PlayInput::Command(Command::StepAgent)))
        );
        assert_eq!(
            parse_line("TOGGLE 2 3"),
            Ok(Some(PlayInput::Command(Command::ToggleObstacleAt {
                at: Point::Cell(Cell::new(2, 3))
            })))
        );
        assert_eq!(
            parse_line("click 85 10 right"),
            Ok(Some(PlayInput::Command(Command::SetGoalAt {
                at: Point::Pixel { x: 85, y: 10 }
            })))
        );
        assert_eq!(parse_line("quit"), Ok(Some(PlayInput::Quit)));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("dance").is_err());
        assert!(parse_line("toggle 1").is_err());
        assert!(parse_line("goal a 1").is_err());
        assert!(parse_line("click 1 2 middle").is_err());
        assert!(parse_line("step 3").is_err());
    }
}
