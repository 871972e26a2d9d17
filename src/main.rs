// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Surflog-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Surflog and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Surflog CLI entrypoint.
//!
//! Runs the interactive surf journal TUI against a journal directory
//! (default `~/.surflog/journal`).

use std::error::Error;
use std::path::PathBuf;

use chrono::Local;

use surflog::store::WriteDurability;
use surflog::tui::{self, Config};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<journal-dir>] [--durable-writes] [--offline]\n  {program} [--journal <dir>] [--durable-writes] [--offline]\n\nIf journal-dir/--journal is omitted, `~/.surflog/journal` is used.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n--offline skips fetching NOAA tide and wave conditions."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    journal_dir: Option<String>,
    durable_writes: bool,
    offline: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--journal" => {
                if options.journal_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.journal_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--offline" => {
                if options.offline {
                    return Err(());
                }
                options.offline = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.journal_dir.is_some() {
                    return Err(());
                }
                options.journal_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn default_journal_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".surflog").join("journal"),
        None => PathBuf::from(".surflog/journal"),
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "surflog".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let journal_dir = options
            .journal_dir
            .map(PathBuf::from)
            .unwrap_or_else(default_journal_dir);

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        tui::run(Config {
            journal_dir,
            utc_offset: *Local::now().offset(),
            durability,
            offline: options.offline,
        })
    })();

    if let Err(err) = result {
        eprintln!("surflog: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn no_args_yields_defaults() {
        assert_eq!(parse(&[]), Ok(CliOptions::default()));
    }

    #[test]
    fn positional_journal_dir() {
        let options = parse(&["/tmp/journal"]).unwrap();
        assert_eq!(options.journal_dir.as_deref(), Some("/tmp/journal"));
        assert!(!options.durable_writes);
        assert!(!options.offline);
    }

    #[test]
    fn journal_flag_takes_a_value() {
        let options = parse(&["--journal", "/tmp/journal"]).unwrap();
        assert_eq!(options.journal_dir.as_deref(), Some("/tmp/journal"));
    }

    #[test]
    fn journal_flag_requires_a_value() {
        assert_eq!(parse(&["--journal"]), Err(()));
    }

    #[test]
    fn positional_and_flag_journal_dirs_conflict() {
        assert_eq!(parse(&["/tmp/a", "--journal", "/tmp/b"]), Err(()));
        assert_eq!(parse(&["--journal", "/tmp/b", "/tmp/a"]), Err(()));
    }

    #[test]
    fn duplicate_positional_dirs_conflict() {
        assert_eq!(parse(&["/tmp/a", "/tmp/b"]), Err(()));
    }

    #[test]
    fn durable_writes_flag() {
        let options = parse(&["--durable-writes"]).unwrap();
        assert!(options.durable_writes);
    }

    #[test]
    fn duplicate_durable_writes_is_rejected() {
        assert_eq!(parse(&["--durable-writes", "--durable-writes"]), Err(()));
    }

    #[test]
    fn offline_flag() {
        let options = parse(&["--offline"]).unwrap();
        assert!(options.offline);
    }

    #[test]
    fn duplicate_offline_is_rejected() {
        assert_eq!(parse(&["--offline", "--offline"]), Err(()));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert_eq!(parse(&["--nope"]), Err(()));
        assert_eq!(parse(&["-x"]), Err(()));
    }

    #[test]
    fn all_options_together() {
        let options = parse(&["--journal", "/tmp/journal", "--durable-writes", "--offline"]).unwrap();
        assert_eq!(
            options,
            CliOptions {
                journal_dir: Some("/tmp/journal".to_owned()),
                durable_writes: true,
                offline: true,
            }
        );
    }
}
