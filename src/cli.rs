use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(author, version, about = "In-memory todo list with a terminal UI", long_about = None)]
pub struct Cli {
    /// Initial status filter: All, Completed or "Not Completed"
    #[arg(short, long, global = true)]
    pub filter: Option<String>,

    /// Log level or filter directive (e.g. debug, tasklist=trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Write logs to this file (the TUI only logs when this is set)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch TUI interface
    Tui,
    /// Run a command script and print the visible tasks
    Run {
        /// Script file; reads stdin when omitted or "-"
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Report failing lines and continue instead of stopping
        #[arg(short, long)]
        keep_going: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "run",
            "script.txt",
            "--keep-going",
            "--filter",
            "Not Completed",
        ])
        .unwrap();
        assert_eq!(cli.filter.as_deref(), Some("Not Completed"));
        match cli.command {
            Some(Commands::Run { file, keep_going }) => {
                assert_eq!(file, Some(PathBuf::from("script.txt")));
                assert!(keep_going);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["tasklist"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_completions_shell_is_typed() {
        let cli = Cli::try_parse_from(["tasklist", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));
        assert!(Cli::try_parse_from(["tasklist", "completions", "tcsh"]).is_err());
    }
}
