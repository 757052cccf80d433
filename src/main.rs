use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tasklist::cli::{Cli, Commands};
use tasklist::config::Config;
use tasklist::logging::{init_logging, LogTarget};
use tasklist::script::ScriptRunner;
use tasklist::ui::run_tui;
use tasklist::TaskListController;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(
        cli.filter.as_deref(),
        cli.log_level.as_deref(),
        cli.log_file.clone(),
    )?;

    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    let target = match (&config.log_file, is_tui) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Off,
        (None, false) => LogTarget::Stderr,
    };
    init_logging(&config.log_level, target)?;
    log::debug!("resolved config: {:?}", config);

    let controller = TaskListController::with_filter(config.initial_filter);

    match cli.command {
        Some(Commands::Run { file, keep_going }) => {
            let source = match file {
                Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read script {}", path.display()))?,
                _ => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read script from stdin")?;
                    buf
                }
            };

            let stdout = io::stdout();
            let mut runner = ScriptRunner::new(controller, stdout.lock()).keep_going(keep_going);
            let summary = runner.run(&source)?;
            for err in &summary.errors {
                eprintln!("{}", err);
            }
            log::info!(
                "script finished: {} commands, {} skipped",
                summary.executed,
                summary.errors.len()
            );
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tasklist", &mut io::stdout());
        }
        Some(Commands::Tui) | None => {
            run_tui(controller)?;
        }
    }

    Ok(())
}
