// Command-line front end: flags, config merge and the session run

use crate::command::commands::setup_menu;
use crate::command::invoker::Invoker;
use crate::config::{ConfigError, MenuConfig};
use crate::instance::InstanceManager;
use crate::menu::session::{SessionError, SessionSummary, run_session};
use clap::{ArgAction, Parser};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Process exit status for a startup or session failure
pub const EXIT_FAILURE: u8 = 1;

/// Numbered instance menu with undo and redo
#[derive(Debug, Parser)]
#[command(name = "instance_menu", version)]
pub struct Cli {
    /// Config file (.ron or .json); defaults to the user config dir
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of actions that can be undone
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Print undo/redo counts after every selection
    #[arg(long)]
    pub status: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load the config file and apply the flags on top of it
    pub fn load_config(&self) -> Result<MenuConfig, ConfigError> {
        MenuConfig::discover(self.config.as_deref())?.with_overrides(self.history_limit, self.status)
    }

    /// Default log level for the verbosity flag
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Errors that end the program with a failure status
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Session(#[from] SessionError),
}

impl CliError {
    /// Exit status to report for this error
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

/// Load the config, build the instance menu and run it to completion
///
/// Returns the session summary when the session ends through the exit
/// sentinel or end of input; the caller exits with status 0 then.
pub fn run<I, O, W>(
    cli: &Cli,
    input: I,
    output: &mut O,
    receiver_output: W,
) -> Result<SessionSummary, CliError>
where
    I: BufRead,
    O: Write,
    W: Write + 'static,
{
    let config = cli.load_config()?;

    let mut invoker = Invoker::new();
    setup_menu(&mut invoker);
    invoker.set_history_limit(config.history_limit());

    let mut instance_manager = InstanceManager::new(receiver_output);
    let summary = run_session(input, output, &mut invoker, &mut instance_manager, &config)?;

    tracing::info!(state = ?instance_manager.state(), "final instance state");
    Ok(summary)
}
