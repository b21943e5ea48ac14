// Menu session loop over arbitrary input and output

use crate::command::invoker::{Invoker, Outcome};
use crate::config::MenuConfig;
use crate::menu::choice::{MenuChoice, render_menu};
use std::io::{BufRead, Write};

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Counters describing a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Numeric selections handled, excluding the exit sentinel
    pub selections: usize,
    /// Lines that were not a number
    pub rejected_lines: usize,
    /// True if the session ended through the exit sentinel rather than end of input
    pub exited: bool,
}

/// Run the menu until the exit sentinel or end of input
///
/// The menu is printed before every read. Each line must hold one integer;
/// anything else is reported and the menu is shown again. Invoker outcomes
/// are never errors, so only I/O on `input`/`output` can fail.
pub fn run_session<R, I, O>(
    mut input: I,
    output: &mut O,
    invoker: &mut Invoker<R>,
    receiver: &mut R,
    config: &MenuConfig,
) -> SessionResult<SessionSummary>
where
    I: BufRead,
    O: Write,
{
    let mut summary = SessionSummary::default();
    let mut line = String::new();

    if invoker.registry().is_empty() {
        tracing::warn!("menu has no action slots, only undo and redo are offered");
    }

    loop {
        write!(output, "{}", render_menu(invoker.registry(), config.exit_sentinel))?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("end of input");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Ok(selection) = trimmed.parse::<i64>() else {
            summary.rejected_lines += 1;
            writeln!(output, "Invalid selection: '{}'", trimmed)?;
            continue;
        };

        let choice =
            MenuChoice::from_selection(selection, invoker.registry().len(), config.exit_sentinel);
        let outcome = match choice {
            MenuChoice::Exit => {
                summary.exited = true;
                break;
            }
            MenuChoice::Action(selection) => invoker.perform_action(selection, receiver),
            MenuChoice::Undo => invoker.undo(receiver),
            MenuChoice::Redo => invoker.redo(receiver),
        };
        summary.selections += 1;

        if let Outcome::Ignored(reason) = &outcome {
            tracing::debug!(?reason, selection, "selection had no effect");
        }

        if config.show_status {
            writeln!(
                output,
                "[{}] undo: {}, redo: {}",
                outcome,
                invoker.undo_count(),
                invoker.redo_count()
            )?;
        }
    }

    tracing::info!(
        selections = summary.selections,
        rejected = summary.rejected_lines,
        "session finished"
    );
    Ok(summary)
}
