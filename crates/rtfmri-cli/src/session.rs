//! Line-oriented cross-filter session used by `rtfmri explore`.
//!
//! ```text
//! primary software      # PrimaryChanged
//! secondary magnet      # SecondaryChanged
//! hover TBV             # PrimaryHovered(Some)
//! hover                 # PrimaryHovered(None)
//! click AFNI            # PrimaryClicked(Some)
//! show
//! quit
//! ```

use thiserror::Error;

use rtfmri_core::{CrossFilterView, ViewEvent};
use rtfmri_model::ViewError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command '{command}' (try 'help')")]
    UnknownCommand { command: String },

    #[error("'{command}' needs a field name")]
    MissingField { command: String },

    #[error(transparent)]
    View(#[from] ViewError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Event(ViewEvent),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  primary <field>    pick the primary field
  secondary <field>  pick the secondary field
  hover [value]      hover a primary value (no value clears)
  click [value]      click a primary value (no value clears)
  show               print the current view
  help               print this message
  quit               end the session";

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, SessionError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let argument = (!rest.is_empty()).then(|| rest.to_string());
    let field = |argument: Option<String>| {
        argument.ok_or_else(|| SessionError::MissingField {
            command: command.to_string(),
        })
    };
    let parsed = match command.to_ascii_lowercase().as_str() {
        "primary" => SessionCommand::Event(ViewEvent::PrimaryChanged(field(argument)?)),
        "secondary" => SessionCommand::Event(ViewEvent::SecondaryChanged(field(argument)?)),
        "hover" => SessionCommand::Event(ViewEvent::PrimaryHovered(argument)),
        "click" => SessionCommand::Event(ViewEvent::PrimaryClicked(argument)),
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        _ => {
            return Err(SessionError::UnknownCommand {
                command: command.to_string(),
            });
        }
    };
    Ok(Some(parsed))
}

/// What the caller should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do (blank line or comment).
    Skip,
    /// An event was applied.
    Applied,
    Show,
    Help,
    Quit,
}

/// A view plus the commands applied to it so far.
#[derive(Debug)]
pub struct Session {
    view: CrossFilterView,
    applied: usize,
}

impl Session {
    pub fn new(view: CrossFilterView) -> Self {
        Self { view, applied: 0 }
    }

    pub fn view(&self) -> &CrossFilterView {
        &self.view
    }

    /// Number of events applied successfully.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Handles one input line. A failed event leaves the view unchanged.
    pub fn handle_line(&mut self, line: &str) -> Result<Step, SessionError> {
        let Some(command) = parse_command(line)? else {
            return Ok(Step::Skip);
        };
        Ok(match command {
            SessionCommand::Event(event) => {
                self.view.apply(&event)?;
                self.applied += 1;
                Step::Applied
            }
            SessionCommand::Show => Step::Show,
            SessionCommand::Help => Step::Help,
            SessionCommand::Quit => Step::Quit,
        })
    }
}
