//! Interactive and scripted command sessions
//!
//! A session reads command lines, runs them against the container's tree and
//! reports results. Tree and parse errors are printed and the session goes on;
//! only I/O failures end it.

use std::io::{BufRead, Write};

use tracing::{debug, info, instrument};

use crate::cli::command::{Command, CommandError, CommandKind};
use crate::cli::output;
use crate::domain::Placement;
use crate::infrastructure::{InfraError, InfraResult, ServiceContainer};

pub const WELCOME: &str = "Welcome to the Directory Tree!";
pub const GOODBYE: &str = "Goodbye!";

/// Whether the session keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A command session writing to `out`.
pub struct Session<'a, W: Write> {
    container: &'a mut ServiceContainer,
    out: W,
}

fn write_err(err: std::io::Error) -> InfraError {
    InfraError::io("write session output", err)
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(container: &'a mut ServiceContainer, out: W) -> Self {
        Self { container, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Read commands until the quit token or end of input.
    pub fn interact<R: BufRead>(&mut self, mut input: R) -> InfraResult<()> {
        let quit_token = self.container.settings.quit_token.clone();
        let prompt = self.container.settings.prompt.clone();

        output::info(&mut self.out, WELCOME).map_err(write_err)?;
        output::info(&mut self.out, &format!("Enter '{quit_token}' to quit")).map_err(write_err)?;

        let mut line = String::new();
        loop {
            if !prompt.is_empty() {
                output::prompt(&mut self.out, &prompt).map_err(write_err)?;
            }
            line.clear();
            let read = input
                .read_line(&mut line)
                .map_err(|e| InfraError::io("read command", e))?;
            if read == 0 {
                debug!("end of input");
                break;
            }
            if self.execute_line(&line)? == Flow::Quit {
                break;
            }
        }

        output::info(&mut self.out, GOODBYE).map_err(write_err)?;
        Ok(())
    }

    /// Run every command of a script, echoing each one first.
    ///
    /// Blank lines and `#` comments are skipped; the quit token stops the script.
    pub fn replay<R: BufRead>(&mut self, input: R) -> InfraResult<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line.map_err(|e| InfraError::io(format!("read script line {}", number + 1), e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed != self.container.settings.quit_token {
                output::header(&mut self.out, &format!("> {trimmed}")).map_err(write_err)?;
            }
            if self.execute_line(trimmed)? == Flow::Quit {
                info!(line = number + 1, "script stopped at quit token");
                break;
            }
        }
        Ok(())
    }

    /// Parse and run one line.
    pub fn execute_line(&mut self, line: &str) -> InfraResult<Flow> {
        let line = line.trim();
        if line == self.container.settings.quit_token {
            return Ok(Flow::Quit);
        }
        match Command::parse(line) {
            Ok(command) => self.execute(&command)?,
            Err(err) => self.report_command_error(&err)?,
        }
        Ok(Flow::Continue)
    }

    /// Run a parsed command against the tree.
    #[instrument(level = "debug", skip(self, command), fields(command = %command))]
    pub fn execute(&mut self, command: &Command) -> InfraResult<()> {
        let verbose = self.container.settings.verbose;
        let tree = &mut self.container.tree;
        let out = &mut self.out;

        let written = match command {
            Command::Create { path } => match tree.create(path) {
                Ok(_) if verbose => output::success(out, &format!("created {path}")),
                Ok(_) => Ok(()),
                Err(err) => output::error(out, &err),
            },
            Command::Delete { path } => match tree.delete(path) {
                Ok(()) if verbose => output::success(out, &format!("deleted {path}")),
                Ok(()) => Ok(()),
                Err(err) => output::error(out, &err),
            },
            Command::Move { source, target } => match tree.relocate(source, target) {
                Ok(relocation) => match relocation.placement {
                    Placement::Inserted if verbose => {
                        output::success(out, &format!("moved {source} to {target}"))
                    }
                    Placement::Inserted => Ok(()),
                    Placement::KeptExisting => output::warning(
                        out,
                        &format!(
                            "{target} already contains {}, kept it and discarded {source}",
                            relocation.node
                        ),
                    ),
                    Placement::Replaced => output::warning(
                        out,
                        &format!("{target} already contained {}, replaced it", relocation.node),
                    ),
                    Placement::Rejected => output::warning(
                        out,
                        &format!(
                            "{target} already contains {}, {source} left in place",
                            relocation.node
                        ),
                    ),
                },
                Err(err) => output::error(out, &err),
            },
            Command::List => tree.write_listing(out),
        };
        written.map_err(write_err)
    }

    fn report_command_error(&mut self, err: &CommandError) -> InfraResult<()> {
        debug!(%err, "rejected command line");
        let out = &mut self.out;
        output::error(out, err).map_err(write_err)?;
        match err {
            CommandError::Empty => {}
            CommandError::Arity { kind, .. } => {
                output::detail(out, &format!("Syntax: {}", kind.syntax())).map_err(write_err)?;
            }
            CommandError::Unknown(_) => {
                output::info(out, "Valid Commands are:").map_err(write_err)?;
                for kind in CommandKind::ALL {
                    output::detail(
                        out,
                        &format!("{} - {} - {}", kind, kind.description(), kind.syntax()),
                    )
                    .map_err(write_err)?;
                }
                output::detail(
                    out,
                    &format!("'{}' + <enter> to quit", self.container.settings.quit_token),
                )
                .map_err(write_err)?;
            }
        }
        Ok(())
    }
}
