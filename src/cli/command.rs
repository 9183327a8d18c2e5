//! Shell command parsing
//!
//! A line is resolved once into a typed [`Command`]; nothing downstream
//! matches on strings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The fixed set of shell commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Create,
    Delete,
    Move,
    List,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Create,
        CommandKind::Delete,
        CommandKind::Move,
        CommandKind::List,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Create => "CREATE",
            CommandKind::Delete => "DELETE",
            CommandKind::Move => "MOVE",
            CommandKind::List => "LIST",
        }
    }

    /// Number of path arguments.
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::Create | CommandKind::Delete => 1,
            CommandKind::Move => 2,
            CommandKind::List => 0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Create => "Create a new folder",
            CommandKind::Delete => "Remove a folder",
            CommandKind::Move => "Move a folder into another folder",
            CommandKind::List => "List all folders",
        }
    }

    pub fn syntax(&self) -> &'static str {
        match self {
            CommandKind::Create => "CREATE <new-folder>",
            CommandKind::Delete => "DELETE <existing-folder>",
            CommandKind::Move => "MOVE <existing-sourcefolder> <existing-targetfolder>",
            CommandKind::List => "LIST",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed shell command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { path: String },
    Delete { path: String },
    Move { source: String, target: String },
    List,
}

/// Why a line is not a valid command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command cannot be empty")]
    Empty,

    #[error("Invalid Command: {0}")]
    Unknown(String),

    #[error("Invalid number of parameters for {kind}")]
    Arity { kind: CommandKind, given: usize },
}

impl Command {
    /// Parse `KEYWORD arg...`, splitting on whitespace.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?;
        let kind = CommandKind::from_keyword(keyword)
            .ok_or_else(|| CommandError::Unknown(keyword.to_uppercase()))?;

        let args: Vec<&str> = words.collect();
        if args.len() != kind.arity() {
            return Err(CommandError::Arity {
                kind,
                given: args.len(),
            });
        }

        Ok(match (kind, args.as_slice()) {
            (CommandKind::Create, [path]) => Command::Create {
                path: path.to_string(),
            },
            (CommandKind::Delete, [path]) => Command::Delete {
                path: path.to_string(),
            },
            (CommandKind::Move, [source, target]) => Command::Move {
                source: source.to_string(),
                target: target.to_string(),
            },
            (CommandKind::List, []) => Command::List,
            _ => unreachable!("arity checked above"),
        })
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Create { .. } => CommandKind::Create,
            Command::Delete { .. } => CommandKind::Delete,
            Command::Move { .. } => CommandKind::Move,
            Command::List => CommandKind::List,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Create { path } | Command::Delete { path } => {
                write!(f, "{} {}", self.kind(), path)
            }
            Command::Move { source, target } => write!(f, "{} {} {}", self.kind(), source, target),
            Command::List => write!(f, "{}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_each_kind_when_looking_up_keyword_then_round_trips() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_keyword(kind.keyword()), Some(kind));
            assert!(kind.syntax().starts_with(kind.keyword()));
        }
    }

    #[test]
    fn given_parsed_command_when_displaying_then_matches_canonical_form() {
        let command = Command::parse("move a/b  x").unwrap();
        assert_eq!(command.to_string(), "MOVE a/b x");
    }
}
