//! Parsing of the interactive command line.

use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a todo with this text. Empty text is passed through; the app
    /// ignores it.
    Add(String),
    /// Toggle the todo at this 1-based position in the rendered list.
    Toggle(usize),
    /// Delete the todo at this 1-based position in the rendered list.
    Delete(usize),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs a list position")]
    MissingPosition(&'static str),
    #[error("`{0}` is not a list position")]
    BadPosition(String),
}

pub const HELP: &str = "\
commands:
  add <text>    add a todo
  toggle <n>    flip completion of item n
  delete <n>    delete item n
  refresh       re-fetch the list
  help          show this message
  quit          exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let command = match verb {
        "add" | "a" => Command::Add(rest.to_owned()),
        "toggle" | "t" => Command::Toggle(position("toggle", rest)?),
        "delete" | "d" | "rm" => Command::Delete(position("delete", rest)?),
        "refresh" | "r" | "ls" => Command::Refresh,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn position(verb: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingPosition(verb));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadPosition(arg.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_inner_spacing() {
        assert_eq!(
            parse("add  buy   milk ").unwrap(),
            Some(Command::Add("buy   milk".to_string()))
        );
    }

    #[test]
    fn bare_add_is_empty_text() {
        assert_eq!(parse("add").unwrap(), Some(Command::Add(String::new())));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse("toggle 2").unwrap(), Some(Command::Toggle(2)));
        assert_eq!(parse("d 1").unwrap(), Some(Command::Delete(1)));
        assert_eq!(
            parse("toggle 0").unwrap_err(),
            CommandError::BadPosition("0".to_string())
        );
    }

    #[test]
    fn missing_or_bad_position() {
        assert_eq!(
            parse("delete").unwrap_err(),
            CommandError::MissingPosition("delete")
        );
        assert_eq!(
            parse("toggle first").unwrap_err(),
            CommandError::BadPosition("first".to_string())
        );
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn unknown_verb() {
        assert_eq!(
            parse("frobnicate 3").unwrap_err(),
            CommandError::Unknown("frobnicate".to_string())
        );
    }
}
