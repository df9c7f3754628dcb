//! Console input parsing
//!
//! Turns a line typed at the prompt into a [`Command`]. Plain lines are
//! chat text; lines starting with `/` are client commands.

use std::path::PathBuf;

/// Text sent by `/test`
pub const TEST_MESSAGE: &str = "Hello from the console!";

/// Parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a chat line
    Say(String),
    /// Send a file as an attachment
    Attach(PathBuf),
    /// Send the canned test message
    Test,
    /// Close the session and exit
    Quit,
    /// Unknown slash command
    Unknown(String),
}

/// Error parsing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    Empty,
    /// `/file` without a path
    MissingPath,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty input"),
            ParseError::MissingPath => write!(f, "usage: /file <path>"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one input line
///
/// # Supported commands
///
/// - `/file <path>` - send a file (the path may be quoted)
/// - `/test` - send a canned test message
/// - `/quit` - disconnect and exit
/// - `//text` - send `/text` literally
///
/// # Examples
///
/// ```
/// use natter_client::commands::{parse_command, Command};
///
/// assert_eq!(parse_command("hello").unwrap(), Command::Say("hello".into()));
/// assert_eq!(parse_command("/quit").unwrap(), Command::Quit);
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    if let Some(escaped) = trimmed.strip_prefix("//") {
        return Ok(Command::Say(format!("/{}", escaped)));
    }

    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(Command::Say(input.to_string()));
    };

    let (name, args) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    match name.to_lowercase().as_str() {
        "file" | "attach" => parse_path(args).map(Command::Attach),
        "test" => Ok(Command::Test),
        "quit" | "exit" => Ok(Command::Quit),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

fn parse_path(args: &str) -> Result<PathBuf, ParseError> {
    let args = args.trim();
    let unquoted = args
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(args);

    if unquoted.is_empty() {
        return Err(ParseError::MissingPath);
    }
    Ok(PathBuf::from(unquoted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_said_verbatim() {
        assert_eq!(
            parse_command("  hello there ").unwrap(),
            Command::Say("  hello there ".into())
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_command(""), Err(ParseError::Empty));
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_escaped_slash() {
        assert_eq!(
            parse_command("//shrug").unwrap(),
            Command::Say("/shrug".into())
        );
        assert_eq!(
            parse_command("  //shrug").unwrap(),
            Command::Say("/shrug".into())
        );
    }

    #[test]
    fn test_file_command() {
        assert_eq!(
            parse_command("/file a/b/c.png").unwrap(),
            Command::Attach(PathBuf::from("a/b/c.png"))
        );
        assert_eq!(
            parse_command("/attach /tmp/x.bin").unwrap(),
            Command::Attach(PathBuf::from("/tmp/x.bin"))
        );
    }

    #[test]
    fn test_file_command_quoted_path() {
        assert_eq!(
            parse_command("/file \"my photos/cat.jpg\"").unwrap(),
            Command::Attach(PathBuf::from("my photos/cat.jpg"))
        );
    }

    #[test]
    fn test_file_command_unquoted_spaces() {
        assert_eq!(
            parse_command("/file my photos/cat.jpg").unwrap(),
            Command::Attach(PathBuf::from("my photos/cat.jpg"))
        );
    }

    #[test]
    fn test_file_command_missing_path() {
        assert_eq!(parse_command("/file"), Err(ParseError::MissingPath));
        assert_eq!(parse_command("/file   "), Err(ParseError::MissingPath));
        assert_eq!(parse_command("/file \"\""), Err(ParseError::MissingPath));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("/test").unwrap(), Command::Test);
        assert_eq!(parse_command("/quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("/EXIT").unwrap(), Command::Quit);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("/dance now").unwrap(),
            Command::Unknown("dance".into())
        );
    }

    #[test]
    fn test_parse_error_display() {
        assert_eq!(ParseError::MissingPath.to_string(), "usage: /file <path>");
    }
}
