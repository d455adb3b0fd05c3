//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message. Prompts are written to stderr so that
//! stdout stays clean for piping.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Read one line from stdin, treating EOF as cancellation.
fn read_line() -> Result<String, PromptError> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(PromptError::Cancelled);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn show(message: &str) -> Result<(), PromptError> {
    let mut err = io::stderr();
    write!(err, "{}", message)?;
    err.flush()?;
    Ok(())
}

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// An empty answer takes `default`.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    show(&format!("{} {} ", message, hint))?;
    let answer = read_line()?;
    Ok(parse_confirm(&answer, default))
}

fn parse_confirm(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Prompt for text input.
///
/// An empty answer takes `default` when one is given.
pub fn input(
    message: &str,
    default: Option<&str>,
    interactive: bool,
) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    match default {
        Some(d) => show(&format!("{} [{}]: ", message, d))?,
        None => show(&format!("{}: ", message))?,
    }
    let answer = read_line()?;
    if answer.is_empty() {
        if let Some(d) = default {
            return Ok(d.to_string());
        }
    }
    Ok(answer)
}

/// Prompt to select from a list of options.
///
/// Options are numbered from 1. Returns the index of the selected option.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    if options.is_empty() {
        return Err(PromptError::Cancelled);
    }

    let mut err = io::stderr();
    writeln!(err, "{}", message)?;
    for (i, option) in options.iter().enumerate() {
        writeln!(err, "  {:>3}) {}", i + 1, option.as_ref())?;
    }

    loop {
        match default {
            Some(d) => show(&format!("Select [{}]: ", d + 1))?,
            None => show("Select: ")?,
        }
        let answer = read_line()?;
        match parse_selection(&answer, options, default) {
            Some(index) => return Ok(index),
            None => writeln!(err, "Enter a number between 1 and {}.", options.len())?,
        }
    }
}

/// Interpret a selection answer as a 1-based index or an exact option.
fn parse_selection<T: AsRef<str>>(
    answer: &str,
    options: &[T],
    default: Option<usize>,
) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return default.filter(|d| *d < options.len());
    }
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options.iter().position(|o| o.as_ref() == answer)
}

/// Prompt for masked input (e.g., passwords).
///
/// The input is not echoed to the terminal.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let value = rpassword::prompt_password(format!("{}: ", message))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_prompts_fail() {
        assert!(matches!(
            confirm("ok?", true, false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            input("name", None, false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            select("pick", &["a"], None, false),
            Err(PromptError::NotInteractive)
        ));
        assert!(matches!(
            password("pw", false),
            Err(PromptError::NotInteractive)
        ));
    }

    #[test]
    fn confirm_parsing() {
        assert!(parse_confirm("", true));
        assert!(!parse_confirm("", false));
        assert!(parse_confirm("Y", false));
        assert!(parse_confirm("yes", false));
        assert!(!parse_confirm("nope", true));
    }

    #[test]
    fn selection_parsing() {
        let options = ["proj:a", "proj:b", "top"];
        assert_eq!(parse_selection("1", &options, None), Some(0));
        assert_eq!(parse_selection(" 3 ", &options, None), Some(2));
        assert_eq!(parse_selection("4", &options, None), None);
        assert_eq!(parse_selection("0", &options, None), None);
        assert_eq!(parse_selection("proj:b", &options, None), Some(1));
        assert_eq!(parse_selection("", &options, Some(2)), Some(2));
        assert_eq!(parse_selection("", &options, None), None);
    }
}
