//! Interactive plugin selection on the terminal.
//!
//! Sources and automations are listed 1-based in registration order. A
//! source must be picked; the automation prompt accepts `0` or an empty
//! line to run without one.

use std::io::{BufRead, Write};

/// The plugins picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub source: &'static str,
    pub automation: Option<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("no source plugin is registered")]
    NoSources,

    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("choice {choice} is out of range 1..={max}")]
    OutOfRange { choice: usize, max: usize },

    /// Input closed before a source was chosen.
    #[error("no selection made")]
    Closed,

    #[error("failed to read selection")]
    Io(#[from] std::io::Error),
}

/// Parse one answer to a numbered menu of `count` entries.
///
/// Returns the 0-based index, or `None` when `optional` and the answer is
/// `0` or empty.
///
/// # Errors
///
/// [`SelectionError::NotANumber`] or [`SelectionError::OutOfRange`].
pub fn parse_choice(
    answer: &str,
    count: usize,
    optional: bool,
) -> Result<Option<usize>, SelectionError> {
    let answer = answer.trim();
    if optional && answer.is_empty() {
        return Ok(None);
    }
    let choice: usize = answer
        .parse()
        .map_err(|_| SelectionError::NotANumber(answer.to_string()))?;
    match choice {
        0 if optional => Ok(None),
        1.. if choice <= count => Ok(Some(choice - 1)),
        _ => Err(SelectionError::OutOfRange { choice, max: count }),
    }
}

/// List the plugins on `output` and read the user's picks from `input`.
///
/// # Errors
///
/// [`SelectionError`] on unreadable or invalid answers; nothing is started
/// in that case.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    sources: &[&'static str],
    automations: &[&'static str],
) -> Result<Selection, SelectionError> {
    if sources.is_empty() {
        return Err(SelectionError::NoSources);
    }

    writeln!(output, "Available sources:")?;
    list(output, sources)?;
    write!(output, "Select the source to run: ")?;
    output.flush()?;
    let answer = read_answer(input)?.ok_or(SelectionError::Closed)?;
    let source = parse_choice(&answer, sources.len(), false)?
        .map(|index| sources[index])
        .ok_or(SelectionError::Closed)?;

    if automations.is_empty() {
        return Ok(Selection {
            source,
            automation: None,
        });
    }

    writeln!(output, "Available automations:")?;
    list(output, automations)?;
    write!(output, "Select the automation to run (0 to disable): ")?;
    output.flush()?;
    let automation = match read_answer(input)? {
        Some(answer) => {
            parse_choice(&answer, automations.len(), true)?.map(|index| automations[index])
        }
        None => None,
    };

    Ok(Selection { source, automation })
}

fn list<W: Write>(output: &mut W, names: &[&str]) -> std::io::Result<()> {
    for (index, name) in names.iter().enumerate() {
        writeln!(output, "{}. {name}", index + 1)?;
    }
    Ok(())
}

fn read_answer<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}
