use anyhow::Result;
use console::Term;
use dialoguer::Confirm;
use std::io::{BufRead, IsTerminal, Write};

/// Asks the operator a yes/no question.
pub trait Confirmation {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Confirmation on the process terminal.
///
/// Uses an interactive dialoguer prompt when stdin is a terminal, drawn on
/// stdout or, when stdout is redirected, on stderr. Otherwise the question is
/// printed to stdout and a single answer line is read from stdin.
pub struct TerminalConfirmation;

/// Where the confirmation question is asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSurface {
    Stdout,
    Stderr,
    /// Print the question and read one line from stdin
    LineInput,
}

/// The dialoguer prompt reads keys from stdin and must draw on a terminal.
pub fn prompt_surface(
    stdin_is_terminal: bool,
    stdout_is_terminal: bool,
    stderr_is_terminal: bool,
) -> PromptSurface {
    match (stdin_is_terminal, stdout_is_terminal, stderr_is_terminal) {
        (true, true, _) => PromptSurface::Stdout,
        (true, false, true) => PromptSurface::Stderr,
        _ => PromptSurface::LineInput,
    }
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, question: &str) -> Result<bool> {
        let (stdout_term, stderr_term) = (Term::stdout(), Term::stderr());
        let term = match prompt_surface(
            std::io::stdin().is_terminal(),
            stdout_term.is_term(),
            stderr_term.is_term(),
        ) {
            PromptSurface::Stdout => Some(stdout_term),
            PromptSurface::Stderr => Some(stderr_term),
            PromptSurface::LineInput => None,
        };

        if let Some(term) = term {
            let answer = Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact_on(&term)?;
            return Ok(answer);
        }

        let mut stdout = std::io::stdout();
        write!(stdout, "{} [y/N] ", question)?;
        stdout.flush()?;

        let answer = read_answer(std::io::stdin().lock())?;
        writeln!(stdout)?;

        Ok(answer.as_deref().is_some_and(is_affirmative))
    }
}

/// Read one answer line; `None` at end of input
pub fn read_answer(mut input: impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// `y` or `yes`, ignoring case and surrounding whitespace
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
