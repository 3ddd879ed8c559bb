//! Line-based prompts over any buffered reader and writer

use crate::error::{LeagueError, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Raised when the input stream ends while a prompt is waiting for an answer
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
pub struct InputClosed;

/// True if `error` means the user closed the input
pub fn is_input_closed(error: &anyhow::Error) -> bool {
    error.is::<InputClosed>()
}

/// Reads answers from `input` and writes questions and messages to `output`
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line of output
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Write a block of text as-is, followed by a blank line
    pub fn show(&mut self, block: &str) -> Result<()> {
        write!(self.output, "{}", block)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn read_answer(&mut self) -> Result<String> {
        self.output.flush()?;

        // Read raw bytes so a malformed line is consumed before it is rejected
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(InputClosed.into());
        }
        let line = String::from_utf8(raw)
            .map_err(|_| LeagueError::validation("Input is not valid UTF-8"))?;
        Ok(line.trim().to_string())
    }

    /// Ask a free-form question; an empty answer yields `default` when given
    pub fn ask(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(default) if !default.is_empty() => {
                write!(self.output, "{} ({}): ", label, default)?
            }
            _ => write!(self.output, "{}: ", label)?,
        }

        let answer = self.read_answer()?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    /// Ask until the answer matches one of `choices` (case-insensitively) and
    /// return the choice in its listed spelling
    pub fn ask_choice(
        &mut self,
        label: &str,
        choices: &[&str],
        default: Option<&str>,
    ) -> Result<String> {
        let label = format!("{} [{}]", label, choices.join("/"));
        loop {
            let answer = self.ask(&label, default)?;
            if let Some(choice) = choices
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(&answer))
            {
                return Ok(choice.to_string());
            }
            self.say("Please select one of the available options")?;
        }
    }

    /// Ask a yes/no question until answered
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            write!(self.output, "{} [y/n]: ", question)?;
            match self.read_answer()?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please enter Y or N")?,
            }
        }
    }
}
