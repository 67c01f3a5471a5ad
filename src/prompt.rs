//! Line-oriented console prompting with retry-until-valid semantics.

use std::fmt::Display;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{SketchError, SketchResult};

/// What to ask and how to treat an empty answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptRequest<'a> {
    pub message: &'a str,
    /// Returned when the user enters nothing.
    pub default: Option<&'a str>,
    /// Whether an empty answer without a default is accepted.
    pub allow_empty: bool,
}

impl<'a> PromptRequest<'a> {
    #[must_use]
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            default: None,
            allow_empty: true,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.allow_empty = false;
        self
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: Option<usize>,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            max_attempts: None,
        }
    }

    /// Caps how many answers a single prompt may reject before failing.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn say(&mut self, message: impl Display) -> SketchResult<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    pub fn response(&mut self, request: PromptRequest<'_>) -> SketchResult<String> {
        self.response_where(request, |_| true)
    }

    /// Asks until `condition` accepts the answer or the attempt cap is hit.
    pub fn response_where(
        &mut self,
        request: PromptRequest<'_>,
        mut condition: impl FnMut(&str) -> bool,
    ) -> SketchResult<String> {
        let mut attempts = 0usize;
        loop {
            attempts += 1;
            let raw = self.read_line(request.message)?;
            let answer = if !raw.is_empty() {
                Some(raw)
            } else if let Some(default) = request.default {
                Some(default.to_owned())
            } else if request.allow_empty {
                Some(String::new())
            } else {
                self.say("You must provide a response to this prompt!")?;
                None
            };

            if let Some(answer) = answer {
                if condition(&answer) {
                    return Ok(answer);
                }
                self.say("Response did not meet conditions. Please try again...")?;
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                debug!(attempts, prompt = request.message, "giving up on prompt");
                return Err(SketchError::InvalidData(format!(
                    "no valid response after {attempts} attempts"
                )));
            }
        }
    }

    /// Yes/no question; only `y` (any case) counts as yes.
    pub fn ask_yes_no(&mut self, message: &str) -> SketchResult<bool> {
        Ok(self.read_line(message)?.eq_ignore_ascii_case("y"))
    }

    fn read_line(&mut self, message: &str) -> SketchResult<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SketchError::InputClosed);
        }
        Ok(line.trim().to_owned())
    }
}
