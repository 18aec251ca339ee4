//! Line-oriented prompting over any line source and writer.
//!
//! The binary reads through `rustyline` when the `readline` feature is on
//! (the default) and through locked stdin otherwise; tests drive it with a
//! `Cursor` and a `Vec<u8>`.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::error::{CliError, Result};

/// Where answers come from.
pub trait LineSource {
    /// Show `prompt` and read one line without its terminator. `None` at end
    /// of input.
    fn next_line(&mut self, prompt: &str, output: &mut dyn Write) -> io::Result<Option<String>>;

    /// Like [`next_line`](Self::next_line), but the answer must not be kept
    /// anywhere, e.g. in an editor history.
    fn next_secret_line(&mut self, prompt: &str, output: &mut dyn Write) -> io::Result<Option<String>> {
        self.next_line(prompt, output)
    }
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self, prompt: &str, output: &mut dyn Write) -> io::Result<Option<String>> {
        write!(output, "{prompt}: ")?;
        output.flush()?;

        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Terminal input with line editing and per-session history.
#[cfg(feature = "readline")]
pub struct Readline {
    editor: rustyline::DefaultEditor,
}

#[cfg(feature = "readline")]
impl Readline {
    pub fn new() -> Result<Self> {
        let editor = rustyline::DefaultEditor::new()
            .map_err(|e| CliError::Io(io::Error::other(format!("failed to init rustyline: {e}"))))?;
        Ok(Self { editor })
    }

    fn read(&mut self, prompt: &str, remember: bool) -> io::Result<Option<String>> {
        let line = readline_outcome(self.editor.readline(&format!("{prompt}: ")))?;
        if remember {
            if let Some(line) = line.as_deref().filter(|l| !l.trim().is_empty()) {
                // History is a convenience; a full buffer is not an input error.
                let _ = self.editor.add_history_entry(line);
            }
        }
        Ok(line)
    }
}

#[cfg(feature = "readline")]
impl LineSource for Readline {
    fn next_line(&mut self, prompt: &str, _output: &mut dyn Write) -> io::Result<Option<String>> {
        self.read(prompt, true)
    }

    fn next_secret_line(&mut self, prompt: &str, _output: &mut dyn Write) -> io::Result<Option<String>> {
        self.read(prompt, false)
    }
}

/// Ctrl-D and Ctrl-C both end input.
#[cfg(feature = "readline")]
fn readline_outcome(
    result: std::result::Result<String, rustyline::error::ReadlineError>,
) -> io::Result<Option<String>> {
    use rustyline::error::ReadlineError;

    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
        Err(ReadlineError::Io(e)) => Err(e),
        Err(e) => Err(io::Error::other(format!("readline error: {e}"))),
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Print a block of pre-rendered text as is.
    pub fn show(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.input.next_line(prompt, &mut self.output)? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(CliError::InputClosed),
        }
    }

    /// Ask for a value kept out of any input history. The answer is still
    /// echoed, so callers say so in the prompt.
    pub fn ask_secret(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = match self.input.next_secret_line(prompt, &mut self.output)? {
                Some(line) => line.trim().to_string(),
                None => return Err(CliError::InputClosed),
            };
            if !value.is_empty() {
                return Ok(value);
            }
            self.say("This field is required. Please enter a value.")?;
        }
    }

    /// Ask for a value. Required prompts repeat until the answer is non-blank.
    pub fn ask(&mut self, prompt: &str, required: bool) -> Result<String> {
        loop {
            let value = self.read_line(prompt)?;
            if !value.is_empty() || !required {
                return Ok(value);
            }
            self.say("This field is required. Please enter a value.")?;
        }
    }

    /// `true` only for an explicit `yes` (any case).
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{prompt} (yes/no)"), true)?;
        Ok(answer.eq_ignore_ascii_case("yes"))
    }

    /// Pick one of `count` numbered entries; returns a zero-based index.
    pub fn choose(&mut self, prompt: &str, count: usize) -> Result<usize> {
        loop {
            let answer = self.ask(prompt, true)?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
                Ok(_) => self.say("Invalid number. Please try again.")?,
                Err(_) => self.say("Please enter a number.")?,
            }
        }
    }
}
