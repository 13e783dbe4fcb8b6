use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};

/// Prompt written before every read attempt.
pub const PROMPT: &str = "$ ";

/// Abstraction over where command lines come from.
///
/// Implementors show the prompt themselves, because an interactive editor
/// owns the terminal while reading. The driver only sees the result.
pub trait LineSource {
    /// Prompt and read the next line.
    ///
    /// Returns `Ok(None)` at end of input and `Err` on a read failure,
    /// which the driver treats as fatal.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Terminal-backed source with line editing and history.
pub struct Interactive {
    editor: DefaultEditor,
}

impl Interactive {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for Interactive {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C discards the pending input; the session goes on.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Buffered source for a script file or non-terminal standard input.
///
/// Lines are yielded with their trailing newline intact; the parser strips
/// it. The prompt goes to standard output before each read so scripted and
/// interactive sessions produce the same transcript.
pub struct Reader<R> {
    input: R,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> LineSource for Reader<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(PROMPT.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}
