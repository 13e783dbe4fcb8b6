use crate::builtin::{Cd, Exit};
use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use crate::external::{self, ExternalCommand};
use crate::input::LineSource;
use crate::jobs::JobTable;
use crate::parser::{self, Terminator};
use anyhow::Result;
use std::io::{self, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports builtin command types defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Whether the session goes on after a line has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// An `exit` builtin ran; remaining segments of the line were abandoned.
    Exit,
}

/// The shell driver: reads lines, dispatches their segments and reaps
/// background children.
///
/// The interpreter maintains an [`Environment`], a chain of builtin
/// [`CommandFactory`] objects queried by name, and a [`JobTable`] of
/// background children. Anything no factory recognizes is handed to the
/// external executor.
///
/// Example
/// ```
/// use seqsh::{Interpreter, LineOutcome};
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let outcome = sh.run_line("true\n", &mut out).unwrap();
/// assert_eq!(outcome, LineOutcome::Continue);
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: Vec<Box<dyn CommandFactory>>,
    jobs: JobTable,
}

impl Interpreter {
    /// Create a new interpreter with a custom chain of builtin factories.
    pub fn new(builtins: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            builtins,
            jobs: JobTable::new(),
        }
    }

    /// The shell state as seen by commands.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Process one input line: split it into segments, dispatch each in
    /// source order, then sweep the job table once.
    ///
    /// Completion lines for foreground and background children go to `out`.
    /// Failures confined to a single segment (builtin errors, spawn and wait
    /// failures) are reported on standard error and do not stop the line.
    pub fn run_line(&mut self, line: &str, out: &mut dyn Write) -> Result<LineOutcome> {
        for segment in parser::split_segments(line) {
            let argv = parser::split_words(segment.text);
            if argv.is_empty() {
                continue;
            }
            match self.run_builtin(&argv) {
                Some(Err(e)) => eprintln!("{e:#}"),
                Some(Ok(_)) => {
                    if self.env.should_exit {
                        return Ok(LineOutcome::Exit);
                    }
                }
                None => self.run_external(&argv, segment.terminator, out)?,
            }
        }
        self.jobs.reap(out)?;
        Ok(LineOutcome::Continue)
    }

    /// Try the builtin chain. `None` means no factory recognized the name.
    fn run_builtin(&mut self, argv: &[&str]) -> Option<Result<ExitCode>> {
        let (name, args) = argv.split_first()?;
        for factory in &self.builtins {
            if let Some(cmd) = factory.try_create(name, args) {
                return Some(cmd.execute(&mut self.env));
            }
        }
        None
    }

    fn run_external(
        &mut self,
        argv: &[&str],
        terminator: Terminator,
        out: &mut dyn Write,
    ) -> Result<()> {
        let cmd = ExternalCommand::new(argv);
        match cmd.spawn(&self.env) {
            Ok(child) if terminator.is_background() => self.jobs.adopt(cmd.program(), child),
            Ok(child) => external::wait_and_report(cmd.program(), child, out)?,
            Err(e) => {
                eprintln!("{}: {}", cmd.program(), e);
                // The child would have exited with the OS error number had
                // the image replacement failed after a successful fork.
                if !terminator.is_background() {
                    writeln!(
                        out,
                        "[{} exited with status {}]",
                        cmd.program(),
                        e.raw_os_error().unwrap_or(1)
                    )?;
                }
            }
        }
        Ok(())
    }

    /// The read-dispatch-reap loop.
    ///
    /// Returns the shell's own exit status: 0 on clean end-of-input (after
    /// the shutdown banner) and 0 on `exit` (no banner). Read failures
    /// propagate to the caller.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<ExitCode> {
        loop {
            let Some(line) = source.next_line()? else {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "\nShutting down...")?;
                return Ok(0);
            };
            if self.run_line(&line, &mut io::stdout().lock())? == LineOutcome::Exit {
                return Ok(0);
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the builtin chain `cd`, `exit`; every
    /// other command is dispatched to the external executor.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Exit>::default()),
        ])
    }
}
