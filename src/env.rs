use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the shell state shared between commands.
///
/// The environment contains:
/// - `current_dir`: the working directory external commands are spawned in,
///   mutated by the `cd` builtin.
/// - `should_exit`: a flag the driver loop checks to know when to terminate.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// `current_dir` is initialized from `std::env::current_dir()`; the
    /// `should_exit` flag starts out `false`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            should_exit: false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
