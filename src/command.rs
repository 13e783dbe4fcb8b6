use crate::env::Environment;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Object-safe trait for a command that runs inside the shell process.
///
/// Implemented by built-ins via a blanket impl in [`crate::builtin`].
/// External programs never go through this trait; they are spawned as
/// child processes by the executor instead.
pub trait ExecutableCommand {
    /// Executes the command against the shell environment.
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`; the
/// interpreter then falls through to the next factory and finally to the
/// external executor.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
