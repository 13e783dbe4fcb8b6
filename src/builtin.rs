use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process. They run
/// synchronously whatever the segment's terminator was; a trailing `&` has
/// no effect on them.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Executes the command against the shell environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero
    /// for error. An `Err` is rendered as a single diagnostic line on
    /// standard error by the driver; it never terminates the shell.
    fn execute(self, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, env: &mut Environment) -> Result<ExitCode> {
        T::execute(*self, env)
    }
}

/// Outcome of argh rejecting (or short-circuiting) a builtin's arguments,
/// e.g. `cd --help` or a stray flag.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, _env: &mut Environment) -> Result<ExitCode> {
        if self.is_error {
            Err(anyhow::anyhow!("{}", self.output.trim_end()))
        } else {
            // Help output requested with --help.
            print!("{}", self.output);
            Ok(0)
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Change the shell's working directory.
/// Without a target the command does nothing.
pub(crate) struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        let Some(target) = self.target.filter(|t| !t.is_empty()) else {
            return Ok(0);
        };

        let target = PathBuf::from(target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: can't resolve {}", new_dir.display()))?;
        if !canonical.is_dir() {
            return Err(anyhow::anyhow!(
                "cd: not a directory: {}",
                canonical.display()
            ));
        }

        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the shell immediately.
pub(crate) struct Exit {
    #[argh(positional, greedy)]
    /// any arguments are accepted and ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_builtin<T: BuiltinCommand + 'static>(args: &[&str], env: &mut Environment) -> Result<ExitCode> {
        let factory = Factory::<T>::default();
        let cmd = factory
            .try_create(T::name(), args)
            .expect("factory should accept its own name");
        cmd.execute(env)
    }

    #[test]
    fn factory_rejects_other_names() {
        let factory = Factory::<Cd>::default();
        assert!(factory.try_create("exit", &[]).is_none());
        assert!(factory.try_create("Cd", &["/"]).is_none());
    }

    #[test]
    fn cd_without_target_is_a_no_op() {
        let mut env = Environment::new();
        let before = env.current_dir.clone();
        assert_eq!(run_builtin::<Cd>(&[], &mut env).unwrap(), 0);
        assert_eq!(env.current_dir, before);
    }

    #[test]
    #[cfg(unix)]
    fn cd_changes_tracked_directory() {
        let mut env = Environment::new();
        assert_eq!(run_builtin::<Cd>(&["/"], &mut env).unwrap(), 0);
        assert_eq!(env.current_dir, PathBuf::from("/"));
    }

    #[test]
    #[cfg(unix)]
    fn cd_resolves_relative_targets() {
        let tmp = std::env::temp_dir();
        let mut env = Environment::new();
        env.current_dir = PathBuf::from("/");
        let relative = tmp
            .strip_prefix("/")
            .expect("temp dir should be absolute")
            .to_string_lossy()
            .into_owned();
        assert_eq!(run_builtin::<Cd>(&[&relative], &mut env).unwrap(), 0);
        assert_eq!(env.current_dir, fs::canonicalize(&tmp).unwrap());
    }

    #[test]
    fn cd_to_missing_directory_fails_without_moving() {
        let mut env = Environment::new();
        let before = env.current_dir.clone();
        let err = run_builtin::<Cd>(&["/definitely/not/a/dir"], &mut env);
        assert!(err.is_err());
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn exit_sets_the_flag_and_ignores_arguments() {
        let mut env = Environment::new();
        assert_eq!(run_builtin::<Exit>(&["7", "extra"], &mut env).unwrap(), 0);
        assert!(env.should_exit);
    }
}
