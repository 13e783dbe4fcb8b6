use crate::env::Environment;
use std::io::{self, Write};
use std::process::{Child, Command, ExitStatus};

/// Command that is not a builtin.
///
/// Owns its argv so the borrowed line buffer can be dropped while a
/// background child is still running. Element zero is the program name as
/// typed; lookup of a bare name follows the host's PATH, the same rules
/// `execvp` applies.
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Build from a non-empty argument vector.
    pub fn new(argv: &[&str]) -> Self {
        Self {
            program: argv[0].to_string(),
            args: argv[1..].iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The program name as typed, used in completion lines.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn the child in the shell's tracked working directory with
    /// inherited stdio and environment.
    pub fn spawn(&self, env: &Environment) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .current_dir(&env.current_dir)
            .spawn()
    }
}

/// Wait for a foreground child and write its completion line.
///
/// On success the line has the form `[<program> exited with status <n>]`.
/// A failed wait is reported on standard error and swallowed so the rest of
/// the input line still runs.
pub fn wait_and_report(program: &str, mut child: Child, out: &mut dyn Write) -> io::Result<()> {
    match child.wait() {
        Ok(status) => writeln!(
            out,
            "[{} exited with status {}]",
            program,
            exit_code(status)
        ),
        Err(e) => {
            eprintln!("{}: wait failed: {}", program, e);
            Ok(())
        }
    }
}

/// Map a child's [`ExitStatus`] to the numeric status the shell reports.
///
/// A normal exit reports the low 8 bits of the termination value.
pub fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn spawn_and_report_success() {
        let env = Environment::new();
        let cmd = ExternalCommand::new(&["true"]);
        let child = cmd.spawn(&env).expect("true should spawn");
        let mut out = Vec::new();
        wait_and_report(cmd.program(), child, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[true exited with status 0]\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn spawn_and_report_failure_status() {
        let env = Environment::new();
        let cmd = ExternalCommand::new(&["sh", "-c", "exit 7"]);
        let child = cmd.spawn(&env).expect("sh should spawn");
        let mut out = Vec::new();
        wait_and_report(cmd.program(), child, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[sh exited with status 7]\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn spawn_honors_tracked_working_directory() {
        let mut env = Environment::new();
        env.current_dir = std::path::PathBuf::from("/");
        let cmd = ExternalCommand::new(&["sh", "-c", "test \"$(pwd)\" = /"]);
        let mut child = cmd.spawn(&env).expect("sh should spawn");
        let status = child.wait().expect("wait should succeed");
        assert_eq!(exit_code(status), 0);
    }

    #[test]
    fn unknown_program_fails_to_spawn() {
        let env = Environment::new();
        let cmd = ExternalCommand::new(&["definitely-not-a-command-a1b2c3"]);
        let err = cmd.spawn(&env).expect_err("spawn should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
