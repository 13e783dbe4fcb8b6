use crate::external::exit_code;
use std::io::{self, Write};
use std::process::Child;

/// One background child the shell has not collected yet.
struct Job {
    program: String,
    child: Child,
}

/// Tracks background children between prompts and reaps the finished ones.
///
/// Foreground children are waited for inside the executor and never reach
/// this table. Dropping the table leaves any still-running children alone;
/// they keep their process and are reparented when the shell exits.
#[derive(Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of background children still tracked.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Start tracking a freshly spawned background child.
    pub fn adopt(&mut self, program: &str, child: Child) {
        self.jobs.push(Job {
            program: program.to_string(),
            child,
        });
    }

    /// Collect every tracked child that has terminated, without blocking.
    ///
    /// For each finished child one line of the form
    /// `[background process <pid> exited with status <n>]` is written to
    /// `out`, in spawn order. Children that are still running stay tracked,
    /// so long-lived background jobs persist across prompts. A child whose
    /// status cannot be polled is reported on standard error and dropped.
    pub fn reap(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let mut i = 0;
        while i < self.jobs.len() {
            match self.jobs[i].child.try_wait() {
                Ok(Some(status)) => {
                    let job = self.jobs.remove(i);
                    writeln!(
                        out,
                        "[background process {} exited with status {}]",
                        job.child.id(),
                        exit_code(status)
                    )?;
                }
                Ok(None) => i += 1,
                Err(e) => {
                    let job = self.jobs.remove(i);
                    eprintln!("{}: can't poll background process: {}", job.program, e);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::{Duration, Instant};

    fn spawn(program: &str, args: &[&str]) -> Child {
        Command::new(program)
            .args(args)
            .spawn()
            .expect("test program should spawn")
    }

    /// Sweep until the table drains or the deadline passes.
    fn reap_until_empty(table: &mut JobTable, out: &mut Vec<u8>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !table.is_empty() {
            assert!(Instant::now() < deadline, "background job never finished");
            table.reap(out).unwrap();
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    #[cfg(unix)]
    fn finished_child_is_reported_and_removed() {
        let mut table = JobTable::new();
        let child = spawn("sleep", &["0"]);
        let pid = child.id();
        table.adopt("sleep", child);

        let mut out = Vec::new();
        reap_until_empty(&mut table, &mut out);

        let report = String::from_utf8(out).unwrap();
        assert_eq!(
            report,
            format!("[background process {} exited with status 0]\n", pid)
        );
    }

    #[test]
    #[cfg(unix)]
    fn running_child_is_left_alone_until_it_finishes() {
        let mut table = JobTable::new();
        table.adopt("sleep", spawn("sleep", &["2"]));

        let mut out = Vec::new();
        table.reap(&mut out).unwrap();
        assert!(out.is_empty(), "a running child must not be reported");
        assert_eq!(table.len(), 1);

        reap_until_empty(&mut table, &mut out);
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("exited with status 0]"));
    }

    #[test]
    #[cfg(unix)]
    fn exit_status_of_background_child_is_reported() {
        let mut table = JobTable::new();
        table.adopt("sh", spawn("sh", &["-c", "exit 3"]));

        let mut out = Vec::new();
        reap_until_empty(&mut table, &mut out);

        let report = String::from_utf8(out).unwrap();
        assert!(report.starts_with("[background process "));
        assert!(report.ends_with(" exited with status 3]\n"));
    }
}
