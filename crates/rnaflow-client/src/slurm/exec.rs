use crate::error::SlurmError;
use rnaflow_core::logging::log_command;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured result of one scheduler command. A non-zero exit is data, not
/// an error; callers decide what a failure means per command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Seam between the client and the actual scheduler binaries. Tests swap in
/// a scripted runner; production uses [`SystemRunner`].
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, SlurmError>;
}

/// Runs scheduler binaries as child processes, killing any that outlive
/// their deadline. SLURM controllers under load can hang a client command
/// for minutes; the timeout keeps this layer responsive.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    const POLL_INTERVAL: Duration = Duration::from_millis(50);
}

/// Drains a child pipe on its own thread. Reading has to overlap the wait
/// loop: a child that fills the pipe buffer blocks until someone reads,
/// and would otherwise sit there until the deadline kills it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, SlurmError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log_command(&command);

        let mut child = command.spawn().map_err(|source| SlurmError::Spawn {
            command: program.to_string(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return Ok(CommandOutput {
                        status_code: status.code(),
                        stdout: stdout.join().unwrap_or_default(),
                        stderr: stderr.join().unwrap_or_default(),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Killing closes the pipes, so the readers finish.
                        let _ = stdout.join();
                        let _ = stderr.join();
                        return Err(SlurmError::Timeout {
                            command: program.to_string(),
                            secs: timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(Self::POLL_INTERVAL);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout.join();
                    let _ = stderr.join();
                    return Err(SlurmError::Spawn {
                        command: program.to_string(),
                        source,
                    });
                }
            }
        }
    }
}
