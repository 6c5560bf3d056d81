#![allow(dead_code)]
use rnaflow_client::error::SlurmError;
use rnaflow_client::slurm::exec::{CommandOutput, CommandRunner};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted stand-in for the scheduler binaries. Responses are queued per
/// program and consumed in order; a program with no queued response behaves
/// like a missing binary.
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<HashMap<String, VecDeque<CommandOutput>>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, program: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back(output);
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            status_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            status_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p == program).count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<CommandOutput, SlurmError> {
        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));
        self.responses
            .lock()
            .unwrap()
            .get_mut(program)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| SlurmError::Spawn {
                command: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            })
    }
}

pub const SQUEUE_HEADER: &str =
    "             JOBID PARTITION                      NAME     USER ST       TIME  NODES NODELIST(REASON)";

pub fn squeue_row(job_id: &str, name: &str, state: &str, time: &str) -> String {
    format!(
        "{:>18} {:>9} {:>25} {:>8} {:>2} {:>10} {:>6} node001",
        job_id, "batch", name, "alice", state, time, 1
    )
}

pub fn squeue_output(rows: &[String]) -> String {
    let mut out = String::from(SQUEUE_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

pub fn sacct_output(job_id: &str, state: &str, exit_code: &str) -> String {
    format!(
        "{id}         {state}      {exit}\n{id}.batch   {state}      {exit}\n",
        id = job_id,
        state = state,
        exit = exit_code
    )
}
