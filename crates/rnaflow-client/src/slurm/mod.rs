pub mod exec;
pub mod parse;

use crate::error::SlurmError;
use exec::{CommandOutput, CommandRunner, SystemRunner};
use rnaflow_core::config::SlurmSettings;
use rnaflow_core::model::{JobReport, RunId};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// The name column must stay unbounded so job names embedding a full run id
// survive into the output; `is_run_active` matches on them.
pub const SQUEUE_FORMAT: &str = "%.18i %.9P %j %.8u %.2t %.10M %.6D %R";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub job_id: String,
    /// Untouched sbatch stdout, kept for operator-facing output and logs.
    pub raw_output: String,
}

/// Thin client over the site's SLURM command-line tools.
///
/// Status queries are deliberately infallible: a job that cannot be located
/// comes back as `Unknown` with a reason, so one flaky controller response
/// never aborts an orchestration pass.
pub struct SlurmClient {
    user: String,
    settings: SlurmSettings,
    runner: Arc<dyn CommandRunner>,
}

impl SlurmClient {
    pub fn new(settings: SlurmSettings) -> Self {
        Self {
            user: local_username(),
            settings,
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_runner(
        settings: SlurmSettings,
        user: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            user: user.into(),
            settings,
            runner,
        }
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout_secs: u64,
    ) -> Result<CommandOutput, SlurmError> {
        self.runner
            .run(program, args, Duration::from_secs(timeout_secs))
    }

    /// Submits a generated script with `sbatch` and returns the assigned
    /// job id.
    pub fn submit(&self, script: &Path) -> Result<SubmittedJob, SlurmError> {
        let script_str = script.to_string_lossy();
        let output = self.run(
            "sbatch",
            &[script_str.as_ref()],
            self.settings.submit_timeout_secs,
        )?;

        if !output.success() {
            return Err(SlurmError::Submission {
                stderr: output.stderr.trim().to_string(),
            });
        }

        let job_id = parse::parse_submit_output(&output.stdout)?;
        info!("submitted {} as job {}", script.display(), job_id);
        Ok(SubmittedJob {
            job_id,
            raw_output: output.stdout,
        })
    }

    /// Resolves the current state of a job: squeue first for live jobs, then
    /// sacct for finished ones.
    pub fn query_status(&self, job_id: &str) -> JobReport {
        match self.run(
            "squeue",
            &["-j", job_id, "-o", SQUEUE_FORMAT],
            self.settings.query_timeout_secs,
        ) {
            Ok(output) if output.success() => {
                if let Some(entry) = parse::parse_squeue_job(&output.stdout) {
                    return JobReport {
                        job_id: job_id.to_string(),
                        state: entry.state,
                        elapsed: Some(entry.elapsed),
                        exit_code: None,
                        error: None,
                    };
                }
            }
            Ok(output) => {
                debug!("squeue returned nonzero for job {}: {}", job_id, output.stderr.trim());
            }
            Err(err) => {
                warn!("squeue failed for job {}: {}", job_id, err);
            }
        }

        match self.run(
            "sacct",
            &["-j", job_id, "--format=JobID,State,ExitCode", "--noheader"],
            self.settings.query_timeout_secs,
        ) {
            Ok(output) if output.success() => {
                if let Some(entry) = parse::parse_sacct_job(&output.stdout) {
                    return JobReport {
                        job_id: job_id.to_string(),
                        state: entry.state,
                        elapsed: None,
                        exit_code: Some(entry.exit_code),
                        error: None,
                    };
                }
                JobReport::unknown(job_id, "job not found in squeue or sacct")
            }
            Ok(output) => JobReport::unknown(
                job_id,
                format!("sacct returned nonzero: {}", output.stderr.trim()),
            ),
            Err(err) => JobReport::unknown(job_id, format!("sacct failed: {}", err)),
        }
    }

    /// True when the scheduler queue still holds any job belonging to this
    /// run. Generated job names embed the run id, so a substring match on
    /// the user's queue is enough. Callers decide what a query failure
    /// means; deletion must not proceed on one, submission may.
    pub fn is_run_active(&self, run_id: &RunId) -> Result<bool, SlurmError> {
        let output = self.run(
            "squeue",
            &["-u", &self.user, "-o", SQUEUE_FORMAT],
            self.settings.query_timeout_secs,
        )?;
        if !output.success() {
            return Err(SlurmError::CommandFailed {
                command: "squeue".to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output
            .stdout
            .lines()
            .skip(1)
            .any(|line| line.contains(run_id.as_str())))
    }

    /// Accounts this user may charge jobs to. Tries the site `allocations`
    /// helper, then `sacctmgr` associations, then the configured fallback
    /// list. Never fails; an account list is always available.
    pub fn list_accounts(&self) -> Vec<String> {
        match self.run("allocations", &[], self.settings.accounts_timeout_secs) {
            Ok(output) if output.success() => {
                let accounts = parse::parse_allocations(&output.stdout);
                if !accounts.is_empty() {
                    return accounts;
                }
            }
            Ok(_) | Err(_) => {}
        }

        let user_arg = format!("user={}", self.user);
        match self.run(
            "sacctmgr",
            &["show", "associations", &user_arg, "-n", "-P"],
            self.settings.fallback_timeout_secs,
        ) {
            Ok(output) if output.success() => {
                let accounts = parse::parse_associations(&output.stdout);
                if !accounts.is_empty() {
                    return accounts;
                }
            }
            Ok(_) | Err(_) => {}
        }

        debug!("no allocation source answered; using fallback account list");
        self.settings.fallback_accounts()
    }
}

/// Username for scoping queue queries. Falls back to `$USER` when the
/// platform lookup fails.
fn local_username() -> String {
    match whoami::username() {
        Ok(user) => user,
        Err(err) => {
            warn!("could not resolve username: {err}; falling back to $USER");
            std::env::var("USER").unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_username_never_panics() {
        let _ = local_username();
    }
}
