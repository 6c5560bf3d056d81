use crate::error::SlurmError;
use regex::Regex;
use rnaflow_core::model::SlurmState;
use std::sync::OnceLock;

/// Extracts the job id from sbatch stdout ("Submitted batch job 12345").
pub fn parse_submit_output(stdout: &str) -> Result<String, SlurmError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Submitted batch job (\d+)").expect("static regex")
    });
    re.captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SlurmError::JobIdParse(stdout.trim().to_string()))
}

/// Normalizes a squeue/sacct state token. squeue reports compact codes
/// ("PD", "R"); sacct reports full names, sometimes with a suffix
/// ("CANCELLED by 1000").
pub fn parse_state_token(token: &str) -> SlurmState {
    let token = token.trim().to_uppercase();
    if token.starts_with("CANCELLED") || token == "CA" {
        return SlurmState::Cancelled;
    }
    match token.as_str() {
        "PD" | "PENDING" => SlurmState::Pending,
        "R" | "RUNNING" => SlurmState::Running,
        "CG" | "COMPLETING" => SlurmState::Completing,
        "CD" | "COMPLETED" => SlurmState::Completed,
        "F" | "FAILED" | "NF" | "NODE_FAIL" | "OOM" | "OUT_OF_MEMORY" => SlurmState::Failed,
        "TO" | "TIMEOUT" => SlurmState::Timeout,
        _ => SlurmState::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub state: SlurmState,
    pub elapsed: String,
}

/// Parses `squeue -j <id> -o "%.18i %.9P %.25j %.8u %.2t %.10M %.6D %R"`
/// output: a header line followed by at most one row for the job. Returns
/// None when the job is no longer queued.
pub fn parse_squeue_job(stdout: &str) -> Option<QueueEntry> {
    let row = stdout.lines().nth(1)?;
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    Some(QueueEntry {
        state: parse_state_token(fields[4]),
        elapsed: fields[5].to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountingEntry {
    pub state: SlurmState,
    pub exit_code: String,
}

/// Parses `sacct -j <id> --format=JobID,State,ExitCode --noheader` output.
/// Step rows (`<id>.batch`, `<id>.extern`) are skipped; only the parent
/// allocation row describes the job.
pub fn parse_sacct_job(stdout: &str) -> Option<AccountingEntry> {
    for line in stdout.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 || fields[0].contains('.') {
            continue;
        }
        return Some(AccountingEntry {
            state: parse_state_token(fields[1]),
            exit_code: fields[2].to_string(),
        });
    }
    None
}

/// Parses the site `allocations` helper output: two header lines, then one
/// row per allocation with the account name in the first column. Help text
/// and separator rows are skipped.
pub fn parse_allocations(stdout: &str) -> Vec<String> {
    let mut accounts = Vec::new();
    for line in stdout.lines().skip(2) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        let name = fields[0];
        if name.starts_with('-') || name.eq_ignore_ascii_case("account") {
            continue;
        }
        if line.to_lowercase().contains("usage:") {
            continue;
        }
        accounts.push(name.to_string());
    }
    accounts.sort();
    accounts.dedup();
    accounts
}

/// Parses `sacctmgr show associations user=<u> -n -P` output: pipe-delimited
/// rows with the account in the second field.
pub fn parse_associations(stdout: &str) -> Vec<String> {
    let mut accounts: Vec<String> = stdout
        .lines()
        .filter_map(|line| line.split('|').nth(1))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    accounts.sort();
    accounts.dedup();
    accounts
}
