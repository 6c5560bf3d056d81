use rnaflow_core::constants::{dirs, params};
use rnaflow_core::model::{RunRecord, StageStatus};
use rnaflow_core::stages::Stage;
use std::path::Path;

/// Outcome of the pre-submission readiness check for one stage. Errors
/// block submission; warnings do not.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageValidation {
    pub stage: Stage,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks that a stage's required inputs exist on disk and that its
/// dependencies are done. A dependency counts as done when the run record
/// says completed or the stage's marker file exists.
pub fn validate_stage(
    stage: Stage,
    record: &RunRecord,
    run_dir: &Path,
    shared_reference_dir: &Path,
) -> StageValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match stage {
        Stage::QcRaw => {
            check_raw_fastq(run_dir, &mut errors, &mut warnings, true);
        }
        Stage::Trim => {
            check_raw_fastq(run_dir, &mut errors, &mut warnings, false);
            if record.parameter(params::ADAPTER_TYPE).is_none() {
                warnings.push(
                    "No adapter type specified, will use default (NexteraPE-PE)".to_string(),
                );
            }
        }
        Stage::QcTrimmed => {
            let trimmed = run_dir.join(dirs::TRIMMED);
            if !trimmed.is_dir() {
                errors.push("Trimmed data directory does not exist".to_string());
            } else if count_matching(&trimmed, "_paired.fq.gz") == 0 {
                errors.push("No trimmed paired FASTQ files found".to_string());
            }
        }
        Stage::Star => {
            let trimmed = run_dir.join(dirs::TRIMMED);
            if !trimmed.is_dir() {
                errors.push("Trimmed data directory does not exist".to_string());
            } else {
                let forward = count_matching(&trimmed, "_forward_paired.fq.gz");
                let reverse = count_matching(&trimmed, "_reverse_paired.fq.gz");
                if forward == 0 {
                    errors
                        .push("No forward paired FASTQ files found in trimmed directory".to_string());
                }
                if reverse == 0 {
                    errors
                        .push("No reverse paired FASTQ files found in trimmed directory".to_string());
                }
                if forward != reverse {
                    errors.push(format!(
                        "Mismatch: {} forward files vs {} reverse files",
                        forward, reverse
                    ));
                }
            }

            let (fasta_found, gtf_found) = find_reference(run_dir, shared_reference_dir);
            if !fasta_found {
                errors.push(
                    "No reference genome FASTA file (.fa or .fasta) found in reference/ or mapping_in/"
                        .to_string(),
                );
            }
            if !gtf_found {
                errors.push(
                    "No gene annotation GTF file (.gtf) found in reference/ or mapping_in/"
                        .to_string(),
                );
            }
        }
        Stage::FeatureCounts => {
            let star = run_dir.join(dirs::STAR);
            if !star.is_dir() {
                errors.push("STAR alignment directory does not exist".to_string());
            } else if count_matching(&star, "_Aligned.sortedByCoord.out.bam") == 0 {
                errors.push("No STAR alignment BAM files found".to_string());
            }

            let (_, gtf_found) = find_reference(run_dir, shared_reference_dir);
            if !gtf_found {
                errors.push(
                    "No gene annotation GTF file (.gtf) found for feature counting".to_string(),
                );
            }
        }
        Stage::Deseq2 => {}
    }

    for dep in stage.dependencies() {
        if !is_stage_completed(*dep, record, run_dir) {
            errors.push(format!("Required stage '{}' has not been completed", dep));
        }
    }

    StageValidation {
        stage,
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Completion check used by validation, dependency gating and rerun
/// detection. The on-disk marker wins over the record: the marker is
/// written by the job itself after verifying its output.
pub fn is_stage_completed(stage: Stage, record: &RunRecord, run_dir: &Path) -> bool {
    if run_dir.join(stage.completion_flag()).is_file() {
        return true;
    }
    record.stage_status(stage) == Some(StageStatus::Completed)
}

fn check_raw_fastq(run_dir: &Path, errors: &mut Vec<String>, warnings: &mut Vec<String>, warn_odd: bool) {
    let raw = run_dir.join(dirs::RAW);
    if !raw.is_dir() {
        errors.push("Raw data directory does not exist".to_string());
        return;
    }
    let count = count_fastq(&raw);
    if count == 0 {
        errors.push("No FASTQ files found in raw directory".to_string());
    } else if warn_odd && count % 2 != 0 {
        warnings.push(format!(
            "Found {} FASTQ files - expected pairs (even number)",
            count
        ));
    }
}

fn find_reference(run_dir: &Path, shared_reference_dir: &Path) -> (bool, bool) {
    let run_reference = run_dir.join(dirs::REFERENCE);
    let mut fasta_found =
        count_matching(&run_reference, ".fa") + count_matching(&run_reference, ".fasta") > 0;
    let mut gtf_found = count_matching(&run_reference, ".gtf") > 0;

    if !fasta_found {
        fasta_found = count_matching(shared_reference_dir, ".fa")
            + count_matching(shared_reference_dir, ".fasta")
            > 0;
    }
    if !gtf_found {
        gtf_found = count_matching(shared_reference_dir, ".gtf") > 0;
    }
    (fasta_found, gtf_found)
}

pub(crate) fn count_fastq(dir: &Path) -> usize {
    count_matching(dir, ".fq.gz") + count_matching(dir, ".fastq.gz")
}

fn count_matching(dir: &Path, suffix: &str) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix))
        })
        .count()
}
