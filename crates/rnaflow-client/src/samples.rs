use rnaflow_core::constants::dirs;
use std::collections::BTreeMap;
use std::path::Path;

/// One sample's forward/reverse read files. A pair is valid only when both
/// mates are present.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SamplePair {
    pub sample_name: String,
    pub forward_file: String,
    pub reverse_file: String,
    pub valid: bool,
}

/// Pairing report over the raw FASTQ files of a run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SampleReport {
    pub total_files: usize,
    pub pairs: Vec<SamplePair>,
    pub unpaired_files: Vec<String>,
    pub issues: Vec<String>,
}

impl SampleReport {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty() && self.unpaired_files.is_empty()
    }
}

fn strip_fastq_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(".fq.gz")
        .or_else(|| name.strip_suffix(".fastq.gz"))
}

/// Groups raw FASTQ files into mate pairs by the `_1`/`_2` suffix
/// convention. Files that follow neither convention are reported as
/// unpaired rather than guessed at.
pub fn sample_report(run_dir: &Path) -> SampleReport {
    let raw_dir = run_dir.join(dirs::RAW);
    let mut names: Vec<String> = match std::fs::read_dir(&raw_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .filter(|n| strip_fastq_suffix(n).is_some())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();

    #[derive(Default)]
    struct Mates {
        forward: Option<String>,
        reverse: Option<String>,
    }

    let mut samples: BTreeMap<String, Mates> = BTreeMap::new();
    let mut unpaired = Vec::new();

    for name in &names {
        let Some(stem) = strip_fastq_suffix(name) else {
            continue;
        };
        if let Some(sample) = stem.strip_suffix("_1") {
            samples.entry(sample.to_string()).or_default().forward = Some(name.clone());
        } else if let Some(sample) = stem.strip_suffix("_2") {
            samples.entry(sample.to_string()).or_default().reverse = Some(name.clone());
        } else {
            unpaired.push(name.clone());
        }
    }

    let mut pairs = Vec::new();
    let mut issues = Vec::new();
    for (sample_name, mates) in samples {
        let valid = mates.forward.is_some() && mates.reverse.is_some();
        if !valid {
            let mut missing = Vec::new();
            if mates.forward.is_none() {
                missing.push("forward (_1)");
            }
            if mates.reverse.is_none() {
                missing.push("reverse (_2)");
            }
            issues.push(format!("Sample {} missing: {}", sample_name, missing.join(", ")));
        }
        pairs.push(SamplePair {
            sample_name,
            forward_file: mates.forward.unwrap_or_default(),
            reverse_file: mates.reverse.unwrap_or_default(),
            valid,
        });
    }

    SampleReport {
        total_files: names.len(),
        pairs,
        unpaired_files: unpaired,
        issues,
    }
}
