use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One named step of the fixed six-stage pipeline.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    QcRaw,
    Trim,
    QcTrimmed,
    Star,
    #[serde(rename = "featurecounts")]
    FeatureCounts,
    Deseq2,
}

/// Default scheduler resource request for a stage, used to parameterize the
/// submission template.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResourceRequest {
    pub cpus: u32,
    pub mem: &'static str,
    pub time: &'static str,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::QcRaw,
        Stage::Trim,
        Stage::QcTrimmed,
        Stage::Star,
        Stage::FeatureCounts,
        Stage::Deseq2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::QcRaw => "qc_raw",
            Stage::Trim => "trim",
            Stage::QcTrimmed => "qc_trimmed",
            Stage::Star => "star",
            Stage::FeatureCounts => "featurecounts",
            Stage::Deseq2 => "deseq2",
        }
    }

    /// Stages that must be COMPLETED before this one may run without an
    /// override.
    pub fn dependencies(self) -> &'static [Stage] {
        match self {
            Stage::QcRaw => &[],
            Stage::Trim => &[Stage::QcRaw],
            Stage::QcTrimmed => &[Stage::Trim],
            Stage::Star => &[Stage::Trim],
            Stage::FeatureCounts => &[Stage::Star],
            Stage::Deseq2 => &[Stage::FeatureCounts],
        }
    }

    pub fn template_file(self) -> &'static str {
        match self {
            Stage::QcRaw => "qc_raw.slurm.template",
            Stage::Trim => "trim.slurm.template",
            Stage::QcTrimmed => "qc_trimmed.slurm.template",
            Stage::Star => "star.slurm.template",
            Stage::FeatureCounts => "featurecounts.slurm.template",
            Stage::Deseq2 => "deseq2.slurm.template",
        }
    }

    /// Completion marker written by the submission script after it has
    /// verified its own output, relative to the run directory.
    pub fn completion_flag(self) -> &'static str {
        match self {
            Stage::QcRaw => "qc_raw/qc_raw_done.flag",
            Stage::Trim => "trimmed/trimming_done.flag",
            Stage::QcTrimmed => "qc_trimmed/qc_trimmed_done.flag",
            Stage::Star => "star/star_alignment_done.flag",
            Stage::FeatureCounts => "featurecounts/featurecounts_done.flag",
            Stage::Deseq2 => "logs/deseq2_done.flag",
        }
    }

    pub fn default_resources(self) -> ResourceRequest {
        match self {
            Stage::QcRaw => ResourceRequest {
                cpus: 8,
                mem: "16G",
                time: "01:00:00",
            },
            Stage::Trim => ResourceRequest {
                cpus: 16,
                mem: "64G",
                time: "06:00:00",
            },
            Stage::QcTrimmed => ResourceRequest {
                cpus: 4,
                mem: "8G",
                time: "01:00:00",
            },
            Stage::Star => ResourceRequest {
                cpus: 8,
                mem: "64G",
                time: "08:00:00",
            },
            Stage::FeatureCounts => ResourceRequest {
                cpus: 8,
                mem: "16G",
                time: "01:00:00",
            },
            Stage::Deseq2 => ResourceRequest {
                cpus: 4,
                mem: "16G",
                time: "01:00:00",
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStageError(pub String);

impl fmt::Display for ParseStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid stage: '{}'. Valid values are: qc_raw, trim, qc_trimmed, star, featurecounts, deseq2",
            self.0
        )
    }
}

impl std::error::Error for ParseStageError {}

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qc_raw" => Ok(Stage::QcRaw),
            "trim" => Ok(Stage::Trim),
            "qc_trimmed" => Ok(Stage::QcTrimmed),
            "star" => Ok(Stage::Star),
            "featurecounts" => Ok(Stage::FeatureCounts),
            "deseq2" => Ok(Stage::Deseq2),
            _ => Err(ParseStageError(s.to_string())),
        }
    }
}
