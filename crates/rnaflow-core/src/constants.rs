pub mod files {
    /// Persisted run record, one per run directory.
    pub const STATE: &str = "state.json";
}

pub mod dirs {
    pub const RUNS: &str = "runs";
    pub const GENERATED: &str = "generated_slurm";
    pub const TEMPLATES: &str = "slurm_templates";
    pub const MAPPING_IN: &str = "mapping_in";

    pub const RAW: &str = "raw";
    pub const TRIMMED: &str = "trimmed";
    pub const QC_RAW: &str = "qc_raw";
    pub const QC_TRIMMED: &str = "qc_trimmed";
    pub const STAR: &str = "star";
    pub const FEATURECOUNTS: &str = "featurecounts";
    pub const COUNTS: &str = "counts";
    pub const METADATA: &str = "metadata";
    pub const DE: &str = "de";
    pub const SUMMARIES: &str = "summaries";
    pub const REFERENCE: &str = "reference";
    pub const LOGS: &str = "logs";

    /// Subdirectory tree allocated when a run is created.
    pub const RUN_SUBDIRS: &[&str] = &[
        RAW,
        "trimmed",
        "trimmed/logs",
        QC_RAW,
        QC_TRIMMED,
        STAR,
        "star/logs",
        FEATURECOUNTS,
        "featurecounts/logs",
        COUNTS,
        METADATA,
        DE,
        SUMMARIES,
        REFERENCE,
        LOGS,
    ];
}

pub mod params {
    pub const ADAPTER_TYPE: &str = "adapter_type";
}

pub mod adapters {
    pub const DEFAULT: &str = "NexteraPE-PE";

    pub const ALL: &[&str] = &[
        "NexteraPE-PE",
        "TruSeq2-PE",
        "TruSeq2-SE",
        "TruSeq3-PE-2",
        "TruSeq3-PE",
        "TruSeq3-SE",
    ];

    pub fn is_valid(name: &str) -> bool {
        ALL.contains(&name)
    }
}

pub mod accounts {
    /// Last-resort account list when neither allocation query works.
    pub const DEFAULTS: &[&str] = &["default", "general", "standard"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_adapter_is_listed() {
        assert!(adapters::is_valid(adapters::DEFAULT));
    }

    #[test]
    fn test_unknown_adapter_rejected() {
        assert!(!adapters::is_valid("NotAnAdapter"));
    }

    #[test]
    fn test_run_subdirs_include_logs() {
        assert!(dirs::RUN_SUBDIRS.contains(&dirs::LOGS));
        assert!(dirs::RUN_SUBDIRS.contains(&dirs::RAW));
    }

    #[test]
    fn test_fallback_accounts_nonempty() {
        assert!(!accounts::DEFAULTS.is_empty());
    }
}
