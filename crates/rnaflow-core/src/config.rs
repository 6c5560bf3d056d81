use crate::constants::{accounts, dirs};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Rotation policy for session log files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub max_files: usize,
    pub max_age_days: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_age_days: 14,
        }
    }
}

/// Scheduler-facing settings. Every external command runs under one of
/// these timeouts; a timeout is a typed outcome, never a hang.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlurmSettings {
    pub submit_timeout_secs: u64,
    pub query_timeout_secs: u64,
    pub accounts_timeout_secs: u64,
    pub fallback_timeout_secs: u64,
    /// Overrides the fallback account list when non-empty.
    pub default_accounts: Vec<String>,
}

impl Default for SlurmSettings {
    fn default() -> Self {
        Self {
            submit_timeout_secs: 60,
            query_timeout_secs: 30,
            accounts_timeout_secs: 90,
            fallback_timeout_secs: 30,
            default_accounts: Vec::new(),
        }
    }
}

impl SlurmSettings {
    pub fn fallback_accounts(&self) -> Vec<String> {
        if self.default_accounts.is_empty() {
            accounts::DEFAULTS.iter().map(|s| s.to_string()).collect()
        } else {
            self.default_accounts.clone()
        }
    }
}

/// Application configuration.
///
/// In module-based deployments the code and templates live in a shared,
/// read-only install directory, while all run data must live in a per-user
/// writable work directory on scratch storage. The work directory comes
/// from RNAFLOW_WORKDIR or SCRATCH; there is deliberately no $HOME
/// fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub install_dir: PathBuf,
    pub base_dir: PathBuf,
    pub slurm: SlurmSettings,
    pub logging: LoggingConfig,
}

/// Optional `rnaflow.toml` overlay next to the install dir.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    slurm: Option<SlurmSettings>,
    #[serde(default)]
    logging: Option<LoggingConfig>,
}

impl Config {
    /// Resolves configuration from the environment plus an optional toml
    /// overlay at `<install_dir>/rnaflow.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let install_dir = resolve_install_dir();
        let base_dir = resolve_base_dir()?;
        let mut config = Config {
            install_dir,
            base_dir,
            slurm: SlurmSettings::default(),
            logging: LoggingConfig::default(),
        };

        let overlay_path = config.install_dir.join("rnaflow.toml");
        if overlay_path.is_file() {
            let text = fs_err::read_to_string(&overlay_path)?;
            let overlay: FileConfig = toml::from_str(&text)?;
            if let Some(slurm) = overlay.slurm {
                config.slurm = slurm;
            }
            if let Some(logging) = overlay.logging {
                config.logging = logging;
            }
        }

        Ok(config)
    }

    /// Builds a configuration rooted at explicit directories. Used by tests
    /// and by callers that manage their own layout.
    pub fn with_dirs(install_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Config {
            install_dir: install_dir.into(),
            base_dir: base_dir.into(),
            slurm: SlurmSettings::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.base_dir.join(dirs::RUNS)
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.base_dir.join(dirs::GENERATED)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.install_dir.join(dirs::TEMPLATES)
    }

    /// Shared reference data (FASTA/GTF) usable by any run that did not
    /// upload its own.
    pub fn reference_dir(&self) -> PathBuf {
        self.base_dir.join(dirs::MAPPING_IN)
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.runs_dir().join(run_id)
    }
}

fn resolve_install_dir() -> PathBuf {
    if let Ok(home) = env::var("RNAFLOW_HOME") {
        return PathBuf::from(home);
    }
    // Running from a source checkout: the workspace root carries the
    // template directory.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = env::var("RNAFLOW_WORKDIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(scratch) = env::var("SCRATCH") {
        return Ok(PathBuf::from(scratch));
    }
    Err(ConfigError::WorkdirNotConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_dirs_layout() {
        let config = Config::with_dirs("/opt/rnaflow", "/scratch/alice");
        assert_eq!(config.runs_dir(), PathBuf::from("/scratch/alice/runs"));
        assert_eq!(
            config.generated_dir(),
            PathBuf::from("/scratch/alice/generated_slurm")
        );
        assert_eq!(
            config.templates_dir(),
            PathBuf::from("/opt/rnaflow/slurm_templates")
        );
        assert_eq!(
            config.reference_dir(),
            PathBuf::from("/scratch/alice/mapping_in")
        );
    }

    #[test]
    fn test_fallback_accounts_default() {
        let settings = SlurmSettings::default();
        let fallback = settings.fallback_accounts();
        assert!(!fallback.is_empty());
        assert!(fallback.contains(&"default".to_string()));
    }

    #[test]
    fn test_fallback_accounts_override() {
        let settings = SlurmSettings {
            default_accounts: vec!["lab-a".to_string()],
            ..SlurmSettings::default()
        };
        assert_eq!(settings.fallback_accounts(), vec!["lab-a".to_string()]);
    }

    #[test]
    fn test_overlay_parses() {
        let overlay: FileConfig = toml::from_str(
            r#"
[slurm]
submit_timeout_secs = 120
default_accounts = ["bio-lab"]

[logging]
max_files = 5
"#,
        )
        .unwrap();
        let slurm = overlay.slurm.unwrap();
        assert_eq!(slurm.submit_timeout_secs, 120);
        assert_eq!(slurm.default_accounts, vec!["bio-lab"]);
        // Unspecified fields keep their defaults.
        assert_eq!(slurm.query_timeout_secs, 30);
        assert_eq!(overlay.logging.unwrap().max_files, 5);
    }
}
