use crate::error::{PipelineError, Result};
use fs_err as fs;
use rnaflow_core::model::RunId;
use rnaflow_core::stages::Stage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Renders per-run submission scripts from stage templates.
///
/// Templates are plain text with uppercase placeholders; rendering is a
/// literal substitution so template authors never fight an escaping syntax.
/// Rendered scripts land in a shared `generated_slurm/` directory, named
/// `{stage}_{run_id}.slurm`, and are kept after submission for debugging.
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    templates_dir: PathBuf,
    generated_dir: PathBuf,
}

/// Inputs threaded into every rendered script.
#[derive(Debug, Clone)]
pub struct ScriptContext<'a> {
    pub run_id: &'a RunId,
    pub account: &'a str,
    pub base_dir: &'a Path,
    pub run_dir: &'a Path,
    pub adapter_type: &'a str,
}

impl ScriptGenerator {
    pub fn new(templates_dir: impl Into<PathBuf>, generated_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            generated_dir: generated_dir.into(),
        }
    }

    pub fn script_path(&self, stage: Stage, run_id: &RunId) -> PathBuf {
        self.generated_dir
            .join(format!("{}_{}.slurm", stage.name(), run_id))
    }

    /// Renders the script for one stage of one run. Re-rendering overwrites
    /// the previous script; generation is idempotent.
    pub fn generate(&self, stage: Stage, ctx: &ScriptContext<'_>) -> Result<PathBuf> {
        let template_path = self.templates_dir.join(stage.template_file());
        if !template_path.is_file() {
            return Err(PipelineError::TemplateMissing(template_path));
        }
        let template = fs::read_to_string(&template_path)
            .map_err(|e| PipelineError::io(&template_path, e))?;

        let mut substitutions = BTreeMap::new();
        substitutions.insert("{RUN_ID}", ctx.run_id.as_str().to_string());
        substitutions.insert("{ACCOUNT}", ctx.account.to_string());
        substitutions.insert("{BASE_DIR}", ctx.base_dir.to_string_lossy().to_string());
        substitutions.insert("{RUN_DIR}", ctx.run_dir.to_string_lossy().to_string());
        substitutions.insert("{ADAPTER_TYPE}", ctx.adapter_type.to_string());

        let mut rendered = template;
        for (placeholder, value) in &substitutions {
            rendered = rendered.replace(placeholder, value);
        }

        fs::create_dir_all(&self.generated_dir)
            .map_err(|e| PipelineError::io(&self.generated_dir, e))?;
        let out_path = self.script_path(stage, ctx.run_id);
        fs::write(&out_path, rendered).map_err(|e| PipelineError::io(&out_path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, std::fs::Permissions::from_mode(0o755))
                .map_err(|e| PipelineError::io(&out_path, e))?;
        }

        debug!("rendered {} script at {}", stage, out_path.display());
        Ok(out_path)
    }

    /// Removes every generated script belonging to one run.
    pub fn cleanup_run(&self, run_id: &RunId) -> Result<()> {
        if !self.generated_dir.is_dir() {
            return Ok(());
        }
        for stage in Stage::ALL {
            let path = self.script_path(stage, run_id);
            if path.is_file() {
                fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
            }
        }
        Ok(())
    }

    /// Trims the generated directory to the most recent `keep_recent`
    /// scripts by modification time.
    pub fn cleanup_old(&self, keep_recent: usize) -> Result<usize> {
        if !self.generated_dir.is_dir() {
            return Ok(0);
        }

        let mut scripts: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        let entries = fs::read_dir(&self.generated_dir)
            .map_err(|e| PipelineError::io(&self.generated_dir, e))?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_script = path
                .extension()
                .is_some_and(|ext| ext == "slurm");
            if !is_script {
                continue;
            }
            let mtime = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::UNIX_EPOCH);
            scripts.push((mtime, path));
        }

        if scripts.len() <= keep_recent {
            return Ok(0);
        }

        scripts.sort_by(|a, b| b.0.cmp(&a.0));
        let mut removed = 0;
        for (_, path) in scripts.into_iter().skip(keep_recent) {
            fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
            removed += 1;
        }
        Ok(removed)
    }
}
