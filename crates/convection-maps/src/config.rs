//! Pipeline configuration (`config/pipeline.yaml`).
//!
//! Supports environment variable substitution using `${VAR}` and
//! `${VAR:-default}` syntax, so RST install locations can come from the
//! environment the toolkit is normally set up with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use darn_common::constants::DEFAULT_KEY_FILE;
use omni::OmniConfig;
use rst_toolkit::ProcessRunner;
use serde::Deserialize;
use tracing::warn;

use crate::params::MapParameters;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub rst: RstConfig,
    pub omni: OmniConfig,
    pub defaults: DefaultsConfig,
}

/// How the RST binaries are found and invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RstConfig {
    /// Directory holding the RST binaries; `PATH` is used when unset
    pub bin_dir: Option<PathBuf>,
    /// Extra options passed to every RST command
    pub options: String,
    /// Colour key for `map_plot -vkey`
    pub key_file: String,
    /// Environment for the RST processes (`SD_HDWPATH`, `MAPDATA`, ...)
    pub env: BTreeMap<String, String>,
}

impl Default for RstConfig {
    fn default() -> Self {
        Self {
            bin_dir: None,
            options: String::new(),
            key_file: DEFAULT_KEY_FILE.to_string(),
            env: BTreeMap::new(),
        }
    }
}

/// Directory and output defaults; anything unset keeps the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub data_path: Option<PathBuf>,
    pub plot_path: Option<PathBuf>,
    pub map_path: Option<PathBuf>,
    pub grid_path: Option<PathBuf>,
    pub imf_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub image_ext: Option<String>,
    pub num_proc: Option<usize>,
}

impl DefaultsConfig {
    /// Copy every configured default into `params`.
    pub fn apply(&self, params: &mut MapParameters) {
        let paths = [
            (&self.data_path, &mut params.data_path),
            (&self.plot_path, &mut params.plot_path),
            (&self.map_path, &mut params.map_path),
            (&self.grid_path, &mut params.grid_path),
            (&self.imf_path, &mut params.imf_path),
            (&self.key_path, &mut params.key_path),
            (&self.log_path, &mut params.log_path),
        ];
        for (configured, target) in paths {
            if let Some(path) = configured {
                *target = path.clone();
            }
        }
        if let Some(ext) = &self.image_ext {
            params.image_ext = ext.clone();
        }
        if let Some(num_proc) = self.num_proc {
            params.num_proc = num_proc;
        }
    }
}

impl PipelineConfig {
    /// Load and parse the YAML file with environment variable substitution.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read pipeline config from {:?}", path.as_ref()))?;

        let expanded = expand_env_vars(&content)?;

        serde_yaml::from_str(&expanded)
            .with_context(|| format!("Failed to parse pipeline config from {:?}", path.as_ref()))
    }

    /// Like [`PipelineConfig::load`], but `None` when the file does not exist.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Like [`PipelineConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load_optional(path.as_ref())? {
            Some(config) => Ok(config),
            None => {
                warn!(path = ?path.as_ref(), "Pipeline config not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Process runner for the configured RST install.
    pub fn runner(&self) -> ProcessRunner {
        let runner = ProcessRunner::new().with_env(self.rst.env.clone());
        match &self.rst.bin_dir {
            Some(dir) => runner.with_bin_dir(dir),
            None => runner,
        }
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` in YAML content.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .with_context(|| format!("Unclosed variable substitution: ${{{}", after))?;
        result.push_str(&resolve_var_expr(&after[..end])?);
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
