//! Configuration types and layered loading.
//!
//! Sources are merged in this order (later wins):
//! 1. Built-in defaults
//! 2. User config (`~/.config/cuaca/config.toml`)
//! 3. Workspace-local config (`.cuaca/config.toml`)
//! 4. Environment variables (prefixed with `CUACA_`)
//! 5. Explicit overrides (passed as argument)

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuacaConfig {
    /// Dataset and model locations.
    #[serde(default)]
    pub resources: ResourceConfig,
    /// Names of the two user-facing input columns.
    #[serde(default)]
    pub inputs: InputConfig,
    /// Class code to display label mapping.
    #[serde(default = "default_labels")]
    pub labels: Vec<LabelEntry>,
    /// Terminal rendering options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for CuacaConfig {
    fn default() -> Self {
        Self {
            resources: ResourceConfig::default(),
            inputs: InputConfig::default(),
            labels: default_labels(),
            display: DisplayConfig::default(),
        }
    }
}

/// Dataset and model locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Reference dataset (delimited text with a header row).
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,
    /// Serialized model artifact.
    #[serde(default = "default_model_path")]
    pub model: PathBuf,
    /// Field delimiter of the reference dataset.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset_path(),
            model: default_model_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dpc.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model.json")
}

fn default_delimiter() -> char {
    ','
}

/// Column names the prompt asks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_temperature_column")]
    pub temperature_column: String,
    #[serde(default = "default_humidity_column")]
    pub humidity_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            temperature_column: default_temperature_column(),
            humidity_column: default_humidity_column(),
        }
    }
}

fn default_temperature_column() -> String {
    "Suhu (°C)".to_string()
}

fn default_humidity_column() -> String {
    "Kelembapan (%)".to_string()
}

/// One entry of the label map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub code: i64,
    pub label: String,
}

fn default_labels() -> Vec<LabelEntry> {
    vec![
        LabelEntry {
            code: 0,
            label: "Rain".to_string(),
        },
        LabelEntry {
            code: 1,
            label: "Clear".to_string(),
        },
    ]
}

/// Terminal rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width in cells of a 100% probability bar.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    /// Rows shown when previewing a dataset.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_bar_width() -> usize {
    30
}

fn default_preview_rows() -> usize {
    5
}

impl CuacaConfig {
    /// Resolve relative resource paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.resources.dataset.is_relative() {
            self.resources.dataset = base.join(&self.resources.dataset);
        }
        if self.resources.model.is_relative() {
            self.resources.model = base.join(&self.resources.model);
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "cuaca", "cuaca")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".cuaca").join("config.toml")
}

/// Load configuration from all layers.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&CuacaConfig>,
) -> Result<CuacaConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(CuacaConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // CUACA_RESOURCES__DATASET, CUACA_DISPLAY__BAR_WIDTH, etc.
    figment = figment.merge(Env::prefixed("CUACA_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}
