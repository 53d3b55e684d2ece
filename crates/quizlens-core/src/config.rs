//! quizlens configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Column naming scheme of the response spreadsheet.
///
/// Per-question columns are built as `{prefix}{index}`, e.g. `回答3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_teacher")]
    pub teacher: String,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default = "default_last_name")]
    pub last_name: String,
    #[serde(default = "default_first_name")]
    pub first_name: String,
    #[serde(default = "default_question_prefix")]
    pub question_prefix: String,
    #[serde(default = "default_response_prefix")]
    pub response_prefix: String,
    #[serde(default = "default_standard_answer_prefix")]
    pub standard_answer_prefix: String,
    /// Response values meaning "did not answer".
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,
}

fn default_teacher() -> String {
    "教师".to_string()
}
fn default_class() -> String {
    "班级".to_string()
}
fn default_last_name() -> String {
    "姓氏".to_string()
}
fn default_first_name() -> String {
    "名".to_string()
}
fn default_question_prefix() -> String {
    "试题".to_string()
}
fn default_response_prefix() -> String {
    "回答".to_string()
}
fn default_standard_answer_prefix() -> String {
    "标准答案".to_string()
}
fn default_placeholders() -> Vec<String> {
    vec!["-".to_string(), "- -".to_string()]
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            teacher: default_teacher(),
            class: default_class(),
            last_name: default_last_name(),
            first_name: default_first_name(),
            question_prefix: default_question_prefix(),
            response_prefix: default_response_prefix(),
            standard_answer_prefix: default_standard_answer_prefix(),
            placeholders: default_placeholders(),
        }
    }
}

impl ColumnConfig {
    pub fn question_column(&self, index: usize) -> String {
        format!("{}{index}", self.question_prefix)
    }

    pub fn response_column(&self, index: usize) -> String {
        format!("{}{index}", self.response_prefix)
    }

    pub fn standard_answer_column(&self, index: usize) -> String {
        format!("{}{index}", self.standard_answer_prefix)
    }

    /// Returns `true` if `value` is one of the "no answer" placeholders.
    pub fn is_placeholder(&self, value: &str) -> bool {
        self.placeholders.iter().any(|p| p == value)
    }
}

/// Top-level quizlens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizlensConfig {
    /// Directory scanned for spreadsheets.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Output directory for written reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File extensions recognised as spreadsheets.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub columns: ColumnConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizlens-reports")
}
fn default_extensions() -> Vec<String> {
    vec!["xlsx".to_string()]
}

impl Default for QuizlensConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            columns: ColumnConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizlens.toml` in the current directory
/// 2. `~/.config/quizlens/config.toml`
///
/// Environment variable overrides: `QUIZLENS_DATA_DIR`, `QUIZLENS_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlensConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizlens.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizlensConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZLENS_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("QUIZLENS_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<QuizlensConfig> {
    let config: QuizlensConfig = toml::from_str(content)?;
    anyhow::ensure!(
        !config.extensions.is_empty(),
        "at least one spreadsheet extension must be configured"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizlens"))
}
