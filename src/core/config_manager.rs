// src/core/config_manager.rs
//! Configuration loading: `config.yaml` environments plus environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::app_log;

pub const DEFAULT_LLM_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GENERATIONS_PER_DAY: u32 = 5;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub llm: LlmConfig,
    pub usage: UsageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub templates_path: PathBuf,
    pub output_path: PathBuf,
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// Key from the environment; a key saved in storage takes precedence.
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    pub generations_per_day: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Browser origins allowed to call the API. An entry without a port
    /// matches that host on any port; `*` allows every origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentSection {
    #[serde(flatten)]
    paths: EnvironmentConfig,
    #[serde(default)]
    llm: LlmConfig,
    #[serde(default)]
    usage: UsageConfig,
    #[serde(default)]
    server: ServerConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentSection,
    production: Option<EnvironmentSection>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            generations_per_day: DEFAULT_GENERATIONS_PER_DAY,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".to_string(),
                "http://127.0.0.1".to_string(),
            ],
        }
    }
}

impl ConfigManager {
    /// Load configuration from `config.yaml` in the working directory.
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir.join("config.yaml"), &base_dir)
    }

    /// Load configuration from an explicit file; relative paths resolve against `base_dir`.
    /// A missing file yields the built-in defaults.
    pub fn load_from(config_path: &Path, base_dir: &Path) -> Result<Self> {
        let env = Self::get_environment();
        app_log!(info, "Loading configuration for environment: {}", env);

        let section = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse_section(&content, &env)?
        } else {
            app_log!(
                info,
                "{} not found, using default configuration",
                config_path.display()
            );
            EnvironmentSection {
                paths: EnvironmentConfig {
                    templates_path: PathBuf::from("templates"),
                    output_path: PathBuf::from("out"),
                    database_path: PathBuf::from("cvcraft.db"),
                },
                llm: LlmConfig::default(),
                usage: UsageConfig::default(),
                server: ServerConfig::default(),
            }
        };

        let mut llm = section.llm;
        Self::apply_llm_overrides(&mut llm);

        Ok(Self {
            environment: EnvironmentConfig {
                templates_path: resolve_path(base_dir, &section.paths.templates_path),
                output_path: resolve_path(base_dir, &section.paths.output_path),
                database_path: resolve_path(base_dir, &section.paths.database_path),
            },
            llm,
            usage: section.usage,
            server: section.server,
        })
    }

    fn get_environment() -> String {
        std::env::var("CVCRAFT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn parse_section(content: &str, env: &str) -> Result<EnvironmentSection> {
        let file: ConfigFile = serde_yaml::from_str(content).context("Failed to parse config.yaml")?;
        Ok(match (env, file.production) {
            ("production", Some(production)) => production,
            ("production", None) => {
                anyhow::bail!("config.yaml has no production section")
            }
            _ => file.local,
        })
    }

    fn apply_llm_overrides(llm: &mut LlmConfig) {
        if let Ok(url) = std::env::var("CVCRAFT_LLM_URL") {
            llm.api_url = url;
        }
        if let Ok(model) = std::env::var("CVCRAFT_LLM_MODEL") {
            llm.model = model;
        }
        llm.api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.environment.output_path).await?;
        FsOps::ensure_dir_exists(&self.environment.templates_path).await?;

        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }

        Ok(())
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  templates_path: templates
  output_path: out
  database_path: data/cvcraft.db
  llm:
    model: gemini-test
    timeout_seconds: 5
  server:
    allowed_origins: ["http://localhost:5173"]
production:
  templates_path: /app/templates
  output_path: /app/out
  database_path: /app/cvcraft.db
  usage:
    generations_per_day: 10
"#;

    #[test]
    fn test_parse_local_section() {
        let section = ConfigManager::parse_section(SAMPLE, "local").unwrap();
        assert_eq!(section.llm.model, "gemini-test");
        assert_eq!(section.llm.timeout_seconds, 5);
        assert_eq!(section.llm.api_url, DEFAULT_LLM_URL);
        assert_eq!(section.usage.generations_per_day, DEFAULT_GENERATIONS_PER_DAY);
        assert_eq!(section.server.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_parse_production_section() {
        let section = ConfigManager::parse_section(SAMPLE, "production").unwrap();
        assert_eq!(section.paths.output_path, PathBuf::from("/app/out"));
        assert_eq!(section.usage.generations_per_day, 10);
        assert_eq!(section.llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(
            section.server.allowed_origins,
            vec!["http://localhost", "http://127.0.0.1"]
        );
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/work");
        assert_eq!(resolve_path(base, Path::new("out")), PathBuf::from("/work/out"));
        assert_eq!(resolve_path(base, Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::load_from(&dir.path().join("config.yaml"), dir.path()).unwrap();
        assert_eq!(config.environment.output_path, dir.path().join("out"));
        assert_eq!(config.environment.database_path, dir.path().join("cvcraft.db"));
    }
}
