//! JSON configuration files.
//!
//! Two independent files live under `~/.config/article_introduction_generator/`:
//! `config.json` for the editor's text and layout, and `config.llm.json` for the
//! chat-completion connection. Each is seeded with its defaults on first run;
//! later loads fill in keys that the file lacks without touching the others.

use crate::error::{IntroError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name under `~/.config`
pub const CONFIG_DIR_NAME: &str = "article_introduction_generator";

const GENERAL_FILE: &str = "config.json";
const LLM_FILE: &str = "config.llm.json";

/// Default configuration root: `~/.config/article_introduction_generator`
pub fn default_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".config").join(CONFIG_DIR_NAME))
        .ok_or_else(|| IntroError::Config("Cannot determine home directory".to_string()))
}

/// Load the JSON object at `path`, seeding it with `defaults` if absent.
///
/// Keys present in `defaults` but missing from the file are filled in memory;
/// the file itself is left as the user wrote it.
pub fn load_or_init(path: &Path, defaults: &Value) -> Result<Value> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(defaults)?)?;
        info!(path = %path.display(), "Created default config");
        return Ok(defaults.clone());
    }

    let content = std::fs::read_to_string(path)?;
    let mut loaded: Value = serde_json::from_str(&content)?;

    match (loaded.as_object_mut(), defaults.as_object()) {
        (Some(current), Some(defaults)) => {
            for (key, value) in defaults {
                if !current.contains_key(key) {
                    debug!(path = %path.display(), key = %key, "Filling missing config key");
                    current.insert(key.clone(), value.clone());
                }
            }
        }
        (None, Some(_)) => {
            return Err(IntroError::Config(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }
        _ => {}
    }

    Ok(loaded)
}

/// Typed handle to one configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile<T> {
    path: PathBuf,
    _kind: PhantomData<T>,
}

impl<T> ConfigFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _kind: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file (creating it on first run) into `T`.
    pub fn load(&self) -> Result<T> {
        let defaults = serde_json::to_value(T::default())?;
        let merged = load_or_init(&self.path, &defaults)?;
        Ok(serde_json::from_value(merged)?)
    }

    /// Re-read the file from disk, replacing `current` only on success.
    pub fn reload(&self, current: &mut T) -> Result<()> {
        *current = self.load()?;
        Ok(())
    }
}

/// Editor labels, tooltips and layout bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub toolbar_load: String,
    pub toolbar_load_tooltip: String,
    pub toolbar_save: String,
    pub toolbar_save_tooltip: String,
    pub toolbar_generate: String,
    pub toolbar_generate_tooltip: String,
    pub toolbar_prompt: String,
    pub toolbar_prompt_tooltip: String,
    pub toolbar_llm_conf: String,
    pub toolbar_llm_conf_tooltip: String,
    pub toolbar_url_usage: String,
    pub toolbar_url_usage_tooltip: String,
    pub toolbar_configure: String,
    pub toolbar_configure_tooltip: String,
    pub toolbar_about: String,
    pub toolbar_about_tooltip: String,
    /// Upper bound of the editor area, in terminal columns
    pub window_width: u16,
    /// Upper bound of the editor area, in terminal rows
    pub window_height: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            toolbar_load: "Load JSON".to_string(),
            toolbar_load_tooltip: "Load an introduction document".to_string(),
            toolbar_save: "Save as JSON".to_string(),
            toolbar_save_tooltip: "Save the document under a new name".to_string(),
            toolbar_generate: "Generate intro.".to_string(),
            toolbar_generate_tooltip: "Generate the introduction with the LLM".to_string(),
            toolbar_prompt: "Prompt only".to_string(),
            toolbar_prompt_tooltip: "Show the prompt text without contacting the LLM".to_string(),
            toolbar_llm_conf: "LLM Conf.".to_string(),
            toolbar_llm_conf_tooltip: "Open the configure Json file of LLM".to_string(),
            toolbar_url_usage: "LLM Usage".to_string(),
            toolbar_url_usage_tooltip: "Open the web page that shows the data usage and cost."
                .to_string(),
            toolbar_configure: "Configure".to_string(),
            toolbar_configure_tooltip: "Open the configure Json file of program GUI".to_string(),
            toolbar_about: "About".to_string(),
            toolbar_about_tooltip: "About the program".to_string(),
            window_width: 1024,
            window_height: 800,
        }
    }
}

/// Chat-completion connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    /// Usage dashboard opened in the browser on request
    pub usage: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            usage: "https://deepinfra.com/dash/usage".to_string(),
            base_url: "https://api.deepinfra.com/v1/openai".to_string(),
            model: "meta-llama/Meta-Llama-3.1-70B-Instruct".to_string(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.has_api_key() { "<redacted>" } else { "<empty>" };
        f.debug_struct("LlmConfig")
            .field("api_key", &key)
            .field("usage", &self.usage)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

fn load_or_fallback<T>(file: &ConfigFile<T>, problems: &mut Vec<String>) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    match file.load() {
        Ok(value) => value,
        Err(e) => {
            warn!(
                path = %file.path().display(),
                error = %e,
                "Unreadable configuration; using defaults"
            );
            problems.push(format!("{}: {}", file.path().display(), e));
            T::default()
        }
    }
}

/// Both configuration files plus their loaded values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub general_file: ConfigFile<GeneralConfig>,
    pub llm_file: ConfigFile<LlmConfig>,
    pub general: GeneralConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load (or create) both files under `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let general_file: ConfigFile<GeneralConfig> = ConfigFile::new(dir.join(GENERAL_FILE));
        let llm_file: ConfigFile<LlmConfig> = ConfigFile::new(dir.join(LLM_FILE));
        let general = general_file.load()?;
        let llm = llm_file.load()?;
        info!(dir = %dir.display(), model = %llm.model, "Configuration loaded");
        Ok(Self {
            general_file,
            llm_file,
            general,
            llm,
        })
    }

    /// Like [`AppConfig::load_from`], but a file that cannot be read or
    /// parsed falls back to its defaults. The errors come back for display.
    pub fn load_or_default(dir: &Path) -> (Self, Vec<String>) {
        let general_file: ConfigFile<GeneralConfig> = ConfigFile::new(dir.join(GENERAL_FILE));
        let llm_file: ConfigFile<LlmConfig> = ConfigFile::new(dir.join(LLM_FILE));
        let mut problems = Vec::new();
        let general = load_or_fallback(&general_file, &mut problems);
        let llm = load_or_fallback(&llm_file, &mut problems);
        info!(
            dir = %dir.display(),
            model = %llm.model,
            errors = problems.len(),
            "Configuration loaded"
        );
        let config = Self {
            general_file,
            llm_file,
            general,
            llm,
        };
        (config, problems)
    }

    /// Re-read the LLM connection file, e.g. after the user edited the key.
    pub fn reload_llm(&mut self) -> Result<()> {
        self.llm_file.reload(&mut self.llm)
    }

    /// Re-read the general configuration file.
    pub fn reload_general(&mut self) -> Result<()> {
        self.general_file.reload(&mut self.general)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_writes_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("config.json");
        let defaults = json!({"a": 1, "b": "two"});

        let loaded = load_or_init(&path, &defaults)?;
        assert_eq!(loaded, defaults);

        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(on_disk, defaults);
        Ok(())
    }

    #[test]
    fn test_missing_key_is_filled() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"a": 5, "extra": true}"#)?;

        let loaded = load_or_init(&path, &json!({"a": 1, "b": "two"}))?;
        assert_eq!(loaded, json!({"a": 5, "b": "two", "extra": true}));

        // the file itself is untouched
        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(on_disk, json!({"a": 5, "extra": true}));
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_reported() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json")?;
        assert!(matches!(
            load_or_init(&path, &json!({})),
            Err(IntroError::Json(_))
        ));

        std::fs::write(&path, "[1, 2]")?;
        assert!(matches!(
            load_or_init(&path, &json!({"a": 1})),
            Err(IntroError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_typed_llm_config() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.llm.json");
        std::fs::write(&path, r#"{"api_key": "sk-test", "model": "tiny"}"#)?;

        let file: ConfigFile<LlmConfig> = ConfigFile::new(path);
        let config = file.load()?;
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "tiny");
        assert_eq!(config.base_url, LlmConfig::default().base_url);
        assert_eq!(config.usage, LlmConfig::default().usage);
        Ok(())
    }

    #[test]
    fn test_reload_picks_up_edits() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = AppConfig::load_from(dir.path())?;
        assert!(!config.llm.has_api_key());
        assert_eq!(config.general, GeneralConfig::default());

        let edited = LlmConfig {
            api_key: "sk-new".to_string(),
            ..LlmConfig::default()
        };
        std::fs::write(
            config.llm_file.path(),
            serde_json::to_string_pretty(&edited)?,
        )?;
        config.reload_llm()?;
        assert_eq!(config.llm, edited);
        Ok(())
    }

    #[test]
    fn test_broken_files_fall_back_to_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join(GENERAL_FILE), r#"{"window_width": "big"}"#)?;
        std::fs::write(dir.path().join(LLM_FILE), "{not json")?;
        assert!(AppConfig::load_from(dir.path()).is_err());

        let (config, problems) = AppConfig::load_or_default(dir.path());
        assert_eq!(config.general, GeneralConfig::default());
        assert_eq!(config.llm, LlmConfig::default());
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains(GENERAL_FILE));
        assert!(problems[1].contains(LLM_FILE));
        Ok(())
    }

    #[test]
    fn test_healthy_files_report_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let (config, problems) = AppConfig::load_or_default(dir.path());
        assert!(problems.is_empty());
        assert_eq!(config.llm, LlmConfig::default());
        assert!(config.llm_file.path().exists());
        Ok(())
    }

    #[test]
    fn test_reload_failure_keeps_current() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = AppConfig::load_from(dir.path())?;
        std::fs::write(config.general_file.path(), "oops")?;
        assert!(config.reload_general().is_err());
        assert_eq!(config.general, GeneralConfig::default());
        Ok(())
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = LlmConfig {
            api_key: "sk-secret".to_string(),
            ..LlmConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
