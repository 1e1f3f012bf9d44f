use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::AI_KEY_ENV;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Writing assistant (OpenRouter)
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub outbox: OutboxConfig,
}

/// Who outgoing messages are from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            display_name: None,
        }
    }
}

impl IdentityConfig {
    /// RFC 5322 mailbox, e.g. `Ada <ada@example.com>`
    pub fn mailbox(&self) -> String {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub keybinding_mode: KeybindingMode,
    #[serde(default)]
    pub theme: ThemeVariant,
    /// Rows between the assist button and its menu
    #[serde(default)]
    pub overlay_gap: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            keybinding_mode: KeybindingMode::default(),
            theme: ThemeVariant::default(),
            overlay_gap: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingMode {
    #[default]
    Vim,
    Arrows,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Dark,
    #[serde(rename = "high-contrast")]
    HighContrast,
    #[default]
    Modern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenRouter API key; the environment variable takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub enable_assist: bool,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            enable_assist: true,
            model: default_ai_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AiConfig {
    /// Key from `env_override` if set, else from the file. Blank keys count
    /// as missing.
    pub fn resolve_api_key(&self, env_override: Option<String>) -> Option<String> {
        env_override
            .or_else(|| self.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(AI_KEY_ENV).ok())
    }

    pub fn is_enabled(&self) -> bool {
        self.enable_assist && self.api_key().is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboxConfig {
    /// Where sent messages are written; defaults to `<data dir>/posta/outbox`
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_email() -> String {
    "me@localhost".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ai_model() -> String {
    "anthropic/claude-3-haiku".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("posta");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_local_dir()
            .context("Could not find data directory")?
            .join("posta");
        Ok(dir)
    }

    pub fn outbox_dir(&self) -> Result<PathBuf> {
        match &self.outbox.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("outbox")),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// A missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        let outbox = self.outbox_dir()?;
        fs::create_dir_all(&outbox)
            .with_context(|| format!("Failed to create outbox: {}", outbox.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [identity]
            email = "ada@example.com"
            display_name = "Ada"

            [ui]
            keybinding_mode = "arrows"
            theme = "high-contrast"
            overlay_gap = 1

            [ai]
            api_key = "sk-test"
            model = "openai/gpt-4o-mini"
            max_tokens = 500

            [outbox]
            dir = "/tmp/posta-out"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.identity.mailbox(), "Ada <ada@example.com>");
        assert_eq!(config.ui.keybinding_mode, KeybindingMode::Arrows);
        assert_eq!(config.ui.theme, ThemeVariant::HighContrast);
        assert_eq!(config.ui.overlay_gap, 1);
        assert_eq!(config.ai.model, "openai/gpt-4o-mini");
        assert_eq!(config.ai.max_tokens, 500);
        assert!(config.ai.enable_assist);
        assert_eq!(
            config.outbox_dir().unwrap(),
            PathBuf::from("/tmp/posta-out")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.identity.mailbox(), "me@localhost");
        assert_eq!(config.ui.keybinding_mode, KeybindingMode::Vim);
        assert_eq!(config.ui.theme, ThemeVariant::Modern);
        assert_eq!(config.ui.overlay_gap, 0);
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.ai.max_tokens, 2000);
    }

    #[test]
    fn test_api_key_env_override() {
        let ai = AiConfig {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ai.resolve_api_key(Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(ai.resolve_api_key(None).as_deref(), Some("from-file"));

        let blank = AiConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.resolve_api_key(None).is_none());
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.identity.email, "me@localhost");
    }

    #[test]
    fn test_load_from_malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui\ntheme = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }
}
