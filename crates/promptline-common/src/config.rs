use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns the promptline base directory: `~/.promptline`, fallback `/tmp/promptline`.
pub fn promptline_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".promptline"))
        .unwrap_or_else(|| PathBuf::from("/tmp/promptline"))
}

fn default_history_file() -> String {
    promptline_dir()
        .join("history")
        .to_string_lossy()
        .to_string()
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub prompt: PromptSection,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Loads the config from `$PROMPTLINE_CONFIG` or `~/.promptline/config.toml`.
/// A missing file yields the defaults.
pub fn load_config() -> Result<PromptConfig> {
    let path = std::env::var("PROMPTLINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| promptline_dir().join("config.toml"));
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PromptConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(PromptConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PromptSection {
    /// Offer previously submitted entries alongside runtime completions.
    #[serde(default = "default_true")]
    pub history_completions: bool,
    #[serde(default = "default_max_history_suggestions")]
    pub max_history_suggestions: usize,
    #[serde(default)]
    pub keymap: Keymap,
    /// Mime type handed to the editor factory.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            history_completions: true,
            max_history_suggestions: default_max_history_suggestions(),
            keymap: Keymap::default(),
            language: default_language(),
            prompt: default_prompt(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_history_suggestions() -> usize {
    50
}

fn default_language() -> String {
    "javascript".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default = "default_history_file")]
    pub file: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            persist: true,
            file: default_history_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Keymap / platform
// ---------------------------------------------------------------------------

/// Which platform's shortcut conventions the prompt follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Ctrl+P / Ctrl+N navigate history.
    Mac,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keymap {
    #[default]
    Auto,
    Mac,
    Default,
}

impl Keymap {
    pub fn platform(self) -> Platform {
        match self {
            Keymap::Auto => Platform::current(),
            Keymap::Mac => Platform::Mac,
            Keymap::Default => Platform::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PromptConfig::default();
        assert!(config.prompt.history_completions);
        assert_eq!(config.prompt.max_history_suggestions, 50);
        assert_eq!(config.prompt.keymap, Keymap::Auto);
        assert_eq!(config.prompt.language, "javascript");
        assert!(config.completion.words.is_empty());
        assert!(config.history.persist);
        assert!(config.history.file.ends_with("history"));
    }

    #[test]
    fn test_keymap_platform() {
        assert_eq!(Keymap::Mac.platform(), Platform::Mac);
        assert_eq!(Keymap::Default.platform(), Platform::Other);
        assert_eq!(Keymap::Auto.platform(), Platform::current());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config_from(Path::new("/nonexistent/promptline.toml")).unwrap();
        assert_eq!(config.prompt.prompt, "> ");
    }
}
