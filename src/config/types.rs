//! Settings types.

use crate::events::EventOrder;
use crate::i18n::LANGUAGES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The tool's own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathsSettings,

    #[serde(default)]
    pub generation: GenerationSettings,
}

/// Where sources are read from and artifacts written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSettings {
    /// Directory holding `task.yaml`, `argument.yaml`, `override.yaml`, `gui.yaml`.
    #[serde(default = "default_argument_dir")]
    pub argument_dir: PathBuf,

    /// Directory of user configs, one `<profile>.json` each.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Directory of translations, one `<locale>.json` each.
    #[serde(default = "default_i18n_dir")]
    pub i18n_dir: PathBuf,

    /// Markdown event calendar. Generation skips events when it is missing.
    #[serde(default = "default_event_file")]
    pub event_file: PathBuf,

    /// Generated constants module.
    #[serde(default = "default_code_file")]
    pub code_file: PathBuf,
}

impl Default for PathsSettings {
    fn default() -> Self {
        Self {
            argument_dir: default_argument_dir(),
            config_dir: default_config_dir(),
            i18n_dir: default_i18n_dir(),
            event_file: default_event_file(),
            code_file: default_code_file(),
        }
    }
}

impl PathsSettings {
    /// Compiled schema output.
    pub fn args_file(&self) -> PathBuf {
        self.argument_dir.join("args.json")
    }

    /// Menu output.
    pub fn menu_file(&self) -> PathBuf {
        self.argument_dir.join("menu.json")
    }
}

fn default_argument_dir() -> PathBuf {
    PathBuf::from("module/config/argument")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_i18n_dir() -> PathBuf {
    PathBuf::from("module/config/i18n")
}

fn default_event_file() -> PathBuf {
    PathBuf::from("campaign/Readme.md")
}

fn default_code_file() -> PathBuf {
    PathBuf::from("module/config/generated.rs")
}

/// How artifacts are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Order events are bound in; the first bound event becomes each server's default.
    #[serde(default)]
    pub event_order: EventOrder,

    /// Locales to scaffold translations for.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Replay the built-in redirections when updating named profiles.
    #[serde(default = "default_true")]
    pub redirections: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            event_order: EventOrder::default(),
            languages: default_languages(),
            redirections: true,
        }
    }
}

fn default_languages() -> Vec<String> {
    LANGUAGES.iter().map(|(locale, _)| locale.to_string()).collect()
}

fn default_true() -> bool {
    true
}
