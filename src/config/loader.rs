//! Settings loader with tier-based merging.
//!
//! Loads settings from multiple tiers and merges them field-by-field.

use super::types::Settings;
use crate::tree::deep_merge_all;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings file name inside each tier directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Settings tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SettingsTier {
    /// Embedded defaults (lowest priority)
    Defaults = 0,
    /// Project-level settings ($CWD/config-forge/)
    Project = 1,
    /// User-level settings (~/.config-forge/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for SettingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsTier::Defaults => write!(f, "defaults"),
            SettingsTier::Project => write!(f, "project"),
            SettingsTier::User => write!(f, "user"),
            SettingsTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories of the file-backed tiers.
#[derive(Debug, Clone)]
pub struct SettingsPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for SettingsPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl SettingsPaths {
    /// Discover tier directories from environment and defaults.
    pub fn discover() -> Self {
        // User dir: CONFIG_FORGE_USER_DIR or ~/.config-forge
        let user_dir = std::env::var("CONFIG_FORGE_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config-forge")));

        // Project dir: CONFIG_FORGE_PROJECT_DIR or $CWD/config-forge
        let project_dir = std::env::var("CONFIG_FORGE_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("config-forge")));

        Self {
            project_dir,
            user_dir,
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn tier_files(&self) -> Vec<(SettingsTier, PathBuf)> {
        [
            (SettingsTier::Project, self.project_dir.as_ref()),
            (SettingsTier::User, self.user_dir.as_ref()),
        ]
        .into_iter()
        .filter_map(|(tier, dir)| dir.map(|dir| (tier, dir.join(SETTINGS_FILE))))
        .collect()
    }
}

/// Loads [`Settings`] from all tiers.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    pub paths: SettingsPaths,
    settings: Settings,
    /// Tiers that contributed, lowest first.
    tiers: Vec<SettingsTier>,
    /// Settings files that contributed, lowest tier first.
    sources: Vec<PathBuf>,
}

impl SettingsLoader {
    /// Load settings from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(SettingsPaths::discover())
    }

    /// Load settings with explicit tier directories.
    pub fn load_with_paths(paths: SettingsPaths) -> Result<Self> {
        Self::load_layers(paths, None, |key| std::env::var(key).ok())
    }

    /// Load settings with an explicit file replacing the project and user tiers.
    pub fn load_file(path: &Path) -> Result<Self> {
        Self::load_layers(SettingsPaths::with_dirs(None, None), Some(path), |key| {
            std::env::var(key).ok()
        })
    }

    fn load_layers(
        paths: SettingsPaths,
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut layers: Vec<Value> = vec![serde_json::to_value(Settings::default())?];
        let mut tiers = vec![SettingsTier::Defaults];
        let mut sources = Vec::new();

        if let Some(path) = explicit {
            layers.push(read_settings_file(path)?);
            tiers.push(SettingsTier::Project);
            sources.push(path.to_path_buf());
        } else {
            for (tier, file) in paths.tier_files() {
                if !file.exists() {
                    continue;
                }
                match read_settings_file(&file) {
                    Ok(layer) => {
                        debug!(%tier, path = %file.display(), "Loaded settings tier");
                        layers.push(layer);
                        tiers.push(tier);
                        sources.push(file);
                    }
                    Err(err) => warn!(%tier, "Ignoring settings file: {err:#}"),
                }
            }
        }

        let merged = deep_merge_all(layers);
        let mut settings: Settings =
            serde_json::from_value(merged).context("settings have an unexpected shape")?;
        if Self::apply_env_overrides(&mut settings, env) > 0 {
            tiers.push(SettingsTier::Environment);
        }
        debug!(tiers = ?tiers, "Settings loaded");

        Ok(Self {
            paths,
            settings,
            tiers,
            sources,
        })
    }

    /// Apply environment variable overrides to settings; returns how many applied.
    fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) -> usize {
        let paths = &mut settings.paths;
        let overrides = [
            ("CONFIG_FORGE_ARGUMENT_DIR", &mut paths.argument_dir),
            ("CONFIG_FORGE_CONFIG_DIR", &mut paths.config_dir),
            ("CONFIG_FORGE_I18N_DIR", &mut paths.i18n_dir),
            ("CONFIG_FORGE_EVENT_FILE", &mut paths.event_file),
        ];

        let mut applied = 0;
        for (key, field) in overrides {
            if let Some(value) = env(key) {
                *field = PathBuf::from(value);
                applied += 1;
            }
        }
        applied
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Highest tier that contributed.
    pub fn effective_tier(&self) -> SettingsTier {
        self.tiers.iter().copied().max().unwrap_or(SettingsTier::Defaults)
    }

    pub fn tiers(&self) -> &[SettingsTier] {
        &self.tiers
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_settings_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("invalid YAML in {}", path.display()))?;
    // An empty file parses as null, which merges as "not specified"
    Ok(value)
}
