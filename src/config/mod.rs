//! Tool settings.
//!
//! Consolidates settings from four tiers with field-by-field YAML merging:
//! 1. **Defaults** - embedded
//! 2. **Project** - `$CWD/config-forge/settings.yaml`
//! 3. **User** - `~/.config-forge/settings.yaml`
//! 4. **Environment** - the variables below
//!
//! Command-line flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `CONFIG_FORGE_ARGUMENT_DIR` - Schema source directory
//! - `CONFIG_FORGE_CONFIG_DIR` - User config directory
//! - `CONFIG_FORGE_I18N_DIR` - Translation directory
//! - `CONFIG_FORGE_EVENT_FILE` - Event calendar
//! - `CONFIG_FORGE_USER_DIR` - User settings dir (default: `~/.config-forge`)
//! - `CONFIG_FORGE_PROJECT_DIR` - Project settings dir (default: `./config-forge`)

mod loader;
mod types;

pub use loader::{SETTINGS_FILE, SettingsLoader, SettingsPaths, SettingsTier};
pub use types::{GenerationSettings, PathsSettings, Settings};
