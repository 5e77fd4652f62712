//! Persistence of user configs and translations.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-profile user configs. `template` is the all-defaults profile.
pub trait UserConfigStore {
    /// The stored config, or `None` if the profile has never been written.
    fn read(&self, profile: &str) -> Result<Option<Value>>;
    fn write(&self, profile: &str, config: &Value) -> Result<()>;
}

/// Per-locale translation mappings.
pub trait TranslationStore {
    fn read(&self, locale: &str) -> Result<Option<Value>>;
    fn write(&self, locale: &str, translations: &Value) -> Result<()>;
}

/// One pretty-printed `<name>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonDir {
    dir: PathBuf,
}

impl JsonDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Names of every JSON file in the directory, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|source| Error::Read {
            path: self.dir.clone(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Option<Value>> {
        let path = self.path_of(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Read { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| Error::Json { path, source })
    }

    pub fn save(&self, name: &str, value: &Value) -> Result<()> {
        write_json(&self.path_of(name), value)
    }
}

impl UserConfigStore for JsonDir {
    fn read(&self, profile: &str) -> Result<Option<Value>> {
        self.load(profile)
    }

    fn write(&self, profile: &str, config: &Value) -> Result<()> {
        self.save(profile, config)
    }
}

impl TranslationStore for JsonDir {
    fn read(&self, locale: &str) -> Result<Option<Value>> {
        self.load(locale)
    }

    fn write(&self, locale: &str, translations: &Value) -> Result<()> {
        self.save(locale, translations)
    }
}

/// Write `value` as indented JSON, creating parent directories.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    write_text(path, &text)
}

/// Write `text`, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let io_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, text).map_err(io_err)?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}

/// In-memory store, for running generation or updates without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<IndexMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, name: &str, value: Value) -> Self {
        self.entries.borrow_mut().insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl UserConfigStore for MemoryStore {
    fn read(&self, profile: &str) -> Result<Option<Value>> {
        Ok(self.get(profile))
    }

    fn write(&self, profile: &str, config: &Value) -> Result<()> {
        self.entries.borrow_mut().insert(profile.to_string(), config.clone());
        Ok(())
    }
}

impl TranslationStore for MemoryStore {
    fn read(&self, locale: &str) -> Result<Option<Value>> {
        Ok(self.get(locale))
    }

    fn write(&self, locale: &str, translations: &Value) -> Result<()> {
        self.entries.borrow_mut().insert(locale.to_string(), translations.clone());
        Ok(())
    }
}
