//! Schema source files.
//!
//! An argument directory holds:
//! - `task.yaml`: task grouping, `task -> [group]`, split into menu sections
//!   by `# ===== Section =====` banner comments
//! - `argument.yaml`: raw argument definitions, `group -> argument -> fragment`
//! - `override.yaml` (optional): `task -> group -> argument -> value`
//! - `gui.yaml` (optional): GUI labels, `group -> key -> text`

use crate::error::{Error, Result};
use crate::schema::{ArgumentDefinitions, TaskGrouping};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TASK_FILE: &str = "task.yaml";
pub const ARGUMENT_FILE: &str = "argument.yaml";
pub const OVERRIDE_FILE: &str = "override.yaml";
pub const GUI_FILE: &str = "gui.yaml";

/// Menu function every banner section belongs to.
pub const TASK_MENU: &str = "Task";

/// Menu tree, `function -> section -> [task]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    pub functions: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl Menu {
    /// Derive the menu from the raw text of a task grouping file.
    ///
    /// A banner line (one containing `=====`) opens a section; every
    /// top-level key after it (an unindented line ending in `:`) is a task of
    /// that section. Keys before the first banner belong to no section.
    pub fn parse(text: &str) -> Self {
        let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut section: Option<String> = None;

        for line in text.lines() {
            if line.contains("=====") {
                let name = line.trim_matches(|c: char| "#=- ".contains(c));
                section = Some(name.to_string());
                continue;
            }
            let Some(section) = &section else {
                continue;
            };
            if line.starts_with(char::is_whitespace) || !line.trim_end().ends_with(':') {
                continue;
            }
            let task = line.trim_end().trim_end_matches(':').trim();
            if !task.is_empty() && !task.starts_with('#') {
                sections.entry(section.clone()).or_default().push(task.to_string());
            }
        }

        let mut functions = IndexMap::new();
        if !sections.is_empty() {
            functions.insert(TASK_MENU.to_string(), sections);
        }
        Self { functions }
    }

    /// `(function, section, tasks)` in file order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.functions.iter().flat_map(|(function, sections)| {
            sections
                .iter()
                .map(move |(section, tasks)| (function.as_str(), section.as_str(), tasks.as_slice()))
        })
    }
}

/// Everything read from an argument directory.
#[derive(Debug, Clone, Default)]
pub struct SchemaSource {
    pub tasks: TaskGrouping,
    pub arguments: ArgumentDefinitions,
    pub overrides: Value,
    pub gui: Value,
    pub menu: Menu,
}

impl SchemaSource {
    /// Load all source files from `dir`. The task and argument files are
    /// required; missing override and GUI files read as empty.
    pub fn load(dir: &Path) -> Result<Self> {
        let task_path = dir.join(TASK_FILE);
        let task_text = read_text(&task_path)?;
        let tasks: TaskGrouping = if task_text.trim().is_empty() {
            TaskGrouping::new()
        } else {
            serde_yaml::from_str(&task_text).map_err(|source| Error::Yaml {
                path: task_path.clone(),
                source,
            })?
        };
        let menu = Menu::parse(&task_text);

        let raw_arguments = read_yaml(&dir.join(ARGUMENT_FILE))?;
        let arguments = ArgumentDefinitions::from_raw(&raw_arguments);

        let overrides = read_optional_yaml(&dir.join(OVERRIDE_FILE))?;
        let gui = read_optional_yaml(&dir.join(GUI_FILE))?;

        debug!(dir = %dir.display(), tasks = tasks.len(), "Loaded schema sources");
        Ok(Self {
            tasks,
            arguments,
            overrides,
            gui,
            menu,
        })
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a YAML document into a JSON tree. An empty document is an empty mapping.
pub fn read_yaml(path: &Path) -> Result<Value> {
    let text = read_text(path)?;
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value: Value = serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(if value.is_null() { Value::Object(Map::new()) } else { value })
}

fn read_optional_yaml(path: &Path) -> Result<Value> {
    if path.exists() {
        read_yaml(path)
    } else {
        Ok(Value::Object(Map::new()))
    }
}
