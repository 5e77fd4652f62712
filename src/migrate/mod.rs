//! Migrating user configs onto a compiled schema.
//!
//! ```text
//!       CompiledSchema ---+
//! (old) <profile>.json ---+-----> <profile>.json
//! ```
//!
//! Every leaf of the schema is filled from the prior config when the prior
//! value is usable, from the schema default otherwise. Settings renamed
//! between versions are carried over by [`RedirectionRule`]s.

mod coerce;
mod redirect;

pub use coerce::{DATETIME_FORMAT, coerce};
pub use redirect::{
    RedirectOutcome, RedirectionRule, Transform, TransformError, apply_all, builtin_rules,
};

use crate::events::{CURRENT_EVENT_KEY, SENTINEL_EVENT, Server};
use crate::schema::{ArgType, CompiledSchema};
use crate::tree;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info};

/// Name of the all-defaults profile.
pub const TEMPLATE_PROFILE: &str = "template";

/// Where each installation's telemetry id lives.
pub const TELEMETRY_ID_PATH: [&str; 3] = ["Alas", "DropRecord", "AzurStatsID"];

/// Where a profile records which game server it plays on.
pub const SERVER_PATH: [&str; 3] = ["Alas", "Emulator", "Server"];

/// Server assumed when a profile names none.
pub const DEFAULT_SERVER: Server = Server::Cn;

/// Tasks whose event selection follows the latest event of the profile's server.
pub const EVENT_SELECTION_TASKS: [&str; 6] = ["Event", "EventAb", "EventCd", "EventSp", "Raid", "RaidDaily"];

/// Tasks that must never select the main campaign.
pub const NO_SENTINEL_TASKS: [&str; 1] = ["WarArchives"];

const EVENT_PATH: [&str; 2] = ["Campaign", "Event"];

/// Target of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Profile {
    /// The canonical all-defaults artifact.
    Template,
    /// A runnable user profile.
    Named(String),
}

impl Profile {
    pub fn from_name(name: &str) -> Self {
        if name == TEMPLATE_PROFILE {
            Profile::Template
        } else {
            Profile::Named(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Template => TEMPLATE_PROFILE,
            Profile::Named(name) => name,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Profile::Template)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Produces user configs from a compiled schema.
///
/// Borrows the schema immutably, so migrations of several profiles can share
/// one schema.
#[derive(Debug, Clone)]
pub struct ConfigMigrator<'a> {
    schema: &'a CompiledSchema,
    redirections: Vec<RedirectionRule>,
}

impl<'a> ConfigMigrator<'a> {
    /// A migrator with the built-in redirection table.
    pub fn new(schema: &'a CompiledSchema) -> Self {
        Self {
            schema,
            redirections: builtin_rules(),
        }
    }

    /// Replace the redirection table.
    pub fn with_redirections(mut self, redirections: Vec<RedirectionRule>) -> Self {
        self.redirections = redirections;
        self
    }

    pub fn redirections(&self) -> &[RedirectionRule] {
        &self.redirections
    }

    /// Build the config for `profile` from its prior content, if any.
    pub fn migrate(&self, profile: &Profile, prior: Option<&Value>) -> Value {
        let empty = Value::Object(Map::new());
        let old = prior.unwrap_or(&empty);
        let is_template = profile.is_template();

        let mut new = self.fill(old, is_template);
        assign_telemetry_id(&mut new, old, is_template);
        self.select_events(&mut new, is_template);

        if !is_template {
            let applied = apply_all(&self.redirections, self.schema, old, &mut new);
            if applied > 0 {
                info!(profile = %profile, applied, "Carried settings over from older schema");
            }
        }
        debug!(profile = %profile, "Migrated config");
        new
    }

    fn fill(&self, old: &Value, is_template: bool) -> Value {
        let mut new = Value::Object(Map::new());
        for (path, spec) in self.schema.leaves() {
            let prior = tree::get(old, path.segments());
            let value = match prior {
                Some(value) if !is_blank(value) && spec.kind != ArgType::Disable && !is_template => {
                    value.clone()
                }
                _ => spec.value.clone(),
            };
            let value = coerce(path.last().unwrap_or_default(), value, spec);
            tree::set(&mut new, path.segments(), value);
        }
        new
    }

    fn select_events(&self, new: &mut Value, is_template: bool) {
        let server = tree::get(new, &SERVER_PATH)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Server>().ok())
            .unwrap_or(DEFAULT_SERVER);

        for task in EVENT_SELECTION_TASKS {
            if self.schema.get(task, EVENT_PATH[0], EVENT_PATH[1]).is_none() {
                continue;
            }
            let selection = if is_template {
                Some(Value::String(SENTINEL_EVENT.to_string()))
            } else {
                self.latest_event(task, server)
            };
            if let Some(selection) = selection {
                tree::set(new, &[task, EVENT_PATH[0], EVENT_PATH[1]], selection);
            }
        }

        for task in NO_SENTINEL_TASKS {
            let path = [task, EVENT_PATH[0], EVENT_PATH[1]];
            let current = tree::get(new, &path).and_then(Value::as_str);
            if current.is_some_and(|event| event != SENTINEL_EVENT) {
                continue;
            }
            if let Some(latest) = self.latest_event(task, server) {
                tree::set(new, &path, latest);
            }
        }
    }

    /// The newest event `task` offers on `server`, as recorded by event binding.
    fn latest_event(&self, task: &str, server: Server) -> Option<Value> {
        self.schema
            .get(task, EVENT_PATH[0], EVENT_PATH[1])?
            .extra_at(&[CURRENT_EVENT_KEY, server.as_str()])
            .cloned()
    }
}

/// A fresh telemetry id: 32 lowercase hex digits.
pub fn random_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Keeps the prior id even when the schema no longer declares it.
fn assign_telemetry_id(new: &mut Value, old: &Value, is_template: bool) {
    if is_template {
        tree::set(new, &TELEMETRY_ID_PATH, Value::Null);
        return;
    }
    let id = tree::get(old, &TELEMETRY_ID_PATH)
        .filter(|id| !is_blank(id))
        .cloned()
        .unwrap_or_else(|| Value::String(random_id()));
    tree::set_if_absent(new, &TELEMETRY_ID_PATH, id);
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
