//! Timed in-game events and their binding into the compiled schema.

mod binder;
mod catalog;

pub use binder::{
    BASELINE_TASKS, CURRENT_EVENT_KEY, EventBinder, RAID_TASKS, STANDARD_EVENT_TASKS,
    WAR_ARCHIVE_TASKS, targets,
};
pub use catalog::{EventCatalog, EventOrder};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder selection meaning "no event", the main campaign.
pub const SENTINEL_EVENT: &str = "campaign_main";

/// Game server, which doubles as the locale of event display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    Cn,
    En,
    Jp,
    Tw,
}

impl Server {
    /// All servers, in event-table column order.
    pub const ALL: [Server; 4] = [Server::Cn, Server::En, Server::Jp, Server::Tw];

    pub fn as_str(&self) -> &'static str {
        match self {
            Server::Cn => "cn",
            Server::En => "en",
            Server::Jp => "jp",
            Server::Tw => "tw",
        }
    }

    /// Prefix prepended to war archive names on this server.
    pub fn archives_prefix(&self) -> &'static str {
        match self {
            Server::Cn => "档案 ",
            Server::En => "archives ",
            Server::Jp | Server::Tw => "檔案 ",
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Server {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cn" => Ok(Server::Cn),
            "en" => Ok(Server::En),
            "jp" => Ok(Server::Jp),
            "tw" => Ok(Server::Tw),
            other => Err(format!("unknown server: {other}")),
        }
    }
}

/// One timed event.
///
/// Two records are the same event when their `directory` matches, whatever
/// their names say.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tw: Option<String>,
    #[serde(default)]
    pub is_war_archive: bool,
    #[serde(default)]
    pub is_raid: bool,
}

impl EventRecord {
    /// A record whose kind is derived from the directory prefix.
    pub fn new(directory: impl Into<String>) -> Self {
        let directory = directory.into();
        Self {
            is_war_archive: directory.starts_with("war_archives"),
            is_raid: directory.starts_with("raid_"),
            directory,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, server: Server, name: impl Into<String>) -> Self {
        *self.slot_mut(server) = Some(name.into());
        self
    }

    /// Display name on `server`, if the event ran there.
    pub fn name(&self, server: Server) -> Option<&str> {
        let slot = match server {
            Server::Cn => &self.cn,
            Server::En => &self.en,
            Server::Jp => &self.jp,
            Server::Tw => &self.tw,
        };
        slot.as_deref().filter(|name| !name.is_empty())
    }

    fn slot_mut(&mut self, server: Server) -> &mut Option<String> {
        match server {
            Server::Cn => &mut self.cn,
            Server::En => &mut self.en,
            Server::Jp => &mut self.jp,
            Server::Tw => &mut self.tw,
        }
    }

    pub fn has_any_name(&self) -> bool {
        Server::ALL.iter().any(|server| self.name(*server).is_some())
    }
}

impl PartialEq for EventRecord {
    fn eq(&self, other: &Self) -> bool {
        self.directory == other.directory
    }
}

impl Eq for EventRecord {}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directory)
    }
}
