//! Folds the event calendar into the compiled schema.
//!
//! ```text
//! event calendar -----+
//!                     v
//!   CompiledSchema ---+-----> CompiledSchema (event options + names)
//! ```

use super::catalog::{EventCatalog, EventOrder};
use super::{EventRecord, SENTINEL_EVENT, Server};
use crate::schema::{ArgumentSpec, CompiledSchema};
use serde_json::Value;
use tracing::debug;

/// Tasks offered raid events.
pub const RAID_TASKS: [&str; 2] = ["Raid", "RaidDaily"];
/// Tasks offered war archive events.
pub const WAR_ARCHIVE_TASKS: [&str; 1] = ["WarArchives"];
/// Tasks offered every other event.
pub const STANDARD_EVENT_TASKS: [&str; 5] = ["Event", "EventAb", "EventCd", "EventSp", "GemsFarming"];
/// Tasks whose option list drops the main-campaign placeholder once bound.
pub const BASELINE_TASKS: [&str; 7] = [
    "Event",
    "EventAb",
    "EventCd",
    "EventSp",
    "Raid",
    "RaidDaily",
    "WarArchives",
];

/// Key under `Campaign.Event` holding each server's default event directory.
pub const CURRENT_EVENT_KEY: &str = "current";

/// Attaches events to every task carrying a `Campaign.Event` argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBinder {
    order: EventOrder,
}

impl EventBinder {
    pub fn new(order: EventOrder) -> Self {
        Self { order }
    }

    /// Bind the whole catalog, then drop the placeholder from event tasks.
    pub fn bind(&self, schema: &mut CompiledSchema, catalog: &EventCatalog) {
        for record in catalog.iter(self.order) {
            Self::bind_record(schema, record);
        }
        Self::remove_baseline(schema);
        debug!(events = catalog.len(), order = ?self.order, "Bound events");
    }

    /// Bind a single record.
    ///
    /// For every server the record has a name on, each target task gets the
    /// directory appended to its options and, unless already recorded, the
    /// server's display name and default event.
    pub fn bind_record(schema: &mut CompiledSchema, record: &EventRecord) {
        for server in Server::ALL {
            let Some(name) = record.name(server) else {
                continue;
            };
            for task in targets(record) {
                let Some(spec) = event_spec(schema, task) else {
                    continue;
                };
                add_option(spec, &record.directory);
                spec.default_extra(&[server.as_str()], Value::String(name.to_string()));
                spec.default_extra(
                    &[CURRENT_EVENT_KEY, server.as_str()],
                    Value::String(record.directory.clone()),
                );
            }
        }
    }

    fn remove_baseline(schema: &mut CompiledSchema) {
        for task in BASELINE_TASKS {
            if let Some(options) = event_spec(schema, task).and_then(|spec| spec.option.as_mut()) {
                options.retain(|option| option.as_str() != Some(SENTINEL_EVENT));
            }
        }
    }
}

/// Tasks a record belongs to.
pub fn targets(record: &EventRecord) -> &'static [&'static str] {
    if record.is_raid {
        &RAID_TASKS
    } else if record.is_war_archive {
        &WAR_ARCHIVE_TASKS
    } else {
        &STANDARD_EVENT_TASKS
    }
}

fn event_spec<'a>(schema: &'a mut CompiledSchema, task: &str) -> Option<&'a mut ArgumentSpec> {
    schema.get_mut(task, "Campaign", "Event")
}

fn add_option(spec: &mut ArgumentSpec, directory: &str) {
    let options = spec.option.get_or_insert_with(Vec::new);
    if !options.iter().any(|option| option.as_str() == Some(directory)) {
        options.push(Value::String(directory.to_string()));
    }
}
