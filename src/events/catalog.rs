//! The event calendar.
//!
//! The calendar is a markdown table, one event per row, oldest first:
//!
//! ```text
//! | Date     | Directory          | Name | cn   | en     | jp   | tw   |
//! | 20211125 | event_20211125_cn  | ...  | 定向折叠 | Parallel Superimposition | 定向折叠 | - |
//! ```
//!
//! `-` marks an event that never ran on that server.

use super::{EventRecord, Server};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// Which end of the calendar consumers see first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrder {
    /// Most recent event first, so "first wins" means "latest wins".
    #[default]
    NewestFirst,
    /// Storage order.
    OldestFirst,
}

/// Ordered event records, stored oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCatalog {
    records: Vec<EventRecord>,
}

impl EventCatalog {
    /// Build a catalog from records already in oldest-first order.
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    /// Parse every dated row of a calendar table. Malformed rows are skipped.
    pub fn parse(text: &str) -> Self {
        let records = text
            .lines()
            .filter(|line| DATE_PATTERN.is_match(line))
            .filter_map(|line| {
                let record = parse_row(line);
                if record.is_none() {
                    warn!(row = %line.trim(), "Skipping malformed event row");
                }
                record
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the requested order.
    pub fn iter(&self, order: EventOrder) -> Box<dyn Iterator<Item = &EventRecord> + '_> {
        match order {
            EventOrder::OldestFirst => Box::new(self.records.iter()),
            EventOrder::NewestFirst => Box::new(self.records.iter().rev()),
        }
    }
}

/// Event rows are the ones carrying a `YYYYMMDD` date.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{8}").expect("date pattern is valid"));

fn parse_row(line: &str) -> Option<EventRecord> {
    let cells: Vec<&str> = line
        .trim()
        .trim_matches(|c: char| c == '|' || c.is_whitespace())
        .split('|')
        .map(str::trim)
        .collect();
    let [_date, directory, _name, cn, en, jp, tw] = cells.as_slice() else {
        return None;
    };

    let mut record = EventRecord::new(directory.replace(' ', "_"));
    for (server, raw) in [(Server::Cn, cn), (Server::En, en), (Server::Jp, jp), (Server::Tw, tw)] {
        if *raw == "-" {
            continue;
        }
        let mut name = clean_name(server, raw);
        if record.is_war_archive {
            name = format!("{}{}", server.archives_prefix(), name);
        }
        record = record.with_name(server, name);
    }
    Some(record)
}

/// Strip separators the translation files cannot hold.
fn clean_name(server: Server, raw: &str) -> String {
    match server {
        Server::En => raw.replace([',', '\'', '\\'], ""),
        Server::Cn | Server::Jp | Server::Tw => raw.replace('、', ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = "\
# Events

| Date     | Directory                | Name  | cn       | en                       | jp       | tw   |
|----------|--------------------------|-------|----------|--------------------------|----------|------|
| 20200326 | war archives 20200326 cn | x     | 微层混合 | Microlayer Medley        | 微層混合 | -    |
| 20211125 | event_20211125_cn        | x     | 定向折叠 | Parallel, Superimposition | 定向折叠 | -    |
| 20220127 | raid_20220127            | x     | 复兴的赞美诗 | Revelations of Dust  | -        | -    |
";

    #[test]
    fn test_parse_rows_oldest_first() {
        let catalog = EventCatalog::parse(CALENDAR);
        let directories: Vec<&str> = catalog
            .iter(EventOrder::OldestFirst)
            .map(|e| e.directory.as_str())
            .collect();
        assert_eq!(
            directories,
            vec!["war_archives_20200326_cn", "event_20211125_cn", "raid_20220127"]
        );
    }

    #[test]
    fn test_newest_first_reverses() {
        let catalog = EventCatalog::parse(CALENDAR);
        let first = catalog.iter(EventOrder::NewestFirst).next().unwrap();
        assert_eq!(first.directory, "raid_20220127");
        assert!(first.is_raid);
    }

    #[test]
    fn test_names_are_cleaned_and_prefixed() {
        let catalog = EventCatalog::parse(CALENDAR);
        let records: Vec<&EventRecord> = catalog.iter(EventOrder::OldestFirst).collect();

        let archive = records[0];
        assert!(archive.is_war_archive);
        assert_eq!(archive.name(Server::En), Some("archives Microlayer Medley"));
        assert_eq!(archive.name(Server::Cn), Some("档案 微层混合"));
        assert_eq!(archive.name(Server::Tw), None);

        assert_eq!(records[1].name(Server::En), Some("Parallel Superimposition"));
        assert_eq!(records[2].name(Server::Jp), None);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let catalog = EventCatalog::parse("| 20220127 | raid_20220127 | too | few |\n");
        assert!(catalog.is_empty());
    }
}
