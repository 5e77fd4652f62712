//! Translation scaffolding.
//!
//! ```text
//!            arguments ---+
//!       menu + gui + events ---+-----> i18n/<locale>.json
//! (old) i18n/<locale>.json ---+
//! ```
//!
//! Every translatable key gets an entry. Saved translations are kept as they
//! are; new keys default to their dotted path, or to the option literal for
//! option labels.

use crate::events::{EventCatalog, EventOrder, Server};
use crate::schema::ArgumentDefinitions;
use crate::source::Menu;
use crate::tree;
use serde_json::{Map, Value};
use tracing::debug;

/// Supported locales and the game server each one is at home on.
pub const LANGUAGES: [(&str, Server); 4] = [
    ("zh-CN", Server::Cn),
    ("en-US", Server::En),
    ("ja-JP", Server::Jp),
    ("zh-TW", Server::Tw),
];

/// Fallback order for event names after the home server.
pub const EVENT_NAME_FALLBACK: [Server; 4] = [Server::En, Server::Cn, Server::Jp, Server::Tw];

const LABEL_WORDS: [&str; 2] = ["name", "help"];

/// The server whose event names a locale prefers.
pub fn home_server(locale: &str) -> Option<Server> {
    LANGUAGES
        .iter()
        .find(|(name, _)| *name == locale)
        .map(|(_, server)| *server)
}

/// Builds translation mappings for one locale at a time.
#[derive(Debug, Clone, Copy)]
pub struct TranslationScaffolder<'a> {
    arguments: &'a ArgumentDefinitions,
    menu: Option<&'a Menu>,
    gui: Option<&'a Value>,
    events: Option<&'a EventCatalog>,
    order: EventOrder,
}

impl<'a> TranslationScaffolder<'a> {
    pub fn new(arguments: &'a ArgumentDefinitions) -> Self {
        Self {
            arguments,
            menu: None,
            gui: None,
            events: None,
            order: EventOrder::default(),
        }
    }

    pub fn with_menu(mut self, menu: &'a Menu) -> Self {
        self.menu = Some(menu);
        self
    }

    /// GUI labels, `group -> key -> text`.
    pub fn with_gui(mut self, gui: &'a Value) -> Self {
        self.gui = Some(gui);
        self
    }

    pub fn with_events(mut self, events: &'a EventCatalog, order: EventOrder) -> Self {
        self.events = Some(events);
        self.order = order;
        self
    }

    /// Build the mapping for `locale`, reusing `saved` translations.
    pub fn scaffold(&self, locale: &str, saved: Option<&Value>) -> Value {
        let empty = Value::Object(Map::new());
        let mut scaffold = Scaffold {
            saved: saved.unwrap_or(&empty),
            new: Value::Object(Map::new()),
        };

        if let Some(menu) = self.menu {
            for (function, section, tasks) in menu.sections() {
                scaffold.labels(&["Menu", function]);
                scaffold.labels(&["Menu", section]);
                for task in tasks {
                    scaffold.labels(&[function, task.as_str()]);
                }
            }
        }

        let mut last_group: Option<String> = None;
        for (path, spec) in self.arguments.leaves() {
            let segments = path.segments();
            if let [group, _] = segments
                && last_group.as_ref() != Some(group)
            {
                scaffold.labels(&[group.as_str(), "_info"]);
                last_group = Some(group.clone());
            }
            scaffold.labels(segments);
            for option in spec.option.iter().flatten() {
                let literal = option_literal(option);
                scaffold.entry(segments, &literal, Value::String(literal.clone()));
            }
        }

        if let Some(events) = self.events {
            for (directory, name) in self.event_names(events, locale) {
                scaffold.entry(&["Campaign", "Event"], &directory, Value::String(name));
            }
        }

        if let Some(gui) = self.gui {
            for (path, _) in tree::iter(gui, 2) {
                if let [group, key] = path.segments() {
                    scaffold.entry(&["Gui", group.as_str()], key, Value::String(format!("Gui.{group}.{key}")));
                }
            }
        }

        debug!(locale, "Scaffolded translations");
        scaffold.new
    }

    /// `(directory, display name)` for every event, in catalog order.
    fn event_names(&self, events: &EventCatalog, locale: &str) -> Vec<(String, String)> {
        let preference: Vec<Server> = home_server(locale)
            .into_iter()
            .chain(EVENT_NAME_FALLBACK)
            .collect();
        events
            .iter(self.order)
            .map(|event| {
                let name = preference
                    .iter()
                    .find_map(|server| event.name(*server))
                    .unwrap_or(&event.directory);
                (event.directory.clone(), name.to_string())
            })
            .collect()
    }
}

struct Scaffold<'s> {
    saved: &'s Value,
    new: Value,
}

impl Scaffold<'_> {
    /// `name` and `help` under `keys`, defaulting to their dotted path.
    fn labels<S: AsRef<str>>(&mut self, keys: &[S]) {
        for word in LABEL_WORDS {
            let dotted = keys
                .iter()
                .map(|key| key.as_ref())
                .chain([word])
                .collect::<Vec<_>>()
                .join(".");
            self.entry(keys, word, Value::String(dotted));
        }
    }

    fn entry<S: AsRef<str>>(&mut self, keys: &[S], word: &str, default: Value) {
        let mut path: Vec<&str> = keys.iter().map(|key| key.as_ref()).collect();
        path.push(word);
        let value = tree::get(self.saved, &path).cloned().unwrap_or(default);
        tree::set(&mut self.new, &path, value);
    }
}

fn option_literal(option: &Value) -> String {
    match option {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
