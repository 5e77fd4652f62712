//! The full generation and update runs.
//!
//! ```text
//!                task.yaml -+----------------> menu.json
//!            argument.yaml -+-> args.json ---> generated.rs
//!            override.yaml -+       |
//!       campaign/Readme.md ---------+
//!                 gui.yaml --------\|
//!                                  ||
//! (old) i18n/<locale>.json --------\\========> i18n/<locale>.json
//! (old)   config/<profile>.json ----\========> config/<profile>.json
//! ```

use crate::codegen;
use crate::config::{PathsSettings, Settings};
use crate::error::{Error, Result, SchemaIssue};
use crate::events::{EventBinder, EventCatalog, EventOrder};
use crate::i18n::TranslationScaffolder;
use crate::migrate::{ConfigMigrator, Profile, TEMPLATE_PROFILE};
use crate::schema::{CompiledSchema, SchemaCompiler};
use crate::source::{self, SchemaSource};
use crate::store::{self, JsonDir, TranslationStore, UserConfigStore};
use serde_json::Value;
use tracing::info;

/// Sources plus the schema compiled and bound from them.
#[derive(Debug, Clone)]
pub struct Build {
    pub source: SchemaSource,
    pub events: EventCatalog,
    pub order: EventOrder,
    pub schema: CompiledSchema,
    pub issues: Vec<SchemaIssue>,
}

impl Build {
    /// Compile `source` and bind `events` into the result.
    pub fn new(source: SchemaSource, events: EventCatalog, order: EventOrder) -> Self {
        let compilation = SchemaCompiler::new(&source.tasks, &source.arguments)
            .with_overrides(&source.overrides)
            .compile();
        let mut schema = compilation.schema;
        EventBinder::new(order).bind(&mut schema, &events);
        Self {
            source,
            events,
            order,
            schema,
            issues: compilation.issues,
        }
    }

    /// Read sources and the event calendar from the configured paths.
    ///
    /// A missing calendar means no events.
    pub fn load(paths: &PathsSettings, order: EventOrder) -> Result<Self> {
        let sources = SchemaSource::load(&paths.argument_dir)?;
        let events = if paths.event_file.exists() {
            EventCatalog::parse(&source::read_text(&paths.event_file)?)
        } else {
            info!(path = %paths.event_file.display(), "No event calendar, skipping events");
            EventCatalog::default()
        };
        Ok(Self::new(sources, events, order))
    }

    /// Translation mapping for `locale`, keeping `saved` entries.
    pub fn translations(&self, locale: &str, saved: Option<&Value>) -> Value {
        TranslationScaffolder::new(&self.source.arguments)
            .with_menu(&self.source.menu)
            .with_gui(&self.source.gui)
            .with_events(&self.events, self.order)
            .scaffold(locale, saved)
    }

    pub fn code(&self) -> String {
        codegen::emit(&self.source.arguments)
    }

    pub fn schema_json(&self) -> Result<Value> {
        serde_json::to_value(&self.schema).map_err(|source| Error::Shape {
            what: "compiled schema".to_string(),
            source,
        })
    }

    pub fn menu_json(&self) -> Result<Value> {
        serde_json::to_value(&self.source.menu).map_err(|source| Error::Shape {
            what: "menu".to_string(),
            source,
        })
    }
}

/// Writes every generated artifact, then refreshes the template profile.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    settings: &'a Settings,
}

impl<'a> Generator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Load, compile and write everything to the configured directories.
    pub fn run(&self) -> Result<Build> {
        let paths = &self.settings.paths;
        let build = Build::load(paths, self.settings.generation.event_order)?;
        self.write(
            &build,
            &JsonDir::new(&paths.i18n_dir),
            &JsonDir::new(&paths.config_dir),
        )?;
        Ok(build)
    }

    /// Write the artifacts of `build` through the given stores.
    pub fn write<T, C>(&self, build: &Build, translations: &T, configs: &C) -> Result<()>
    where
        T: TranslationStore + ?Sized,
        C: UserConfigStore + ?Sized,
    {
        let paths = &self.settings.paths;
        store::write_json(&paths.args_file(), &build.schema_json()?)?;
        store::write_json(&paths.menu_file(), &build.menu_json()?)?;
        store::write_text(&paths.code_file, &build.code())?;

        for locale in &self.settings.generation.languages {
            let saved = translations.read(locale)?;
            translations.write(locale, &build.translations(locale, saved.as_ref()))?;
        }

        Updater::new(&build.schema, self.settings.generation.redirections)
            .update(configs, &Profile::Template)?;

        info!(
            arguments = build.schema.len(),
            events = build.events.len(),
            issues = build.issues.len(),
            "Generated artifacts"
        );
        Ok(())
    }
}

/// Migrates stored profiles onto a compiled schema.
#[derive(Debug, Clone)]
pub struct Updater<'a> {
    migrator: ConfigMigrator<'a>,
    dry_run: bool,
}

impl<'a> Updater<'a> {
    /// An updater that replays the built-in redirections if `redirections` is set.
    pub fn new(schema: &'a CompiledSchema, redirections: bool) -> Self {
        let migrator = ConfigMigrator::new(schema);
        let migrator = if redirections {
            migrator
        } else {
            migrator.with_redirections(Vec::new())
        };
        Self {
            migrator,
            dry_run: false,
        }
    }

    /// Compute updates without writing them back.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Migrate one profile and store the result.
    pub fn update<S: UserConfigStore + ?Sized>(&self, store: &S, profile: &Profile) -> Result<Value> {
        let prior = store.read(profile.name())?;
        let updated = self.migrator.migrate(profile, prior.as_ref());
        if self.dry_run {
            info!(profile = %profile, changed = prior.as_ref() != Some(&updated), "Dry run, not writing");
        } else {
            store.write(profile.name(), &updated)?;
        }
        Ok(updated)
    }

    /// Migrate every named profile in turn; stops at the first store failure.
    pub fn update_all<S: UserConfigStore + ?Sized>(
        &self,
        store: &S,
        names: &[String],
    ) -> Result<Vec<(Profile, Value)>> {
        names
            .iter()
            .map(|name| {
                let profile = Profile::from_name(name);
                self.update(store, &profile).map(|config| (profile, config))
            })
            .collect()
    }
}

/// Every profile stored in `dir`, the template last.
pub fn stored_profiles(dir: &JsonDir) -> Result<Vec<String>> {
    let mut names: Vec<String> = dir
        .names()?
        .into_iter()
        .filter(|name| name != TEMPLATE_PROFILE)
        .collect();
    names.push(TEMPLATE_PROFILE.to_string());
    Ok(names)
}
