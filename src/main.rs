//! config-forge
//!
//! Compiles the task/argument schema and keeps user configs in step with it.

use anyhow::Result;
use clap::Parser;
use config_forge::cli::generate::run_generate;
use config_forge::cli::update::run_update;
use config_forge::cli::{Cli, Command};
use config_forge::config::SettingsLoader;
use config_forge::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let Ok(target) = cli.log.parse::<LogTarget>();
    logging::init(&target, cli.verbose)?;

    // Load settings with tier merging; an explicit file replaces the file tiers
    let loader = match &cli.settings {
        Some(path) => SettingsLoader::load_file(path)?,
        None => SettingsLoader::load()?,
    };
    for source in loader.sources() {
        debug!(path = %source.display(), "Using settings file");
    }
    debug!(tier = %loader.effective_tier(), "Effective settings tier");
    let settings = loader.into_settings();

    match cli.command {
        Command::Generate(args) => run_generate(settings, &args)?,
        Command::Update(args) => run_update(settings, &args)?,
    }

    Ok(())
}
