//! Update subcommand: migrate user configs onto the current schema.

use super::PathArgs;
use crate::config::Settings;
use crate::pipeline::{Build, Updater, stored_profiles};
use crate::store::JsonDir;
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the update subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Profiles to update (default: every stored profile and the template)
    #[arg(value_name = "PROFILE")]
    pub profiles: Vec<String>,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Show what would be updated without writing any config.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not carry settings over from older schema locations
    #[arg(long)]
    pub no_redirect: bool,
}

/// Run the update command.
pub fn run_update(mut settings: Settings, args: &UpdateArgs) -> Result<()> {
    args.paths.apply(&mut settings.paths);
    if args.no_redirect {
        settings.generation.redirections = false;
    }

    let build = Build::load(&settings.paths, settings.generation.event_order)
        .context("failed to compile schema")?;
    let store = JsonDir::new(&settings.paths.config_dir);
    let names = if args.profiles.is_empty() {
        stored_profiles(&store)?
    } else {
        args.profiles.clone()
    };

    let updated = Updater::new(&build.schema, settings.generation.redirections)
        .dry_run(args.dry_run)
        .update_all(&store, &names)
        .context("failed to update configs")?;

    for (profile, _) in &updated {
        println!("  {}", store.path_of(profile.name()).display());
    }
    if args.dry_run {
        println!("Dry run: {} config(s) checked, no changes made.", updated.len());
    } else {
        println!("Updated {} config(s).", updated.len());
    }
    Ok(())
}
