//! Generate subcommand: compile the schema and write every artifact.

use super::PathArgs;
use crate::config::Settings;
use crate::events::EventOrder;
use crate::pipeline::Generator;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Translation directory (overrides settings)
    #[arg(long, value_name = "DIR")]
    pub i18n_dir: Option<PathBuf>,

    /// Generated constants module (overrides settings)
    #[arg(long, value_name = "FILE")]
    pub code_file: Option<PathBuf>,

    /// Bind events oldest first, making the oldest event each server's default
    #[arg(long)]
    pub oldest_first: bool,
}

impl GenerateArgs {
    pub fn apply(&self, settings: &mut Settings) {
        self.paths.apply(&mut settings.paths);
        if let Some(dir) = &self.i18n_dir {
            settings.paths.i18n_dir = dir.clone();
        }
        if let Some(file) = &self.code_file {
            settings.paths.code_file = file.clone();
        }
        if self.oldest_first {
            settings.generation.event_order = EventOrder::OldestFirst;
        }
    }
}

/// Run the generate command.
pub fn run_generate(mut settings: Settings, args: &GenerateArgs) -> Result<()> {
    args.apply(&mut settings);
    let build = Generator::new(&settings)
        .run()
        .context("generation failed")?;

    println!(
        "Compiled {} arguments across {} tasks, {} events",
        build.schema.len(),
        build.schema.task_names().count(),
        build.events.len()
    );
    if !build.issues.is_empty() {
        println!("{} schema issue(s) skipped:", build.issues.len());
        for issue in &build.issues {
            println!("  {issue}");
        }
    }
    Ok(())
}
