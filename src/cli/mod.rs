//! CLI command definitions for config-forge
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod generate;
pub mod update;

use clap::{Parser, Subcommand};
use generate::GenerateArgs;
use std::path::PathBuf;
use update::UpdateArgs;

/// Schema compiler and user-config migrator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (replaces the project and user settings tiers)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the schema and write args, menu, code, translations and the template
    Generate(GenerateArgs),

    /// Migrate user configs onto the current schema
    Update(UpdateArgs),
}

/// Path overrides shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Schema source directory (overrides settings)
    #[arg(long, value_name = "DIR")]
    pub argument_dir: Option<PathBuf>,

    /// User config directory (overrides settings)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Event calendar (overrides settings)
    #[arg(long, value_name = "FILE")]
    pub event_file: Option<PathBuf>,
}

impl PathArgs {
    pub fn apply(&self, paths: &mut crate::config::PathsSettings) {
        if let Some(dir) = &self.argument_dir {
            paths.argument_dir = dir.clone();
        }
        if let Some(dir) = &self.config_dir {
            paths.config_dir = dir.clone();
        }
        if let Some(file) = &self.event_file {
            paths.event_file = file.clone();
        }
    }
}
