use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use skein_bind::config::{BindingConfig, CONFIG_FILE_NAME};

use crate::commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "skein",
    about = "Skein: inspect contract schemas and cache keys",
    version
)]
pub struct Cli {
    /// Path to the binding config file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the method table derived from a schema file
    Schema {
        /// A `{constants, methods}` document or a two-line schema log dump
        file: PathBuf,
        /// Also bind the constants section
        #[arg(long)]
        include_constants: bool,
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the cache key of a JSON array of arguments
    Hash {
        /// Arguments, e.g. '[100, "bob"]'
        args: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default binding configuration
    Init {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: String,
    },
}

/// Load the config at `path`, or the defaults if no such file exists.
pub fn load_config(path: &str) -> Result<BindingConfig, CliError> {
    if !Path::new(path).exists() {
        return Ok(BindingConfig::default());
    }
    BindingConfig::load(path).map_err(|e| CliError::Config(e.to_string()))
}

pub fn run(cli: Cli, config: &BindingConfig) -> Result<(), CliError> {
    match cli.command {
        Command::Schema {
            file,
            include_constants,
            json,
        } => commands::schema::run(&file, include_constants, json, config),
        Command::Hash { args, json } => commands::hash::run(&args, json),
        Command::Init { dir } => commands::init::run(&dir),
    }
}
