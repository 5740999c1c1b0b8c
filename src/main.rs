//! assetpipe - filter, bundle and serve front-end assets.

mod asset;
mod cache;
mod cli;
mod config;
mod core;
mod filter;
mod logger;
mod pipeline;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, dump::DumpOptions};
use config::PipelineConfig;
use pipeline::Pipeline;
use std::{io, sync::Arc};
use utils::mime::MimeTable;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = PipelineConfig::load(&cli)?;
    let mut pipeline = Pipeline::new(&config, Arc::new(MimeTable::new()))?;

    match &cli.command {
        Commands::Dump { no_debug } => {
            let options = DumpOptions {
                no_debug: *no_debug,
                verbose: cli.verbose,
                lock_path: None,
            };
            cli::dump::dump(&mut pipeline, &options, &mut io::stdout().lock())
        }
        Commands::Serve { no_debug, .. } => {
            if *no_debug {
                pipeline.set_debug(false);
            }
            cli::serve::serve(pipeline, &config)
        }
        Commands::List => cli::list::list(&mut pipeline, &mut io::stdout().lock()),
    }
}
