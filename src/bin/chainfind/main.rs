//! chainfind CLI - discover installed C/C++ toolchains

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("chainfind=debug")
    } else {
        EnvFilter::new("chainfind=info")
    };

    // stdout carries JSON/YAML output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Discover(args) => commands::discover::execute(args),
        Commands::Env(args) => commands::env::execute(args),
        Commands::Triplet(args) => commands::triplet::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
