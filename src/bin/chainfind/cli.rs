//! CLI definitions using clap.

use std::path::PathBuf;

use chainfind::cc::BuildConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// chainfind - discover installed C/C++ toolchains
#[derive(Parser)]
#[command(name = "chainfind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover compiler toolchains (or installations)
    Discover(DiscoverArgs),

    /// Describe the compiler named by CC/CXX
    Env(EnvArgs),

    /// Parse and normalize a target triplet
    Triplet(TripletArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Summary,
    Json,
    Yaml,
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// Show compiler installations instead of toolchains
    #[arg(short, long)]
    pub installations: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Comma separated toolchain types
    #[arg(
        short = 't',
        long = "type",
        value_delimiter = ',',
        value_parser = ["msvc", "gcc", "gnu", "clang", "llvm"]
    )]
    pub types: Vec<String>,

    /// Do not return cross compiling toolchains
    #[arg(short, long)]
    pub native: bool,

    /// Only toolchains matching this target triplet
    #[arg(long, value_name = "TRIPLET", conflicts_with = "native")]
    pub target: Option<String>,

    /// Print only the preferred toolchain
    #[arg(long, conflicts_with = "installations")]
    pub best: bool,

    /// Keep GCC installations that have no C++ compiler
    #[arg(long)]
    pub c_only: bool,

    /// Additional directory to scan (repeatable)
    #[arg(long = "path", value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Scan only the --path directories
    #[arg(long, requires = "paths")]
    pub isolated: bool,

    /// Write output to the specified file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct EnvArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,

    /// Also show default flags for a build configuration
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<BuildConfig>,

    /// Write output to the specified file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct TripletArgs {
    /// Triplet to parse, e.g. x86_64-w64-mingw32
    pub triplet: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    pub format: Format,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
