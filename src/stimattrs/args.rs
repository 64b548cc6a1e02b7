use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stimattrs", version)]
#[command(about = "Compose Stimulus data attributes from component manifests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding stimattrs.json (defaults to the current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose a manifest's attributes and print them
    #[command(alias = "r")]
    Render {
        /// Path to the component manifest (JSON)
        manifest: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },

    /// Validate a manifest's declarations and evaluate it once
    Check {
        /// Path to the component manifest (JSON)
        manifest: PathBuf,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., attribute-prefix)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}
