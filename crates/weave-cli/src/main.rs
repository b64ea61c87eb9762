//! weave CLI: expand nested template references and variables in text files.
//!
//! Provides two commands: `render` expands a document and binds variables,
//! `check` reports template references that cannot be resolved.
//!
//! All semantics live in [`weave_core`]; this crate only parses arguments,
//! sets up logging, and prints.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "weave",
    about = "Replace template references with actual content",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to weave.config.json (default: ./weave.config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand templates and variables in a file
    Render(RenderArgs),

    /// Report template references that cannot be resolved
    Check {
        /// Files to check
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory containing template files (default: each input's directory)
        #[arg(long, short = 't')]
        template_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RenderArgs {
    /// Template file to process
    pub input: PathBuf,

    /// Directory containing template files (default: the input's directory)
    #[arg(long, short = 't')]
    pub template_dir: Option<PathBuf>,

    /// Variables in key=value format; values are parsed as JSON when possible
    #[arg(long = "vars", num_args = 1..)]
    pub vars: Vec<String>,

    /// JSON or YAML file containing variables
    #[arg(long)]
    pub vars_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum template nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Show interpolation statistics
    #[arg(long)]
    pub stats: bool,

    /// Print the full result as JSON instead of the expanded text
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render(args) => {
            commands::render::run(cli.config.as_deref(), &args)?;
        }
        Commands::Check {
            inputs,
            template_dir,
        } => {
            commands::check::run(cli.config.as_deref(), &inputs, template_dir.as_deref())?;
        }
    }

    Ok(())
}
