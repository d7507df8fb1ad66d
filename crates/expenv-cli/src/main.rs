//! Expenv CLI - render and inspect exponential-decay envelopes.

mod commands;
mod host;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "expenv")]
#[command(author, version, about = "Exponential-decay envelope generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch to WAV or CSV
    Render(commands::render::RenderArgs),

    /// List factory patches or print one as TOML
    Patches(commands::patches::PatchesArgs),

    /// Print a decay curve table
    Table(commands::table::TableArgs),

    /// Show how millisecond durations quantize to control ticks
    Steps(commands::steps::StepsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Patches(args) => commands::patches::run(args),
        Commands::Table(args) => commands::table::run(args),
        Commands::Steps(args) => commands::steps::run(args),
    }
}
