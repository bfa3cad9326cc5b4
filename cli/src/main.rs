mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{add, import, lifecycle, next_code, view};
use tracing_subscriber::EnvFilter;

/// Installs the log subscriber; `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::NextCode(args) => next_code::run(&cli, args),
        Commands::AddVillages(args) => add::villages(&cli, args),
        Commands::AddUnit(args) => add::unit(&cli, args),
        Commands::Import(args) => import::run(&cli, args),
        Commands::Delete(args) => lifecycle::delete(&cli, args),
        Commands::Approve(args) => lifecycle::approve_staged(&cli, args),
        Commands::Reject(args) => lifecycle::reject_staged(&cli, args),
        Commands::List(args) => view::list(&cli, args),
        Commands::Export(args) => view::export(&cli, args),
        Commands::Duplicates(args) => view::duplicates(&cli, args),
        Commands::Validate(args) => view::check(args),
        Commands::Normalize => view::normalize(&cli),
    }
}

fn main() -> anyhow::Result<()> { run() }
