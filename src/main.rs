use anyhow::Result;
use clap::Parser;

use omegazone::cli::{Cli, Commands};
use omegazone::commands::{inspect, run};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Run(args) => run::run(&cli, args),
        Commands::Inspect(args) => inspect::run(&cli, args),
    }
}
