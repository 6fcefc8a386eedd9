mod bindings;
mod bootstrap;
mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let resolved = bootstrap::resolve_effect(&cli.effect)?;
    match cli.command {
        Command::Sample(args) => run::run_sample(&resolved, args),
        Command::Wave(args) => run::run_wave(&resolved, args),
        Command::Preview(args) => run::run_preview(&resolved, args),
        Command::Stats(args) => run::run_stats(&resolved, args),
        Command::Config => run::run_config(&resolved),
    }
}
