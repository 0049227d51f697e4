use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use twinscan::cli::{AppContext, Cli, Commands};
use twinscan::core::rank::Outcome;

fn main() -> ExitCode {
    match run() {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(Outcome::BadInput.exit_code())
        }
    }
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    twinscan::infra::logging::init_tracing(cli.verbose, cli.log_json)?;

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Scan(args) => twinscan::scan_run(args, &ctx),
        Commands::Init(args) => twinscan::infra::config::init(args, &ctx).map(|()| Outcome::Success),
        Commands::Completions(args) => twinscan::completion::run(args, &ctx).map(|()| Outcome::Success),
    }
}
