mod cli;
mod commands;
mod paths;
mod runner;
mod settings;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, ShareCommand};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let catalog = cli.catalog.clone();
    let catalog = catalog.as_deref();

    match cli.command {
        Command::Install(args) => commands::install::install(&args.name, catalog),
        Command::BulkInstall(args) => commands::install::bulk(&ctx, &args.names, catalog),
        Command::Uninstall(args) => commands::install::uninstall(&args.name, catalog),
        Command::Test(args) => commands::install::test(&args.name, catalog),
        Command::List => commands::list::run(catalog),
        Command::Status => commands::status::run(&ctx, catalog),
        Command::Share(share) => match share {
            ShareCommand::Connect { root } => commands::share::connect(root.as_deref(), catalog),
            ShareCommand::Disconnect { root } => {
                commands::share::disconnect(root.as_deref(), catalog)
            }
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rollout", &mut io::stdout());
            Ok(())
        }
    }
}
