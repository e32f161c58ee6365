//! compart CLI - compartmentalize a C codebase with protection keys
//!
//! Usage: compart <COMMAND>
//!
//! Commands:
//!   run           Full pipeline into the secondary tree
//!   assign        Show the compartment table
//!   inject        Inject compartment preambles
//!   rewrite       Run the rewriter and merge its output
//!   patch         Apply source patches
//!   sync          Clone or update the secondary tree
//!   canonicalize  Normalize compile database paths

mod cli;
mod commands;
mod ui;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use compart::Interrupt;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let interrupt = Interrupt::new();
    let flag = interrupt.clone();
    if let Err(err) = ctrlc::set_handler(move || flag.trigger()) {
        tracing::warn!("cannot install Ctrl-C handler: {}", err);
    }

    let json = cli.json;
    let command = cli.command.name();
    if let Err(err) = commands::dispatch(cli, interrupt) {
        ui::error::print_error(&err, json, command);
        std::process::exit(ui::error::exit_code(&err));
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
