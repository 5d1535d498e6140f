use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info_span};
use tracing_error::{ErrorLayer, SpanTrace};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod controller;

use controller::{CommandArgs, Controller};
use tabstat::domain::TableError;

fn main() -> ExitCode {
    let args = CommandArgs::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: &CommandArgs) -> Result<(), TableError> {
    let span = info_span!("tabstat");
    let _guard = span.enter();

    let stdout = io::stdout();
    let mut controller = Controller::new(stdout.lock());
    controller.run(&args.command).inspect_err(|e| {
        error!("{e}\n{}", SpanTrace::capture());
    })
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(ErrorLayer::default())
        .init();
}
