use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pup::ui::errors::CommandError;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    init_logging(args.iter().any(|a| a == "--debug"));

    match pup::cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

/// Log to stderr. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default = if debug { "warn,pup=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: anyhow::Error) -> ExitCode {
    if let Some(usage) = err.downcast_ref::<clap::Error>() {
        usage.exit();
    }
    match err.downcast_ref::<CommandError>() {
        // Agents parse this from stdout
        Some(CommandError::Structured(json)) => println!("{}", json),
        _ => eprintln!("Error: {:#}", err),
    }
    ExitCode::FAILURE
}
