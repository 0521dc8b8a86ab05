use anyhow::Context;
use chrono::Local;
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader};
use std::rc::Rc;
use structopt::StructOpt;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use todomaster::cli::CommandLineArgs;
use todomaster::interface::{self, RenderOptions};
use todomaster::Store;

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Logs go to stderr, the view owns stdout.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose).to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs {
        script,
        width,
        verbose,
    } = CommandLineArgs::from_args();

    init_logging(verbose);

    let mut store = Store::new();
    store.subscribe(interface::console_view(
        Rc::new(RefCell::new(io::stdout())),
        RenderOptions { width },
    ));

    let today = || Local::now().date_naive();
    let mut out = io::stdout();

    // Run the session, from a script or from the terminal.
    match script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}.", path.display()))?;
            interface::run_session(&mut store, BufReader::new(file), &mut out, false, today)
        }
        None => {
            let stdin = io::stdin();
            interface::run_session(&mut store, stdin.lock(), &mut out, true, today)
        }
    }?;
    Ok(())
}
