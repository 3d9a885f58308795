use ndbin::settings::{WalkError, WalkSettings};
use ndbin::walk;
use ndutil::argparse::ArgError;
use ndutil::resources;
use std::io;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &WalkSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let settings = match WalkSettings::from_args(std::env::args_os()) {
        Ok(settings) => settings,
        // --help, --version and usage errors print themselves.
        Err(WalkError::Args(ArgError::Parse(err))) => err.exit(),
        Err(err) => {
            eprintln!("ndwalk: {}", err);
            process::exit(2);
        }
    };
    init_tracing(&settings);

    if let Some(bytes) = settings.limit_mem {
        if !resources::limit(bytes) {
            warn!(bytes, "continuing without a memory cap");
        }
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match walk::run(&settings, &mut out) {
        Ok(visited) => info!(
            visited,
            peak = resources::peak(),
            current = resources::current(),
            "walk finished"
        ),
        Err(err) => {
            eprintln!("ndwalk: {}", err);
            process::exit(1);
        }
    }
}
