//! snippet-vis CLI
//!
//! Draw the snippet keys of one or more major modes as a compressed
//! prefix tree and fail on `name` conflicts.
//!
//! Author: Moroya Sakamoto

use clap::Parser;
use tracing_subscriber::EnvFilter;

use snippet_vis::{run, VisConfig};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("snippet_vis={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let config = VisConfig::parse();
    init_tracing(config.verbose);

    match run(&config) {
        Ok(outcome) => {
            if let Some(image) = &outcome.image {
                tracing::info!(image = %image.display(), "done");
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
