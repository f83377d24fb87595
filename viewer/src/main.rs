use clap::Parser;
use glt_viewer::{cli::init_logging, run, Args};
use std::process::exit;
use tracing::error;

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(error) = run(&args) {
        error!(error = ?error, "{error}");

        exit(1)
    }
}
