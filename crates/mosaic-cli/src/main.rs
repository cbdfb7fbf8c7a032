//! `mosaic` binary: lays out a gallery collection file and writes the
//! resulting 2- and 4-column layouts.

use std::process;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use mosaic::MosaicError;
use mosaic_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match mosaic_cli::run(&args) {
        Ok(()) => info!(output = args.output.as_str(); "Gallery layout written"),
        Err(err) => {
            report(&err);
            process::exit(1);
        }
    }
}

fn init_logging(requested: &str) {
    let level = requested.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("mosaic: unknown log level '{requested}', falling back to warn");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
}

/// Renders every diagnostic carried by `err` through miette.
fn report(err: &MosaicError) {
    let handler = miette::GraphicalReportHandler::new();

    for diagnostic in to_reportables(err) {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, &diagnostic) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!("{err}"),
        }
    }
}
