//! `skyline-probe`: load a landscape and print what the viewer would see.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p skyline-app -- path/to/landscape --gpu-check`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use skyline_app::{ProbeError, Report, open_landscape, render_offscreen};
use skyline_config::{CliArgs, Config};
use skyline_landscape::{Brightness, MinimalBrightnessPolicy};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from(".skyline"));
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Using default config: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    skyline_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> Result<(), ProbeError> {
    info!(landscape = %args.landscape.display(), "Probing landscape");
    let landscape = open_landscape(&args.landscape, config)?;

    let policy = MinimalBrightnessPolicy::from_config(&config.landscape);
    let report = Report::collect(landscape.as_ref(), &policy, args.azimuth_step);
    print!("{report}");

    if args.gpu_check {
        let brightness = policy.apply(
            Brightness::default(),
            landscape.base().minimal_brightness(),
        );
        match render_offscreen(landscape.as_ref(), brightness) {
            Ok(draws) => info!(draws, "GPU check rendered"),
            Err(ProbeError::Gpu(e)) => warn!("GPU check skipped: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
