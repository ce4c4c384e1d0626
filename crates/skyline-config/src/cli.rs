//! Command-line arguments for the landscape probe.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Landscape probe command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "skyline-probe", about = "Load a landscape and report its horizon")]
pub struct CliArgs {
    /// Landscape directory containing `landscape.ron`.
    pub landscape: PathBuf,

    /// Azimuth step of the printed horizon profile, in degrees.
    #[arg(long, default_value_t = 10.0)]
    pub azimuth_step: f64,

    /// Also render one frame offscreen to check the landscape on the GPU.
    #[arg(long)]
    pub gpu_check: bool,

    /// Directory searched for textures the landscape does not ship.
    #[arg(long)]
    pub shared_textures: Option<PathBuf>,

    /// Enable the brightness floor at this value.
    #[arg(long)]
    pub minimal_brightness: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref dir) = args.shared_textures {
            self.landscape.shared_texture_dir = Some(dir.clone());
        }
        if let Some(floor) = args.minimal_brightness {
            self.landscape.use_minimal_brightness = true;
            self.landscape.minimal_brightness = floor;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
