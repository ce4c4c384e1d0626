//! Configuration for skyline.
//!
//! Two kinds of settings live here: the viewer's own `config.ron` (fade
//! timing, brightness floor, logging) with CLI overrides via clap, and the
//! per-landscape `landscape.ron` descriptions together with the reader for
//! flat `section/key` maps that older landscape packages use.

mod cli;
mod config;
mod error;
mod landscape;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, LandscapeDefaults};
pub use error::ConfigError;
pub use landscape::{
    AtmosphereDefaults, LANDSCAPE_FILE, LandscapeConfig, LandscapeKind, LandscapeSection,
    Location, LocationSection, MAX_DECOR_REPEAT, MAX_SIDES, MAX_TESSELATION, PressureSetting,
    SideSpec,
};
