//! The landscape probe: loads a landscape directory, reports its metadata
//! and horizon profile, and can render one offscreen frame as a GPU check.

pub mod error;
pub mod gpu_check;
pub mod ini;
pub mod probe;
pub mod resolver;

pub use error::ProbeError;
pub use gpu_check::{horizon_view_projection, render_offscreen};
pub use ini::{INI_FILE, parse_ini, read_ini};
pub use probe::{Report, load_description, open_landscape};
pub use resolver::{DirectoryTextureResolver, decode_texture};
