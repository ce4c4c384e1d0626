//! Horizon landscapes around an observer: measured horizon lines, panoramas
//! on cylinders, fisheye and equirectangular images, their fades and the
//! opacity of the ground toward any direction.

mod base;
mod brightness;
mod error;
mod fader;
mod fisheye;
mod horizon_list;
mod horizon_polygon;
mod landscape;
mod layers;
pub mod mesh;
mod old_style;
pub mod painter;
mod polygonal;
pub mod projection;
mod spherical;
mod texture;

pub use base::LandscapeBase;
pub use brightness::{Brightness, MinimalBrightnessPolicy};
pub use error::LandscapeError;
pub use fader::{FULLY_OFF, FULLY_ON, Fader};
pub use fisheye::{FisheyeLandscape, FisheyeParams};
pub use horizon_list::{HorizonListMode, decode_file, decode_reader, decode_str};
pub use horizon_polygon::{build_horizon_polygon, load_horizon_polygon};
pub use landscape::{
    Landscape, create_landscape, horizon_altitude, horizon_profile, load_landscape,
};
pub use mesh::{LandscapeVertex, Mesh, Topology};
pub use old_style::{OldStyleLandscape, SideGeometry};
pub use painter::{BlendMode, DrawCommand, DrawList, LandscapePainter, Layer};
pub use polygonal::PolygonalLandscape;
pub use spherical::{Extent, SphericalLandscape, SphericalParams};
pub use texture::{
    MemoryTextures, TextureHandle, TextureImage, TextureResolver, WeakTextureHandle,
};
