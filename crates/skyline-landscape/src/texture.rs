//! Decoded landscape images and the handles landscapes hold on to them.
//!
//! A [`TextureHandle`] may be created before its pixels exist; a loader
//! fulfils it once, from any thread. Landscapes only ever read: drawing
//! skips a layer whose handle is still pending, and opacity sampling falls
//! back to the default.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use crate::error::LandscapeError;

/// RGBA8 image, rows top to bottom.
#[derive(Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl TextureImage {
    /// Wrap raw RGBA8 pixels. Returns `None` for zero dimensions or a byte
    /// count that does not match them.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Image with every texel computed by `texel(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut texel: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height.max(1) {
            for x in 0..width.max(1) {
                rgba.extend_from_slice(&texel(x, y));
            }
        }
        Self {
            width: width.max(1),
            height: height.max(1),
            rgba,
        }
    }

    /// Single-colored image.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixels, four bytes per texel.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Texel at integer coordinates, clamped to the image.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    /// Alpha in `[0, 1]` of the texel covering `(u, v)`; `v` grows
    /// downward. Coordinates outside the unit square clamp to the border.
    pub fn alpha_at(&self, u: f64, v: f64) -> f32 {
        let x = (u * self.width as f64).floor() as i64;
        let y = (v * self.height as f64).floor() as i64;
        self.texel(x, y)[3] as f32 / 255.0
    }
}

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

struct TextureSlot {
    id: u64,
    name: String,
    image: OnceLock<TextureImage>,
}

/// Shared, write-once reference to a landscape image.
#[derive(Clone)]
pub struct TextureHandle(Arc<TextureSlot>);

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for TextureHandle {}

impl TextureHandle {
    /// A handle whose pixels will arrive later.
    pub fn pending(name: impl Into<String>) -> Self {
        Self(Arc::new(TextureSlot {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            image: OnceLock::new(),
        }))
    }

    /// A handle that is usable immediately.
    pub fn ready(name: impl Into<String>, image: TextureImage) -> Self {
        let handle = Self::pending(name);
        handle.fulfil(image);
        handle
    }

    /// Provide the pixels. Only the first call has an effect; returns
    /// whether this call did.
    pub fn fulfil(&self, image: TextureImage) -> bool {
        self.0.image.set(image).is_ok()
    }

    /// The pixels, once available.
    pub fn get(&self) -> Option<&TextureImage> {
        self.0.image.get()
    }

    pub fn is_ready(&self) -> bool {
        self.0.image.get().is_some()
    }

    /// Process-unique identifier, stable across clones.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// File name the handle was resolved from.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// A reference that does not keep the image alive.
    pub fn downgrade(&self) -> WeakTextureHandle {
        WeakTextureHandle(Arc::downgrade(&self.0))
    }
}

/// Non-owning counterpart of [`TextureHandle`], for caches keyed by handle.
#[derive(Clone, Debug)]
pub struct WeakTextureHandle(Weak<TextureSlot>);

impl WeakTextureHandle {
    /// Whether any [`TextureHandle`] to the image still exists.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub fn upgrade(&self) -> Option<TextureHandle> {
        self.0.upgrade().map(TextureHandle)
    }
}

/// Turns file names from a landscape description into texture handles.
pub trait TextureResolver {
    /// Look up `file_name` for the landscape `landscape_id`. `None` means
    /// the file does not exist; a handle that is still pending is fine.
    fn resolve(&self, landscape_id: &str, file_name: &str) -> Option<TextureHandle>;
}

/// Resolve a texture a landscape cannot do without.
pub(crate) fn resolve_required(
    textures: &dyn TextureResolver,
    landscape_id: &str,
    file_name: &str,
) -> Result<TextureHandle, LandscapeError> {
    textures
        .resolve(landscape_id, file_name)
        .ok_or_else(|| LandscapeError::TextureUnavailable {
            id: landscape_id.to_string(),
            name: file_name.to_string(),
        })
}

/// Resolve an optional layer's texture. A named but missing file only
/// drops the layer.
pub(crate) fn resolve_optional(
    textures: &dyn TextureResolver,
    landscape_id: &str,
    file_name: Option<&str>,
) -> Option<TextureHandle> {
    let file_name = file_name?;
    let handle = textures.resolve(landscape_id, file_name);
    if handle.is_none() {
        log::warn!("Landscape '{landscape_id}': texture '{file_name}' not found, layer disabled");
    }
    handle
}

/// In-memory resolver for programmatic landscapes and tests.
#[derive(Debug, Default)]
pub struct MemoryTextures {
    textures: HashMap<String, TextureHandle>,
}

impl MemoryTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded image under `file_name`.
    pub fn insert(&mut self, file_name: &str, image: TextureImage) -> TextureHandle {
        let handle = TextureHandle::ready(file_name, image);
        self.textures.insert(file_name.to_string(), handle.clone());
        handle
    }

    /// Register a name whose pixels are not loaded yet.
    pub fn insert_pending(&mut self, file_name: &str) -> TextureHandle {
        let handle = TextureHandle::pending(file_name);
        self.textures.insert(file_name.to_string(), handle.clone());
        handle
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureResolver for MemoryTextures {
    fn resolve(&self, _landscape_id: &str, file_name: &str) -> Option<TextureHandle> {
        self.textures.get(file_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_validation() {
        assert!(TextureImage::new(2, 2, vec![0; 16]).is_some());
        assert!(TextureImage::new(2, 2, vec![0; 15]).is_none());
        assert!(TextureImage::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_alpha_sampling_clamps() {
        let image = TextureImage::from_fn(4, 2, |x, y| [0, 0, 0, if y == 0 { x as u8 * 50 } else { 255 }]);
        assert_eq!(image.alpha_at(0.0, 0.0), 0.0);
        assert!((image.alpha_at(0.6, 0.2) - 100.0 / 255.0).abs() < 1e-6);
        assert_eq!(image.alpha_at(0.5, 1.0), 1.0);
        assert_eq!(image.alpha_at(-3.0, 7.0), 1.0);
        assert!((image.alpha_at(5.0, -1.0) - 150.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_pending_handle_fulfils_once() {
        let handle = TextureHandle::pending("sky.png");
        let clone = handle.clone();
        assert!(!handle.is_ready());
        assert!(clone.fulfil(TextureImage::filled(1, 1, [1, 2, 3, 4])));
        assert!(handle.is_ready());
        assert!(!handle.fulfil(TextureImage::filled(1, 1, [9, 9, 9, 9])));
        assert_eq!(handle.get().unwrap().texel(0, 0), [1, 2, 3, 4]);
        assert_eq!(handle, clone);
    }

    #[test]
    fn test_weak_handle_follows_last_clone() {
        let handle = TextureHandle::ready("sky.png", TextureImage::filled(1, 1, [0; 4]));
        let copy = handle.clone();
        let weak = handle.downgrade();
        drop(handle);
        assert!(weak.is_alive());
        assert_eq!(weak.upgrade().map(|h| h.id()), Some(copy.id()));
        drop(copy);
        assert!(!weak.is_alive());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_handle_ids_are_unique() {
        let a = TextureHandle::pending("a.png");
        let b = TextureHandle::pending("a.png");
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_fulfil_from_another_thread() {
        let handle = TextureHandle::pending("late.png");
        let loader = handle.clone();
        std::thread::spawn(move || loader.fulfil(TextureImage::filled(2, 2, [0, 0, 0, 255])))
            .join()
            .unwrap();
        assert!(handle.is_ready());
    }

    #[test]
    fn test_memory_resolver() {
        let mut textures = MemoryTextures::new();
        textures.insert("ground.png", TextureImage::filled(1, 1, [0; 4]));
        textures.insert_pending("fog.png");
        assert_eq!(textures.len(), 2);
        assert!(textures.resolve("any", "ground.png").unwrap().is_ready());
        assert!(!textures.resolve("any", "fog.png").unwrap().is_ready());
        assert!(textures.resolve("any", "missing.png").is_none());
    }
}
