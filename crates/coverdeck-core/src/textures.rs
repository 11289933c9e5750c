//! One-shot artwork upload.
//!
//! Every entry's artwork is resolved, decoded to RGBA8 and uploaded to the
//! render backend before the main loop starts. The handle table always has
//! at least two slots so neighbor lookups stay in bounds for tiny catalogs.

use std::path::Path;

use log::Level;

use crate::backend::{RenderBackend, TextureId};
use crate::catalog::CatalogEntry;
use crate::diag::SinkHandle;
use crate::error::{CoverdeckError, Result};
use crate::resolver::ArtworkResolver;

const COMPONENT: &str = "textures";

/// Minimum number of handle slots.
pub const MIN_SLOTS: usize = 2;

/// Side of the generated placeholder, in pixels.
const PLACEHOLDER_SIZE: u32 = 64;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decode any format the `image` crate recognizes.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| CoverdeckError::Image(format!("{}: {e}", path.display())))?;
        let rgba = img.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Grey checkerboard shown when no artwork can be decoded.
    pub fn placeholder() -> Self {
        let size = PLACEHOLDER_SIZE;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let v = if (x / 8 + y / 8) % 2 == 0 { 96 } else { 160 };
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }
}

/// Render handles for the catalog, indexed like the entry list.
#[derive(Debug, Clone)]
pub struct TextureCache {
    handles: Vec<Option<TextureId>>,
}

impl TextureCache {
    /// Resolve, decode and upload the artwork of every entry, in order.
    ///
    /// Artwork that fails to decode or that the backend rejects (too large
    /// for the GPU, say) is replaced by the default image, and that by a
    /// generated placeholder, so each entry gets a texture. Only a backend
    /// that refuses the placeholder too is an error.
    pub fn upload(
        backend: &mut dyn RenderBackend,
        entries: &[CatalogEntry],
        resolver: &ArtworkResolver,
        sink: &SinkHandle,
    ) -> Result<Self> {
        let mut handles = Vec::with_capacity(entries.len().max(MIN_SLOTS));
        for entry in entries {
            let path = resolver.resolve(entry);
            let image = load_with_fallback(&path, resolver.default_image(), sink);
            let id = upload_with_fallback(backend, &image, resolver.default_image(), sink)?;
            handles.push(Some(id));
        }
        log::info!("uploaded {} textures", entries.len());
        Ok(Self::from_handles(handles))
    }

    /// Table from already uploaded handles, padded to [`MIN_SLOTS`].
    pub fn from_handles(mut handles: Vec<Option<TextureId>>) -> Self {
        if handles.len() < MIN_SLOTS {
            handles.resize(MIN_SLOTS, None);
        }
        Self { handles }
    }

    /// Number of allocated slots, never below [`MIN_SLOTS`].
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle in `index`, `None` for an unused slot.
    pub fn get(&self, index: usize) -> Option<TextureId> {
        self.handles.get(index).copied().flatten()
    }
}

fn load_with_fallback(path: &Path, default_image: &Path, sink: &SinkHandle) -> DecodedImage {
    match DecodedImage::open(path) {
        Ok(image) => return image,
        Err(e) => sink.record(
            Level::Warn,
            COMPONENT,
            &format!("cannot decode {} ({e}), using default artwork", path.display()),
        ),
    }
    if path != default_image {
        match DecodedImage::open(default_image) {
            Ok(image) => return image,
            Err(e) => sink.record(
                Level::Warn,
                COMPONENT,
                &format!("cannot decode default artwork ({e})"),
            ),
        }
    }
    sink.record(Level::Warn, COMPONENT, "using placeholder artwork");
    DecodedImage::placeholder()
}

fn upload_with_fallback(
    backend: &mut dyn RenderBackend,
    image: &DecodedImage,
    default_image: &Path,
    sink: &SinkHandle,
) -> Result<TextureId> {
    match backend.load_texture(image.width, image.height, &image.rgba) {
        Ok(id) => return Ok(id),
        Err(e) => sink.record(
            Level::Warn,
            COMPONENT,
            &format!(
                "cannot upload {}x{} artwork ({e}), using default artwork",
                image.width, image.height
            ),
        ),
    }
    match DecodedImage::open(default_image) {
        Ok(default) => match backend.load_texture(default.width, default.height, &default.rgba) {
            Ok(id) => return Ok(id),
            Err(e) => sink.record(
                Level::Warn,
                COMPONENT,
                &format!("cannot upload default artwork ({e})"),
            ),
        },
        Err(e) => sink.record(
            Level::Warn,
            COMPONENT,
            &format!("cannot decode default artwork ({e})"),
        ),
    }
    sink.record(Level::Warn, COMPONENT, "using placeholder artwork");
    let placeholder = DecodedImage::placeholder();
    backend.load_texture(placeholder.width, placeholder.height, &placeholder.rgba)
}
