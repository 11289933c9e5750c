//! Backend traits implemented by each platform.
//!
//! The carousel and texture cache only talk to these traits; the SDL2
//! backend (and the mocks in tests) provide the implementations.

use crate::error::Result;
use crate::input::InputEvent;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Opaque handle to a texture owned by a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Rendering surface.
///
/// Textures are uploaded once as RGBA8 and sampled with nearest-neighbor
/// filtering when blitted at a different size.
pub trait RenderBackend {
    /// Clear the back buffer.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Upload RGBA8 pixel data and return a handle to it.
    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId>;

    /// Draw a texture stretched over a screen rectangle.
    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Present the back buffer.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Current drawable size in pixels.
    fn viewport(&self) -> (u32, u32);

    /// Release backend resources.
    fn shutdown(&mut self) -> Result<()>;
}

/// Source of platform-agnostic input events.
pub trait InputBackend {
    /// Drain all pending events.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(c.a, 255);
        assert_eq!(c, Color::rgba(10, 20, 30, 255));
    }

    #[test]
    fn texture_ids_compare_by_value() {
        assert_eq!(TextureId(3), TextureId(3));
        assert_ne!(TextureId(3), TextureId(4));
    }
}
