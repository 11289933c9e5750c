//! Shared test utilities for coverdeck-core tests.
//!
//! Provides a [`MockBackend`] that records draw calls, a routed
//! [`MockTransport`] for metadata lookups, and a [`CountingTimer`].

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use coverdeck_metadata::HttpTransport;

use crate::backend::{Color, RenderBackend, TextureId};
use crate::carousel::StepTimer;
use crate::error::{CoverdeckError, Result};

/// A recorded call on the mock backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Load {
        id: TextureId,
        width: u32,
        height: u32,
    },
    Blit {
        tex: TextureId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    Swap,
}

/// A mock backend that records all calls for test assertions.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    next_id: u64,
    size: (u32, u32),
    max_texture: Option<u32>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_id: 1,
            size: (800, 600),
            max_texture: None,
        }
    }

    /// Backend that rejects textures wider or taller than `max_side`, like
    /// a GPU with a small texture limit.
    pub fn with_max_texture(max_side: u32) -> Self {
        Self {
            max_texture: Some(max_side),
            ..Self::new()
        }
    }

    pub fn blits(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Blit { .. }))
            .collect()
    }

    pub fn swap_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Swap))
            .count()
    }

    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Load { .. }))
            .count()
    }
}

impl RenderBackend for MockBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Clear(color));
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        if rgba_data.len() != (width * height * 4) as usize {
            return Err(CoverdeckError::Backend("bad texture size".into()));
        }
        if let Some(max) = self.max_texture {
            if width > max || height > max {
                return Err(CoverdeckError::Backend(format!(
                    "texture {width}x{height} exceeds max {max}"
                )));
            }
        }
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.calls.push(DrawCall::Load { id, width, height });
        Ok(id)
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DrawCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.calls.push(DrawCall::Swap);
        Ok(())
    }

    fn viewport(&self) -> (u32, u32) {
        self.size
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Serves canned bodies by URL suffix and counts requests.
///
/// Clones share routes and the request count, so a test can keep one
/// handle while the client owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
    count: Rc<Cell<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, suffix: &str, body: &[u8]) -> Self {
        self.routes
            .borrow_mut()
            .push((suffix.to_string(), body.to_vec()));
        self
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str, _query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.count.set(self.count.get() + 1);
        self.routes
            .borrow()
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| CoverdeckError::Http(format!("GET {url}: status 404")))
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default)]
pub struct CountingTimer {
    pub waits: Vec<Duration>,
}

impl StepTimer for CountingTimer {
    fn wait(&mut self, delay: Duration) {
        self.waits.push(delay);
    }
}

/// Write a small solid-color PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]))
        .save(path)
        .unwrap();
}
