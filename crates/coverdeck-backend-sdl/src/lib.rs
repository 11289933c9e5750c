//! SDL2 backend for coverdeck.
//!
//! Implements `RenderBackend` and `InputBackend` using SDL2. Covers are
//! uploaded once as RGBA textures and scaled with nearest-neighbor sampling.
//! Joysticks are opened as SDL reports them, including ones plugged in
//! after startup.

use std::collections::HashMap;

use sdl2::EventPump;
use sdl2::JoystickSubsystem;
use sdl2::event::Event;
use sdl2::joystick::Joystick;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use coverdeck_types::backend::{Color, InputBackend, RenderBackend, TextureId};
use coverdeck_types::error::{CoverdeckError, Result};
use coverdeck_types::input::{Axis, Button, InputEvent};

/// Full-scale value of an SDL joystick axis.
const AXIS_MAX: f32 = 32767.0;

/// SDL2 rendering and input backend.
///
/// # Safety
///
/// `textures` is declared before `texture_creator` so that Rust's drop order
/// (declaration order) destroys all textures before the creator they borrow from.
/// The `Texture<'static>` lifetime is erased via transmute in `load_texture()`;
/// this is sound because the `TextureCreator` always outlives the textures.
pub struct SdlBackend {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    joystick_subsystem: JoystickSubsystem,
    joysticks: Vec<Joystick>,
    textures: HashMap<u64, Texture<'static>>,
    texture_creator: TextureCreator<WindowContext>,
    next_texture_id: u64,
    viewport_w: u32,
    viewport_h: u32,
}

impl SdlBackend {
    /// Create the window. In fullscreen mode the window takes the desktop
    /// resolution and `width`/`height` are ignored.
    pub fn new(title: &str, width: u32, height: u32, fullscreen: bool) -> Result<Self> {
        let sdl = sdl2::init().map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        let video = sdl
            .video()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        let joystick_subsystem = sdl
            .joystick()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;

        if !sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0") {
            log::warn!("nearest-neighbor scaling hint not accepted");
        }

        let mut builder = video.window(title, width, height);
        if fullscreen {
            builder.fullscreen_desktop();
        } else {
            builder.position_centered();
        }
        let window = builder
            .build()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        let (viewport_w, viewport_h) = canvas
            .output_size()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl
            .event_pump()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        sdl.mouse().show_cursor(!fullscreen);

        log::info!("SDL2 backend initialized: {viewport_w}x{viewport_h}");

        let mut backend = Self {
            canvas,
            event_pump,
            joystick_subsystem,
            joysticks: Vec::new(),
            textures: HashMap::new(),
            texture_creator,
            next_texture_id: 1,
            viewport_w,
            viewport_h,
        };
        let count = backend
            .joystick_subsystem
            .num_joysticks()
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        for index in 0..count {
            backend.open_joystick(index);
        }
        Ok(backend)
    }

    fn open_joystick(&mut self, index: u32) {
        match self.joystick_subsystem.open(index) {
            Ok(joystick) => {
                let id = joystick.instance_id();
                if self.joysticks.iter().any(|j| j.instance_id() == id) {
                    return;
                }
                log::info!("joystick opened: {}", joystick.name());
                self.joysticks.push(joystick);
            },
            Err(e) => log::warn!("cannot open joystick {index}: {e}"),
        }
    }

    fn close_joystick(&mut self, instance_id: u32) {
        self.joysticks.retain(|j| j.instance_id() != instance_id);
    }
}

impl RenderBackend for SdlBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas.set_draw_color(sdl2::pixels::Color::RGBA(
            color.r, color.g, color.b, color.a,
        ));
        self.canvas.clear();
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        let expected = (width * height * 4) as usize;
        if rgba_data.len() != expected {
            return Err(CoverdeckError::Backend(format!(
                "texture data size mismatch: expected {expected}, got {}",
                rgba_data.len()
            )));
        }

        let mut texture = self
            .texture_creator
            .create_texture_static(PixelFormatEnum::ABGR8888, width, height)
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        texture
            .update(None, rgba_data, (width * 4) as usize)
            .map_err(|e| CoverdeckError::Backend(e.to_string()))?;
        texture.set_blend_mode(sdl2::render::BlendMode::Blend);

        // SAFETY: The texture borrows from self.texture_creator which lives in the
        // same struct. `textures` is declared before `texture_creator`, so Rust drops
        // textures first. The erased lifetime is therefore always valid.
        let texture: Texture<'static> = unsafe { std::mem::transmute(texture) };

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        Ok(TextureId(id))
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| CoverdeckError::Backend(format!("texture not found: {}", tex.0)))?;
        self.canvas
            .copy(texture, None, Rect::new(x, y, w, h))
            .map_err(CoverdeckError::Backend)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn viewport(&self) -> (u32, u32) {
        (self.viewport_w, self.viewport_h)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.textures.clear();
        self.joysticks.clear();
        log::info!("SDL2 backend shut down");
        Ok(())
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let pending: Vec<Event> = self.event_pump.poll_iter().collect();
        for event in pending {
            match event {
                Event::JoyDeviceAdded { which, .. } => self.open_joystick(which),
                Event::JoyDeviceRemoved { which, .. } => self.close_joystick(which),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::SizeChanged(w, h),
                    ..
                } => {
                    self.viewport_w = w.max(1) as u32;
                    self.viewport_h = h.max(1) as u32;
                },
                other => events.extend(map_sdl_event(other)),
            }
        }
        events
    }
}

/// Map an SDL2 event to a coverdeck input event.
fn map_sdl_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(key),
            repeat: false,
            ..
        } => map_key(key).map(InputEvent::ButtonPress),
        Event::KeyUp {
            keycode: Some(key), ..
        } => map_key(key).map(InputEvent::ButtonRelease),
        Event::JoyAxisMotion {
            axis_idx, value, ..
        } => map_axis(axis_idx, value),
        Event::JoyButtonDown { button_idx, .. } => Some(InputEvent::JoyButtonPress(button_idx)),
        Event::JoyButtonUp { button_idx, .. } => Some(InputEvent::JoyButtonRelease(button_idx)),
        _ => None,
    }
}

fn map_key(key: Keycode) -> Option<Button> {
    match key {
        Keycode::Up => Some(Button::Up),
        Keycode::Down => Some(Button::Down),
        Keycode::Left => Some(Button::Left),
        Keycode::Right => Some(Button::Right),
        Keycode::Return => Some(Button::Confirm),
        Keycode::Escape | Keycode::Q => Some(Button::Cancel),
        Keycode::S => Some(Button::Power),
        Keycode::Z => Some(Button::ZoomOut),
        Keycode::X => Some(Button::ZoomIn),
        _ => None,
    }
}

/// Axes 0 and 1 are the first stick; others are ignored.
fn map_axis(axis_idx: u8, value: i16) -> Option<InputEvent> {
    let axis = match axis_idx {
        0 => Axis::Horizontal,
        1 => Axis::Vertical,
        _ => return None,
    };
    Some(InputEvent::AxisMotion {
        axis,
        value: (f32::from(value) / AXIS_MAX).clamp(-1.0, 1.0),
    })
}
