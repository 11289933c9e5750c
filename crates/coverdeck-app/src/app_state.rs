//! Kiosk state: the carousel plus the pieces a command can touch.

use coverdeck_core::backend::RenderBackend;
use coverdeck_core::carousel::{Carousel, StepTimer};
use coverdeck_core::config::CarouselConfig;
use coverdeck_core::error::Result;
use coverdeck_core::selection::PersistedSelection;

use crate::input::KioskCommand;
use crate::launch::SystemActions;

/// Whether the main loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Kiosk {
    pub carousel: Carousel,
    selection: PersistedSelection,
    system: Box<dyn SystemActions>,
    zoom_step: f32,
    blocking: bool,
}

impl Kiosk {
    pub fn new(
        carousel: Carousel,
        selection: PersistedSelection,
        system: Box<dyn SystemActions>,
        config: &CarouselConfig,
    ) -> Self {
        Self {
            carousel,
            selection,
            system,
            zoom_step: config.zoom_step,
            blocking: config.blocking_transitions,
        }
    }

    /// Apply one command. Launch and shutdown failures are logged and do
    /// not stop the kiosk; only render errors propagate.
    pub fn dispatch(
        &mut self,
        command: KioskCommand,
        backend: &mut dyn RenderBackend,
        timer: &mut dyn StepTimer,
    ) -> Result<Flow> {
        match command {
            KioskCommand::Quit => {
                log::info!("quit requested");
                return Ok(Flow::Exit);
            },
            KioskCommand::Shutdown => {
                if let Err(e) = self.system.shutdown() {
                    log::error!("shutdown failed: {e}");
                }
                return Ok(Flow::Exit);
            },
            KioskCommand::ZoomIn => {
                self.carousel.adjust_zoom(self.zoom_step);
            },
            KioskCommand::ZoomOut => {
                self.carousel.adjust_zoom(-self.zoom_step);
            },
            KioskCommand::NavigateRight if self.blocking => {
                self.carousel.navigate_right(backend, timer)?;
            },
            KioskCommand::NavigateLeft if self.blocking => {
                self.carousel.navigate_left(backend, timer)?;
            },
            KioskCommand::NavigateRight => {
                self.carousel.begin_right();
            },
            KioskCommand::NavigateLeft => {
                self.carousel.begin_left();
            },
            KioskCommand::Launch => self.launch_selected(),
        }
        Ok(Flow::Continue)
    }

    fn launch_selected(&mut self) {
        if !self.carousel.is_idle() {
            return;
        }
        let link = self.carousel.selected_entry().link().to_path_buf();
        if let Err(e) = self.selection.write(&link) {
            log::warn!("cannot save selection to {}: {e}", self.selection.path().display());
        }
        if let Err(e) = self.system.launch(&link) {
            log::error!("launch of {} failed: {e}", link.display());
        }
    }

    /// Advance a stepped transition by one frame.
    pub fn tick(&mut self) {
        if !self.blocking {
            self.carousel.step();
        }
    }

    pub fn draw(&self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.carousel.render(backend)?;
        backend.swap_buffers()
    }
}
