//! coverdeck kiosk entry point.
//!
//! Scans the catalog directory, resolves and uploads cover art, then runs a
//! fixed-rate loop showing the cover flow. Left/Right browse, Return
//! launches, Z/X zoom, S powers off and Escape quits. A joystick works the
//! same way with the first stick and button 0.

mod app_state;
mod input;
mod launch;

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};

use app_state::{Flow, Kiosk};
use coverdeck_backend_sdl::SdlBackend;
use coverdeck_core::backend::{InputBackend, RenderBackend};
use coverdeck_core::carousel::{Carousel, SleepTimer};
use coverdeck_core::catalog::CatalogScanner;
use coverdeck_core::config::{CONFIG_ENV_VAR, KioskConfig, LoggingConfig};
use coverdeck_core::diag::LogSink;
use coverdeck_core::error::CoverdeckError;
use coverdeck_core::resolver::ArtworkResolver;
use coverdeck_core::selection::PersistedSelection;
use coverdeck_core::textures::TextureCache;
use coverdeck_metadata::MetadataClient;
use input::InputMapper;
use launch::CommandRunner;

/// Exit status when the catalog directory is missing or has no entries.
const EXIT_CATALOG: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("coverdeck: {e:#}");
            let catalog_fatal = e
                .downcast_ref::<CoverdeckError>()
                .is_some_and(CoverdeckError::is_catalog_fatal);
            if catalog_fatal {
                ExitCode::from(EXIT_CATALOG)
            } else {
                ExitCode::FAILURE
            }
        },
    }
}

fn run() -> Result<()> {
    // Config from CLI arg, COVERDECK_CONFIG env var, or ./coverdeck.toml.
    let config_path = KioskConfig::locate(
        std::env::args().nth(1),
        std::env::var(CONFIG_ENV_VAR).ok(),
    );
    let config = KioskConfig::load(&config_path)?;
    init_logging(&config.logging)?;
    log::info!("Starting coverdeck (config {})", config_path.display());

    let catalog_dir = std::path::absolute(config.catalog.catalog_dir()?)?;
    log::info!("Using {} as catalog", catalog_dir.display());

    let sink = LogSink::handle();
    let mut selection = PersistedSelection::in_dir(&catalog_dir, &config.catalog.selection_file);
    let scanner = CatalogScanner::new(config.catalog.link_extension.as_str(), Rc::clone(&sink));
    let entries = scanner.scan(&catalog_dir, &mut selection)?;

    let mut backend = SdlBackend::new(
        &config.display.title,
        config.display.width,
        config.display.height,
        config.display.fullscreen,
    )?;

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let default_image = config.artwork.resolve_default_image(exe_dir.as_deref());
    log::debug!("default artwork: {}", default_image.display());
    let resolver = ArtworkResolver::new(
        MetadataClient::new(config.metadata.clone()),
        config.catalog.image_extension.as_str(),
        default_image,
        Rc::clone(&sink),
    );

    let textures = TextureCache::upload(&mut backend, &entries, &resolver, &sink)?;
    let carousel = Carousel::new(entries, textures, &config.carousel)?;
    log::info!("Catalog ready, {} entries", carousel.len());

    let mut kiosk = Kiosk::new(
        carousel,
        selection,
        Box::new(CommandRunner::from_config(&config.system)),
        &config.carousel,
    );
    let mut mapper = InputMapper::default();
    let mut timer = SleepTimer;
    let frame_budget = config.display.frame_budget();

    'running: loop {
        let frame_start = Instant::now();

        let events = backend.poll_events();
        let mut commands: Vec<_> = events.iter().filter_map(|e| mapper.map(e)).collect();
        commands.extend(mapper.held());
        for command in commands {
            if kiosk.dispatch(command, &mut backend, &mut timer)? == Flow::Exit {
                break 'running;
            }
        }

        kiosk.tick();
        kiosk.draw(&mut backend)?;

        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    backend.shutdown()?;
    log::info!("coverdeck shut down cleanly");
    Ok(())
}

/// `RUST_LOG` overrides the configured level. An empty `file` logs to
/// stderr.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.level.as_str()),
    );
    if !config.file.is_empty() {
        let file = File::create(&config.file)
            .with_context(|| format!("cannot open log file {}", config.file))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
