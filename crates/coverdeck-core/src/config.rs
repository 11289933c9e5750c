//! Kiosk configuration (`coverdeck.toml`).
//!
//! Every section and field has a default, so a partial file, or no file at
//! all, yields a working configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use coverdeck_metadata::MetadataConfig;

use crate::error::{CoverdeckError, Result};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "coverdeck.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "COVERDECK_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub catalog: CatalogConfig,
    pub metadata: MetadataConfig,
    pub artwork: ArtworkConfig,
    pub display: DisplayConfig,
    pub carousel: CarouselConfig,
    pub system: SystemConfig,
    pub logging: LoggingConfig,
}

impl KioskConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .map_err(|e| CoverdeckError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Pick the config file: explicit argument, then the environment
    /// variable, then [`DEFAULT_CONFIG_FILE`].
    pub fn locate(arg: Option<String>, env: Option<String>) -> PathBuf {
        arg.or(env)
            .filter(|p| !p.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }
}

/// `[catalog]`: where entries live and how their files are named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Candidate catalog directories, first existing one wins.
    pub search_paths: Vec<PathBuf>,
    pub link_extension: String,
    pub image_extension: String,
    /// Marker file name inside the catalog directory.
    pub selection_file: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            link_extension: "lnk".to_string(),
            image_extension: "jpg".to_string(),
            selection_file: ".lastgame".to_string(),
        }
    }
}

impl CatalogConfig {
    /// First search path that is an existing directory.
    pub fn catalog_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.search_paths.iter().find(|p| p.is_dir()) {
            return Ok(dir.clone());
        }
        let first = self
            .search_paths
            .first()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("Games"));
        Err(CoverdeckError::CatalogMissing(first))
    }
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if cfg!(windows) {
        if let Some(desktop) = dirs::desktop_dir() {
            paths.push(desktop.join("Games"));
        }
    }
    paths.push(PathBuf::from("Games"));
    paths
}

/// `[artwork]`: the bundled fallback image.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtworkConfig {
    pub default_image: PathBuf,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            default_image: PathBuf::from("assets").join("default.png"),
        }
    }
}

impl ArtworkConfig {
    /// Resolve a relative default image against the executable's directory,
    /// then the working directory. Returns the configured path unchanged if
    /// neither exists.
    pub fn resolve_default_image(&self, exe_dir: Option<&Path>) -> PathBuf {
        if self.default_image.is_absolute() {
            return self.default_image.clone();
        }
        exe_dir
            .map(|dir| dir.join(&self.default_image))
            .filter(|p| p.is_file())
            .unwrap_or_else(|| self.default_image.clone())
    }
}

/// `[display]`: window setup and frame pacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Fullscreen at desktop resolution; `width`/`height` are ignored.
    pub fullscreen: bool,
    pub frame_rate: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "coverdeck".to_string(),
            width: 800,
            height: 600,
            fullscreen: cfg!(windows),
            frame_rate: 35,
        }
    }
}

impl DisplayConfig {
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

/// `[carousel]`: camera and transition tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Initial camera distance along z.
    pub default_zoom: f32,
    pub zoom_step: f32,
    pub transition_steps: u32,
    pub step_delay_ms: u64,
    /// Run each transition to completion inside the navigation call. When
    /// false the main loop advances one step per frame.
    pub blocking_transitions: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            default_zoom: -7.0,
            zoom_step: 0.1,
            transition_steps: 10,
            step_delay_ms: 50,
            blocking_transitions: true,
        }
    }
}

impl CarouselConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// `[system]`: external commands. `{link}` in an argument is replaced by
/// the selected entry's link path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub launch_command: Vec<String>,
    /// Empty means shutdown only exits the launcher.
    pub shutdown_command: Vec<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let (launch, shutdown): (&[&str], &[&str]) = if cfg!(windows) {
            (
                &["cmd", "/C", "start", "", "/B", "/WAIT", "{link}"],
                &["shutdown.exe", "/f", "/s", "/t", "30"],
            )
        } else {
            (&["xdg-open", "{link}"], &[])
        };
        Self {
            launch_command: launch.iter().map(|s| s.to_string()).collect(),
            shutdown_command: shutdown.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Log file, truncated at startup. Empty logs to stderr.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "coverdeck.log".to_string(),
        }
    }
}
