//! External commands: launching the selected entry and powering off.

use std::path::Path;
use std::process::Command;

use coverdeck_core::config::SystemConfig;
use coverdeck_core::error::{CoverdeckError, Result};

/// Replaced by the link path in launch command arguments.
pub const LINK_PLACEHOLDER: &str = "{link}";

/// Side effects the kiosk triggers outside its own window.
pub trait SystemActions {
    /// Run the entry behind `link` and wait for it to exit.
    fn launch(&mut self, link: &Path) -> Result<()>;

    /// Ask the OS to power off.
    fn shutdown(&mut self) -> Result<()>;
}

/// Runs the commands configured in `[system]`.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    launch_command: Vec<String>,
    shutdown_command: Vec<String>,
}

impl CommandRunner {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            launch_command: config.launch_command.clone(),
            shutdown_command: config.shutdown_command.clone(),
        }
    }
}

impl SystemActions for CommandRunner {
    fn launch(&mut self, link: &Path) -> Result<()> {
        let argv = expand_link(&self.launch_command, link);
        log::info!("launching {}", link.display());
        run(&argv)
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.shutdown_command.is_empty() {
            log::info!("shutdown requested, no shutdown command configured");
            return Ok(());
        }
        log::info!("shutting down the system");
        run(&self.shutdown_command)
    }
}

/// Substitute `link` for every [`LINK_PLACEHOLDER`] occurrence.
pub fn expand_link(command: &[String], link: &Path) -> Vec<String> {
    let link = link.to_string_lossy();
    command
        .iter()
        .map(|arg| arg.replace(LINK_PLACEHOLDER, &link))
        .collect()
}

fn run(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| CoverdeckError::Launch("empty command".to_string()))?;
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| CoverdeckError::Launch(format!("{program}: {e}")))?;
    if !status.success() {
        log::warn!("{program} exited with {status}");
    }
    Ok(())
}
