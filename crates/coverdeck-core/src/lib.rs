//! coverdeck core.
//!
//! Platform-agnostic pieces of the launcher: catalog scanning and the
//! persisted selection marker, artwork resolution against the metadata
//! service, the texture upload pass, and the carousel state machine with
//! its projection onto the screen. Rendering goes through the
//! [`RenderBackend`](coverdeck_types::backend::RenderBackend) trait, so
//! nothing here depends on SDL.

pub use coverdeck_types::backend;
pub use coverdeck_types::diag;
pub use coverdeck_types::error;
pub use coverdeck_types::input;

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod projection;
pub mod resolver;
pub mod selection;
pub mod textures;

#[cfg(test)]
pub(crate) mod test_utils;
