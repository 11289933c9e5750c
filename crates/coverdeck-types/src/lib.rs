//! Foundation types and traits for coverdeck.
//!
//! This crate contains the platform-agnostic types shared by all coverdeck
//! crates: input events, render/input backend traits, the injected
//! diagnostic sink, and the error type.

pub mod backend;
pub mod diag;
pub mod error;
pub mod input;
