//! # Now Playing Runtime
//!
//! Foundational runtime infrastructure for the now-playing core:
//! - Logging and tracing infrastructure
//! - Event bus system
//! - Shared error types
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the player core depends on.
//! It establishes the logging conventions and the event broadcasting
//! mechanism used by presentation collaborators to stay consistent with
//! coordinator state.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
