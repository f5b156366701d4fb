//! # Audio Engine Seam
//!
//! Abstractions over the concrete playback engine. Decoding and output are
//! host concerns; the coordinator only needs a way to open a session for a
//! location and drive its transport.
//!
//! ## Architecture
//!
//! - [`AudioEngine::open`] is async because constructing a session is the
//!   expensive part: the engine inspects the source to learn its duration
//!   and may touch disk or network to do so.
//! - [`EngineSession`] transport methods are synchronous fire-and-forget:
//!   they flip engine-internal state and must not block the caller for an
//!   unbounded time.
//!
//! The crate ships one implementation, [`crate::sim::SimulatedEngine`],
//! for tests and hosts without an audio device. Real engines live in
//! platform bridges.

use crate::catalog::MediaLocation;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A progress report from the session monitor.
///
/// `Ended` collapses natural completion and unrecoverable engine failure
/// into one terminal signal; observers cannot distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Current playback position.
    Position(Duration),
    /// The session is terminal. Emitted exactly once.
    Ended,
}

/// Factory for playback sessions.
///
/// Opening is the only fallible acquisition step: a location that cannot
/// be read or decoded fails here, and the coordinator treats that the same
/// as "no current item".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Opens a playback session bound to `location`.
    ///
    /// On success the session is stopped at position zero with its
    /// duration fixed from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing, unreadable, or not
    /// decodable by this engine.
    async fn open(&self, location: &MediaLocation) -> Result<Box<dyn EngineSession>>;
}

/// One live playback session bound to one source.
///
/// Implementations must tolerate transport calls in any order; the
/// resource layer above enforces the Stopped/Playing/Paused/Ended state
/// machine.
#[cfg_attr(test, mockall::automock)]
pub trait EngineSession: Send {
    /// Total length of the source, fixed at open time.
    fn duration(&self) -> Duration;

    /// Start or resume playback from the current position.
    fn play(&mut self) -> Result<()>;

    /// Pause playback, retaining the current position.
    fn pause(&mut self) -> Result<()>;

    /// Move the playback position. The caller clamps `position` into
    /// `[0, duration]` before calling.
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Whether the session reached the end of the source or failed
    /// unrecoverably. Once `true`, the session is terminal.
    fn is_ended(&self) -> bool;

    /// Release engine resources. Further transport calls are undefined.
    fn stop(&mut self);
}
