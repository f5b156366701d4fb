//! # Simulated Engine
//!
//! A deterministic [`AudioEngine`] for tests, demos, and headless hosts.
//!
//! Sources are registered up front with a known duration; opening any
//! other location fails the way a missing file would. Sessions advance
//! their position on the tokio clock while playing, so tests running under
//! a paused runtime clock (`#[tokio::test(start_paused = true)]`) drive
//! playback deterministically with `tokio::time::advance`.

use crate::catalog::MediaLocation;
use crate::engine::{AudioEngine, EngineSession};
use crate::error::{PlayerError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
struct SimEntry {
    duration: Duration,
    fail_open: bool,
}

/// Engine that simulates playback against a registry of known sources.
#[derive(Default)]
pub struct SimulatedEngine {
    sources: RwLock<HashMap<MediaLocation, SimEntry>>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a playable source with the given total duration.
    pub fn register(&self, location: MediaLocation, duration: Duration) {
        self.sources.write().insert(
            location,
            SimEntry {
                duration,
                fail_open: false,
            },
        );
    }

    /// Registers a source whose open always fails, simulating a file that
    /// exists in the catalog but is unreadable.
    pub fn register_failing(&self, location: MediaLocation) {
        self.sources.write().insert(
            location,
            SimEntry {
                duration: Duration::ZERO,
                fail_open: true,
            },
        );
    }
}

#[async_trait]
impl AudioEngine for SimulatedEngine {
    async fn open(&self, location: &MediaLocation) -> Result<Box<dyn EngineSession>> {
        let entry = self
            .sources
            .read()
            .get(location)
            .cloned()
            .ok_or_else(|| PlayerError::SourceNotFound(location.describe()))?;

        if entry.fail_open {
            return Err(PlayerError::SourceError(location.describe()));
        }

        Ok(Box::new(SimSession {
            duration: entry.duration,
            base: Duration::ZERO,
            started_at: None,
        }))
    }
}

/// Clock-driven session: position = accumulated base + time since the
/// last `play`, capped at the duration.
struct SimSession {
    duration: Duration,
    base: Duration,
    started_at: Option<Instant>,
}

impl EngineSession for SimSession {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn play(&mut self) -> Result<()> {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.base = self.position();
        self.started_at = None;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.base = position.min(self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.base + elapsed).min(self.duration)
    }

    fn is_ended(&self) -> bool {
        self.position() >= self.duration
    }

    fn stop(&mut self) {
        self.base = self.position();
        self.started_at = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn location(name: &str) -> MediaLocation {
        MediaLocation::LocalFile {
            path: PathBuf::from(format!("/recordings/{name}")),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn open_unknown_location_fails() {
        let engine = SimulatedEngine::new();
        let Err(err) = engine.open(&location("missing.m4a")).await else {
            panic!("opening an unregistered location succeeded");
        };
        assert!(err.is_source_error());
    }

    #[tokio::test(start_paused = true)]
    async fn open_failing_location_fails() {
        let engine = SimulatedEngine::new();
        engine.register_failing(location("corrupt.m4a"));
        let Err(err) = engine.open(&location("corrupt.m4a")).await else {
            panic!("opening an unreadable location succeeded");
        };
        assert!(err.is_source_error());
    }

    #[tokio::test(start_paused = true)]
    async fn position_advances_only_while_playing() {
        let engine = SimulatedEngine::new();
        engine.register(location("memo.m4a"), Duration::from_secs(10));
        let mut session = engine.open(&location("memo.m4a")).await.unwrap();

        assert_eq!(session.duration(), Duration::from_secs(10));
        assert_eq!(session.position(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(session.position(), Duration::ZERO); // not playing yet

        session.play().unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(session.position(), Duration::from_secs(3));

        session.pause().unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(session.position(), Duration::from_secs(3));

        session.play().unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(session.position(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn seek_applies_in_any_transport_state() {
        let engine = SimulatedEngine::new();
        engine.register(location("memo.m4a"), Duration::from_secs(10));
        let mut session = engine.open(&location("memo.m4a")).await.unwrap();

        session.seek(Duration::from_secs(4)).unwrap();
        assert_eq!(session.position(), Duration::from_secs(4));

        session.play().unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        session.seek(Duration::from_secs(8)).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(session.position(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn position_caps_at_duration_and_ends() {
        let engine = SimulatedEngine::new();
        engine.register(location("memo.m4a"), Duration::from_secs(10));
        let mut session = engine.open(&location("memo.m4a")).await.unwrap();

        session.play().unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(session.position(), Duration::from_secs(10));
        assert!(session.is_ended());
    }
}
