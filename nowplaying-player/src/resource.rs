//! # Playback Resource
//!
//! Wraps exactly one live engine session: transport state machine plus the
//! progress feed that keeps the coordinator's state in sync.
//!
//! ## Lifecycle
//!
//! A resource is created by [`PlaybackResource::open`] when the
//! coordinator's current item changes, and destroyed when the item changes
//! again, is cleared, or playback ends. The monitor task reports
//! [`ProgressUpdate::Position`] on a fixed cadence while playing and
//! [`ProgressUpdate::Ended`] exactly once when the session reaches the end
//! of the source or fails; after that the resource is terminal and must
//! not be reused. Dropping the resource aborts the monitor task and stops
//! the session.

use crate::engine::{AudioEngine, EngineSession, ProgressUpdate};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

/// Transport state of a playback session.
///
/// `Ended` is terminal: no transition leaves it. Seeking never changes the
/// transport state, only the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Session exists but has never been started.
    Stopped,
    /// Audio is playing; the monitor reports positions.
    Playing,
    /// Paused with position retained.
    Paused,
    /// Completed or failed. Terminal.
    Ended,
}

/// Callback receiving progress reports from the monitor task.
pub(crate) type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

struct SessionState {
    session: Box<dyn EngineSession>,
    transport: Transport,
}

/// One live playback session bound to one item's location.
///
/// At most one resource exists per coordinator; the coordinator enforces
/// that, not this type.
pub struct PlaybackResource {
    shared: Arc<Mutex<SessionState>>,
    duration: Duration,
    monitor: JoinHandle<()>,
}

impl PlaybackResource {
    /// Opens a session for `location` and spawns its progress monitor.
    ///
    /// On success the resource is stopped at position zero with `duration`
    /// fixed from the source. On failure no resource exists and the caller
    /// must treat the outcome as "no current item".
    pub(crate) async fn open(
        engine: &dyn AudioEngine,
        location: &crate::catalog::MediaLocation,
        interval: Duration,
        callback: ProgressCallback,
    ) -> Result<Self> {
        let session = engine.open(location).await?;
        let duration = session.duration();

        let shared = Arc::new(Mutex::new(SessionState {
            session,
            transport: Transport::Stopped,
        }));

        // Anchor the first tick one full interval after open, sampled
        // here rather than in the task body: an async fn body runs only
        // at first poll, which may be after the deadline has passed.
        let start = tokio::time::Instant::now() + interval;

        let monitor = tokio::spawn(monitor_loop(
            Arc::clone(&shared),
            duration,
            start,
            interval,
            callback,
        ));

        Ok(Self {
            shared,
            duration,
            monitor,
        })
    }

    /// Total length of the source, fixed at open time.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current transport state.
    pub fn transport(&self) -> Transport {
        self.shared.lock().transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport() == Transport::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.transport() == Transport::Paused
    }

    /// Current playback position as the engine reports it.
    pub fn position(&self) -> Duration {
        self.shared.lock().session.position()
    }

    /// Pause if playing; (re)start from the current position otherwise.
    ///
    /// No-op once the session has ended.
    pub fn toggle_play(&self) -> Result<()> {
        let mut state = self.shared.lock();
        match state.transport {
            Transport::Playing => {
                state.session.pause()?;
                state.transport = Transport::Paused;
            }
            Transport::Stopped | Transport::Paused => {
                state.session.play()?;
                state.transport = Transport::Playing;
            }
            Transport::Ended => {}
        }
        Ok(())
    }

    /// Seeks to `target` clamped into `[0, duration]`, effective
    /// immediately in any transport state. Returns the clamped position.
    pub fn set_progress(&self, target: Duration) -> Result<Duration> {
        let clamped = target.min(self.duration);
        self.shared.lock().session.seek(clamped)?;
        Ok(clamped)
    }
}

impl Drop for PlaybackResource {
    fn drop(&mut self) {
        // Stop the feed before the session so no report fires after
        // teardown. A callback already executing is discarded upstream by
        // the coordinator's generation check.
        self.monitor.abort();
        let mut state = self.shared.lock();
        state.session.stop();
        state.transport = Transport::Ended;
    }
}

/// Samples the session on a fixed cadence and forwards progress reports.
///
/// The update is decided under the session lock but reported after
/// releasing it: the callback re-enters the coordinator, which may drop
/// this very resource on `Ended`.
async fn monitor_loop(
    shared: Arc<Mutex<SessionState>>,
    duration: Duration,
    start: tokio::time::Instant,
    interval: Duration,
    callback: ProgressCallback,
) {
    // `start` is the open-time anchor one full interval after open. A
    // plain `interval()` would fire immediately, and consuming that tick
    // from inside the task skips the first real report when the task is
    // first polled after the deadline has already passed.
    let mut tick = tokio::time::interval_at(start, interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tick.tick().await;

        let update = {
            let mut state = shared.lock();
            match state.transport {
                Transport::Playing => {
                    if state.session.is_ended() || state.session.position() >= duration {
                        state.transport = Transport::Ended;
                        state.session.stop();
                        Some(ProgressUpdate::Ended)
                    } else {
                        Some(ProgressUpdate::Position(state.session.position()))
                    }
                }
                Transport::Stopped | Transport::Paused | Transport::Ended => None,
            }
        };

        match update {
            Some(ProgressUpdate::Ended) => {
                trace!("playback session ended");
                callback(ProgressUpdate::Ended);
                break;
            }
            Some(position) => callback(position),
            None => {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
