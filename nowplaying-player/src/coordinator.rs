//! # Playback Coordinator
//!
//! The single shared owner of the active playback session.
//!
//! ## Overview
//!
//! The coordinator owns at most one [`PlaybackResource`] at a time, derives
//! the public [`PlaybackState`] from it, and broadcasts
//! [`PlayerEvent::StateChanged`] whenever that state is replaced. It is an
//! explicitly constructed context object: hosts create one at startup and
//! hand an `Arc` to every presentation collaborator, which keeps lifetime
//! and test isolation explicit instead of hiding them behind a process
//! global.
//!
//! ## Invariants
//!
//! - `current_item == None` ⇔ no resource ⇔ `state == {0, 0}`.
//! - `state.progress <= state.duration` at all times.
//! - The `(item, resource, state)` triple is replaced atomically under one
//!   lock; no observer sees a current item paired with an empty state.
//!
//! ## Concurrency
//!
//! State is mutated from two call sites: presentation commands and the
//! session monitor's progress callback. Both funnel into short critical
//! sections on one mutex. Item switches are additionally serialized by an
//! async lock so a slow engine `open` cannot interleave with another
//! switch. Each resource carries a generation number; progress callbacks
//! whose generation no longer matches are discarded, which resolves the
//! race between a switch and a report still in flight from the old
//! session.
//!
//! ## Failure semantics
//!
//! Construction failure and mid-session engine failure both degrade
//! silently to "no current item": observers are notified and re-read an
//! empty state. The warn-level `tracing` events emitted on those paths are
//! the observability extension point; no error value crosses this API.

use crate::catalog::{Catalog, PlaybackItem};
use crate::config::PlayerConfig;
use crate::engine::{AudioEngine, ProgressUpdate};
use crate::error::{PlayerError, Result};
use crate::resource::{PlaybackResource, ProgressCallback, Transport};
use nowplaying_runtime::events::{EventBus, PlayerEvent, Receiver};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

// ============================================================================
// Playback State
// ============================================================================

/// Value snapshot of the active session exposed to observers.
///
/// Replaced wholesale on every relevant event; never mutated field by
/// field from outside. `Duration` being unsigned makes non-negativity a
/// type-level guarantee; the coordinator maintains
/// `progress <= duration`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Total length of the current source. Zero iff no current item.
    pub duration: Duration,
    /// Current position within the source.
    pub progress: Duration,
}

impl PlaybackState {
    /// `true` when no session is active.
    pub fn is_empty(&self) -> bool {
        *self == PlaybackState::default()
    }
}

// ============================================================================
// Coordinator
// ============================================================================

struct Inner {
    item: Option<PlaybackItem>,
    resource: Option<PlaybackResource>,
    state: PlaybackState,
    /// Bumped on every teardown; progress callbacks carry the generation
    /// of the resource that produced them and stale ones are discarded.
    generation: u64,
}

/// Shared now-playing coordinator. See the module docs for the contract.
pub struct PlaybackCoordinator {
    engine: Arc<dyn AudioEngine>,
    config: PlayerConfig,
    events: EventBus,
    /// Serializes item switches end to end, including the engine `open`.
    switch_lock: tokio::sync::Mutex<()>,
    inner: Mutex<Inner>,
}

impl PlaybackCoordinator {
    /// Creates a coordinator bound to an injected engine.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InvalidConfig`] if `config` fails validation.
    pub fn new(engine: Arc<dyn AudioEngine>, config: PlayerConfig) -> Result<Arc<Self>> {
        config.validate().map_err(PlayerError::InvalidConfig)?;
        let events = EventBus::new(config.event_capacity);
        Ok(Arc::new(Self {
            engine,
            config,
            events,
            switch_lock: tokio::sync::Mutex::new(()),
            inner: Mutex::new(Inner {
                item: None,
                resource: None,
                state: PlaybackState::default(),
                generation: 0,
            }),
        }))
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Replaces the current item.
    ///
    /// Any existing session is torn down first. For `Some(item)` a new
    /// session is opened; on success the state becomes
    /// `{duration, 0}`, on failure the coordinator degrades to "no
    /// current item" exactly as if `None` had been passed (an item whose
    /// source cannot be opened is not representable as current). Every
    /// branch broadcasts exactly one state change.
    pub async fn set_current_item(self: &Arc<Self>, item: Option<PlaybackItem>) {
        let _switch = self.switch_lock.lock().await;

        // Tear down the previous session before acquiring a new one. The
        // generation bump invalidates any report still in flight from it.
        let previous = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.item = None;
            inner.state = PlaybackState::default();
            inner.resource.take()
        };
        drop(previous);

        let Some(item) = item else {
            debug!("current item cleared");
            self.events.emit(PlayerEvent::StateChanged).ok();
            return;
        };

        let generation = self.inner.lock().generation;
        let weak = Arc::downgrade(self);
        let callback: ProgressCallback = Box::new(move |update| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.apply_progress(generation, update);
            }
        });

        match PlaybackResource::open(
            &*self.engine,
            item.location(),
            self.config.progress_interval,
            callback,
        )
        .await
        {
            Ok(resource) => {
                let duration = resource.duration();
                // A zero-length source is indistinguishable from "nothing
                // playing" in the public state, so it cannot be installed
                // as current. Dropping the resource releases the session.
                if duration.is_zero() {
                    warn!(
                        source = %item.location().describe(),
                        "source reported zero duration; clearing current item"
                    );
                } else {
                    debug!(
                        item = %item.name(),
                        source = %item.location().describe(),
                        ?duration,
                        "playback session opened"
                    );
                    let mut inner = self.inner.lock();
                    inner.item = Some(item);
                    inner.resource = Some(resource);
                    inner.state = PlaybackState {
                        duration,
                        progress: Duration::ZERO,
                    };
                }
            }
            Err(error) => {
                // Degrades silently: observers only see "no current item".
                warn!(
                    source = %item.location().describe(),
                    %error,
                    "failed to open playback session; clearing current item"
                );
            }
        }
        self.events.emit(PlayerEvent::StateChanged).ok();
    }

    /// Pauses if playing, (re)starts from the current position otherwise.
    /// No-op without a current item.
    ///
    /// A mid-session engine failure here collapses to "ended": the
    /// session is released and the state reset, matching the failure
    /// channel of the progress feed.
    pub fn toggle_play(&self) {
        let outcome = {
            let inner = self.inner.lock();
            inner.resource.as_ref().map(|r| r.toggle_play())
        };
        match outcome {
            None => {}
            Some(Ok(())) => {
                self.events.emit(PlayerEvent::StateChanged).ok();
            }
            Some(Err(error)) => {
                warn!(%error, "engine failed during transport toggle; releasing session");
                self.clear_session_and_notify();
            }
        }
    }

    /// Seeks the current session to `target`, clamped into
    /// `[0, duration]`, effective immediately in any transport state.
    /// No-op without a current item.
    pub fn set_progress(&self, target: Duration) {
        let outcome = {
            let mut inner = self.inner.lock();
            match inner.resource.as_ref().map(|r| r.set_progress(target)) {
                None => return,
                Some(Ok(clamped)) => {
                    inner.state.progress = clamped;
                    Ok(())
                }
                Some(Err(error)) => Err(error),
            }
        };
        match outcome {
            Ok(()) => {
                self.events.emit(PlayerEvent::StateChanged).ok();
            }
            Err(error) => {
                warn!(%error, "engine failed during seek; releasing session");
                self.clear_session_and_notify();
            }
        }
    }

    // ------------------------------------------------------------------
    // Progress feed
    // ------------------------------------------------------------------

    /// Applies a report from a session monitor.
    ///
    /// Reports from a resource that is no longer current are discarded:
    /// no state change, no broadcast. `Ended` resets the coordinator to
    /// empty exactly once; a duplicate is ignored by the same check.
    pub(crate) fn apply_progress(&self, generation: u64, update: ProgressUpdate) {
        let released = {
            let mut inner = self.inner.lock();
            if inner.resource.is_none() || inner.generation != generation {
                debug!(generation, "discarding stale progress report");
                return;
            }
            match update {
                ProgressUpdate::Position(position) => {
                    inner.state.progress = position.min(inner.state.duration);
                    None
                }
                ProgressUpdate::Ended => {
                    debug!("session ended; clearing current item");
                    inner.item = None;
                    inner.state = PlaybackState::default();
                    inner.resource.take()
                }
            }
        };
        drop(released);
        self.events.emit(PlayerEvent::StateChanged).ok();
    }

    fn clear_session_and_notify(&self) {
        let released = {
            let mut inner = self.inner.lock();
            inner.item = None;
            inner.state = PlaybackState::default();
            inner.resource.take()
        };
        drop(released);
        self.events.emit(PlayerEvent::StateChanged).ok();
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Current state snapshot. Re-read this on every notification.
    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state
    }

    /// Handle of the current item, if any.
    pub fn current_item(&self) -> Option<PlaybackItem> {
        self.inner.lock().item.clone()
    }

    /// Transport state of the current session; `Stopped` without one.
    pub fn transport(&self) -> Transport {
        self.inner
            .lock()
            .resource
            .as_ref()
            .map(|r| r.transport())
            .unwrap_or(Transport::Stopped)
    }

    pub fn is_playing(&self) -> bool {
        self.transport() == Transport::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.transport() == Transport::Paused
    }

    /// Subscribes to state-change notifications. Safe to call or drop at
    /// any time, including during teardown.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// The underlying event bus, for hosts that fan out further.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ------------------------------------------------------------------
    // Restoration
    // ------------------------------------------------------------------

    /// Identity path of the current item, for persistence. `None` when
    /// nothing is current or the catalog no longer knows the item.
    pub fn current_item_path(&self, catalog: &dyn Catalog) -> Option<Vec<Uuid>> {
        let item_id = self.inner.lock().item.as_ref().map(|i| i.id())?;
        catalog.path_for(item_id)
    }

    /// Re-attaches to the item a persisted identity path names,
    /// reconstructing the playback session from scratch.
    ///
    /// An unresolvable path leaves the coordinator untouched and returns
    /// `false`.
    pub async fn restore_from_path(self: &Arc<Self>, catalog: &dyn Catalog, path: &[Uuid]) -> bool {
        match catalog.item_at_path(path) {
            Some(item) => {
                self.set_current_item(Some(item)).await;
                true
            }
            None => {
                debug!("restoration path did not resolve; keeping current state");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Test support
    // ------------------------------------------------------------------

    #[cfg(test)]
    pub(crate) fn current_generation(&self) -> u64 {
        self.inner.lock().generation
    }

    #[cfg(test)]
    pub(crate) fn has_resource(&self) -> bool {
        self.inner.lock().resource.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
