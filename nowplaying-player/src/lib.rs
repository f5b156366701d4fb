//! # Now-Playing Player
//!
//! Shared playback coordination for audio-recording hosts.
//!
//! This crate centralizes "what is playing right now" behind a single
//! coordinator so multiple presentation surfaces (a detail pane, a
//! mini-player, a lock-screen widget) stay consistent without talking to
//! each other. It owns session lifecycle and transport; decoding and
//! audio output stay behind the [`engine::AudioEngine`] seam so platform
//! bridges supply the real engine and tests run against
//! [`sim::SimulatedEngine`].
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           presentation collaborators          │
//! │    (commands in, StateChanged + re-read out)  │
//! └──────────────────────┬────────────────────────┘
//!                        │
//!            ┌───────────▼───────────┐
//!            │  PlaybackCoordinator  │  at most one current item
//!            └───────────┬───────────┘
//!                        │ owns 0..1
//!            ┌───────────▼───────────┐
//!            │   PlaybackResource    │  transport + progress monitor
//!            └───────────┬───────────┘
//!                        │ drives
//!            ┌───────────▼───────────┐
//!            │  AudioEngine session  │  platform / simulated
//!            └───────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use nowplaying_player::{
//!     catalog::{MediaLocation, PlaybackItem},
//!     config::PlayerConfig,
//!     coordinator::PlaybackCoordinator,
//!     sim::SimulatedEngine,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo() -> nowplaying_player::Result<()> {
//! let engine = Arc::new(SimulatedEngine::new());
//! let location = MediaLocation::LocalFile { path: "/recordings/memo.m4a".into() };
//! engine.register(location.clone(), Duration::from_secs(30));
//!
//! let coordinator = PlaybackCoordinator::new(engine, PlayerConfig::default())?;
//! let mut events = coordinator.subscribe();
//!
//! coordinator
//!     .set_current_item(Some(PlaybackItem::new("Memo", location)))
//!     .await;
//! coordinator.toggle_play();
//!
//! while let Ok(_event) = events.recv().await {
//!     let state = coordinator.state();
//!     println!("{:?} / {:?}", state.progress, state.duration);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod resource;
pub mod sim;

pub use catalog::{Catalog, MediaLocation, MemoryCatalog, PlaybackItem};
pub use config::PlayerConfig;
pub use coordinator::{PlaybackCoordinator, PlaybackState};
pub use engine::{AudioEngine, EngineSession, ProgressUpdate};
pub use error::{PlayerError, Result};
pub use resource::{PlaybackResource, Transport};
pub use sim::SimulatedEngine;

pub use nowplaying_runtime::events::{EventBus, PlayerEvent};
