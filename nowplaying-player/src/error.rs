//! # Player Error Types
//!
//! Error types for playback-session operations.
//!
//! Note that the coordinator deliberately does not surface these to
//! observers: construction and playback failures degrade to "no current
//! item" (see [`crate::coordinator`]). The taxonomy exists for engine
//! implementations and for hosts that call the engine seam directly.

use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlayerError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The source location does not resolve to any playable media.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Failed to open or read the audio source.
    #[error("Failed to open audio source: {0}")]
    SourceError(String),

    // ========================================================================
    // Format Errors
    // ========================================================================
    /// The source was readable but its format is not recognized or cannot
    /// be decoded by the engine.
    #[error("Unsupported or invalid audio format: {0}")]
    InvalidFormat(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// The engine failed during an active session.
    #[error("Playback operation failed: {0}")]
    PlaybackFailed(String),

    /// Seeking is not supported for this audio source.
    #[error("Seeking not supported")]
    SeekNotSupported,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The player configuration failed validation.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlayerError {
    /// Returns `true` if this error occurred while acquiring the source,
    /// i.e. before a session existed. The coordinator treats these
    /// identically to "no current item".
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            PlayerError::SourceNotFound(_)
                | PlayerError::SourceError(_)
                | PlayerError::InvalidFormat(_)
                | PlayerError::Io(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_classification() {
        assert!(PlayerError::SourceNotFound("x".into()).is_source_error());
        assert!(PlayerError::SourceError("x".into()).is_source_error());
        assert!(PlayerError::InvalidFormat("x".into()).is_source_error());
        assert!(!PlayerError::PlaybackFailed("x".into()).is_source_error());
        assert!(!PlayerError::SeekNotSupported.is_source_error());
    }
}
