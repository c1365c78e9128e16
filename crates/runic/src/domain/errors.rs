//! Domain Errors
//!
//! Error types for relay operations.

use thiserror::Error;

use super::entities::ChannelId;

/// Failures reported by the chat platform
///
/// Adapters map their transport errors onto these variants so that the
/// relay can tell apart the cases it recovers from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The remote object does not exist (anymore)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The bot lacks the permission for this operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The target cannot support the operation at all (e.g. threads and webhooks)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Platform request failed: {0}")]
    Request(String),
}

/// Relay layer errors
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Reference symbol source is missing {} token(s): {}", missing.len(), missing.join(", "))]
    GlyphTableIncomplete { missing: Vec<String> },

    #[error("Glyph table has not been loaded yet")]
    GlyphTableNotLoaded,

    #[error("Persona endpoint for channel {channel_id} vanished again after being recreated")]
    EndpointVanished { channel_id: ChannelId },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RelayError {
    /// Whether this error means the render pipeline must not serve traffic
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::GlyphTableIncomplete { .. } | Self::GlyphTableNotLoaded
        )
    }
}
