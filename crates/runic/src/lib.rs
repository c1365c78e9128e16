//! Runic Babble Core Library
//!
//! Glyph rendering and persona relay for the Madouji writing system.
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - **Domain Layer** (`domain/`): Pure types and transforms
//!   - `entities/`: Glyph table, persona endpoints, payloads
//!   - `value_objects/`: Immutable value types (WrapMode)
//!   - `services/`: Pure text transforms (diacritics, trigger spans, layout)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `platform`: Chat platform RPCs (webhooks, messages, emojis)
//!   - `renderer`: Image rendering backend
//!
//! - **Application** (`application/`): Use cases orchestrating the ports
//!   - `RenderPipeline`, `PersonaCache`, `RelayDispatcher`
//!
//! # Usage
//!
//! ```rust,ignore
//! use runic::{RelayDispatcher, RelayOptions, RenderPipeline};
//!
//! let pipeline = RenderPipeline::new().with_renderer(renderer);
//! let dispatcher = RelayDispatcher::new(platform, pipeline, RelayOptions::default());
//! dispatcher.load_glyph_table(home_guild).await?;
//! dispatcher.on_message(inbound).await?;
//! ```

pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use application::{
    CommandInvocation, InboundMessage, PersonaCache, RelayDispatcher, RelayOptions, RelayOutcome,
    RenderPipeline, DEFAULT_GLYPH_SIZE,
};
pub use domain::{
    compose_diacritics, find_trigger_spans, layout_lines, Attachment, ChannelId, Embed,
    EndpointId, GlyphTable, GuildId, Identity, MessageId, OutgoingMessage, PersonaEndpoint,
    PlatformError, PostedMessage, ReferenceToken, RelayError, RenderedPayload, TriggerSpan,
    UserId, UserProfile, WrapMode,
};
pub use ports::{ChatPlatform, GlyphImageRenderer, ImageRequest};
