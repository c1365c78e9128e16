//! Domain Entities
//!
//! Pure domain models without platform dependencies.
//! - Ids: Snowflake newtypes for channels, messages, users, guilds, endpoints
//! - GlyphTable: Symbol to emoji token mapping
//! - PersonaEndpoint: Per-channel impersonation webhook
//! - Payload: Rendered output and the outgoing message shape

mod glyph_table;
mod ids;
mod payload;
mod persona;

pub use glyph_table::*;
pub use ids::*;
pub use payload::*;
pub use persona::*;
