//! Application Services (Use Cases)
//!
//! Orchestrate the domain transforms and the platform ports.

mod persona_cache;
mod relay;
mod render_pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use persona_cache::PersonaCache;
pub use relay::{CommandInvocation, InboundMessage, RelayDispatcher, RelayOptions, RelayOutcome};
pub use render_pipeline::{RenderPipeline, DEFAULT_GLYPH_SIZE};
