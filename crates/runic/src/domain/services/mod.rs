//! Domain Services
//!
//! Pure text transforms used by the render pipeline.

mod glyph_mapper;
mod layout;
mod trigger;

pub use glyph_mapper::*;
pub use layout::*;
pub use trigger::*;
