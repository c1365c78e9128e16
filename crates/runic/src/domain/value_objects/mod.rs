//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod wrap_mode;

pub use wrap_mode::*;
