//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the relay interacts with the
//! chat platform and the image backend.
//!
//! Implementations of these traits live in the integration crates.

mod platform;
mod renderer;

pub use platform::*;
pub use renderer::*;
