//! Terminal event handlers.

pub mod keyboard;
pub mod mouse;
