//! Terminal view: input parsing, rendering and the event loop.

pub mod app;
pub mod input;
pub mod render;
