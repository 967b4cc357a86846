//! Backend bridge: commands from the view and the worker that runs them.

pub mod commands;
pub mod runtime;
