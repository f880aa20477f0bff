//! Shared plumbing for the `rotate-crop` and `ela` binaries.

pub mod commands;
pub mod config;
pub mod io;
pub mod logging;
pub mod sink;
