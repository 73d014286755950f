// src/cli/mod.rs
//! Command-line front end.

pub mod args;
pub mod handlers;
pub mod logging;

pub use args::Cli;
