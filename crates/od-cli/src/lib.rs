//! Overseas-day counter CLI library.
//!
//! This crate provides the CLI interface: reading event files, loading
//! configuration and rendering results.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
