//! CLI subcommand implementations.

pub mod correct;
pub mod count;
pub mod input;
pub mod util;
