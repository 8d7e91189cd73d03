//! Subcommand implementations

pub mod limits;
pub mod plan;
