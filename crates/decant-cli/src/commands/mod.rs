//! Subcommand implementations.

pub mod completion;
pub mod copy;
pub mod extract;
