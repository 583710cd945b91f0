//! `dup-cli` subcommands.

pub mod duplicate;
pub mod show;
pub mod stage;
