//! Command implementations for rnictl CLI

pub mod clean;
pub mod completions;
pub mod helpers;
pub mod install;
pub mod start;
pub mod status;
pub mod version;
