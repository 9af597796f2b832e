//! Command implementations for the rprov CLI

pub mod completions;
pub mod env;
pub mod install;
pub mod list;
pub mod verify;
pub mod version;
