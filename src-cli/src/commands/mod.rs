//! CLI command modules

pub mod align;
pub mod cleanup;
pub mod merge;
