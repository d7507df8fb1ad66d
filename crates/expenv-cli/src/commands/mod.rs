//! CLI command implementations.

pub mod patches;
pub mod render;
pub mod steps;
pub mod table;
