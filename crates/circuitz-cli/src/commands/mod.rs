//! CLI command implementations.

pub mod clock;
pub mod config;
pub mod demo;
pub mod kinds;
pub mod table;
