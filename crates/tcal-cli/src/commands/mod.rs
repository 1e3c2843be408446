//! CLI command implementations.

pub mod convert;
pub mod events;
pub mod show;
