//! CLI command implementations.

pub mod lookup;
pub mod secrets;
