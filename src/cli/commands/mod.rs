//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod extract;
pub mod generate;
pub mod validate;
