//! stillrisk-cli
//!
//! Configuration and the assessment pipeline behind the `stillrisk` binary.

pub mod config;
pub mod error;
pub mod pipeline;
