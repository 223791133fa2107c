//! stillrisk-export
//!
//! Single-page PDF reports, bilingual CSV history files and console
//! summaries.

pub mod csv;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod render;
pub mod shaping;
pub mod styles;
