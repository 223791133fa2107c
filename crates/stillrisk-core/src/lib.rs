//! stillrisk-core
//!
//! Pure domain types for stillbirth risk assessment: the clinical input
//! record, risk bands, assessment records, the session history log and the
//! bilingual text table. No model, network or file dependency.

pub mod error;
pub mod i18n;
pub mod models;
