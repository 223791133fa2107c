//! stillrisk-model
//!
//! Feature alignment and risk scoring. Turns a clinical input record into
//! the ordered feature vector the trained classifier expects, evaluates the
//! classifier, and maps the resulting probability onto a risk band.

pub mod artifacts;
pub mod classify;
pub mod error;
pub mod manifest;
pub mod normalize;
pub mod scorer;
pub mod xgboost;
