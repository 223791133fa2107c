//! stillrisk-explain
//!
//! Short bullet explanations for a risk band, either from a remote chat
//! model or from a fixed table of clinical checks.

pub mod compose;
pub mod error;
pub mod openrouter;
pub mod request;
pub mod rules;

pub use compose::{compose, Explanation};
pub use request::{Explainer, ExplanationRequest};
