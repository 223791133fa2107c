use tracing::warn;

use stillrisk_core::models::assessment::ExplanationSource;

use crate::request::{Explainer, ExplanationRequest};
use crate::rules::RuleBasedExplainer;

#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub bullets: Vec<String>,
    pub source: ExplanationSource,
}

/// Ask the remote explainer first, if any, and fall back to the rule table
/// on any failure. Never fails.
pub fn compose(remote: Option<&dyn Explainer>, request: &ExplanationRequest<'_>) -> Explanation {
    if let Some(explainer) = remote {
        match explainer.explain(request) {
            Ok(bullets) if !bullets.is_empty() => {
                return Explanation {
                    bullets,
                    source: ExplanationSource::Remote,
                };
            }
            Ok(_) => {
                warn!(
                    explainer = explainer.name(),
                    "remote explanation had no bullets, using rules"
                );
            }
            Err(e) => {
                warn!(
                    explainer = explainer.name(),
                    error = %e,
                    "remote explanation failed, using rules"
                );
            }
        }
    }

    Explanation {
        bullets: RuleBasedExplainer.bullets(request),
        source: ExplanationSource::RuleBased,
    }
}
