//! Feature manifest: the authoritative, ordered list of feature names the
//! trained model was fitted on.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::ModelError;

/// Header line some manifest files start with. Never a feature name.
pub const HEADER_TOKEN: &str = "feature";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureManifest {
    names: Vec<String>,
}

impl FeatureManifest {
    /// Build a manifest, rejecting empty lists and duplicate names.
    pub fn new(names: Vec<String>) -> Result<Self, ModelError> {
        if names.is_empty() {
            return Err(ModelError::InvalidManifest("no feature names".to_string()));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidManifest(format!(
                    "duplicate feature name '{name}'"
                )));
            }
        }

        Ok(Self { names })
    }

    /// Parse the plain-text format: one name per line, blank lines and the
    /// `feature` header ignored, surrounding whitespace trimmed.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != HEADER_TOKEN)
            .map(str::to_string)
            .collect();
        Self::new(names)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ModelError::unavailable(path.display().to_string(), e))?;
        let manifest = Self::parse(&text)?;
        info!(path = %path.display(), features = manifest.len(), "loaded feature manifest");
        Ok(manifest)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
