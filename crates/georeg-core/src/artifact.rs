//! Shared request types exchanged with the classification backend.

use serde::{Deserialize, Serialize};

/// One unit of input text describing a product feature.
///
/// Built by the ingestion layer from a tabular row, a JSON line, or a raw
/// line of text. Immutable once built; consumed once by the request router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureArtifact {
    pub feature_text: String,
    /// Short signal tags asserted about the artifact. Order-preserving;
    /// duplicates are kept (the backend unions them with detected signals).
    #[serde(default)]
    pub rule_hits: Vec<String>,
}

impl FeatureArtifact {
    pub fn new(feature_text: impl Into<String>, rule_hits: Vec<String>) -> Self {
        Self {
            feature_text: feature_text.into(),
            rule_hits,
        }
    }

    /// An artifact with no asserted signals.
    pub fn text_only(feature_text: impl Into<String>) -> Self {
        Self::new(feature_text, Vec::new())
    }

    pub fn has_signals(&self) -> bool {
        !self.rule_hits.is_empty()
    }
}
