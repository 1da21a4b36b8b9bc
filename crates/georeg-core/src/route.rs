//! Request routing: derive the backend mode and endpoint from the input
//! set itself.
//!
//! Mode is a pure function of the artifacts, never caller-configurable.
//! Routing stays deterministic and auditable: the same inputs always hit
//! the same endpoint with the same payload.

use crate::artifact::FeatureArtifact;
use crate::region::RegionConstraint;

/// Default retrieval depth per classified row.
pub const DEFAULT_K: u32 = 5;

/// Backend invocation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The caller supplied signal tags for at least one artifact.
    ExplicitSignals,
    /// No artifact carries tags; the backend detects signals itself.
    AutoDetect,
}

/// Select the mode for a set of artifacts.
///
/// All-or-nothing per batch: one tagged artifact routes the whole batch as
/// explicit, and untagged rows within it rely on the backend's own per-row
/// detection fallback. There is no client-side per-row split.
pub fn mode(artifacts: &[FeatureArtifact]) -> Mode {
    if artifacts.iter().any(FeatureArtifact::has_signals) {
        Mode::ExplicitSignals
    } else {
        Mode::AutoDetect
    }
}

/// A planned single-artifact classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePlan {
    pub mode: Mode,
    pub feature_text: String,
    pub rule_hits: Vec<String>,
    pub regions: Option<Vec<String>>,
}

impl SinglePlan {
    pub fn endpoint(&self) -> &'static str {
        match self.mode {
            Mode::ExplicitSignals => "/classify",
            Mode::AutoDetect => "/classify_auto",
        }
    }
}

/// Plan a single-artifact request.
///
/// When a region constraint is active the artifact text is suffixed with a
/// human-readable assumption annotation carrying the user-facing label.
/// This feeds the backend's text heuristics; the structured `regions`
/// field is sent alongside it, and both are deliberate.
pub fn plan_single(artifact: &FeatureArtifact, constraint: &RegionConstraint) -> SinglePlan {
    let feature_text = match constraint.label() {
        Some(label) => format!(
            "{}\n\n[Assumption: operating in {label}]",
            artifact.feature_text
        ),
        None => artifact.feature_text.clone(),
    };
    SinglePlan {
        mode: mode(std::slice::from_ref(artifact)),
        feature_text,
        rule_hits: artifact.rule_hits.clone(),
        regions: constraint.to_codes(),
    }
}

/// A planned batch classification request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub mode: Mode,
    pub rows: Vec<FeatureArtifact>,
    /// Retrieval depth per row.
    pub k: u32,
    /// Ask the backend to include a pre-serialized CSV export.
    pub csv: bool,
    pub regions: Option<Vec<String>>,
}

impl BatchPlan {
    pub fn endpoint(&self) -> &'static str {
        match self.mode {
            Mode::ExplicitSignals => "/batch_classify",
            Mode::AutoDetect => "/batch_classify_auto",
        }
    }
}

/// Plan a batch request. Rows are carried as-is; the region constraint
/// applies to every row.
pub fn plan_batch(
    artifacts: Vec<FeatureArtifact>,
    constraint: &RegionConstraint,
    k: u32,
    csv: bool,
) -> BatchPlan {
    BatchPlan {
        mode: mode(&artifacts),
        rows: artifacts,
        k,
        csv,
        regions: constraint.to_codes(),
    }
}
