//! Structured backend responses, held verbatim for display and export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The backend's geo-specific-logic decision.
///
/// Unknown wire values fold to `Unclear` rather than failing the whole
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoDecision {
    Yes,
    No,
    #[serde(other)]
    Unclear,
}

impl GeoDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoDecision::Yes => "yes",
            GeoDecision::No => "no",
            GeoDecision::Unclear => "unclear",
        }
    }
}

/// A law referenced by a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawRef {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub article_or_section: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// The audit record accompanying a verdict.
///
/// Known keys get typed access; anything else the backend sends is kept
/// verbatim in `extra` and round-trips untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// Union of detected and caller-provided signals.
    #[serde(default)]
    pub rules_hit: Vec<String>,
    /// Only what the caller supplied.
    #[serde(default)]
    pub rules_input: Vec<String>,
    #[serde(default)]
    pub regions_inferred: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_filter_used: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Provenance {
    /// Signals to display: the detected union when present, otherwise the
    /// caller's input for transparency.
    pub fn display_signals(&self) -> &[String] {
        if self.rules_hit.is_empty() {
            &self.rules_input
        } else {
            &self.rules_hit
        }
    }
}

/// A single-artifact classification result. Never mutated after receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub needs_geo_logic: GeoDecision,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub laws: Vec<LawRef>,
    /// Trusted as returned; never recomputed here.
    pub confidence: f64,
    #[serde(default)]
    pub provenance: Provenance,
}

/// One row of a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub feature_text: String,
    pub needs_geo_logic: GeoDecision,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub laws: Vec<LawRef>,
    pub confidence: f64,
    #[serde(default)]
    pub rule_hits: Vec<String>,
}

/// Full batch response: structured rows plus an optional pre-serialized
/// CSV export produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub rows: Vec<BatchRow>,
    #[serde(default)]
    pub csv: Option<String>,
}
