//! Export projections: the audit JSON artifact and flattened tabular rows.

use crate::verdict::{BatchOutcome, BatchRow, LawRef, Verdict};

/// Pretty-print a verdict for the downloadable audit artifact.
pub fn audit_json(verdict: &Verdict) -> serde_json::Result<String> {
    serde_json::to_string_pretty(verdict)
}

/// The backend-provided CSV export, when the batch requested one.
///
/// No client-side synthesis: when the backend returned no CSV the
/// structured rows are the only export. This keeps the client and
/// backend export formats byte-identical.
pub fn batch_csv(outcome: &BatchOutcome) -> Option<&str> {
    outcome.csv.as_deref()
}

/// Flattened projection of one batch row for tabular display.
///
/// Built at export time and discarded after. Laws collapse to
/// `name | region | article | source` fragments joined by `"; "`, and rule
/// hits join with `";"`, matching the backend's own CSV flattener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub feature_text: String,
    pub decision: String,
    pub reasoning: String,
    pub laws: String,
    pub confidence: String,
    pub rule_hits: String,
}

impl ExportRow {
    pub fn from_row(row: &BatchRow) -> Self {
        let laws = row
            .laws
            .iter()
            .map(law_str)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            feature_text: row.feature_text.clone(),
            decision: row.needs_geo_logic.as_str().to_string(),
            reasoning: row.reasoning.clone(),
            laws,
            confidence: format!("{:.2}", row.confidence),
            rule_hits: row.rule_hits.join(";"),
        }
    }
}

fn law_str(law: &LawRef) -> String {
    [
        Some(law.name.as_str()),
        law.region.as_deref(),
        law.article_or_section.as_deref(),
        law.source.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" | ")
}
