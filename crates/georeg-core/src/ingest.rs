//! Row normalization: tabular rows, raw lines, or JSON-per-line records
//! into [`FeatureArtifact`]s.
//!
//! Every path is best-effort. A line that fails to parse as JSON becomes
//! an artifact with the raw line as its text; a malformed tabular row
//! degrades to whatever fields it carries. Nothing here raises.

use serde_json::Value;
use tracing::debug;

use crate::artifact::FeatureArtifact;
use crate::tabular;

/// Normalize delimited tabular text into artifacts.
///
/// The first row is the header (case-insensitive, trimmed). Column
/// precedence per row:
/// 1. a non-empty `feature_text` cell;
/// 2. `feature_name` / `feature_description` cells joined with a blank line;
/// 3. all cells joined with `", "` as a last resort.
///
/// Rows whose cells are all empty are skipped. A `rule_hits` cell is split
/// on runs of comma, semicolon, or whitespace.
pub fn from_csv(text: &str) -> Vec<FeatureArtifact> {
    let rows = tabular::parse(text);
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let col = |name: &str| header.iter().position(|h| h == name);

    let idx_text = col("feature_text");
    let idx_name = col("feature_name");
    let idx_desc = col("feature_description");
    let idx_rules = col("rule_hits");

    let mut out = Vec::new();
    for row in data {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        // Rows shorter than the header read missing cells as empty.
        let cell =
            |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("");

        let text_cell = cell(idx_text);
        let feature_text = if !text_cell.is_empty() {
            text_cell.to_string()
        } else if idx_name.is_some() || idx_desc.is_some() {
            [cell(idx_name), cell(idx_desc)]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n\n")
        } else {
            row.join(", ")
        };

        let feature_text = feature_text.trim();
        if feature_text.is_empty() {
            continue;
        }
        let rule_hits = split_rule_hits(cell(idx_rules));
        out.push(FeatureArtifact::new(feature_text, rule_hits));
    }
    debug!(artifacts = out.len(), "normalized tabular input");
    out
}

/// Normalize newline-delimited input: one artifact per non-empty line.
///
/// Each line is first tried as a single-line JSON record with
/// `feature_text` / `rule_hits` fields; anything that fails to parse is
/// taken verbatim as untagged artifact text.
pub fn from_lines(text: &str) -> Vec<FeatureArtifact> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(artifact_from_line)
        .collect()
}

fn artifact_from_line(line: &str) -> FeatureArtifact {
    let Ok(value) = serde_json::from_str::<Value>(line) else {
        return FeatureArtifact::text_only(line);
    };
    let feature_text = match value.get("feature_text").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => line.to_string(),
    };
    let rule_hits = value
        .get("rule_hits")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    FeatureArtifact::new(feature_text, rule_hits)
}

/// Split a raw tag cell on runs of comma, semicolon, or whitespace.
pub fn split_rule_hits(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Serialize artifacts one JSON object per line, for review and editing
/// before submission.
pub fn to_jsonl(artifacts: &[FeatureArtifact]) -> serde_json::Result<String> {
    let lines = artifacts
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}
