//! Terminal rendering of verdicts, batch rows, and retrieval previews.

use georeg_client::{LawEntry, SearchDoc};
use georeg_core::export::ExportRow;
use georeg_core::verdict::{BatchRow, GeoDecision, LawRef, Verdict};

const BAR_WIDTH: usize = 20;
const MAX_FEATURE_CHARS: usize = 60;

/// Print a single verdict as a vertical card.
pub fn print_verdict(verdict: &Verdict) {
    println!(
        "=== {} ===  {}",
        badge(verdict.needs_geo_logic),
        confidence_bar(verdict.confidence)
    );

    let prov = &verdict.provenance;
    if !prov.regions_inferred.is_empty() {
        println!("regions: {}", prov.regions_inferred.join(", "));
    }
    if let Some(used) = prov.region_filter_used {
        println!("region filter {}", if used { "on" } else { "off" });
    }
    if !verdict.reasoning.is_empty() {
        println!("\n{}", verdict.reasoning);
    }

    if !verdict.laws.is_empty() {
        println!("\nLaws");
        for law in &verdict.laws {
            print_law(law);
        }
    }

    let signals = prov.display_signals();
    if !signals.is_empty() {
        println!("\nSignals");
        println!("  {}", signals.join(", "));
    }

    println!("\nProvenance");
    match serde_json::to_string_pretty(prov) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("  (unrenderable)"),
    }
}

/// Print batch rows as flattened one-row summaries.
pub fn print_batch(rows: &[BatchRow]) {
    println!("{} rows", rows.len());
    for (i, row) in rows.iter().enumerate() {
        let flat = ExportRow::from_row(row);
        let one_line = flat.feature_text.replace('\n', " ");
        println!(
            "{:>3}. [{:<7}] {}  {}",
            i + 1,
            flat.decision,
            flat.confidence,
            truncate(&one_line, MAX_FEATURE_CHARS)
        );
        if !flat.laws.is_empty() {
            println!("     laws: {}", flat.laws);
        }
        if !flat.rule_hits.is_empty() {
            println!("     signals: {}", flat.rule_hits);
        }
    }
}

/// Print retrieved documents with their law metadata line.
pub fn print_docs(docs: &[SearchDoc]) {
    println!("{} docs", docs.len());
    for doc in docs {
        let meta = |key: &str| {
            doc.metadata
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        };
        println!(
            "--- {} · {} · {}",
            meta("law_name"),
            meta("region"),
            meta("article_or_section")
        );
        println!("{}", doc.content);
    }
}

/// Print knowledge-base entries.
pub fn print_law_entries(laws: &[LawEntry]) {
    println!("{} laws", laws.len());
    for law in laws {
        println!("{}", law.law_name);
        println!("  {} · {}", law.region, law.file_path);
        if !law.source.is_empty() {
            println!("  {}", law.source);
        }
    }
}

fn print_law(law: &LawRef) {
    print!("  {}", law.name);
    if let Some(region) = law.region.as_deref().filter(|r| !r.is_empty()) {
        print!("  {region}");
    }
    if let Some(article) = law.article_or_section.as_deref().filter(|a| !a.is_empty()) {
        print!("  {article}");
    }
    if let Some(source) = law.source.as_deref().filter(|s| !s.is_empty()) {
        print!("  {source}");
    }
    println!();
}

fn badge(decision: GeoDecision) -> String {
    decision.as_str().to_uppercase()
}

fn confidence_bar(confidence: f64) -> String {
    let pct = (confidence * 100.0).round().clamp(0.0, 100.0) as usize;
    let filled = pct * BAR_WIDTH / 100;
    format!(
        "confidence [{}{}] {pct}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}
