//! Ranking results → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): `Score: 1.2345` then `Post: ...`, one block per result
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of every query's results

use postrank_core::{Candidate, Error};
use postrank_search::{Ranked, TermContribution};
use serde_json::{json, Value};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Results for one query.
#[derive(Debug)]
pub struct QueryReport<'a> {
    pub label: String,
    pub results: Vec<Ranked<'a, Candidate>>,
    /// Per-result breakdown, parallel to `results`, when `--explain` is set
    pub explanations: Option<Vec<Vec<TermContribution>>>,
}

/// Format every query's results.
pub fn format_reports(reports: &[QueryReport<'_>], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(reports),
        OutputMode::Human => format_human(reports),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_human(reports: &[QueryReport<'_>]) -> String {
    let mut out = String::new();
    let with_headers = reports.len() > 1;

    for report in reports {
        if with_headers {
            out.push_str(&format!("== {}\n", report.label));
        }
        if report.results.is_empty() {
            out.push_str("(no results)\n\n");
            continue;
        }
        for (i, ranked) in report.results.iter().enumerate() {
            out.push_str(&format!("Score: {:.4}\n", ranked.score));
            out.push_str(&format!("Post: {}\n", ranked.candidate.text));
            if let Some(reshare) = &ranked.candidate.reshare {
                out.push_str(&format!("Reshare: {}\n", reshare.text));
            }
            if let Some(parts) = report.explanations.as_ref().and_then(|e| e.get(i)) {
                for part in parts {
                    out.push_str(&format!(
                        "  {}  tf={} idf={:.4} weight={:.4} -> {:.4}\n",
                        part.term, part.tf, part.idf, part.weight, part.contribution
                    ));
                }
            }
            out.push('\n');
        }
    }
    out
}

fn contribution_json(part: &TermContribution) -> Value {
    json!({
        "term": part.term,
        "tf": part.tf,
        "idf": part.idf,
        "weight": part.weight,
        "contribution": part.contribution,
    })
}

fn format_json(reports: &[QueryReport<'_>]) -> String {
    let queries: Vec<Value> = reports
        .iter()
        .map(|report| {
            let results: Vec<Value> = report
                .results
                .iter()
                .enumerate()
                .map(|(i, ranked)| {
                    let mut entry = json!({
                        "index": ranked.index,
                        "score": ranked.score,
                        "post": ranked.candidate,
                    });
                    if let Some(parts) = report.explanations.as_ref().and_then(|e| e.get(i)) {
                        entry["explain"] = parts.iter().map(contribution_json).collect();
                    }
                    entry
                })
                .collect();
            json!({ "query": report.label, "results": results })
        })
        .collect();

    serde_json::to_string_pretty(&queries).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
