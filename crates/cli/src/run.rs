//! `rank` subcommand execution.
//!
//! Everything here returns the rendered output instead of printing it, so
//! `main` only dispatches and writes to stdout.

use postrank_core::{Candidate, Error, Result, RetrievalStats, UserHistory};
use postrank_search::{rank_top_k_with, Retriever};
use tracing::{info, warn};

use crate::format::{format_reports, OutputMode, QueryReport};
use crate::parse::RankArgs;

/// Pick the candidate pool out of a user's history
///
/// Drops the post named by `exclude_id` and enforces `min_candidates`
/// on what is left.
pub fn select_candidates(
    history: UserHistory,
    exclude_id: Option<&str>,
    min_candidates: Option<usize>,
) -> Result<Vec<Candidate>> {
    let total = history.weibo.len();
    let posts = match exclude_id {
        Some(id) => {
            let posts = history.without_post(id);
            if posts.len() == total {
                warn!(target: "postrank::cli", id, "Excluded post id not found in history");
            }
            posts
        }
        None => history.weibo,
    };

    if let Some(required) = min_candidates {
        if posts.len() < required {
            return Err(Error::TooFewCandidates {
                candidates: posts.len(),
                required,
            });
        }
    }
    Ok(posts)
}

/// Run every query of a `rank` invocation and render the results
pub fn run_rank(args: &RankArgs, mode: OutputMode) -> Result<String> {
    let retriever = Retriever::from_config(&args.config)?;
    let history = UserHistory::from_file(&args.history)?;
    let posts = select_candidates(history, args.exclude_id.as_deref(), args.min_candidates)?;
    info!(
        target: "postrank::cli",
        path = %args.history.display(),
        candidates = posts.len(),
        "Loaded history"
    );

    let mut stats = RetrievalStats::new();
    let mut reports = Vec::with_capacity(args.queries.len());
    for source in &args.queries {
        let query = source.read()?;
        let report = if args.explain {
            let model = retriever.model(&posts)?;
            let results = rank_top_k_with(&model, &query, &posts, retriever.options())?;
            stats.record(posts.len(), results.len());
            let prepared = model.prepare_query(&query);
            let explanations = results
                .iter()
                .map(|r| model.explain(&prepared, r.index))
                .collect::<Result<Vec<_>>>()?;
            QueryReport {
                label: source.label(),
                results,
                explanations: Some(explanations),
            }
        } else {
            QueryReport {
                label: source.label(),
                results: retriever.retrieve(&query, &posts, &mut stats)?,
                explanations: None,
            }
        };
        reports.push(report);
    }

    let output = format_reports(&reports, mode);

    info!(
        target: "postrank::cli",
        queries = stats.queries,
        candidates = stats.total_candidates,
        returned = stats.total_returned,
        tokenizer = retriever.tokenizer().name(),
        "Ranking finished"
    );
    Ok(output)
}
