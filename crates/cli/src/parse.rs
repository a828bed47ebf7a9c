//! ArgMatches → CliAction conversion.
//!
//! Also resolves the effective [`RetrievalConfig`]: config file first, then
//! command-line overrides, then one validation pass over the result.

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use postrank_core::{Error, Result, RetrievalConfig, TokenizerKind, CONFIG_FILE_NAME};

/// Where a query's text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    /// Given inline with `--query`
    Inline(String),
    /// Read from a file with `--query-file`
    File(PathBuf),
}

impl QuerySource {
    /// Short label for output headers
    pub fn label(&self) -> String {
        match self {
            QuerySource::Inline(text) => text.chars().take(40).collect(),
            QuerySource::File(path) => path.display().to_string(),
        }
    }

    /// Query text
    pub fn read(&self) -> Result<String> {
        match self {
            QuerySource::Inline(text) => Ok(text.clone()),
            QuerySource::File(path) => Ok(std::fs::read_to_string(path)?),
        }
    }
}

/// Arguments of the `rank` subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct RankArgs {
    pub history: PathBuf,
    pub queries: Vec<QuerySource>,
    pub exclude_id: Option<String>,
    /// Smallest acceptable pool after exclusion
    pub min_candidates: Option<usize>,
    pub explain: bool,
    pub config: RetrievalConfig,
}

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// Rank history posts against queries
    Rank(RankArgs),
    /// Print the default config file
    PrintConfig,
}

/// Convert parsed matches into an action.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is out of range.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction> {
    match matches.subcommand() {
        Some(("rank", sub)) => {
            let config = resolve_config(sub)?;
            Ok(CliAction::Rank(RankArgs {
                history: sub
                    .get_one::<PathBuf>("history")
                    .cloned()
                    .ok_or_else(|| Error::invalid_config("--history is required"))?,
                queries: collect_queries(sub),
                exclude_id: sub.get_one::<String>("exclude-id").cloned(),
                min_candidates: sub.get_one::<usize>("min-candidates").copied(),
                explain: sub.get_flag("explain"),
                config,
            }))
        }
        Some(("config", _)) => Ok(CliAction::PrintConfig),
        Some((other, _)) => Err(Error::invalid_config(format!(
            "Unknown subcommand '{}'",
            other
        ))),
        None => Err(Error::invalid_config("No subcommand given")),
    }
}

fn collect_queries(sub: &ArgMatches) -> Vec<QuerySource> {
    let mut queries: Vec<QuerySource> = sub
        .get_many::<String>("query")
        .into_iter()
        .flatten()
        .map(|q| QuerySource::Inline(q.clone()))
        .collect();
    queries.extend(
        sub.get_many::<PathBuf>("query-file")
            .into_iter()
            .flatten()
            .map(|p| QuerySource::File(p.clone())),
    );
    queries
}

/// Load the base config and apply command-line overrides.
fn resolve_config(sub: &ArgMatches) -> Result<RetrievalConfig> {
    let explicit = sub.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let mut config = load_base_config(explicit, Path::new(CONFIG_FILE_NAME))?;

    if let Some(&top_k) = sub.get_one::<usize>("top-k") {
        config.top_k = top_k;
    }
    if let Some(&k1) = sub.get_one::<f64>("k1") {
        config.k1 = k1;
    }
    if let Some(&b) = sub.get_one::<f64>("b") {
        config.b = b;
    }
    if let Some(name) = sub.get_one::<String>("tokenizer") {
        config.tokenizer = name.parse::<TokenizerKind>()?;
    }
    if sub.get_flag("parallel") {
        config.parallel = true;
    }

    config.validate()?;
    Ok(config)
}

/// Explicit `--config` must exist; the default file is optional.
fn load_base_config(explicit: Option<&Path>, default_path: &Path) -> Result<RetrievalConfig> {
    match explicit {
        Some(path) => RetrievalConfig::from_file(path),
        None if default_path.exists() => RetrievalConfig::from_file(default_path),
        None => Ok(RetrievalConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Result<CliAction> {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        matches_to_action(&matches)
    }

    #[test]
    fn test_parse_rank_overrides() {
        let action = parse(&[
            "postrank",
            "rank",
            "--history",
            "u.json",
            "-q",
            "新闻",
            "--query-file",
            "news.txt",
            "-k",
            "5",
            "--k1",
            "1.2",
            "--b",
            "0.5",
            "--tokenizer",
            "bigram",
            "--exclude-id",
            "42",
            "--min-candidates",
            "10",
            "--parallel",
            "--explain",
        ])
        .unwrap();

        let CliAction::Rank(args) = action else {
            panic!("expected rank action");
        };
        assert_eq!(args.history, PathBuf::from("u.json"));
        assert_eq!(
            args.queries,
            vec![
                QuerySource::Inline("新闻".to_string()),
                QuerySource::File(PathBuf::from("news.txt")),
            ]
        );
        assert_eq!(args.exclude_id.as_deref(), Some("42"));
        assert_eq!(args.min_candidates, Some(10));
        assert!(args.explain);
        assert_eq!(args.config.top_k, 5);
        assert_eq!(args.config.k1, 1.2);
        assert_eq!(args.config.b, 0.5);
        assert_eq!(args.config.tokenizer, TokenizerKind::Bigram);
        assert!(args.config.parallel);
    }

    #[test]
    fn test_parse_rank_rejects_bad_b() {
        let err = parse(&["postrank", "rank", "--history", "u.json", "-q", "x", "--b", "2"])
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_parse_config_subcommand() {
        assert_eq!(parse(&["postrank", "config"]).unwrap(), CliAction::PrintConfig);
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "top_k = 9\ntokenizer = \"whitespace\"\n").unwrap();

        let action = parse(&[
            "postrank",
            "--config",
            path.to_str().unwrap(),
            "rank",
            "--history",
            "u.json",
            "-q",
            "x",
        ])
        .unwrap();
        let CliAction::Rank(args) = action else {
            panic!("expected rank action");
        };
        assert_eq!(args.config.top_k, 9);
        assert_eq!(args.config.tokenizer, TokenizerKind::Whitespace);
    }

    #[test]
    fn test_load_base_config_missing_explicit_is_error() {
        let err = load_base_config(
            Some(Path::new("/nonexistent/postrank.toml")),
            Path::new(CONFIG_FILE_NAME),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_base_config_default_optional() {
        let dir = TempDir::new().unwrap();
        let config = load_base_config(None, &dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, RetrievalConfig::default());
    }

    #[test]
    fn test_load_base_config_default_present() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "top_k = 4\n").unwrap();
        let config = load_base_config(None, &path).unwrap();
        assert_eq!(config.top_k, 4);
    }

    #[test]
    fn test_query_source_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("news.txt");
        std::fs::write(&path, "山姆超市").unwrap();

        assert_eq!(QuerySource::File(path).read().unwrap(), "山姆超市");
        assert_eq!(QuerySource::Inline("x".into()).read().unwrap(), "x");
    }

    #[test]
    fn test_query_label_truncates() {
        let long = "字".repeat(100);
        assert_eq!(QuerySource::Inline(long).label().chars().count(), 40);
    }
}
