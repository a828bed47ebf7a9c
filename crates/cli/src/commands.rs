//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("postrank")
        .about("Rank a user's posts by BM25 relevance to a target article")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./postrank.toml if present)")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(build_rank())
        .subcommand(build_config())
}

fn build_rank() -> Command {
    Command::new("rank")
        .about("Rank history posts against one or more queries")
        .arg(
            Arg::new("history")
                .long("history")
                .help("User history JSON ({\"user\":..., \"weibo\":[...]} or a bare array)")
                .value_parser(value_parser!(std::path::PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .short('q')
                .help("Query text (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("query-file")
                .long("query-file")
                .help("File holding the query text, e.g. news.txt (repeatable)")
                .value_parser(value_parser!(std::path::PathBuf))
                .action(ArgAction::Append),
        )
        .group(
            ArgGroup::new("queries")
                .args(["query", "query-file"])
                .required(true)
                .multiple(true),
        )
        .arg(
            Arg::new("top-k")
                .long("top-k")
                .short('k')
                .help("Number of posts to return")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("k1")
                .long("k1")
                .help("BM25 term-frequency saturation (>= 0)")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("b")
                .long("b")
                .help("BM25 length normalization (0..=1)")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("tokenizer")
                .long("tokenizer")
                .help("Segmentation strategy")
                .value_parser(["unicode", "bigram", "whitespace"]),
        )
        .arg(
            Arg::new("exclude-id")
                .long("exclude-id")
                .help("Drop the post with this id from the candidate pool"),
        )
        .arg(
            Arg::new("min-candidates")
                .long("min-candidates")
                .help("Fail when fewer posts remain in the pool (e.g. 10)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Score candidates in parallel")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .help("Show per-term score contributions")
                .action(ArgAction::SetTrue),
        )
}

fn build_config() -> Command {
    Command::new("config").about("Print the default postrank.toml")
}
