//! postrank CLI: rank a user's post history against target articles.
//!
//! ```text
//! postrank rank --history 1001.json --query-file news.txt --top-k 5
//! postrank --json rank --history 1001.json -q "山姆超市" --explain
//! postrank rank --history 1001.json --query-file news.txt --exclude-id 42 --min-candidates 10
//! postrank config > postrank.toml
//! ```

mod commands;
mod format;
mod parse;
mod run;

use std::process;

use postrank_core::RetrievalConfig;
use tracing_subscriber::filter::LevelFilter;

use commands::build_cli;
use format::{format_error, OutputMode};
use parse::{matches_to_action, CliAction};
use run::run_rank;

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let result = matches_to_action(&matches).and_then(|action| match action {
        CliAction::PrintConfig => {
            print!("{}", RetrievalConfig::default_toml());
            Ok(())
        }
        CliAction::Rank(args) => {
            print!("{}", run_rank(&args, output_mode)?);
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("{}", format_error(&e, output_mode));
        process::exit(1);
    }
}

/// Log to stderr so stdout stays parseable in `--json` mode.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
