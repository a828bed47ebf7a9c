//! Ranking API Contract Tests
//!
//! Validates the build / score / rank contracts end to end, including the
//! fixed reference scenarios.

use postrank_core::{Bm25Params, Candidate, Error, ScoringText};
use postrank_search::{
    rank_top_k, retrieve_relevant, Bm25Model, CharBigramTokenizer, FnTokenizer, RankOptions,
    UnicodeWordTokenizer, WhitespaceTokenizer,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn pets_corpus() -> Vec<&'static str> {
    vec!["猫喜欢睡觉", "狗喜欢跑步", "猫和狗是朋友"]
}

fn is_non_increasing(scores: &[f64]) -> bool {
    scores.windows(2).all(|w| w[0] >= w[1])
}

// ============================================================================
// Construction Contracts
// ============================================================================

/// Empty corpus is a usage error naming the condition
#[test]
fn test_empty_corpus_rejected() {
    let empty: Vec<String> = Vec::new();
    let err = Bm25Model::with_defaults(&empty, UnicodeWordTokenizer).unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus));
    assert!(err.to_string().to_lowercase().contains("empty corpus"));
}

/// Out-of-domain parameters fail fast and are never clamped
#[test]
fn test_invalid_params_rejected() {
    for (k1, b) in [(-0.5, 0.75), (1.5, -0.1), (1.5, 1.1), (f64::NAN, 0.5)] {
        let err = Bm25Model::new(pets_corpus(), UnicodeWordTokenizer, k1, b).unwrap_err();
        assert!(err.is_config_error(), "k1={} b={} should be rejected", k1, b);
    }
}

/// Configuration is checked before the corpus
#[test]
fn test_invalid_params_on_empty_corpus_is_config_error() {
    let empty: Vec<String> = Vec::new();
    let err = Bm25Model::new(&empty, UnicodeWordTokenizer, -1.0, 0.75).unwrap_err();
    assert!(err.is_config_error());
}

// ============================================================================
// Scoring Contracts
// ============================================================================

/// Documents containing the query term outrank the one that does not
#[test]
fn test_pets_scenario() {
    let model = Bm25Model::with_defaults(pets_corpus(), UnicodeWordTokenizer).unwrap();

    let s0 = model.score("猫", 0);
    let s1 = model.score("猫", 1);
    let s2 = model.score("猫", 2);

    assert_eq!(s1, 0.0);
    assert!(s0 > s1);
    assert!(s2 > s1);

    let candidates = pets_corpus();
    let ranked = rank_top_k(&model, "猫", &candidates, 3).unwrap();
    assert_eq!(ranked[2].index, 1);
}

/// Same scenario with an external-style segmenter plugged in
#[test]
fn test_pets_scenario_with_injected_segmenter() {
    let per_char = FnTokenizer::new("per-char", |text: &str| {
        text.chars().map(|c| c.to_string()).collect()
    });
    let model = Bm25Model::with_defaults(pets_corpus(), per_char).unwrap();
    assert_eq!(model.score("猫", 1), 0.0);
    assert!(model.score("猫", 0) > 0.0);
    assert!(model.score("猫", 2) > 0.0);
}

/// A one-document corpus equal to the query scores finite and positive
#[test]
fn test_single_document_corpus() {
    let text = "山姆超市10天翻车3次";
    let model = Bm25Model::new([text], UnicodeWordTokenizer, 1.5, 0.75).unwrap();
    let score = model.score(text, 0);
    assert!(score.is_finite());
    assert!(score > 0.0);
}

/// A query term absent from the corpus adds nothing anywhere
#[test]
fn test_absent_term_adds_zero() {
    let model = Bm25Model::with_defaults(pets_corpus(), UnicodeWordTokenizer).unwrap();
    for i in 0..model.corpus_size() {
        assert_eq!(model.score("猫 鱼", i), model.score("猫", i));
        assert_eq!(model.score("鱼", i), 0.0);
    }
}

/// IDF stays strictly positive across the whole df range
#[test]
fn test_idf_strictly_positive() {
    let corpus = ["a b c d", "a b c", "a b", "a"];
    let model = Bm25Model::with_defaults(corpus, WhitespaceTokenizer).unwrap();
    for term in ["a", "b", "c", "d", "unseen"] {
        let idf = model.idf(term);
        assert!(idf.is_finite() && idf > 0.0, "idf({}) = {}", term, idf);
    }
}

/// Zero-length documents never produce NaN, for any valid b
#[test]
fn test_zero_length_document_finite() {
    for b in [0.0, 0.5, 1.0] {
        let model = Bm25Model::new(["", "a b", "..."], WhitespaceTokenizer, 1.5, b).unwrap();
        for i in 0..3 {
            assert!(model.score("a ...", i).is_finite());
        }
    }
}

/// Out-of-range index is a loud failure on the direct path
#[test]
#[should_panic]
fn test_out_of_range_index_panics() {
    let model = Bm25Model::with_defaults(pets_corpus(), UnicodeWordTokenizer).unwrap();
    model.score("猫", 3);
}

// ============================================================================
// Ranking Contracts
// ============================================================================

/// Output length is min(k, N) and scores are non-increasing
#[test]
fn test_rank_length_and_order() {
    let corpus = ["a b", "b c", "c d", "a a", "d"];
    let model = Bm25Model::with_defaults(corpus, WhitespaceTokenizer).unwrap();

    for k in 0..8 {
        let ranked = rank_top_k(&model, "a c", &corpus, k).unwrap();
        assert_eq!(ranked.len(), k.min(corpus.len()));
        let scores: Vec<f64> = ranked.iter().map(|r| r.score).collect();
        assert!(is_non_increasing(&scores));
    }
}

/// Equal scores keep corpus order
#[test]
fn test_rank_ties_are_stable() {
    let corpus = ["x y", "z", "x y", "z", "x y"];
    let model = Bm25Model::with_defaults(corpus, WhitespaceTokenizer).unwrap();
    let ranked = rank_top_k(&model, "x", &corpus, 5).unwrap();
    let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![0, 2, 4, 1, 3]);
}

/// top_k = 0 is a valid request with an empty answer
#[test]
fn test_rank_zero_k() {
    let posts = vec![Candidate::new("猫"), Candidate::new("狗")];
    let ranked = retrieve_relevant(
        "猫",
        &posts,
        UnicodeWordTokenizer,
        Bm25Params::default(),
        RankOptions::top(0),
    )
    .unwrap();
    assert!(ranked.is_empty());
}

/// Reshared text participates in scoring
#[test]
fn test_reshare_text_is_scored() {
    let posts = vec![
        Candidate::new("今天去公园散步"),
        Candidate::new("转发微博").with_reshare("山姆超市又翻车了"),
        Candidate::new("晚饭吃什么"),
    ];
    assert!(posts[1].scoring_text().contains("山姆"));

    let ranked = retrieve_relevant(
        "山姆",
        &posts,
        UnicodeWordTokenizer,
        Bm25Params::default(),
        RankOptions::top(3),
    )
    .unwrap();

    assert_eq!(ranked[0].index, 1);
    assert!(ranked[0].score > ranked[1].score);
    // Original record comes back, reshare intact
    assert_eq!(ranked[0].candidate.reshare.as_ref().unwrap().text, "山姆超市又翻车了");
    assert_eq!(ranked[0].candidate.text, "转发微博");
}

/// Ranked results expose every field of the original record
#[test]
fn test_rank_returns_caller_records() {
    let posts: Vec<Candidate> = serde_json::from_str(
        r#"[
            {"id": 11, "text": "新闻 评论", "attitudes_count": 5},
            {"id": 12, "text": "无关"}
        ]"#,
    )
    .unwrap();

    let ranked = retrieve_relevant(
        "新闻",
        &posts,
        UnicodeWordTokenizer,
        Bm25Params::default(),
        RankOptions::top(1),
    )
    .unwrap();

    let (post, score) = ranked[0].into_pair();
    assert!(score > 0.0);
    assert_eq!(post.id_string().as_deref(), Some("11"));
    assert_eq!(post.extra["attitudes_count"], serde_json::json!(5));
}

/// Bigram segmentation ranks phrase matches first
#[test]
fn test_bigram_tokenizer_ranking() {
    let corpus = ["喜欢睡觉", "睡前喜欢看书", "觉得不错"];
    let model = Bm25Model::with_defaults(corpus, CharBigramTokenizer).unwrap();
    let ranked = rank_top_k(&model, "睡觉", &corpus, 3).unwrap();
    assert_eq!(ranked[0].index, 0);
    assert_eq!(ranked[1].score, 0.0);
}

/// Model built from one list cannot rank another of different length
#[test]
fn test_candidate_mismatch_is_error() {
    let model = Bm25Model::with_defaults(pets_corpus(), UnicodeWordTokenizer).unwrap();
    let other = ["猫"];
    let err = rank_top_k(&model, "猫", &other, 1).unwrap_err();
    assert!(matches!(err, Error::CandidateMismatch { .. }));
}
