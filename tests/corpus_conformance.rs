//! Corpus-based conformance tests.
//!
//! Runs every vector in `corpus/corpus.json` and reports failures with
//! details.

use minijson::conformance::{CorpusRunner, TestResult};
use std::path::Path;

/// Path to the corpus file relative to the project root.
const CORPUS_PATH: &str = "corpus/corpus.json";

fn load_runner() -> CorpusRunner {
    let corpus_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(CORPUS_PATH);
    CorpusRunner::load(&corpus_path).expect("Failed to load corpus")
}

/// Load and run the full corpus.
#[test]
fn test_full_corpus() {
    let runner = load_runner();

    println!("Loaded corpus with {} vectors", runner.vector_count());
    println!("Manifest: {:?}", runner.manifest());

    let results = runner.run_all();

    println!("\n=== Corpus Conformance Results ===");
    println!("{}", results.summary());

    for (id, result) in results.problems() {
        match result {
            TestResult::Fail { expected, actual } => {
                println!("  {} - expected: {}, actual: {}", id, expected, actual);
            }
            TestResult::Error { message } => println!("  {} - {}", id, message),
            TestResult::Pass => {}
        }
    }

    assert!(
        results.all_passed(),
        "Corpus conformance failed: {}",
        results.summary()
    );
    assert_eq!(results.total(), runner.vector_count());
}

/// The corpus covers both accepted and rejected documents.
#[test]
fn test_corpus_has_both_outcomes() {
    use minijson::conformance::Expected;

    let corpus_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(CORPUS_PATH);
    let content = std::fs::read_to_string(corpus_path).unwrap();
    let corpus: minijson::conformance::Corpus = serde_json::from_str(&content).unwrap();

    let ok = corpus
        .vectors
        .iter()
        .filter(|v| matches!(v.expected, Expected::Tree(_)))
        .count();
    let err = corpus.vectors.len() - ok;
    assert!(ok >= 10, "only {ok} accepting vectors");
    assert!(err >= 10, "only {err} rejecting vectors");

    let mut ids: Vec<&str> = corpus.vectors.iter().map(|v| v.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), corpus.vectors.len(), "duplicate vector ids");
}
