//! Corpus-based conformance testing.
//!
//! A corpus is a JSON file of test vectors, each pairing an input document
//! with the expected outcome: either a tree shape (root type, length and
//! values at given paths) or an error code. The corpus file itself is read
//! with `serde_json`; the documents under test go through this crate's own
//! lexer and parser.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{ConformanceError, ConformanceResult};
use crate::json::{parse_with_limits, Limits, Root, Value};

/// Corpus manifest with metadata.
#[derive(Debug, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Free-form description of the corpus.
    #[serde(default)]
    pub description: String,
}

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// A single test vector.
#[derive(Debug, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Document text to parse.
    pub input: String,
    /// Parse with [`Limits::lenient`] instead of [`Limits::strict`].
    #[serde(default)]
    pub lenient: bool,
    /// Expected outcome.
    pub expected: Expected,
}

/// Expected outcome of a vector.
#[derive(Debug, Deserialize)]
pub enum Expected {
    /// The document parses into a tree of this shape.
    #[serde(rename = "ok")]
    Tree(ExpectedTree),
    /// The document fails with this error.
    #[serde(rename = "err")]
    Error(ExpectedError),
}

/// Expected tree shape.
#[derive(Debug, Deserialize)]
pub struct ExpectedTree {
    /// Type name of the root value (`array`, `object`, `integer`, ...).
    #[serde(rename = "type")]
    pub root_type: String,
    /// Element or property count of a container root.
    #[serde(default)]
    pub len: Option<usize>,
    /// Checks on values inside the tree.
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// A check on the value found at a path.
#[derive(Debug, Deserialize)]
pub struct Check {
    /// Lookup path, e.g. `clubs[0]`.
    pub path: String,
    /// What the path must hold.
    #[serde(flatten)]
    pub expect: CheckExpect,
}

/// Expectation attached to a [`Check`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckExpect {
    /// The value equals this JSON value.
    Value(serde_json::Value),
    /// The value has this type name.
    Type(String),
    /// The path addresses nothing.
    Missing(bool),
}

/// Expected error.
#[derive(Debug, Deserialize)]
pub struct ExpectedError {
    /// Numeric error code.
    pub code: u32,
    /// Error name, checked when present.
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result from the parser.
        actual: String,
    },
    /// The vector itself is malformed (e.g. a bad lookup path).
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, id: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((id.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    /// Returns true if all tests passed (no failures or errors).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} errors (total: {})",
            self.passed,
            self.failed,
            self.errors,
            self.total()
        )
    }

    /// Results that are not passes.
    pub fn problems(&self) -> impl Iterator<Item = &(String, TestResult)> {
        self.details.iter().filter(|(_, r)| !r.is_pass())
    }
}

/// Corpus runner that executes test vectors.
#[derive(Debug)]
pub struct CorpusRunner {
    corpus: Corpus,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConformanceError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Load corpus from JSON text.
    pub fn from_json(content: &str) -> ConformanceResult<Self> {
        let corpus: Corpus =
            serde_json::from_str(content).map_err(|e| ConformanceError::Format(e.to_string()))?;
        Ok(Self { corpus })
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = run_vector(vector);
            debug!(id = %vector.id, pass = result.is_pass(), "ran vector");
            results.record(&vector.id, result);
        }

        results
    }
}

/// Run a single test vector.
pub fn run_vector(vector: &TestVector) -> TestResult {
    let limits = if vector.lenient {
        Limits::lenient()
    } else {
        Limits::strict()
    };

    match (&vector.expected, parse_with_limits(vector.input.as_bytes(), limits)) {
        (Expected::Tree(tree), Ok(root)) => check_tree(tree, &root),
        (Expected::Tree(tree), Err(e)) => TestResult::Fail {
            expected: format!("ok: {}", tree.root_type),
            actual: format!("err: E{} {}", e.code(), e),
        },
        (Expected::Error(err), Ok(root)) => TestResult::Fail {
            expected: format!("err: E{}", err.code),
            actual: format!("ok: {root}"),
        },
        (Expected::Error(err), Err(e)) => {
            let name_matches = err.name.as_deref().map_or(true, |name| name == e.name());
            if e.code() == err.code && name_matches {
                TestResult::Pass
            } else {
                TestResult::Fail {
                    expected: format!(
                        "E{} {}",
                        err.code,
                        err.name.as_deref().unwrap_or_default()
                    ),
                    actual: format!("E{} {}", e.code(), e.name()),
                }
            }
        }
    }
}

fn check_tree(tree: &ExpectedTree, root: &Root) -> TestResult {
    let value = root.value();
    if value.type_name() != tree.root_type {
        return TestResult::Fail {
            expected: format!("root type {}", tree.root_type),
            actual: format!("root type {}", value.type_name()),
        };
    }

    if let Some(expected_len) = tree.len {
        let actual_len = match value {
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        };
        if actual_len != Some(expected_len) {
            return TestResult::Fail {
                expected: format!("len {expected_len}"),
                actual: format!("len {actual_len:?}"),
            };
        }
    }

    for check in &tree.checks {
        let found = match root.lookup(&check.path) {
            Ok(found) => found,
            Err(e) => {
                return TestResult::Error {
                    message: format!("bad path {:?}: {}", check.path, e),
                }
            }
        };

        let passed = match (&check.expect, found) {
            (CheckExpect::Value(expected), Some(actual)) => matches_json(actual, expected),
            (CheckExpect::Type(name), Some(actual)) => actual.type_name() == name,
            (CheckExpect::Missing(missing), found) => *missing == found.is_none(),
            (_, None) => false,
        };

        if !passed {
            return TestResult::Fail {
                expected: format!("{} = {:?}", check.path, check.expect),
                actual: format!("{} = {:?}", check.path, found),
            };
        }
    }

    TestResult::Pass
}

/// Structural comparison of a parsed value with a `serde_json` value.
///
/// Integers must match exactly; floats compare with a relative tolerance
/// since the two parsers may round differently in the last place.
pub fn matches_json(actual: &Value, expected: &serde_json::Value) -> bool {
    use serde_json::Value as J;

    match (actual, expected) {
        (Value::Null, J::Null) => true,
        (Value::Integer(n), J::Number(m)) => m.as_i64() == Some(*n),
        (Value::Float(x), J::Number(m)) => m
            .as_f64()
            .is_some_and(|y| (x - y).abs() <= f64::EPSILON * x.abs().max(1.0)),
        (Value::String(s), J::String(t)) => s == t,
        (Value::Array(a), J::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| matches_json(x, y))
        }
        (Value::Object(o), J::Object(m)) => {
            o.len() == m.len()
                && m.iter().all(|(key, v)| {
                    o.get(key)
                        .is_some_and(|property| matches_json(property.value(), v))
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_CORPUS: &str = r#"{
        "manifest": {"format_version": "1"},
        "vectors": [
            {
                "id": "array_ok",
                "input": "[1, 2.5, \"x\", null]",
                "expected": {"ok": {"type": "array", "len": 4, "checks": [
                    {"path": "[0]", "value": 1},
                    {"path": "[1]", "value": 2.5},
                    {"path": "[2]", "type": "string"},
                    {"path": "[3]", "value": null},
                    {"path": "[4]", "missing": true}
                ]}}
            },
            {
                "id": "double_comma",
                "input": "[1,,2]",
                "expected": {"err": {"code": 2, "name": "UnexpectedToken"}}
            },
            {
                "id": "bare_root_lenient",
                "input": "7",
                "lenient": true,
                "expected": {"ok": {"type": "integer", "checks": [{"path": "", "value": 7}]}}
            }
        ]
    }"#;

    #[test]
    fn test_small_corpus_passes() {
        let runner = CorpusRunner::from_json(SMALL_CORPUS).unwrap();
        assert_eq!(runner.vector_count(), 3);
        assert_eq!(runner.manifest().format_version, "1");

        let results = runner.run_all();
        assert!(results.all_passed(), "{}", results.summary());
        assert_eq!(results.passed, 3);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let corpus = r#"{
            "manifest": {"format_version": "1"},
            "vectors": [
                {"id": "wrong_code", "input": "[1,,2]", "expected": {"err": {"code": 4}}},
                {"id": "wrong_value", "input": "[1]", "expected": {"ok": {"type": "array", "checks": [{"path": "[0]", "value": 2}]}}},
                {"id": "bad_path", "input": "[1]", "expected": {"ok": {"type": "array", "checks": [{"path": "[x]", "value": 1}]}}}
            ]
        }"#;
        let results = CorpusRunner::from_json(corpus).unwrap().run_all();
        assert_eq!(results.failed, 2);
        assert_eq!(results.errors, 1);
        assert!(!results.all_passed());
        assert_eq!(results.problems().count(), 3);
    }

    #[test]
    fn test_malformed_corpus() {
        let err = CorpusRunner::from_json("{\"vectors\": 3}").unwrap_err();
        assert!(matches!(err, ConformanceError::Format(_)));
    }

    #[test]
    fn test_matches_json_objects() {
        let root = crate::json::parse(br#"{"a": [1, {"b": "c"}], "d": 0.5}"#).unwrap();
        let expected = serde_json::json!({"a": [1, {"b": "c"}], "d": 0.5});
        assert!(matches_json(root.value(), &expected));

        let different = serde_json::json!({"a": [1, {"b": "x"}], "d": 0.5});
        assert!(!matches_json(root.value(), &different));
    }
}
