use std::collections::BTreeSet;

use proptest::prelude::*;
use semcmp_parser::ParsedCorpus;
use semcmp_similarity::{HashedBagOfWords, VectorTable};
use semcmp_simplifier::{CompareConfig, SemanticComparator};

const FIXTURE: &str = include_str!("fixtures/phrases.conllu");

const RESUME: &str = "Create, promote and develop a business. Understand customer needs";
const JOB: &str = "Manage a small team.\n\nCapture business requirements\n\nLead people";

fn comparator() -> SemanticComparator<ParsedCorpus> {
    let corpus = ParsedCorpus::from_conllu(FIXTURE).unwrap();
    SemanticComparator::new(corpus)
}

#[test]
fn test_documents_are_simplified_per_sentence() {
    let comparator = comparator();

    assert_eq!(
        comparator.extract_phrases(RESUME).unwrap(),
        vec![
            "Create a business",
            "Understand customer needs",
            "develop a business",
            "promote a business",
        ]
    );
    assert_eq!(
        comparator.extract_phrases(JOB).unwrap(),
        vec!["Capture business requirements", "Lead people", "Manage a small team"]
    );
    assert_eq!(comparator.split_by_sents(RESUME).len(), 2);
}

#[test]
fn test_aligned_candidates() {
    let comparator = comparator();
    let phrases = comparator
        .transform_phrase("Understand customer needs", "Capture business requirements")
        .unwrap();

    assert_eq!(phrases.first().map(String::as_str), Some("Understand customer needs"));
    assert!(phrases.contains(&"Capture customer needs".to_string()));
    assert_eq!(phrases.last().map(String::as_str), Some("Capture business requirements"));
}

#[test]
fn test_comparing_documents_requires_a_model() {
    let mut comparator = comparator();
    let err = comparator.compare_documents(RESUME, JOB).unwrap_err();
    assert!(err.is_unavailable_model());

    comparator.load_semantic_model(HashedBagOfWords::new(256));
    let buckets = comparator.compare_documents(RESUME, JOB).unwrap();

    let a = comparator.extract_phrases(RESUME).unwrap();
    let b = comparator.extract_phrases(JOB).unwrap();
    for phrase in &a {
        let paired = buckets.shared.iter().filter(|(x, _)| x == phrase).count();
        assert_eq!(paired + usize::from(buckets.only_a.contains(phrase)), 1);
    }
    for phrase in &b {
        let claimed = buckets.shared.iter().any(|(_, y)| y == phrase);
        assert_ne!(claimed, buckets.only_b.contains(phrase));
    }
}

#[test]
fn test_three_by_three_buckets() {
    let table = VectorTable::from_json(
        r#"{"dimension": 3, "vectors": {
            "Create a business": [1.0, 0.0, 0.0],
            "Understand customer needs": [0.0, 1.0, 0.0],
            "Cook pasta": [0.0, 0.0, 1.0],
            "Build a company": [0.8, 0.6, 0.0],
            "Capture business requirements": [0.0, 0.8, 0.6],
            "Lead people": [0.6, 0.0, -0.8]
        }}"#,
    )
    .unwrap();

    let config = CompareConfig { cutoff: 0.5, ..CompareConfig::default() };
    let mut comparator = SemanticComparator::with_config(ParsedCorpus::new(), config);
    comparator.load_semantic_model(table);

    let doc_a = ["Create a business", "Understand customer needs", "Cook pasta"];
    let doc_b = ["Build a company", "Capture business requirements", "Lead people"];
    let similarity = comparator.build_similarity_matrix(&doc_a, &doc_b).unwrap();
    let buckets = comparator.bucket_sort(&doc_a, &doc_b, &similarity).unwrap();

    let shared: BTreeSet<(&str, &str)> = buckets.shared.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    assert_eq!(
        shared,
        BTreeSet::from([
            ("Create a business", "Build a company"),
            ("Understand customer needs", "Capture business requirements"),
            ("Cook pasta", "Capture business requirements"),
        ])
    );
    assert!(buckets.only_a.is_empty());
    assert_eq!(buckets.only_b, BTreeSet::from(["Lead people".to_string()]));
}

proptest! {
    #[test]
    fn test_equal_phrases_align_to_themselves(phrase in "[A-Za-z ]{0,40}") {
        // The corpus is empty: any parse would fail
        let comparator = SemanticComparator::new(ParsedCorpus::new());
        prop_assert_eq!(comparator.transform_phrase(&phrase, &phrase).unwrap(), vec![phrase.clone()]);
    }
}
