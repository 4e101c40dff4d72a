use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::{Result, SimilarityError};
use crate::matrix::SimilarityMatrix;

/// Minimum similarity for two phrases to count as shared, unless configured otherwise.
pub const DEFAULT_CUTOFF: f32 = 0.3;

/// Partition of two phrase lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    /// `(phrase from A, best match from B)`.
    pub shared: BTreeSet<(String, String)>,
    pub only_a: BTreeSet<String>,
    pub only_b: BTreeSet<String>,
}

/// Greedy row-wise matching of `doc_a` against `doc_b`.
///
/// Each row keeps its best column when that score is strictly above `cutoff` (ties go to the
/// leftmost column). Several rows may claim the same column; nothing resolves such conflicts.
/// Phrases of `doc_b` never claimed end up in `only_b`.
pub fn bucket_sort<S: AsRef<str>>(
    doc_a: &[S],
    doc_b: &[S],
    similarity: &SimilarityMatrix,
    cutoff: f32,
) -> Result<Buckets> {
    if similarity.rows() != doc_a.len() || similarity.cols() != doc_b.len() {
        return Err(SimilarityError::ShapeMismatch {
            rows: similarity.rows(),
            cols: similarity.cols(),
            left: doc_a.len(),
            right: doc_b.len(),
        });
    }

    let doc_a: Vec<&str> = doc_a.iter().map(|phrase| phrase.as_ref()).collect();
    let doc_b: Vec<&str> = doc_b.iter().map(|phrase| phrase.as_ref()).collect();
    let mut buckets = Buckets::default();

    for (i, phrase) in doc_a.iter().enumerate() {
        let row = similarity.row(i);
        // f32::max skips NaN; an empty row stays at -inf and never passes the cutoff
        let best = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let matched = if best > cutoff {
            row.iter().position(|&score| score == best)
        } else {
            None
        };

        match matched {
            Some(j) => {
                tracing::trace!(a = *phrase, b = doc_b[j], score = best, "shared");
                buckets.shared.insert((phrase.to_string(), doc_b[j].to_string()));
            }
            None => {
                buckets.only_a.insert(phrase.to_string());
            }
        }
    }

    let claimed: BTreeSet<&str> = buckets.shared.iter().map(|(_, b)| b.as_str()).collect();
    let unclaimed: Vec<String> = doc_b
        .iter()
        .filter(|phrase| !claimed.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect();
    buckets.only_b.extend(unclaimed);

    tracing::debug!(
        shared = buckets.shared.len(),
        only_a = buckets.only_a.len(),
        only_b = buckets.only_b.len(),
        cutoff,
        "bucket sort finished"
    );

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_row_wise_best_match() {
        let a = vec!["create a business", "manage a team", "cook pasta"];
        let b = vec!["build a company", "lead people", "write reports"];
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![0.8, 0.1, 0.2],
            vec![0.3, 0.7, 0.7],
            vec![0.1, 0.2, 0.4],
        ])
        .unwrap();

        let buckets = bucket_sort(&a, &b, &similarity, 0.5).unwrap();

        // Tie on row 1 goes to the leftmost column
        assert!(buckets.shared.contains(&("manage a team".to_string(), "lead people".to_string())));
        assert!(buckets.shared.contains(&("create a business".to_string(), "build a company".to_string())));
        assert_eq!(buckets.shared.len(), 2);
        assert_eq!(buckets.only_a, BTreeSet::from(["cook pasta".to_string()]));
        assert_eq!(buckets.only_b, BTreeSet::from(["write reports".to_string()]));
    }

    #[test]
    fn test_score_equal_to_cutoff_is_not_shared() {
        let similarity = SimilarityMatrix::from_rows(vec![vec![0.3]]).unwrap();
        let buckets = bucket_sort(&["a"], &["b"], &similarity, DEFAULT_CUTOFF).unwrap();

        assert!(buckets.shared.is_empty());
        assert!(buckets.only_a.contains("a"));
        assert!(buckets.only_b.contains("b"));
    }

    #[test]
    fn test_duplicate_claims_are_kept() {
        let similarity = SimilarityMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.8, 0.2]]).unwrap();
        let buckets = bucket_sort(&["x", "y"], &["p", "q"], &similarity, 0.5).unwrap();

        assert_eq!(buckets.shared.len(), 2);
        assert!(buckets.shared.iter().all(|(_, b)| b == "p"));
        assert_eq!(buckets.only_b, BTreeSet::from(["q".to_string()]));
    }

    #[test]
    fn test_empty_documents() {
        let similarity = SimilarityMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        let buckets = bucket_sort(&["x", "y"], &[] as &[&str], &similarity, 0.0).unwrap();
        assert_eq!(buckets.only_a.len(), 2);

        let empty = SimilarityMatrix::from_rows(vec![]).unwrap();
        let buckets = bucket_sort(&[] as &[&str], &[] as &[&str], &empty, 0.0).unwrap();
        assert_eq!(buckets, Buckets::default());
    }

    #[test]
    fn test_shape_is_checked() {
        let similarity = SimilarityMatrix::from_rows(vec![vec![0.9, 0.1]]).unwrap();
        let result = bucket_sort(&["x", "y"], &["p", "q"], &similarity, 0.5);
        assert!(matches!(result, Err(SimilarityError::ShapeMismatch { rows: 1, cols: 2, .. })));
    }

    fn matrix_strategy() -> impl Strategy<Value = (usize, usize, Vec<f32>)> {
        (0usize..6, 0usize..6).prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                proptest::collection::vec(-1.0f32..1.0, rows * cols),
            )
        })
    }

    fn build(rows: usize, cols: usize, values: &[f32]) -> SimilarityMatrix {
        let table = (0..rows)
            .map(|i| values[i * cols..(i + 1) * cols].to_vec())
            .collect();
        SimilarityMatrix::from_rows(table).unwrap()
    }

    proptest! {
        #[test]
        fn test_every_phrase_lands_somewhere((rows, cols, values) in matrix_strategy(), cutoff in -1.0f32..1.0) {
            let a = names("a", rows);
            let b = names("b", cols);
            let similarity = build(rows, cols, &values);

            let buckets = bucket_sort(&a, &b, &similarity, cutoff).unwrap();

            for phrase in &a {
                let in_pairs = buckets.shared.iter().filter(|(x, _)| x == phrase).count();
                let in_only = usize::from(buckets.only_a.contains(phrase));
                prop_assert_eq!(in_pairs + in_only, 1);
            }
            for phrase in &b {
                let claimed = buckets.shared.iter().any(|(_, y)| y == phrase);
                prop_assert!(claimed != buckets.only_b.contains(phrase));
            }
        }

        #[test]
        fn test_raising_cutoff_never_grows_shared((rows, cols, values) in matrix_strategy(), low in -1.0f32..1.0, delta in 0.0f32..1.0) {
            let a = names("a", rows);
            let b = names("b", cols);
            let similarity = build(rows, cols, &values);

            let loose = bucket_sort(&a, &b, &similarity, low).unwrap();
            let strict = bucket_sort(&a, &b, &similarity, low + delta).unwrap();
            prop_assert!(strict.shared.len() <= loose.shared.len());
        }
    }
}
