use serde::Serialize;

use crate::errors::{Result, SimilarityError};

/// Similarity of two embeddings: their inner product.
///
/// Embeddings are expected to be unit length, which makes this the cosine similarity.
pub fn compare_score(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Row-major table indexed `[phrase in document A][phrase in document B]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(SimilarityError::DimensionMismatch {
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    /// Pairwise inner products between two embedding sets.
    pub fn from_embeddings(left: &[Vec<f32>], right: &[Vec<f32>]) -> Result<Self> {
        let dimension = left.first().or(right.first()).map_or(0, Vec::len);
        if let Some(bad) = left.iter().chain(right).find(|v| v.len() != dimension) {
            return Err(SimilarityError::DimensionMismatch {
                expected: dimension,
                found: bad.len(),
            });
        }

        let mut values = Vec::with_capacity(left.len() * right.len());
        for a in left {
            for b in right {
                values.push(compare_score(a, b));
            }
        }
        Ok(Self {
            rows: left.len(),
            cols: right.len(),
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.rows && j < self.cols {
            Some(self.values[i * self.cols + j])
        } else {
            None
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}
