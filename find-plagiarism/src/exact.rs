//! Exact Jaccard similarities of all pairs of shingle sets.
use std::time::Instant;

use rayon::prelude::*;
use triangle_matrix::TriangleMatrix;

use crate::errors::Result;
use crate::feature::ShingleSet;

/// Exact Jaccard similarities of all pairs, used to validate MinHash estimates.
///
/// The computation takes `O(n^2)` set comparisons, so it should be skipped for
/// large corpora.
pub struct ExactSimilarities {
    matrix: TriangleMatrix<f64>,
}

impl ExactSimilarities {
    /// Computes the similarities of all pairs in `shingle_sets`.
    ///
    /// # Examples
    ///
    /// ```
    /// use find_plagiarism::exact::ExactSimilarities;
    /// use find_plagiarism::feature::ShingleSet;
    ///
    /// let sets = vec![
    ///     ShingleSet::from_iter([1, 2, 3, 4]),
    ///     ShingleSet::from_iter([2, 3, 4, 5]),
    ///     ShingleSet::new(),
    /// ];
    /// let exact = ExactSimilarities::compute(&sets).unwrap();
    /// assert_eq!(exact.get(0, 1), 0.6);
    /// assert_eq!(exact.get(2, 0), 0.);
    /// ```
    pub fn compute(shingle_sets: &[ShingleSet]) -> Result<Self> {
        let start = Instant::now();
        let n = shingle_sets.len();
        let mut matrix = TriangleMatrix::new(n)?;
        for (i, row) in matrix.rows_mut() {
            if (i + 1) % 100 == 0 {
                tracing::debug!("Processed {}/{}...", i + 1, n);
            }
            fill_row(shingle_sets, i, row);
        }
        tracing::info!(
            "Computed {} exact similarities in {} sec",
            matrix.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(Self { matrix })
    }

    /// Computes the similarities in parallel, assigning each row of the matrix to a task.
    pub fn compute_in_parallel(shingle_sets: &[ShingleSet]) -> Result<Self> {
        let start = Instant::now();
        let mut matrix = TriangleMatrix::new(shingle_sets.len())?;
        matrix
            .rows_mut()
            .into_par_iter()
            .for_each(|(i, row)| fill_row(shingle_sets, i, row));
        tracing::info!(
            "Computed {} exact similarities in {} sec",
            matrix.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(Self { matrix })
    }

    /// Gets the similarity of documents `i` and `j`.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        *self.matrix.get(i, j)
    }

    /// Gets the matrix of similarities.
    pub const fn matrix(&self) -> &TriangleMatrix<f64> {
        &self.matrix
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.matrix.memory_in_bytes()
    }
}

fn fill_row(shingle_sets: &[ShingleSet], i: usize, row: &mut [f64]) {
    let x = &shingle_sets[i];
    for (y, sim) in shingle_sets[i + 1..].iter().zip(row.iter_mut()) {
        *sim = lsh::jaccard_similarity(x, y);
    }
}
