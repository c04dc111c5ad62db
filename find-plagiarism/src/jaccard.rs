//! Searcher of similar document pairs with MinHash signatures.
use std::time::Instant;

use lsh::hash_family::HashFamily;
use lsh::minhash::{MinHasher, Signature};
use rand::SeedableRng;
use rayon::prelude::*;
use triangle_matrix::TriangleMatrix;

use crate::errors::{FindPlagiarismError, Result};
use crate::feature::ShingleSet;

/// Searcher in the Jaccard space using MinHash signatures.
pub struct JaccardSearcher {
    hasher: MinHasher,
    signatures: Vec<Signature>,
    similarities: Option<TriangleMatrix<f64>>,
}

impl JaccardSearcher {
    /// Creates an instance with randomly drawn hash functions.
    ///
    /// # Arguments
    ///
    /// * `num_hashes` - Number of hash functions, i.e., the signature length (must be more than 0).
    ///                  The larger this value, the more accurate the estimation,
    ///                  but the more time and memory it takes.
    /// * `seed` - Seed value for random values.
    pub fn new(num_hashes: usize, seed: Option<u64>) -> Result<Self> {
        if num_hashes == 0 {
            return Err(FindPlagiarismError::input(
                "Number of hash functions must not be 0.",
            ));
        }
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let family =
            HashFamily::generate(num_hashes, &mut rng).map_err(FindPlagiarismError::HashGeneration)?;
        Ok(Self::with_hash_family(family))
    }

    /// Creates an instance with given hash functions.
    pub const fn with_hash_family(family: HashFamily) -> Self {
        Self {
            hasher: MinHasher::new(family),
            signatures: vec![],
            similarities: None,
        }
    }

    /// Builds the signatures of input shingle sets. Previously built signatures and
    /// similarities are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use find_plagiarism::feature::ShingleSet;
    /// use find_plagiarism::JaccardSearcher;
    ///
    /// let sets = vec![
    ///     ShingleSet::from_iter([1, 2, 3, 4]),
    ///     ShingleSet::from_iter([2, 3, 4, 5]),
    ///     ShingleSet::from_iter([6, 7, 8]),
    /// ];
    /// let searcher = JaccardSearcher::new(1000, Some(42))
    ///     .unwrap()
    ///     .build_signatures(&sets)
    ///     .compare_signatures()
    ///     .unwrap();
    ///
    /// let results = searcher.search_similar_pairs(0.5);
    /// assert_eq!(results.len(), 1);
    /// assert_eq!((results[0].0, results[0].1), (0, 1));
    /// ```
    pub fn build_signatures<'a, I>(mut self, shingle_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a ShingleSet>,
    {
        let start = Instant::now();
        self.signatures.clear();
        self.similarities = None;
        for (i, shingles) in shingle_sets.into_iter().enumerate() {
            if (i + 1) % 1000 == 0 {
                tracing::debug!("Processed {} documents...", i + 1);
            }
            self.signatures.push(self.hasher.signature(shingles));
        }
        self.log_signatures(start);
        self
    }

    /// Builds the signatures of input shingle sets in parallel.
    pub fn build_signatures_in_parallel(mut self, shingle_sets: &[ShingleSet]) -> Self {
        let start = Instant::now();
        self.similarities = None;
        let hasher = &self.hasher;
        shingle_sets
            .par_iter()
            .map(|shingles| hasher.signature(shingles))
            .collect_into_vec(&mut self.signatures);
        self.log_signatures(start);
        self
    }

    /// Compares all pairs of signatures, storing the fractions of agreeing components.
    ///
    /// # Errors
    ///
    /// An error will be returned when the pairs cannot be addressed.
    pub fn compare_signatures(mut self) -> Result<Self> {
        let start = Instant::now();
        let mut matrix = TriangleMatrix::new(self.signatures.len())?;
        for (i, row) in matrix.rows_mut() {
            compare_row(&self.signatures, i, row);
        }
        self.similarities = Some(matrix);
        self.log_similarities(start);
        Ok(self)
    }

    /// Compares all pairs of signatures in parallel. Each row of the matrix is filled by
    /// one task, so no value is written twice.
    ///
    /// # Errors
    ///
    /// An error will be returned when the pairs cannot be addressed.
    pub fn compare_signatures_in_parallel(mut self) -> Result<Self> {
        let start = Instant::now();
        let mut matrix = TriangleMatrix::new(self.signatures.len())?;
        let signatures = &self.signatures;
        matrix
            .rows_mut()
            .into_par_iter()
            .for_each(|(i, row)| compare_row(signatures, i, row));
        self.similarities = Some(matrix);
        self.log_similarities(start);
        Ok(self)
    }

    /// Searches for all pairs whose estimated similarity is greater than `threshold`,
    /// returning triplets of the left-side index, the right-side index, and the similarity.
    /// The pairs are sorted by indices.
    pub fn search_similar_pairs(&self, threshold: f64) -> Vec<(usize, usize, f64)> {
        self.similarities.as_ref().map_or_else(Vec::new, |matrix| {
            matrix
                .iter()
                .filter(|&(_, _, &s)| s > threshold)
                .map(|(i, j, &s)| (i, j, s))
                .collect()
        })
    }

    /// Gets the estimated similarity of documents `i` and `j`, or `None` if signatures
    /// are not compared yet.
    ///
    /// # Panics
    ///
    /// It will panic when `i == j` or either index is out of range.
    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        self.similarities.as_ref().map(|matrix| *matrix.get(i, j))
    }

    /// Gets the matrix of estimated similarities, or `None` if signatures are not compared yet.
    pub const fn similarities(&self) -> Option<&TriangleMatrix<f64>> {
        self.similarities.as_ref()
    }

    /// Gets the signatures in the input order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Gets the number of hash functions.
    pub fn num_hashes(&self) -> usize {
        self.hasher.num_hashes()
    }

    /// Gets the number of input documents.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Checks if no signature is built.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the memory usage of signatures and similarities in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.len() * self.num_hashes() * std::mem::size_of::<u64>()
            + self
                .similarities
                .as_ref()
                .map_or(0, |matrix| matrix.memory_in_bytes())
    }

    fn log_signatures(&self, start: Instant) {
        tracing::info!(
            "Produced {} signatures of length {} in {} sec, consuming {} MiB",
            self.len(),
            self.num_hashes(),
            start.elapsed().as_secs_f64(),
            (self.len() * self.num_hashes() * std::mem::size_of::<u64>()) as f64
                / (1024. * 1024.)
        );
    }

    fn log_similarities(&self, start: Instant) {
        tracing::info!(
            "Compared {} pairs of signatures in {} sec",
            self.similarities.as_ref().map_or(0, |matrix| matrix.len()),
            start.elapsed().as_secs_f64()
        );
    }
}

fn compare_row(signatures: &[Signature], i: usize, row: &mut [f64]) {
    let x = &signatures[i];
    for (y, sim) in signatures[i + 1..].iter().zip(row.iter_mut()) {
        *sim = x.similarity(y);
    }
}
