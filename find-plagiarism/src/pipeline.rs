//! End-to-end detection of plagiarism pairs.
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use triangle_matrix::TriangleMatrix;

use crate::corpus::{Corpus, GroundTruthMap};
use crate::errors::{FindPlagiarismError, Result};
use crate::evaluate::{Evaluation, Evaluator, ReportSink};
use crate::exact::ExactSimilarities;
use crate::feature::{FeatureConfig, FeatureExtractor, ShingleSet, DEFAULT_WINDOW_SIZE};
use crate::jaccard::JaccardSearcher;
use crate::shingling::{ShingleHasher, SipShingleHasher};

/// Default number of hash functions.
pub const DEFAULT_NUM_HASHES: usize = 10;

/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default maximum number of documents for which exact similarities are computed.
pub const DEFAULT_EXACT_CEILING: usize = 2500;

/// Configuration of [`Pipeline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Number of documents in the corpus.
    pub num_docs: usize,
    /// Number of hash functions, i.e., the signature length.
    pub num_hashes: usize,
    /// Pairs with estimated similarities greater than this value are candidates.
    pub threshold: f64,
    /// Exact similarities are computed only if `num_docs` is at most this value.
    pub exact_ceiling: usize,
    /// Number of tokens in a shingle.
    pub window_size: usize,
    /// Seed value for random values. If `None`, a random seed is used.
    pub seed: Option<u64>,
    /// Runs independent stages in parallel.
    pub parallel: bool,
}

impl PipelineConfig {
    /// Creates a configuration with default values for `num_docs` documents.
    pub const fn new(num_docs: usize) -> Self {
        Self {
            num_docs,
            num_hashes: DEFAULT_NUM_HASHES,
            threshold: DEFAULT_THRESHOLD,
            exact_ceiling: DEFAULT_EXACT_CEILING,
            window_size: DEFAULT_WINDOW_SIZE,
            seed: None,
            parallel: false,
        }
    }

    /// Checks the values.
    ///
    /// # Errors
    ///
    /// An error will be returned when `num_docs` is less than 2, `num_hashes` or
    /// `window_size` is 0, or `threshold` is not in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.num_docs < 2 {
            return Err(FindPlagiarismError::input(format!(
                "Number of documents must be at least 2, but got {}.",
                self.num_docs
            )));
        }
        if self.num_hashes == 0 {
            return Err(FindPlagiarismError::input(
                "Number of hash functions must not be 0.",
            ));
        }
        if self.window_size == 0 {
            return Err(FindPlagiarismError::input("Window size must not be 0."));
        }
        if !(0. ..=1.).contains(&self.threshold) {
            return Err(FindPlagiarismError::input(format!(
                "Threshold must be in [0,1], but got {}.",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Errors of estimated similarities against exact ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Validation {
    /// Mean absolute error over all pairs.
    pub mean_absolute_error: f64,
    /// Maximum absolute error over all pairs.
    pub max_absolute_error: f64,
}

impl Validation {
    /// Compares estimated similarities with exact ones, or returns `None` without pairs.
    ///
    /// # Panics
    ///
    /// It will panic if the matrices have different numbers of items.
    pub fn compare(exact: &TriangleMatrix<f64>, estimated: &TriangleMatrix<f64>) -> Option<Self> {
        assert_eq!(exact.num_items(), estimated.num_items());
        if exact.is_empty() {
            return None;
        }
        let mut sum_error = 0.;
        let mut max_error: f64 = 0.;
        for (x, y) in exact.values().iter().zip(estimated.values()) {
            let error = (x - y).abs();
            sum_error += error;
            max_error = max_error.max(error);
        }
        Some(Self {
            mean_absolute_error: sum_error / exact.len() as f64,
            max_absolute_error: max_error,
        })
    }
}

/// Result of [`Pipeline::run`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Counts of the classification.
    pub evaluation: Evaluation,
    /// Errors of the estimation, available if exact similarities were computed.
    pub validation: Option<Validation>,
    /// Average number of distinct shingles per document.
    pub average_shingles: f64,
}

/// Pipeline converting documents into shingle sets and signatures, and classifying
/// similar pairs.
pub struct Pipeline {
    config: PipelineConfig,
    feature_config: FeatureConfig,
    family_seed: u64,
}

impl Pipeline {
    /// Creates an instance.
    ///
    /// # Errors
    ///
    /// An error will be returned when the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let feature_config = FeatureConfig::new(config.window_size, seeder.next_u64())?;
        Ok(Self {
            config,
            feature_config,
            family_seed: seeder.next_u64(),
        })
    }

    /// Gets the configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Converts every document of `corpus` into its shingle set with the keyed SipHash
    /// of the configured seed.
    ///
    /// # Errors
    ///
    /// An error will be returned when the corpus does not have `num_docs` documents.
    pub fn shingle(&self, corpus: &Corpus) -> Result<Vec<ShingleSet>> {
        self.shingle_with_hasher(
            corpus,
            SipShingleHasher::new(self.feature_config.seed()),
        )
    }

    /// Converts every document of `corpus` into its shingle set with `hasher`.
    /// Each parallel worker gets its own clone.
    ///
    /// # Errors
    ///
    /// An error will be returned when the corpus does not have `num_docs` documents.
    pub fn shingle_with_hasher<H>(&self, corpus: &Corpus, hasher: H) -> Result<Vec<ShingleSet>>
    where
        H: ShingleHasher + Clone + Sync,
    {
        self.check_num_docs(corpus.len())?;
        let start = Instant::now();
        let shingle_sets: Vec<_> = if self.config.parallel {
            corpus
                .documents()
                .par_iter()
                .map_init(
                    || FeatureExtractor::with_hasher(&self.feature_config, hasher.clone()),
                    |extractor, doc| {
                        let mut shingles = ShingleSet::new();
                        extractor.extract(&doc.tokens, &mut shingles);
                        shingles
                    },
                )
                .collect()
        } else {
            let mut extractor = FeatureExtractor::with_hasher(&self.feature_config, hasher);
            let mut shingle_sets = Vec::with_capacity(corpus.len());
            for (i, doc) in corpus.documents().iter().enumerate() {
                if (i + 1) % 1000 == 0 {
                    tracing::debug!("Processed {} documents...", i + 1);
                }
                let mut shingles = ShingleSet::new();
                extractor.extract(&doc.tokens, &mut shingles);
                shingle_sets.push(shingles);
            }
            shingle_sets
        };
        tracing::info!(
            "Shingled {} documents in {} sec",
            shingle_sets.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(shingle_sets)
    }

    /// Runs all the stages over `corpus`.
    ///
    /// # Errors
    ///
    /// An error will be returned when the corpus does not have `num_docs` documents or
    /// hash functions cannot be generated.
    pub fn run<S>(
        &self,
        corpus: &Corpus,
        truth: &GroundTruthMap,
        sink: &mut S,
    ) -> Result<PipelineOutput>
    where
        S: ReportSink + ?Sized,
    {
        let shingle_sets = self.shingle(corpus)?;
        self.run_with_shingle_sets(&corpus.ids(), &shingle_sets, truth, sink)
    }

    /// Runs all the stages over `corpus`, shingling with `hasher`.
    ///
    /// # Errors
    ///
    /// An error will be returned when the corpus does not have `num_docs` documents or
    /// hash functions cannot be generated.
    pub fn run_with_hasher<H, S>(
        &self,
        corpus: &Corpus,
        hasher: H,
        truth: &GroundTruthMap,
        sink: &mut S,
    ) -> Result<PipelineOutput>
    where
        H: ShingleHasher + Clone + Sync,
        S: ReportSink + ?Sized,
    {
        let shingle_sets = self.shingle_with_hasher(corpus, hasher)?;
        self.run_with_shingle_sets(&corpus.ids(), &shingle_sets, truth, sink)
    }

    /// Runs the stages following shingling.
    ///
    /// # Arguments
    ///
    /// * `ids` - Document identifiers in the index order.
    /// * `shingle_sets` - Shingle sets in the index order.
    /// * `truth` - Known plagiarism pairs.
    /// * `sink` - Receiver of candidate pairs and final counts.
    ///
    /// # Errors
    ///
    /// An error will be returned when the numbers of identifiers and shingle sets are not
    /// `num_docs` or hash functions cannot be generated.
    pub fn run_with_shingle_sets<D, S>(
        &self,
        ids: &[D],
        shingle_sets: &[ShingleSet],
        truth: &GroundTruthMap,
        sink: &mut S,
    ) -> Result<PipelineOutput>
    where
        D: AsRef<str>,
        S: ReportSink + ?Sized,
    {
        self.check_num_docs(ids.len())?;
        self.check_num_docs(shingle_sets.len())?;

        let average_shingles = if shingle_sets.is_empty() {
            0.
        } else {
            shingle_sets.iter().map(|s| s.len()).sum::<usize>() as f64 / shingle_sets.len() as f64
        };
        tracing::info!("Average shingles per document: {average_shingles:.2}");

        let searcher = JaccardSearcher::new(self.config.num_hashes, Some(self.family_seed))?;
        let searcher = if self.config.parallel {
            searcher
                .build_signatures_in_parallel(shingle_sets)
                .compare_signatures_in_parallel()?
        } else {
            searcher.build_signatures(shingle_sets).compare_signatures()?
        };
        let estimates = searcher
            .similarities()
            .ok_or_else(|| FindPlagiarismError::input("Signatures are not compared."))?;

        let validation = if shingle_sets.len() <= self.config.exact_ceiling {
            let exact = if self.config.parallel {
                ExactSimilarities::compute_in_parallel(shingle_sets)?
            } else {
                ExactSimilarities::compute(shingle_sets)?
            };
            let validation = Validation::compare(exact.matrix(), estimates);
            if let Some(v) = validation {
                tracing::info!(
                    "Mean absolute error of estimates: {:.4} (max {:.4})",
                    v.mean_absolute_error,
                    v.max_absolute_error
                );
            }
            validation
        } else {
            tracing::info!(
                "Skipped exact similarities for {} documents (ceiling {})",
                shingle_sets.len(),
                self.config.exact_ceiling
            );
            None
        };

        let evaluation = Evaluator::new(ids, shingle_sets, truth).evaluate(
            estimates,
            self.config.threshold,
            sink,
        );
        Ok(PipelineOutput {
            evaluation,
            validation,
            average_shingles,
        })
    }

    fn check_num_docs(&self, len: usize) -> Result<()> {
        if len != self.config.num_docs {
            return Err(FindPlagiarismError::input(format!(
                "Expected {} documents, but got {len}.",
                self.config.num_docs
            )));
        }
        Ok(())
    }
}
