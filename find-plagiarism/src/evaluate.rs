//! Classification of similar pairs against known plagiarism pairs.
use triangle_matrix::TriangleMatrix;

use crate::corpus::GroundTruthMap;
use crate::feature::ShingleSet;

/// Pair of documents whose estimated similarity exceeds the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePair {
    /// Index of the left-side document.
    pub i: usize,
    /// Index of the right-side document (`i < j`).
    pub j: usize,
    /// Identifier of the left-side document.
    pub left: String,
    /// Identifier of the right-side document.
    pub right: String,
    /// Similarity estimated from signatures.
    pub estimated: f64,
    /// Exact Jaccard similarity of the shingle sets.
    pub exact: f64,
    /// Whether the pair is a known plagiarism pair.
    pub is_true_positive: bool,
}

/// Aggregated counts of a classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of candidates that are known pairs.
    pub true_positives: usize,
    /// Number of candidates that are not known pairs.
    pub false_positives: usize,
    /// Number of known pairs.
    pub total_true_pairs: usize,
}

impl Evaluation {
    /// Gets the fraction of candidates that are known pairs, or 0 without candidates.
    pub fn precision(&self) -> f64 {
        let candidates = self.true_positives + self.false_positives;
        if candidates == 0 {
            0.
        } else {
            self.true_positives as f64 / candidates as f64
        }
    }

    /// Gets the fraction of known pairs found as candidates, or 0 without known pairs.
    pub fn recall(&self) -> f64 {
        if self.total_true_pairs == 0 {
            0.
        } else {
            self.true_positives as f64 / self.total_true_pairs as f64
        }
    }
}

/// Receiver of classification results.
pub trait ReportSink {
    /// Receives a candidate pair, in the order of indices.
    fn candidate(&mut self, pair: &CandidatePair);

    /// Receives the final counts.
    fn summary(&mut self, evaluation: &Evaluation);
}

/// [`ReportSink`] keeping everything in memory.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    /// Received candidates.
    pub candidates: Vec<CandidatePair>,
    /// Received counts.
    pub evaluation: Option<Evaluation>,
}

impl ReportSink for CollectingSink {
    fn candidate(&mut self, pair: &CandidatePair) {
        self.candidates.push(pair.clone());
    }

    fn summary(&mut self, evaluation: &Evaluation) {
        self.evaluation = Some(*evaluation);
    }
}

/// Classifier of estimated similarities.
pub struct Evaluator<'a, D> {
    ids: &'a [D],
    shingle_sets: &'a [ShingleSet],
    truth: &'a GroundTruthMap,
}

impl<'a, D> Evaluator<'a, D>
where
    D: AsRef<str>,
{
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `ids` - Document identifiers in the index order.
    /// * `shingle_sets` - Shingle sets in the index order, used only for reporting
    ///                    exact similarities.
    /// * `truth` - Known plagiarism pairs.
    pub const fn new(
        ids: &'a [D],
        shingle_sets: &'a [ShingleSet],
        truth: &'a GroundTruthMap,
    ) -> Self {
        Self {
            ids,
            shingle_sets,
            truth,
        }
    }

    /// Reports every pair whose estimated similarity is strictly greater than `threshold`,
    /// and counts true and false positives.
    ///
    /// The exact similarity of a candidate is recomputed from the shingle sets and never
    /// affects the classification.
    ///
    /// # Panics
    ///
    /// It will panic if `estimates` is not a matrix of `ids.len()` items.
    pub fn evaluate<S>(
        &self,
        estimates: &TriangleMatrix<f64>,
        threshold: f64,
        sink: &mut S,
    ) -> Evaluation
    where
        S: ReportSink + ?Sized,
    {
        assert_eq!(estimates.num_items(), self.ids.len());
        let mut evaluation = Evaluation {
            total_true_pairs: self.truth.num_pairs(),
            ..Evaluation::default()
        };
        for (i, j, &estimated) in estimates.iter() {
            if estimated <= threshold {
                continue;
            }
            let left = self.ids[i].as_ref();
            let right = self.ids[j].as_ref();
            let is_true_positive = self.truth.is_pair(left, right);
            if is_true_positive {
                evaluation.true_positives += 1;
            } else {
                evaluation.false_positives += 1;
            }
            sink.candidate(&CandidatePair {
                i,
                j,
                left: left.to_string(),
                right: right.to_string(),
                estimated,
                exact: lsh::jaccard_similarity(&self.shingle_sets[i], &self.shingle_sets[j]),
                is_true_positive,
            });
        }
        tracing::info!(
            "Found {} candidates ({} true positives, {} false positives)",
            evaluation.true_positives + evaluation.false_positives,
            evaluation.true_positives,
            evaluation.false_positives
        );
        sink.summary(&evaluation);
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let ids = ["a", "b", "c", "d"];
        let sets = vec![
            ShingleSet::from_iter([1, 2, 3, 4]),
            ShingleSet::from_iter([2, 3, 4, 5]),
            ShingleSet::from_iter([1, 2, 3]),
            ShingleSet::from_iter([9]),
        ];
        let mut truth = GroundTruthMap::new();
        truth.insert("a", "b");
        truth.insert("d", "x");
        // (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
        let estimates =
            TriangleMatrix::from_values(4, vec![0.7, 0.5, 0.1, 0.6, 0., 0.]).unwrap();

        let mut sink = CollectingSink::default();
        let evaluation = Evaluator::new(&ids, &sets, &truth).evaluate(&estimates, 0.5, &mut sink);
        assert_eq!(
            evaluation,
            Evaluation {
                true_positives: 1,
                false_positives: 1,
                total_true_pairs: 2,
            }
        );
        assert_eq!(sink.evaluation, Some(evaluation));
        assert_eq!(sink.candidates.len(), 2);

        let first = &sink.candidates[0];
        assert_eq!((first.left.as_str(), first.right.as_str()), ("a", "b"));
        assert_eq!(first.exact, 0.6);
        assert!(first.is_true_positive);

        let second = &sink.candidates[1];
        assert_eq!((second.i, second.j), (1, 2));
        assert_eq!(second.exact, 0.4);
        assert!(!second.is_true_positive);
    }

    #[test]
    fn test_rates() {
        let evaluation = Evaluation {
            true_positives: 3,
            false_positives: 1,
            total_true_pairs: 6,
        };
        assert_eq!(evaluation.precision(), 0.75);
        assert_eq!(evaluation.recall(), 0.5);
        assert_eq!(Evaluation::default().precision(), 0.);
        assert_eq!(Evaluation::default().recall(), 0.);
    }
}
