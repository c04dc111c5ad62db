//! Near-duplicate detection in documents with MinHash.
//!
//! Documents are converted into sets of word shingles, and each set is summarized by a
//! short MinHash signature. The fraction of agreeing signature components estimates the
//! Jaccard similarity of two documents, so all pairs can be compared at a fraction of the
//! cost of exact set comparisons. Pairs with high estimates are reported and checked
//! against known plagiarism pairs.
//!
//! # Examples
//!
//! ```
//! use find_plagiarism::corpus::{Corpus, GroundTruthMap};
//! use find_plagiarism::evaluate::CollectingSink;
//! use find_plagiarism::{Pipeline, PipelineConfig};
//!
//! let data = "\
//! t1 the quick brown fox jumps over the lazy dog
//! t2 the quick brown fox jumps over the lazy cat
//! t3 lorem ipsum dolor sit amet consectetur adipiscing elit
//! ";
//! let corpus = Corpus::from_reader(data.as_bytes(), 3).unwrap();
//! let truth = GroundTruthMap::from_reader("t1 t2\n".as_bytes()).unwrap();
//!
//! let mut config = PipelineConfig::new(3);
//! config.num_hashes = 500;
//! config.seed = Some(42);
//!
//! let mut sink = CollectingSink::default();
//! let output = Pipeline::new(config)
//!     .unwrap()
//!     .run(&corpus, &truth, &mut sink)
//!     .unwrap();
//! assert_eq!(output.evaluation.true_positives, 1);
//! assert_eq!(output.evaluation.false_positives, 0);
//! ```
#![deny(missing_docs)]

pub mod corpus;
pub mod errors;
pub mod evaluate;
pub mod exact;
pub mod feature;
pub mod jaccard;
pub mod pipeline;
pub mod shingling;

pub use jaccard::JaccardSearcher;
pub use pipeline::{Pipeline, PipelineConfig};
