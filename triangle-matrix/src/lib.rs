//! This library provides a compact storage of symmetric pairwise values, such as
//! similarities between all pairs of documents.
//!
//! Only the `n*(n-1)/2` values above the diagonal are stored in a linear buffer,
//! which halves the memory of a full matrix and rejects accesses to the meaningless
//! diagonal cells. The mapping from pairs to offsets follows the triangular layout
//! described in Section 6.2 of [Mining of Massive Datasets](http://infolab.stanford.edu/~ullman/mmds/ch6.pdf),
//! adapted to 0-based indices.
#![deny(missing_docs)]

pub mod errors;
pub mod index;
pub mod matrix;

pub use index::TriangleIndex;
pub use matrix::TriangleMatrix;
