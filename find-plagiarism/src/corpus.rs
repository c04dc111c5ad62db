//! Loaders of documents and ground-truth pairs.
use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;

use crate::errors::{FindPlagiarismError, Result};

/// Document with an identifier and a sequence of tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Identifier such as `t8470`.
    pub id: String,
    /// Tokens in order.
    pub tokens: Vec<String>,
}

impl Document {
    /// Parses a line `<id> <token> <token> ...` separated by single spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use find_plagiarism::corpus::Document;
    ///
    /// let doc = Document::parse("t1 the cat sat").unwrap();
    /// assert_eq!(doc.id, "t1");
    /// assert_eq!(doc.tokens, vec!["the", "cat", "sat"]);
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut fields = line.split(' ');
        let id = fields.next().filter(|id| !id.is_empty())?;
        Some(Self {
            id: id.to_string(),
            tokens: fields.map(|t| t.to_string()).collect(),
        })
    }
}

/// Documents in a fixed order, which determines their indices in every stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Creates a corpus from documents in the given order.
    pub const fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Reads exactly `num_docs` documents, one per line.
    ///
    /// # Errors
    ///
    /// An error will be returned when the reader has less than `num_docs` lines or a line
    /// has no identifier.
    pub fn from_reader<R>(rdr: R, num_docs: usize) -> Result<Self>
    where
        R: Read,
    {
        let mut documents = Vec::with_capacity(num_docs);
        for (i, line) in BufReader::new(rdr).lines().take(num_docs).enumerate() {
            let line = line?;
            let doc = Document::parse(&line).ok_or_else(|| {
                FindPlagiarismError::input(format!("Line {} has no document id.", i + 1))
            })?;
            documents.push(doc);
        }
        if documents.len() < num_docs {
            return Err(FindPlagiarismError::input(format!(
                "Expected {num_docs} documents, but the corpus has only {}.",
                documents.len()
            )));
        }
        Ok(Self { documents })
    }

    /// Gets the documents.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Gets the identifiers in order.
    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }

    /// Gets the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Checks if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Symmetric mapping from a document identifier to the identifier of its known pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroundTruthMap {
    pairs: HashMap<String, String>,
}

impl GroundTruthMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads pairs `<id> <id>`, one per line. Empty lines are skipped.
    ///
    /// # Errors
    ///
    /// An error will be returned when a line does not consist of two identifiers.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut truth = Self::new();
        for (lhs, rhs) in read_pairs(rdr)? {
            truth.insert(lhs, rhs);
        }
        Ok(truth)
    }

    /// Maps two documents to each other.
    pub fn insert<S>(&mut self, lhs: S, rhs: S)
    where
        S: Into<String>,
    {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        self.pairs.insert(lhs.clone(), rhs.clone());
        self.pairs.insert(rhs, lhs);
    }

    /// Gets the known pair of `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.pairs.get(id).map(|s| s.as_str())
    }

    /// Checks if `lhs` and `rhs` are a known pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use find_plagiarism::corpus::GroundTruthMap;
    ///
    /// let mut truth = GroundTruthMap::new();
    /// truth.insert("t1", "t9");
    /// assert!(truth.is_pair("t9", "t1"));
    /// assert!(!truth.is_pair("t1", "t2"));
    /// ```
    pub fn is_pair(&self, lhs: &str, rhs: &str) -> bool {
        self.get(lhs) == Some(rhs)
    }

    /// Gets the number of entries, counting both directions of each pair.
    pub fn num_entries(&self) -> usize {
        self.pairs.len()
    }

    /// Gets the number of known pairs.
    pub fn num_pairs(&self) -> usize {
        self.num_entries() / 2
    }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Reads pairs `<id> <id>` in the input order, one per line. Empty lines are skipped.
///
/// # Errors
///
/// An error will be returned when a line does not consist of two identifiers separated
/// by a single space.
pub fn read_pairs<R>(rdr: R) -> Result<Vec<(String, String)>>
where
    R: Read,
{
    let mut pairs = vec![];
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<_> = line.split(' ').collect();
        if fields.len() != 2 || fields.iter().any(|f| f.is_empty()) {
            return Err(FindPlagiarismError::input(format!(
                "Line {} must be a pair of document ids, but got {line:?}.",
                i + 1
            )));
        }
        pairs.push((fields[0].to_string(), fields[1].to_string()));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_from_reader() {
        let data = "t1 a b c d\nt2 x y\r\nt3\nt4 ignored\n";
        let corpus = Corpus::from_reader(data.as_bytes(), 3).unwrap();
        assert_eq!(corpus.ids(), vec!["t1", "t2", "t3"]);
        assert_eq!(corpus.documents()[0].tokens, vec!["a", "b", "c", "d"]);
        assert_eq!(corpus.documents()[1].tokens, vec!["x", "y"]);
        assert!(corpus.documents()[2].tokens.is_empty());
    }

    #[test]
    fn test_corpus_too_short() {
        let data = "t1 a b c\nt2 d e f\n";
        assert!(matches!(
            Corpus::from_reader(data.as_bytes(), 3),
            Err(FindPlagiarismError::Input(_))
        ));
    }

    #[test]
    fn test_corpus_without_id() {
        let data = "t1 a b c\n\n";
        assert!(Corpus::from_reader(data.as_bytes(), 2).is_err());
    }

    #[test]
    fn test_truth_from_reader() {
        let data = "t1 t5\nt3 t2\n\n";
        let truth = GroundTruthMap::from_reader(data.as_bytes()).unwrap();
        assert_eq!(truth.num_entries(), 4);
        assert_eq!(truth.num_pairs(), 2);
        assert_eq!(truth.get("t5"), Some("t1"));
        assert!(truth.is_pair("t2", "t3"));
        assert!(!truth.is_pair("t1", "t3"));
        assert_eq!(truth.get("t4"), None);
    }

    #[test]
    fn test_read_pairs_keeps_order() {
        let data = "t9 t1\n\nt3 t2\r\n";
        let pairs = read_pairs(data.as_bytes()).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("t9".to_string(), "t1".to_string()),
                ("t3".to_string(), "t2".to_string()),
            ]
        );
        assert!(read_pairs("t1  t2\n".as_bytes()).is_err());
        assert!(read_pairs("t1\tt2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_truth_malformed() {
        let data = "t1 t5\nt3\n";
        assert!(GroundTruthMap::from_reader(data.as_bytes()).is_err());
        let data = "t1 t5 t6\n";
        assert!(GroundTruthMap::from_reader(data.as_bytes()).is_err());
    }
}
