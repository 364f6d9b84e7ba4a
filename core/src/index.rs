use crate::error::Result;
use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use crate::DocumentId;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

/// Normalised term -> ids of the documents containing it.
///
/// Postings keep insertion order (corpus enumeration order) and hold each
/// document at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: BTreeMap<String, Vec<DocumentId>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Load every page body and index it. Any load failure aborts the build.
    pub fn build<S: DocumentStore>(ids: &[DocumentId], store: &S) -> Result<Self> {
        let mut index = Self::new();
        for id in ids {
            let page = store.load(id)?;
            index.add_document(id, &page.body);
        }
        tracing::info!(docs = ids.len(), terms = index.len(), "built inverted index");
        Ok(index)
    }

    pub fn add_document(&mut self, id: &str, body: &str) {
        let mut seen: HashSet<String> = HashSet::new();
        for term in tokenize(body) {
            if seen.insert(term.clone()) {
                self.insert(term, id);
            }
        }
    }

    /// Add `id` to the postings of `term` unless it is already there.
    pub fn insert(&mut self, term: String, id: &str) {
        let list = self.postings.entry(term).or_default();
        if !list.iter().any(|d| d == id) {
            list.push(id.to_string());
        }
    }

    pub fn postings(&self, term: &str) -> Option<&[DocumentId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    /// Number of documents containing `term`; 0 for unknown terms.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn contains(&self, term: &str, id: &str) -> bool {
        self.postings(term).is_some_and(|p| p.iter().any(|d| d == id))
    }

    /// Terms in ascending order with their postings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocumentId])> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    /// Write the text export: `term id1 id2 ...`, one term per line.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for (term, docs) in &self.postings {
            write!(w, "{term}")?;
            for doc in docs {
                write!(w, " {doc}")?;
            }
            writeln!(w)?;
        }
        w.flush()
    }
}
