//! TF-IDF scoring and top-K ranking.
//!
//! tf  = occurrences of the term / non-empty tokens in the body
//! idf = log10(corpus size / documents containing the term)
//!
//! A document's score is the sum of tf * idf over the distinct query terms.

use crate::error::Result;
use crate::store::DocumentStore;
use crate::tokenizer::{normalize, tokenize};
use crate::{DocumentId, InvertedIndex};
use std::collections::{HashMap, HashSet};

pub const MAX_RESULTS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub score: f64,
}

/// Normalise query words, dropping empties and repeats (first occurrence wins).
pub fn query_terms<S: AsRef<str>>(query: &[S]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for raw in query {
        let term = normalize(raw.as_ref());
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Token counts of one body.
struct TermCounts {
    counts: HashMap<String, usize>,
    total: usize,
}

impl TermCounts {
    fn of(body: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        for token in tokenize(body) {
            *counts.entry(token).or_insert(0) += 1;
            total += 1;
        }
        Self { counts, total }
    }

    fn is_empty(&self) -> bool { self.total == 0 }

    /// 0 for every term when the body has no tokens.
    fn frequency(&self, term: &str) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.counts.get(term).copied().unwrap_or(0) as f64 / self.total as f64
    }
}

/// Fraction of the body's tokens equal to `term`. An empty body gives 0.
pub fn term_frequency(body: &str, term: &str) -> f64 {
    TermCounts::of(body).frequency(term)
}

/// `None` when the term occurs nowhere in the corpus.
pub fn inverse_document_frequency(corpus_size: usize, document_frequency: usize) -> Option<f64> {
    if document_frequency == 0 {
        return None;
    }
    Some((corpus_size as f64 / document_frequency as f64).log10())
}

/// Documents of `ids` listed in the postings of `term`. Postings naming
/// pages outside `ids` are not counted, so the result never exceeds the
/// corpus size.
fn corpus_frequency(index: &InvertedIndex, members: &HashSet<&str>, term: &str) -> usize {
    let Some(postings) = index.postings(term) else { return 0 };
    let df = postings.iter().filter(|d| members.contains(d.as_str())).count();
    if df < postings.len() {
        tracing::warn!(%term, foreign = postings.len() - df, "index lists pages missing from the collection");
    }
    df
}

/// Score every document in `ids`, keeping corpus order.
pub fn score_documents<S, Q>(query: &[Q], index: &InvertedIndex, ids: &[DocumentId], store: &S) -> Result<Vec<ScoredDocument>>
where
    S: DocumentStore,
    Q: AsRef<str>,
{
    let members: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut weighted: Vec<(String, f64)> = Vec::new();
    for term in query_terms(query) {
        match inverse_document_frequency(ids.len(), corpus_frequency(index, &members, &term)) {
            Some(idf) => weighted.push((term, idf)),
            None => tracing::debug!(%term, "query term not in index, skipped"),
        }
    }

    let mut scored = Vec::with_capacity(ids.len());
    for id in ids {
        let mut score = 0.0;
        if !weighted.is_empty() {
            let page = store.load(id)?;
            let counts = TermCounts::of(&page.body);
            if counts.is_empty() {
                tracing::debug!(%id, "empty document, term frequency forced to 0");
            }
            for (term, idf) in &weighted {
                score += counts.frequency(term) * idf;
            }
        }
        scored.push(ScoredDocument { id: id.clone(), score });
    }
    Ok(scored)
}

/// Order by score, highest first, ties kept in corpus order; keep the top
/// [`MAX_RESULTS`] and drop zero scores.
pub fn top_k(mut scored: Vec<ScoredDocument>, k: usize) -> Vec<ScoredDocument> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.into_iter().take(k).filter(|d| d.score != 0.0).collect()
}

/// Rank the corpus against a free-text query.
pub fn rank<S, Q>(query: &[Q], index: &InvertedIndex, ids: &[DocumentId], store: &S) -> Result<Vec<ScoredDocument>>
where
    S: DocumentStore,
    Q: AsRef<str>,
{
    let scored = score_documents(query, index, ids, store)?;
    Ok(top_k(scored, MAX_RESULTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn doc(id: &str, score: f64) -> ScoredDocument {
        ScoredDocument { id: id.to_string(), score }
    }

    #[test]
    fn term_frequency_of_sentence() {
        let body = "The cat sat on the mat.";
        assert!((term_frequency(body, "the") - 2.0 / 6.0).abs() < 1e-12);
        assert!((term_frequency(body, "cat") - 1.0 / 6.0).abs() < 1e-12);
        assert!((term_frequency(body, "mat") - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(term_frequency(body, "dog"), 0.0);
    }

    #[test]
    fn empty_body_has_zero_frequency() {
        assert_eq!(term_frequency("", "cat"), 0.0);
        assert_eq!(term_frequency(" . , ", "cat"), 0.0);
    }

    #[test]
    fn idf_values() {
        let idf = inverse_document_frequency(2, 1).unwrap();
        assert!((idf - 0.30103).abs() < 1e-5);
        assert_eq!(inverse_document_frequency(4, 4), Some(0.0));
        assert_eq!(inverse_document_frequency(4, 0), None);
    }

    #[test]
    fn query_terms_are_normalised_and_deduplicated() {
        assert_eq!(query_terms(&["Fox", "fox.", "dog", "", "?", "FOX"]), ["fox", "dog"]);
    }

    #[test]
    fn top_k_orders_and_filters() {
        let scored = vec![doc("a", 0.1), doc("b", 0.0), doc("c", 0.5), doc("d", 0.1)];
        let ranked = top_k(scored, MAX_RESULTS);
        let ids: Vec<&str> = ranked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "d"]);
    }

    #[test]
    fn top_k_caps_length() {
        let scored: Vec<ScoredDocument> = (0..50).map(|i| doc(&format!("u{i}"), i as f64 + 1.0)).collect();
        let ranked = top_k(scored, MAX_RESULTS);
        assert_eq!(ranked.len(), MAX_RESULTS);
        assert_eq!(ranked[0].id, "u49");
        assert_eq!(ranked[29].id, "u20");
    }

    #[test]
    fn fox_scenario() {
        let mut store = MemoryStore::new();
        store.insert_sections("X", "", "the quick brown fox");
        store.insert_sections("Y", "", "the lazy dog");
        let ids = vec!["X".to_string(), "Y".to_string()];
        let index = InvertedIndex::build(&ids, &store).unwrap();
        assert_eq!(index.document_frequency("fox"), 1);

        let scored = score_documents(&["fox"], &index, &ids, &store).unwrap();
        assert!((scored[0].score - 0.25 * 2f64.log10()).abs() < 1e-12);
        assert_eq!(scored[1].score, 0.0);

        let ranked = rank(&["fox", "fox"], &index, &ids, &store).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "X");
        assert!((ranked[0].score - 0.25 * 2f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn unknown_terms_score_nothing() {
        let mut store = MemoryStore::new();
        store.insert_sections("X", "", "alpha beta");
        let ids = vec!["X".to_string()];
        let index = InvertedIndex::build(&ids, &store).unwrap();
        assert!(rank(&["gamma"], &index, &ids, &store).unwrap().is_empty());
        // present in every document: idf is 0
        assert!(rank(&["alpha"], &index, &ids, &store).unwrap().is_empty());
    }

    #[test]
    fn empty_page_scores_zero() {
        let mut store = MemoryStore::new();
        store.insert_sections("blank", "", "");
        store.insert_sections("marks", "", " . , ; ?");
        store.insert_sections("X", "", "red fox");
        store.insert_sections("Y", "", "blue sky");
        let ids: Vec<String> = ["blank", "marks", "X", "Y"].iter().map(|s| s.to_string()).collect();
        let index = InvertedIndex::build(&ids, &store).unwrap();

        let scored = score_documents(&["fox"], &index, &ids, &store).unwrap();
        assert!(scored.iter().all(|d| d.score.is_finite()));
        assert_eq!(scored[0].score, 0.0);
        assert_eq!(scored[1].score, 0.0);

        let ranked = rank(&["fox"], &index, &ids, &store).unwrap();
        let ranked_ids: Vec<&str> = ranked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ranked_ids, ["X"]);
        assert!((ranked[0].score - 0.5 * 4f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn pages_outside_the_collection_do_not_count() {
        let mut store = MemoryStore::new();
        store.insert_sections("X", "", "the quick brown fox");
        let ids = vec!["X".to_string()];
        let index = crate::persist::parse_inverted_index("fox X Z\nquick X\n").unwrap();

        let scored = score_documents(&["fox", "quick"], &index, &ids, &store).unwrap();
        assert_eq!(scored[0].score, 0.0);
        assert!(rank(&["fox"], &index, &ids, &store).unwrap().is_empty());

        store.insert_sections("Y", "", "dog");
        let ids = vec!["X".to_string(), "Y".to_string()];
        let ranked = rank(&["fox"], &index, &ids, &store).unwrap();
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].score > 0.0);
        assert!((ranked[0].score - 0.25 * 2f64.log10()).abs() < 1e-12);
    }
}
