//! Link graph, inverted index and TF-IDF ranking over a small corpus of
//! hyperlinked text pages.

pub mod error;
pub mod graph;
pub mod index;
pub mod persist;
pub mod rank;
pub mod store;
pub mod tokenizer;

pub use error::{Error, Result};
pub use graph::{DanglingLink, GraphBuild, LinkGraph};
pub use index::InvertedIndex;
pub use rank::{rank, ScoredDocument, MAX_RESULTS};
pub use store::{CachedStore, DocumentStore, FsStore, MemoryStore, Page};

/// Opaque page identifier. Never normalised.
pub type DocumentId = String;

/// A page as seen by the link graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    /// Body text with section newlines folded into single spaces.
    pub body: String,
    /// Outbound link targets, deduplicated, never including `id` itself.
    pub links: Vec<DocumentId>,
}
