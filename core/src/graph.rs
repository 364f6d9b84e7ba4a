//! Directed link graph over the corpus.
//!
//! Nodes live in one vector in corpus enumeration order; edges are indices
//! into it. Inbound lists are derived from the outbound lists and never
//! edited on their own.

use crate::error::Result;
use crate::store::DocumentStore;
use crate::{Document, DocumentId};
use std::collections::HashMap;

/// Outbound link naming an id that is not part of the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub source: DocumentId,
    pub target: DocumentId,
}

#[derive(Debug)]
pub struct GraphBuild {
    pub graph: LinkGraph,
    pub dangling: Vec<DanglingLink>,
}

#[derive(Debug, Default)]
pub struct LinkGraph {
    nodes: Vec<Document>,
    lookup: HashMap<DocumentId, usize>,
    outbound: Vec<Vec<usize>>,
    inbound: Vec<Vec<usize>>,
}

impl LinkGraph {
    /// Load every page and build the graph. Any load failure aborts the build.
    pub fn build<S: DocumentStore>(ids: &[DocumentId], store: &S) -> Result<GraphBuild> {
        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            let page = store.load(id)?;
            let mut links: Vec<DocumentId> = Vec::new();
            for target in page.link_tokens() {
                if target == id || links.iter().any(|l| l == target) {
                    continue;
                }
                links.push(target.to_string());
            }
            nodes.push(Document { id: id.clone(), body: page.body, links });
        }

        let lookup: HashMap<DocumentId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

        let mut dangling = Vec::new();
        let mut outbound = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut resolved = Vec::with_capacity(node.links.len());
            for target in &node.links {
                match lookup.get(target) {
                    Some(&idx) => resolved.push(idx),
                    None => {
                        tracing::warn!(source = %node.id, %target, "link to document outside the corpus");
                        dangling.push(DanglingLink { source: node.id.clone(), target: target.clone() });
                    }
                }
            }
            outbound.push(resolved);
        }

        let inbound = derive_inbound(&outbound);
        let graph = LinkGraph { nodes, lookup, outbound, inbound };
        tracing::info!(nodes = graph.len(), edges = graph.edge_count(), dangling = dangling.len(), "built link graph");
        Ok(GraphBuild { graph, dangling })
    }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> &Document {
        &self.nodes[idx]
    }

    /// Resolved outbound targets of `idx`, in link order. Dangling targets
    /// are kept on the [`Document`] but not here.
    pub fn outbound(&self, idx: usize) -> &[usize] {
        &self.outbound[idx]
    }

    pub fn inbound(&self, idx: usize) -> &[usize] {
        &self.inbound[idx]
    }

    pub fn outbound_ids(&self, idx: usize) -> Vec<&str> {
        self.outbound[idx].iter().map(|&i| self.nodes[i].id.as_str()).collect()
    }

    pub fn inbound_ids(&self, idx: usize) -> Vec<&str> {
        self.inbound[idx].iter().map(|&i| self.nodes[i].id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Document)> {
        self.nodes.iter().enumerate()
    }

    /// Number of resolved edges.
    pub fn edge_count(&self) -> usize {
        self.outbound.iter().map(Vec::len).sum()
    }

    /// True when every inbound list equals a fresh derivation from the
    /// outbound lists.
    pub fn is_consistent(&self) -> bool {
        derive_inbound(&self.outbound) == self.inbound
    }
}

fn derive_inbound(outbound: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut inbound = vec![Vec::new(); outbound.len()];
    for (src, targets) in outbound.iter().enumerate() {
        for &dst in targets {
            inbound[dst].push(src);
        }
    }
    inbound
}
