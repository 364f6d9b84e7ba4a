use crate::error::{Error, Result};
use crate::DocumentId;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const START_LINKS: &str = "#start Section-1";
const END_LINKS: &str = "#end Section-1";
const START_BODY: &str = "#start Section-2";
const END_BODY: &str = "#end Section-2";

/// The two logical sections of a page, each folded onto one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Raw link section; split on whitespace to get target ids.
    pub links: String,
    pub body: String,
}

impl Page {
    pub fn link_tokens(&self) -> impl Iterator<Item = &str> {
        self.links.split_whitespace()
    }
}

/// Source of page content keyed by document id.
pub trait DocumentStore {
    fn load(&self, id: &str) -> Result<Page>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load(&self, id: &str) -> Result<Page> {
        (**self).load(id)
    }
}

enum Marker {
    Start(usize),
    End(usize),
}

fn marker(line: &str) -> Option<Marker> {
    if line.starts_with(START_LINKS) {
        Some(Marker::Start(0))
    } else if line.starts_with(START_BODY) {
        Some(Marker::Start(1))
    } else if line.starts_with(END_LINKS) {
        Some(Marker::End(0))
    } else if line.starts_with(END_BODY) {
        Some(Marker::End(1))
    } else {
        None
    }
}

/// Split a page into its link and body sections.
///
/// Marker and blank lines are dropped; the remaining lines of a section are
/// joined with single spaces. Lines outside any section are ignored.
pub fn parse_page(id: &str, text: &str) -> Result<Page> {
    let mut sections: [Vec<&str>; 2] = [Vec::new(), Vec::new()];
    let mut open: Option<usize> = None;
    let mut closed = 0usize;

    for line in text.lines() {
        match marker(line) {
            Some(Marker::Start(n)) => {
                if let Some(cur) = open {
                    return Err(Error::malformed(id, format!("section {} opened inside section {}", n + 1, cur + 1)));
                }
                if closed >= 2 {
                    return Err(Error::malformed(id, "more than two sections"));
                }
                if n != closed {
                    return Err(Error::malformed(id, format!("expected section {}, found section {}", closed + 1, n + 1)));
                }
                open = Some(n);
            }
            Some(Marker::End(n)) => match open {
                Some(cur) if cur == n => {
                    open = None;
                    closed += 1;
                }
                Some(cur) => {
                    return Err(Error::malformed(id, format!("end of section {} inside section {}", n + 1, cur + 1)));
                }
                None => {
                    return Err(Error::malformed(id, format!("end of section {} before its start", n + 1)));
                }
            },
            None => {
                if let Some(cur) = open {
                    let content = line.trim_end_matches(['\r', '\n']);
                    if !content.trim().is_empty() {
                        sections[cur].push(content);
                    }
                }
            }
        }
    }

    if let Some(cur) = open {
        return Err(Error::malformed(id, format!("section {} is never closed", cur + 1)));
    }
    if closed < 2 {
        return Err(Error::malformed(id, format!("expected 2 sections, found {closed}")));
    }
    let [links, body] = sections;
    Ok(Page { links: links.join(" "), body: body.join(" ") })
}

/// Pages stored as `<root>/<id>.txt`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn page_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.txt"))
    }
}

impl DocumentStore for FsStore {
    fn load(&self, id: &str) -> Result<Page> {
        let path = self.page_path(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::DocumentNotFound { id: id.to_string() })
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        parse_page(id, &text)
    }
}

/// Raw page text held in memory, parsed on every load.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pages: HashMap<DocumentId, String>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, id: impl Into<DocumentId>, text: impl Into<String>) {
        self.pages.insert(id.into(), text.into());
    }

    /// Build a well-formed page from a link list and body text.
    pub fn insert_sections(&mut self, id: impl Into<DocumentId>, links: &str, body: &str) {
        let text = format!("{START_LINKS}\n{links}\n{END_LINKS}\n\n{START_BODY}\n{body}\n{END_BODY}\n");
        self.insert(id, text);
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Page> {
        let text = self
            .pages
            .get(id)
            .ok_or_else(|| Error::DocumentNotFound { id: id.to_string() })?;
        parse_page(id, text)
    }
}

/// Read-through cache in front of another store. Only successful loads
/// are cached, so failures are reported again on the next call.
pub struct CachedStore<S> {
    inner: S,
    pages: RwLock<HashMap<DocumentId, Arc<Page>>>,
}

impl<S: DocumentStore> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, pages: RwLock::new(HashMap::new()) }
    }

    pub fn cached(&self) -> usize {
        self.pages.read().len()
    }
}

impl<S: DocumentStore> DocumentStore for CachedStore<S> {
    fn load(&self, id: &str) -> Result<Page> {
        if let Some(page) = self.pages.read().get(id) {
            return Ok(Page::clone(page));
        }
        let page = Arc::new(self.inner.load(id)?);
        self.pages.write().insert(id.to_string(), Arc::clone(&page));
        Ok(Page::clone(&page))
    }
}

/// Parse a manifest: whitespace-separated ids, duplicates folded,
/// enumerated in ascending order.
pub fn parse_collection(text: &str) -> Vec<DocumentId> {
    text.split_whitespace()
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn read_collection<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentId>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_collection(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "#start Section-1\n\nurl2 url34 url1\n  url26\n\n#end Section-1\n\n#start Section-2\nMars has long been the subject\nof human interest.\n#end Section-2\n";

    #[test]
    fn splits_sections_and_folds_lines() {
        let page = parse_page("url1", PAGE).unwrap();
        assert_eq!(page.link_tokens().collect::<Vec<_>>(), ["url2", "url34", "url1", "url26"]);
        assert_eq!(page.body, "Mars has long been the subject of human interest.");
    }

    #[test]
    fn empty_sections_are_fine() {
        let page = parse_page("x", "#start Section-1\n#end Section-1\n#start Section-2\n#end Section-2\n").unwrap();
        assert_eq!(page, Page::default());
    }

    #[test]
    fn end_before_start_is_malformed() {
        let err = parse_page("x", "#end Section-1\n#start Section-1\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { ref id, .. } if id == "x"));
    }

    #[test]
    fn missing_body_is_malformed() {
        let err = parse_page("x", "#start Section-1\na\n#end Section-1\n").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn third_section_is_malformed() {
        let text = format!("{PAGE}#start Section-2\nmore\n#end Section-2\n");
        assert!(matches!(parse_page("x", &text), Err(Error::MalformedDocument { .. })));
    }

    #[test]
    fn nested_start_is_malformed() {
        let text = "#start Section-1\n#start Section-2\n#end Section-2\n#end Section-1\n";
        assert!(matches!(parse_page("x", text), Err(Error::MalformedDocument { .. })));
    }

    #[test]
    fn crlf_lines() {
        let text = PAGE.replace('\n', "\r\n");
        let page = parse_page("url1", &text).unwrap();
        assert_eq!(page.body, "Mars has long been the subject of human interest.");
    }

    #[test]
    fn memory_store_missing_id() {
        let store = MemoryStore::new();
        assert!(matches!(store.load("nope"), Err(Error::DocumentNotFound { ref id }) if id == "nope"));
    }

    #[test]
    fn cache_serves_repeat_loads() {
        let mut mem = MemoryStore::new();
        mem.insert_sections("a", "b", "hello world");
        let cache = CachedStore::new(mem);
        assert_eq!(cache.cached(), 0);
        let first = cache.load("a").unwrap();
        let second = cache.load("a").unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.cached(), 1);
        assert!(cache.load("missing").is_err());
        assert_eq!(cache.cached(), 1);
    }

    #[test]
    fn collection_is_deduplicated_and_ordered() {
        let ids = parse_collection("url31 url2\n  url11\turl2\n\n");
        assert_eq!(ids, ["url11", "url2", "url31"]);
    }
}
