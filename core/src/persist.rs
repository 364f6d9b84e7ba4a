use crate::error::{Error, Result};
use crate::InvertedIndex;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Summary written next to the index export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub num_links: usize,
    pub dangling_links: usize,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn now(num_docs: usize, num_terms: usize, num_links: usize, dangling_links: usize) -> Self {
        let created_at = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
        Self { num_docs, num_terms, num_links, dangling_links, created_at, version: INDEX_FORMAT_VERSION }
    }
}

/// File layout of a corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    pub root: PathBuf,
}

impl CorpusPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn collection(&self) -> PathBuf { self.root.join("collection.txt") }
    pub fn inverted_index(&self) -> PathBuf { self.root.join("invertedIndex.txt") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_inverted_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    let f = File::create(path).map_err(|e| Error::io(path, e))?;
    index.write_to(BufWriter::new(f)).map_err(|e| Error::io(path, e))
}

pub fn load_inverted_index(path: &Path) -> Result<InvertedIndex> {
    let mut f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| Error::io(path, e))?;
    parse_inverted_index(&buf)
}

/// Parse the text export. Blank lines are skipped; repeated ids on a line
/// are folded.
pub fn parse_inverted_index(text: &str) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    for (n, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let Some(term) = fields.next() else { continue };
        let mut any = false;
        for id in fields {
            index.insert(term.to_string(), id);
            any = true;
        }
        if !any {
            return Err(Error::MalformedIndex { line: n + 1, reason: format!("term {term:?} has no documents") });
        }
    }
    Ok(index)
}

pub fn save_meta(path: &Path, meta: &MetaFile) -> Result<()> {
    let mut f = File::create(path).map_err(|e| Error::io(path, e))?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes()).map_err(|e| Error::io(path, e))?;
    Ok(())
}

pub fn load_meta(path: &Path) -> Result<MetaFile> {
    let mut f = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| Error::io(path, e))?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}
