use anyhow::{Context, Result};
use clap::Parser;
use tfrank_core::persist::{load_inverted_index, load_meta, CorpusPaths};
use tfrank_core::store::read_collection;
use tfrank_core::{rank, CachedStore, FsStore};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Rank pages against the query words by TF-IDF")]
struct Args {
    /// Directory holding collection.txt and the pages
    #[arg(long, env = "TFRANK_CORPUS", default_value = ".")]
    corpus: PathBuf,
    /// Inverted index export (defaults to <corpus>/invertedIndex.txt)
    #[arg(long, env = "TFRANK_INDEX")]
    index: Option<PathBuf>,
    /// Query words
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    words: Vec<String>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Args::parse();
    let paths = CorpusPaths::new(&args.corpus);

    let manifest = paths.collection();
    let ids = read_collection(&manifest).with_context(|| format!("reading manifest {}", manifest.display()))?;
    let index_path = args.index.unwrap_or_else(|| paths.inverted_index());
    let index = load_inverted_index(&index_path)
        .with_context(|| format!("reading index {}", index_path.display()))?;

    check_summary(&index_path.with_file_name("meta.json"), ids.len());

    let store = CachedStore::new(FsStore::new(&paths.root));
    let ranked = rank(&args.words, &index, &ids, &store).context("ranking pages")?;
    tracing::debug!(results = ranked.len(), pages_read = store.cached(), "query complete");

    for doc in ranked {
        println!("{} {:.6}", doc.id, doc.score);
    }
    Ok(())
}

/// Warn when the summary written with the index was built over a different
/// collection. The summary is optional.
fn check_summary(path: &Path, num_docs: usize) {
    if !path.exists() {
        return;
    }
    match load_meta(path) {
        Ok(meta) if meta.num_docs != num_docs => {
            tracing::warn!(indexed = meta.num_docs, collection = num_docs, "index was built over a different collection");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable index summary"),
    }
}
