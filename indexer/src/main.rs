use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tfrank_core::persist::{save_inverted_index, save_meta, CorpusPaths, MetaFile};
use tfrank_core::store::read_collection;
use tfrank_core::{FsStore, InvertedIndex, LinkGraph};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the link graph and inverted index for a page corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory holding collection.txt and one <id>.txt per page
    #[arg(long, env = "TFRANK_CORPUS", default_value = ".")]
    corpus: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the inverted index and write invertedIndex.txt and meta.json
    Build {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Output directory (defaults to the corpus directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print every page with its outbound and inbound links
    Graph {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, output } => {
            let output = output.unwrap_or_else(|| corpus.corpus.clone());
            build_index(&CorpusPaths::new(&corpus.corpus), &CorpusPaths::new(output))
        }
        Commands::Graph { corpus } => print_graph(&CorpusPaths::new(&corpus.corpus)),
    }
}

fn load_ids(paths: &CorpusPaths) -> Result<Vec<String>> {
    let manifest = paths.collection();
    read_collection(&manifest).with_context(|| format!("reading manifest {}", manifest.display()))
}

fn build_index(input: &CorpusPaths, output: &CorpusPaths) -> Result<()> {
    let ids = load_ids(input)?;
    let store = FsStore::new(&input.root);
    tracing::info!(num_docs = ids.len(), corpus = %input.root.display(), "loaded collection");

    let built = LinkGraph::build(&ids, &store).context("building link graph")?;
    let index = InvertedIndex::build(&ids, &store).context("building inverted index")?;

    let index_path = output.inverted_index();
    save_inverted_index(&index_path, &index)
        .with_context(|| format!("writing {}", index_path.display()))?;

    let meta = MetaFile::now(ids.len(), index.len(), built.graph.edge_count(), built.dangling.len());
    let meta_path = output.meta();
    save_meta(&meta_path, &meta).with_context(|| format!("writing {}", meta_path.display()))?;

    tracing::info!(output = %index_path.display(), terms = index.len(), "index build complete");
    Ok(())
}

fn print_graph(paths: &CorpusPaths) -> Result<()> {
    let ids = load_ids(paths)?;
    let store = FsStore::new(&paths.root);
    let built = LinkGraph::build(&ids, &store).context("building link graph")?;
    let graph = &built.graph;

    for (idx, node) in graph.iter() {
        let line = format!(
            "{} out={} in={} -> {}",
            node.id,
            graph.outbound(idx).len(),
            graph.inbound(idx).len(),
            graph.outbound_ids(idx).join(" ")
        );
        println!("{}", line.trim_end());
    }
    Ok(())
}
