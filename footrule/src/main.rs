use anyhow::{Context, Result};
use clap::Parser;
use tfrank_core::tokenizer::normalize;
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "footrule")]
#[command(about = "List the URLs of each ranking file (no aggregation is performed)")]
struct Cli {
    /// Ranking files, one URL per line
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug)]
struct RankFile {
    name: String,
    urls: Vec<String>,
}

impl RankFile {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading ranking file {}", path.display()))?;
        let urls = text.lines().map(normalize).filter(|u| !u.is_empty()).collect();
        Ok(Self { name: path.display().to_string(), urls })
    }

    fn render(&self) -> String {
        let mut out = format!("{}\n    nURLS {}\n    URLS:", self.name, self.urls.len());
        for url in &self.urls {
            out.push(' ');
            out.push_str(url);
        }
        out
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let files = cli.files.iter().map(|p| RankFile::load(p)).collect::<Result<Vec<_>>>()?;
    let union: BTreeSet<&str> = files.iter().flat_map(|f| f.urls.iter().map(String::as_str)).collect();
    tracing::info!(files = files.len(), urls = union.len(), "loaded rankings");

    for file in &files {
        println!("{}", file.render());
    }
    Ok(())
}
