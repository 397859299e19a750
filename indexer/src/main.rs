use anyhow::Result;
use clap::{Parser, Subcommand};
use searchcore::crawl::crawl_file_tree;
use searchcore::persist::{write_shard, ShardReader};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect on-disk index shards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a corpus directory and write one index shard
    Build {
        /// Corpus root directory
        #[arg(long)]
        corpus: PathBuf,
        /// Output shard directory
        #[arg(long)]
        output: PathBuf,
    },
    /// Print summary information about an existing shard
    Inspect {
        /// Shard directory
        #[arg(long)]
        shard: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, output } => build_shard(&corpus, &output),
        Commands::Inspect { shard } => inspect_shard(&shard),
    }
}

fn build_shard(corpus: &Path, output: &Path) -> Result<()> {
    let (doc_table, index) = crawl_file_tree(corpus)?;
    tracing::info!(
        num_docs = doc_table.len(),
        num_words = index.num_words(),
        "crawl complete"
    );

    let created_at = time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "".into());
    write_shard(output, &doc_table, &index, created_at)?;
    tracing::info!(output = %output.display(), "shard written");
    Ok(())
}

fn inspect_shard(shard: &Path) -> Result<()> {
    let reader = ShardReader::open(shard)?;
    let meta = reader.meta();
    println!("shard:      {}", reader.root().display());
    println!("version:    {}", meta.version);
    println!("documents:  {}", reader.num_docs());
    println!("words:      {}", reader.num_words());
    println!("created at: {}", meta.created_at);
    Ok(())
}
