use anyhow::Result;
use clap::Parser;
use searchcore::query::{QueryEngine, QueryResult};
use searchcore::tokenizer::query_terms;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searchshell")]
#[command(about = "Interactive conjunctive search over one or more index shards", long_about = None)]
struct Args {
    /// Shard directories to search
    #[arg(required = true)]
    shards: Vec<PathBuf>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    // One engine for the lifetime of the shell; shards are expensive to
    // open and cheap to query repeatedly.
    let engine = QueryEngine::open(&args.shards)?;
    tracing::info!(shards = args.shards.len(), "shards loaded");

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "query> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF (ctrl-D).
            writeln!(stdout)?;
            break;
        }
        let words = query_terms(&line);
        if words.is_empty() {
            continue;
        }
        let results = engine.process_query(&words)?;
        print_results(&mut stdout, &results)?;
    }
    Ok(())
}

fn print_results(out: &mut impl Write, results: &[QueryResult]) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out, "  [no results]")?;
        return Ok(());
    }
    // Engine order is rank-ascending; show best matches first.
    for r in results.iter().rev() {
        writeln!(out, "  {} ({})", r.document, r.rank)?;
    }
    Ok(())
}
