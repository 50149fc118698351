use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use vta_cli::{AnswerPayload, display_banner, read_question, render_links, render_results};
use vta_core::SearchConfig;
use vta_rag::{RetrievalEngine, VtaConfig};

#[derive(Parser)]
#[command(name = "vta")]
#[command(about = "Virtual teaching assistant: find forum posts and course content for a question", long_about = None)]
struct Cli {
    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load sources and build the embedding index
    Build {
        /// Re-embed even if a cache file exists
        #[arg(short, long)]
        force: bool,
    },
    /// Show the posts most similar to a question
    Search {
        query: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        #[arg(short, long)]
        min_similarity: Option<f32>,
    },
    /// Print the context block an answer would be composed from
    Context {
        query: String,
        #[arg(short, long, default_value_t = 4000)]
        max_length: usize,
    },
    /// Context plus supporting links for a question
    Ask {
        query: String,
        /// Emit the payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = VtaConfig::from_env().context("failed to read configuration")?;
    let mut engine = RetrievalEngine::from_config(config)?.with_progress(|progress| {
        eprintln!(
            "{} Processed {}/{} documents",
            "⏳".yellow(),
            progress.processed,
            progress.total
        );
    });

    let force = matches!(cli.command, Some(Commands::Build { force: true }));
    let prepared = engine.prepare(force).await;

    match cli.command {
        Some(Commands::Build { .. }) => {
            let report = prepared?;
            let source = if report.from_cache { "loaded from cache" } else { "embedded" };
            println!(
                "{} {} documents {} ({})",
                "✅".green(),
                report.documents,
                source,
                engine.index().cache_path().display()
            );
        }
        Some(Commands::Search {
            query,
            top_k,
            min_similarity,
        }) => {
            prepared?;
            let defaults = engine.config().search;
            let config = SearchConfig {
                top_k: top_k.unwrap_or(defaults.top_k),
                min_similarity: min_similarity.unwrap_or(defaults.min_similarity),
            };
            let results = engine.index().search(&query, config).await?;
            render_results(&results);
        }
        Some(Commands::Context { query, max_length }) => {
            prepared?;
            let context = engine.context(&query, Some(max_length)).await?;
            println!("{}", context.text);
        }
        Some(Commands::Ask { query, json }) => {
            prepared?;
            let context = engine.context(&query, None).await?;
            let payload = AnswerPayload::new(&query, &context);
            if json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                render_results(&context.results);
                println!();
                render_links(&payload.links);
            }
        }
        Some(Commands::Stats) => {
            if let Err(e) = prepared {
                println!("{} Index not ready: {}", "⚠️".yellow(), e);
            }
            println!("{}", serde_json::to_string_pretty(&engine.stats())?);
        }
        None => {
            prepared?;
            interactive(&engine).await?;
        }
    }

    Ok(())
}

async fn interactive(engine: &RetrievalEngine) -> Result<()> {
    display_banner(engine.index().documents().len(), engine.index().provider().model_id());

    while let Some(input) = read_question()? {
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        match engine.context(&input, None).await {
            Ok(context) => {
                render_results(&context.results);
                render_links(&AnswerPayload::new(&input, &context).links);
            }
            Err(e) => println!("{} Search failed: {}", "❌".red(), e),
        }
        println!();
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
