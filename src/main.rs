mod error;
mod extract;
mod fetch;
mod normalize;
mod pipeline;
mod registry;
mod report;
mod settings;
mod stats;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use fetch::HttpFetcher;
use normalize::{Normalizer, StopWords};
use pipeline::Pipeline;
use report::Directive;
use settings::Settings;
use stats::StatsEngine;
use store::DirStore;

#[derive(Parser)]
#[command(name = "speech_compare", about = "Fetch speech transcripts and compare their vocabulary")]
struct Cli {
    /// Run file (TOML); defaults to the built-in speech list
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, normalize and compare every configured document (default)
    Run(RunArgs),
    /// List configured documents and their extractors
    Documents,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Directory for normalized transcripts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Extra stop words, one per line
    #[arg(short, long)]
    stopwords: Option<PathBuf>,
    /// Words per bar chart
    #[arg(short = 'n', long)]
    top_n: Option<usize>,
    /// Write chart data as JSON to this path
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    info!(
        documents = settings.documents.len(),
        output_dir = ?settings.output_dir,
        "Loaded settings"
    );

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Documents => {
            println!("{:>3} | {:<28} | {:<26} | URL", "#", "Label", "Extractor");
            println!("{}", "-".repeat(100));
            for (i, d) in settings.documents.iter().enumerate() {
                println!(
                    "{:>3} | {:<28} | {:<26} | {}",
                    i + 1,
                    d.label(),
                    d.extractor().describe(),
                    d.url
                );
            }
        }
        Commands::Run(args) => {
            if let Some(dir) = args.output_dir {
                settings.output_dir = dir;
            }
            if let Some(path) = args.stopwords {
                settings.stopword_file = Some(path);
            }
            if let Some(n) = args.top_n {
                settings.top_n = n;
            }
            settings.validate()?;
            run(&settings, args.export)?;
        }
    }

    println!("\nDone in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn run(settings: &Settings, export: Option<PathBuf>) -> Result<()> {
    let mut stop_words = StopWords::english();
    if let Some(path) = &settings.stopword_file {
        let added = stop_words.extend_from_file(path)?;
        info!("Added {} stop words from {:?}", added, path);
    }
    info!("{} stop words", stop_words.len());

    let pipeline = Pipeline::new(
        HttpFetcher::new(settings.fetch_timeout_secs)?,
        DirStore::new(&settings.output_dir),
        Normalizer::new(stop_words),
        StatsEngine::new(),
    );

    println!("Processing {} documents...", settings.documents.len());
    let report = pipeline.run(&settings.documents);
    report::print_outcomes(&report);
    println!("Transcripts: {:?}", pipeline.store().root());

    report::present(&report.registry, settings.top_n, settings.flow_words, &Directive::Display)?;
    if let Some(path) = export {
        report::present(
            &report.registry,
            settings.top_n,
            settings.flow_words,
            &Directive::Export(path.clone()),
        )?;
        println!("\nChart data written to {:?}", path);
    }
    Ok(())
}
