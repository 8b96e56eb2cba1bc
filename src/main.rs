// src/main.rs
use clap::Parser;
use outline_research::config::ApiConfig;
use outline_research::extractors::outline::outline_extractor;
use outline_research::extractors::{ContentOutline, ExtractionResult};
use outline_research::research::ResearchPipeline;
use outline_research::storage::StorageManager;
use outline_research::utils::{self, AppError};
use std::path::PathBuf;

/// Command Line Interface for the SEO content outline researcher
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query to research and outline
    #[arg(short, long, required_unless_present = "input", conflicts_with = "input")]
    query: Option<String>,

    /// Parse an existing outline document instead of running the research (no API keys needed)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for saved outlines
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Do not write any files
    #[arg(long)]
    no_save: bool,

    /// Print the structured outline as JSON on stdout
    #[arg(long)]
    print_json: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (RUST_LOG, else the verbosity flag)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Produce an outline document, either offline or through the research pipeline
    let (query, keywords, document, sections) = match (&args.input, &args.query) {
        (Some(path), _) => {
            tracing::info!("Parsing outline document from {}", path.display());
            let bytes = std::fs::read(path)?;
            let sections = outline_extractor().extract_bytes(&bytes)?;
            let document = String::from_utf8_lossy(&bytes).into_owned();
            let outline = ContentOutline::from_sections(&sections);

            let query = match path.file_stem() {
                Some(stem) if outline.primary_keyword.is_empty() => stem.to_string_lossy().into_owned(),
                _ => outline.primary_keyword.clone(),
            };
            let mut keywords = vec![outline.primary_keyword];
            keywords.extend(outline.secondary_keywords);
            keywords.retain(|k| !k.is_empty());

            (query, keywords, document, sections)
        }
        (None, Some(query)) => {
            let config = ApiConfig::from_env()?;
            tracing::debug!("Loaded configuration: {:?}", config);

            let pipeline = ResearchPipeline::new(&config)?;
            let report = pipeline.run(query, |stage| tracing::info!("{}", stage)).await?;

            let mut keywords = vec![report.analysis.primary_keyword];
            keywords.extend(report.analysis.secondary_keywords);
            (report.query, keywords, report.document, report.sections)
        }
        (None, None) => return Err(AppError::Config("Either --query or --input is required".to_string())),
    };

    log_sections(&sections);
    let outline = ContentOutline::from_sections(&sections);

    // 4. Save and/or print
    if !args.no_save {
        let storage = StorageManager::new(&args.output_dir)?;
        let dir = storage.save_outline(&query, &document, &sections, &outline)?;
        storage.save_metadata(&query, &keywords, &document, &sections)?;
        tracing::info!("Saved outline files to: {}", dir.display());
    }

    if args.print_json {
        let json = serde_json::to_string_pretty(&outline).map_err(|e| AppError::Processing(e.to_string()))?;
        println!("{}", json);
    }

    let missing = sections.missing();
    tracing::info!(
        "Processing finished. Sections found: {}, missing: {}",
        sections.len() - missing.len(),
        missing.len()
    );

    if missing.len() == sections.len() {
        return Err(AppError::Processing(format!("No outline sections found for '{}'", query)));
    }

    Ok(())
}

fn log_sections(sections: &ExtractionResult) {
    for (name, content) in sections.iter() {
        if content.is_empty() {
            tracing::warn!("Section '{}' is empty", name);
        } else {
            tracing::info!("Section '{}': {} chars", name, content.chars().count());
        }
    }
}
