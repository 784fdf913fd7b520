//! Linkage CLI - command-line interface for the record linkage engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkage_io::RecordLoader;
use linkage_recipe::{to_linkage_options, validate_recipe, LinkOptions};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "linkage")]
#[command(about = "Probabilistic record linkage: blocking, Fellegi-Sunter scoring, EM, clustering")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full linkage pipeline against one CSV source
    Link {
        /// Path to the LinkOptions JSON file
        #[arg(short, long)]
        recipe: PathBuf,

        /// Path to the input CSV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate a LinkOptions file against a CSV source's schema
    ValidateRecipe {
        /// Path to the LinkOptions JSON file
        #[arg(short, long)]
        recipe: PathBuf,

        /// Path to the input CSV file (used to resolve field names)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Link { recipe, input } => run_link(&recipe, &input),
        Commands::ValidateRecipe { recipe, input } => validate_recipe_file(&recipe, &input),
    }
}

fn load_recipe(path: &PathBuf) -> Result<LinkOptions> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading recipe {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("parsing recipe {path:?}"))
}

fn load_records(input: &PathBuf) -> Result<Vec<linkage_core::Record>> {
    let loader = linkage_io::CsvRecordLoader::new(input);
    loader
        .load_all()
        .map_err(|e| linkage_core::LinkageError::LoaderFailure(e.to_string()))
        .map_err(anyhow::Error::from)
}

fn field_names(records: &[linkage_core::Record]) -> Vec<String> {
    records
        .first()
        .map(|r| r.fields.keys().cloned().collect())
        .unwrap_or_default()
}

fn run_link(recipe_path: &PathBuf, input: &PathBuf) -> Result<()> {
    info!(?recipe_path, ?input, "loading recipe and input");

    let recipe = load_recipe(recipe_path)?;
    let records = load_records(input)?;
    let available_fields = field_names(&records);

    if let Err(errors) = validate_recipe(&recipe, &available_fields) {
        for error in &errors {
            eprintln!("Validation error: {error}");
        }
        anyhow::bail!("recipe validation failed with {} errors", errors.len());
    }
    info!("recipe validated successfully");

    let options = to_linkage_options(&recipe);
    let records: Vec<Arc<linkage_core::Record>> = records.into_iter().map(Arc::new).collect();

    let clusters = linkage_core::link_records(&records, &options)
        .map_err(|e| anyhow::anyhow!("linkage failed: {e}"))?;

    println!("\n=== Record Linkage Complete ===");
    println!("Input records: {}", records.len());
    println!("Clusters: {}", clusters.len());
    for (root, members) in &clusters {
        println!("  {root}: {members:?}");
    }

    Ok(())
}

fn validate_recipe_file(recipe_path: &PathBuf, input: &PathBuf) -> Result<()> {
    info!(?recipe_path, "validating recipe");

    let recipe = load_recipe(recipe_path)?;
    let records = load_records(input)?;
    let available_fields = field_names(&records);

    match validate_recipe(&recipe, &available_fields) {
        Ok(()) => {
            println!("Recipe is valid!");
            println!("  Recipe ID: {}", recipe.recipe_id);
            println!("  Blocking fields: {:?}", recipe.blocking_fields);
            println!("  Similarity functions: {}", recipe.similarity_functions.len());
            Ok(())
        }
        Err(errors) => {
            eprintln!("Recipe validation failed:");
            for error in &errors {
                eprintln!("  - {error}");
            }
            anyhow::bail!("validation failed with {} errors", errors.len());
        }
    }
}
