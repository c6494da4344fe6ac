use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flashcard_builder::io::read_word_list;
use flashcard_builder::stages::{SessionEnd, editor_command};
use flashcard_builder::{
    CleanTargets, Component, Config, Curator, GoogleImageSearch, KeySource, Lemmatizer, Lexicon,
    MerriamWebster, ModelClient, Reviewer, TermStore, TerminalKeys, execute_assemble,
    execute_clean, execute_generate, execute_images, execute_manifest, execute_sanitize,
    run_session,
};

#[derive(Parser)]
#[command(name = "sfb")]
#[command(author, version, about = "Spanish vocabulary to Anki flashcard pipeline", long_about = None)]
struct Cli {
    /// Configuration file (default: flashcards.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, lemmatize and deduplicate the raw word list
    Sanitize,

    /// Review dictionary entries word by word (y/n/u/q)
    Curate,

    /// Generate flashcard content for curated entries
    Generate {
        /// Show each generated record for approval or editing
        #[arg(long)]
        review: bool,
    },

    /// Pick an image for each entry with flashcard content
    Images,

    /// Build the Anki deck package
    Assemble,

    /// Show which artifacts exist for each entry
    Manifest,

    /// Remove one kind of generated artifact
    Clean {
        #[arg(value_enum)]
        component: Component,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();
    setup_logging(cli.verbose);

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to load .env: {}", e);
        }
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let store = TermStore::new(config.paths.terms_path());

    match cli.command {
        Commands::Sanitize => sanitize(&config),
        Commands::Curate => curate(&config, store).await,
        Commands::Generate { review } => generate(&config, &store, review).await,
        Commands::Images => images(&config, &store).await,
        Commands::Assemble => {
            let result = execute_assemble(&store, &config.anki, &config.paths.deck_path())?;
            println!(
                "{} {} notes written to {}",
                style("Done:").green(),
                result.notes,
                config.paths.deck_path().display()
            );
            Ok(())
        }
        Commands::Manifest => {
            print!("{}", execute_manifest(&store)?);
            Ok(())
        }
        Commands::Clean { component, force } => {
            let targets = CleanTargets {
                store,
                history: config.paths.curator_history_path(),
                sanitized_vocab: config.paths.sanitized_vocab_path(),
            };
            let mut keys = TerminalKeys::new();
            let confirm_with: Option<&mut dyn KeySource> = if force { None } else { Some(&mut keys) };
            execute_clean(component, &targets, confirm_with)?;
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over `--verbose` when set
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn sanitize(config: &Config) -> Result<()> {
    let lemmatizer = match config.paths.lexicon_path() {
        Some(path) => {
            let lexicon = Lexicon::load(&path)?;
            info!("Loaded lexicon with {} forms from {:?}", lexicon.len(), path);
            Lemmatizer::new(lexicon).strict(config.sanitize.strict_lexicon)
        }
        None => Lemmatizer::default(),
    };

    let result = execute_sanitize(
        &config.paths.raw_vocab_path(),
        &config.paths.sanitized_vocab_path(),
        &lemmatizer,
    )?;
    println!(
        "{} {} unique lemmas from {} lines",
        style("Sanitized:").green(),
        result.lemmas.len(),
        result.lines_read
    );
    Ok(())
}

async fn curate(config: &Config, store: TermStore) -> Result<()> {
    let list_path = config.paths.sanitized_vocab_path();
    let words = read_word_list(&list_path)
        .with_context(|| format!("No sanitized word list at {:?}; run `sfb sanitize` first", list_path))?;

    let dictionary = MerriamWebster::from_env()?;
    let mut curator = Curator::new(dictionary, store, words, config.paths.curator_history_path())?;
    let mut keys = TerminalKeys::new();

    let summary = run_session(&mut curator, &mut keys).await?;
    if summary.end == SessionEnd::LookupFailed {
        println!(
            "{} dictionary unavailable; run `sfb curate` again to resume",
            style("Stopped:").yellow()
        );
    }
    Ok(())
}

async fn generate(config: &Config, store: &TermStore, review: bool) -> Result<()> {
    let model = ModelClient::from_config(&config.llm)?;
    info!("Using {:?} model {}", config.llm.provider, config.llm.model);

    let mut keys = TerminalKeys::new();
    let reviewer = if review {
        Some(Reviewer {
            keys: &mut keys,
            editor: editor_command(),
        })
    } else {
        None
    };

    let result = execute_generate(&model, store, reviewer).await?;
    println!(
        "{} {} generated, {} failed",
        style("Done:").green(),
        result.generated,
        result.failed
    );
    Ok(())
}

async fn images(config: &Config, store: &TermStore) -> Result<()> {
    let search = GoogleImageSearch::from_env()?;
    let mut keys = TerminalKeys::new();

    let result = execute_images(&search, store, &mut keys, &config.images).await?;
    println!(
        "{} {} images saved, {} skipped",
        style("Done:").green(),
        result.saved,
        result.skipped
    );
    Ok(())
}
