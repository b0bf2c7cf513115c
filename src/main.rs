use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use pokemantle::{
    match_guess, Catalog, GameConfig, Ranking, SimilarityCache, SimilarityEngine,
};
use pokemantle_game::DEFAULT_SUGGESTION_LIMIT;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod terminal;

/// Guess the secret Pokémon from similarity feedback
#[derive(Parser, Debug)]
#[command(name = "pokemantle")]
#[command(about = "Guess the secret Pokémon from similarity feedback", long_about = None)]
struct Cli {
    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CatalogArgs {
    /// Path to the catalog JSON array
    #[arg(short, long, default_value = "data/pokemon.json")]
    catalog: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactive rounds in the terminal
    Play {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Seed for target selection
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of suggestions for `?text`
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        suggestions: usize,
    },

    /// Print the catalog ranked by similarity to a target
    Rank {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Key of the target entity
        #[arg(short, long)]
        target: String,

        /// Number of entries to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print JSON rows with every original attribute
        #[arg(long)]
        json: bool,
    },

    /// Grade one guess against a target
    Grade {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Key of the target entity
        #[arg(short, long)]
        target: String,

        /// Guess as a player would type it
        #[arg(short, long)]
        guess: String,

        /// Break the score down into its components
        #[arg(long)]
        explain: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::WARN,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Pokemantle v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Play {
            catalog,
            seed,
            suggestions,
        } => {
            let mut config = GameConfig::new(catalog.catalog).with_suggestion_limit(suggestions);
            config.seed = seed;
            let catalog = Arc::new(load_catalog(&config)?);
            if catalog.is_empty() {
                bail!("catalog {:?} has no entities", config.catalog_path);
            }
            let cache = SimilarityCache::new();
            terminal::run(catalog, &cache, &config)
        }
        Command::Rank {
            catalog,
            target,
            limit,
            json,
        } => {
            let catalog = load_catalog(&GameConfig::new(catalog.catalog))?;
            let target = catalog
                .require(&target)
                .with_context(|| format!("unknown target {:?}", target))?;
            let matrix = SimilarityEngine::compute(&catalog);
            let ranking = Ranking::new(target, &catalog, &matrix);

            if json {
                let view = ranking.view(&catalog);
                let rows = &view[..limit.min(view.len())];
                println!("{}", serde_json::to_string_pretty(rows)?);
            } else {
                for (position, entry) in ranking.top(limit).iter().enumerate() {
                    println!(
                        "{:>5}  {:>3}  {} ({})",
                        position + 1,
                        entry.score,
                        entry.display_name,
                        entry.name
                    );
                }
            }
            Ok(())
        }
        Command::Grade {
            catalog,
            target,
            guess,
            explain,
        } => {
            let catalog = load_catalog(&GameConfig::new(catalog.catalog))?;
            let target = catalog
                .require(&target)
                .with_context(|| format!("unknown target {:?}", target))?;
            let Some(guessed) = match_guess(guess.trim(), &catalog) else {
                bail!("no entity matches {:?}", guess);
            };

            let engine = SimilarityEngine::fit(&catalog);
            let matrix = engine.similarity_matrix();
            let ranking = Ranking::new(target, &catalog, &matrix);
            let Some(grade) = ranking.grade(guessed) else {
                bail!("could not grade {:?}", guess);
            };
            println!("rank {}  score {}", grade.rank, grade.score);

            if explain {
                if let Some(breakdown) = engine.explain(&matrix, guessed, target) {
                    println!("{}", serde_json::to_string_pretty(&breakdown)?);
                }
            }
            Ok(())
        }
    }
}

fn load_catalog(config: &GameConfig) -> anyhow::Result<Catalog> {
    let catalog = config
        .load_catalog()
        .with_context(|| format!("failed to load catalog from {:?}", config.catalog_path))?;
    info!("Loaded {} entities from {:?}", catalog.len(), config.catalog_path);
    Ok(catalog)
}
