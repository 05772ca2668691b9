//! Binary entry point: parse flags, start logging, build the store and drive
//! the Ratatui event loop until the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use recipe_box::config::Args;
use recipe_box::{logging, run_app, seed, App, CoinFlip, RecipeStore};
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    let log_path = args.log_path()?;
    logging::init(&log_path, &args.log_level)?;

    let recipes = if args.empty {
        Vec::new()
    } else {
        seed::sample_recipes().context("failed to build sample recipes")?
    };
    let policy = match args.seed {
        Some(seed) => CoinFlip::seeded(seed),
        None => CoinFlip::from_entropy(),
    };
    let store = RecipeStore::with_recipes(recipes)
        .context("failed to load initial recipes")?
        .with_policy(policy);
    info!(recipes = store.len(), log = %log_path.display(), "starting recipe box");

    let mut app = App::new(store);
    run_app(&mut app)
}
