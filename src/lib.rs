//! Core library surface for the Recipe Box TUI application.
//!
//! The store is usable on its own; the `ui` module is one consumer of it and
//! the binary wires the two together.
pub mod config;
pub mod logging;
pub mod models;
pub mod seed;
pub mod store;
pub mod ui;

/// The domain types that other layers manipulate.
pub use models::{Recipe, RecipeDraft, RecipeId, RecipePatch};

/// The recipe store and its pluggable pieces.
pub use store::{CoinFlip, RecipeStore, RecommendationPolicy, StoreError, StoreEvent};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
