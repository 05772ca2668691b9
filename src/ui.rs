//! Ratatui front-end for the recipe box. The app owns the store and is the
//! only caller of its mutating operations.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
