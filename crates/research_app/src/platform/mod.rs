mod app;
pub mod config;
mod effects;
mod keys;
pub mod logging;
mod terminal;
mod ui;

pub use app::run_app;
