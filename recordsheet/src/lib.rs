mod app;
pub mod app_core;
mod background;
pub mod cache;
pub mod cli;
mod commands;
pub mod events;
pub mod logging;
pub mod settings;
pub mod state;
pub mod utils;

pub use app::App;

// Always expose testing module (integration tests need it)
pub mod testing;
