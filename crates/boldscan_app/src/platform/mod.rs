mod app;
mod args;
mod config;
mod effects;
mod logging;
mod output;

pub use app::run_app;
