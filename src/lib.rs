pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod export;
pub mod headless;
pub mod logging;
pub mod ui;
