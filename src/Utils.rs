//! different utility modules used throughout the project
/// server settings from a TOML file
pub mod config;
/// terminal logger set up once per process
pub mod logger;
