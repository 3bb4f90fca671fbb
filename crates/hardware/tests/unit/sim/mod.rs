/// JSON configuration files and validation.
pub mod config;
