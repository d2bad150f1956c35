// App layer - configuration and the command line actions.

#[path = "app_config.rs"]
pub mod config;

#[path = "commands.rs"]
pub mod commands;
