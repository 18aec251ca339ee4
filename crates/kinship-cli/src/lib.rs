//! kinship-cli: Console front-end for the Kinship family tree.
//!
//! Hosts the numbered menu, the generation browser, and the one-shot
//! commands behind the `kinship` binary. All I/O goes through
//! [`prompt::Prompter`] so every flow can be driven from a script.

pub mod app;
pub mod browse;
pub mod config;
pub mod connect;
pub mod error;
pub mod menu;
pub mod prompt;
pub mod render;
