//! Configuration, domain models and the static command table

pub mod commands;
pub mod config;
pub mod models;
