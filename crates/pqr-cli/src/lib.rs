//! Command-line front end for the PQR case tracker.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
mod tables;
