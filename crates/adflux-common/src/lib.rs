//! # adflux-common
//!
//! Shared types, configuration, error handling, and media URL resolution used
//! across all AdFlux crates. No I/O lives here beyond reading configuration.

pub mod any_row;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod mysql_row;
