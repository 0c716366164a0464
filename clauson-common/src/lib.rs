//! # Clauson Common Library
//!
//! Shared code for the Clauson dictionary tools including:
//! - Error types
//! - Configuration loading (CLI → ENV → TOML → defaults)
//! - SQLite schema application and reset

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
