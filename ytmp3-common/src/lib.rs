//! # YTMP3 Common Library
//!
//! Shared code for the YTMP3 bot crates including:
//! - Error and result types
//! - Configuration loading and resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
