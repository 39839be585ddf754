//! Core types and configuration for the TAQ processing workspace.
//!
//! This crate provides shared types used across all other crates:
//! - Decoded tick series (trades, quotes)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{AdjustConfig, BatchConfig, CleanConfig, ResampleConfig};
pub use error::{Error, Result};
pub use types::*;
