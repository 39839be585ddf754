//! Tick-data cleaning and adjustment pipelines.
//!
//! This crate handles:
//! - Windowed statistical outlier detection over a price sequence
//! - The file-to-file cleaning pipeline (decode, detect, filter, re-encode)
//! - Corporate-action adjustment (factor table, law classification, rewrite)
//! - Parallel batch execution over independent (security, day) files

pub mod adjust;
pub mod batch;
pub mod cleaner;
pub mod outlier;

pub use adjust::{adjust_file, FactorRow, FactorTable};
pub use batch::{BatchReport, BatchRunner, CleanJob};
pub use cleaner::{clean_file, CleanReport, Cleaner};
pub use outlier::OutlierDetector;
