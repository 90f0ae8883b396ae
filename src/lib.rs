//! ftlpattern - access pattern generator for multi-channel FTL benchmarks
//!
//! ftlpattern builds the ordered list of byte offsets ("testset") that an IO
//! benchmark replays against a page-mapped storage backend made of several
//! parallel instances (channels).
//!
//! # Architecture
//!
//! - **Patterns**: linear, random, and channel-interleaved (round-robin) orderings
//! - **Testsets**: newline-delimited offset files consumed by the benchmark executable
//! - **Verification**: coverage checks over generated or re-read testsets
//! - **Manifests**: JSON sidecars recording parameters and seeds for reproducible runs

pub mod config;
pub mod error;
pub mod manifest;
pub mod pattern;
pub mod testset;
pub mod verify;

// Re-export commonly used types
pub use config::Config;
pub use error::PatternError;
pub use pattern::{BlockPlan, Geometry, RandomSource, Strategy};

/// Result type used by the configuration layer and the CLI
pub type Result<T> = anyhow::Result<T>;
