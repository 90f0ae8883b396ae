//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// ftlpattern - access pattern generator for multi-channel FTL benchmarks
///
/// Writes a testset file (one byte offset per line) for each requested block size.
/// Options left unset fall back to the TOML config file, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "ftlpattern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Testset Options ===
    /// Extent to cover (e.g., 4G, 256K, 1048576) [default: 4G]
    #[arg(short = 's', long)]
    pub size: Option<String>,

    /// Block size(s), comma-separated (e.g., 4K or 4K,8K,16K) [default: 4K]
    #[arg(short = 'b', long = "block-size", value_delimiter = ',')]
    pub block_sizes: Vec<String>,

    /// Access pattern: linear, random, round_robin_sequential, round_robin_random,
    /// round_robin_per_pages [default: linear]
    #[arg(short = 'p', long)]
    pub pattern: Option<String>,

    /// Seed for randomized patterns (entropy-seeded when omitted)
    #[arg(long, env = "FTLPATTERN_SEED")]
    pub seed: Option<u64>,

    // === Backend Geometry ===
    /// Backend page size (e.g., 32K) [default: 32768]
    #[arg(long)]
    pub page_size: Option<String>,

    /// Number of backend channels [default: 4]
    #[arg(long)]
    pub channels: Option<usize>,

    // === Output Options ===
    /// Testset output path [default: testset.txt]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Write a JSON manifest (<testset>.json) next to each testset
    #[arg(long)]
    pub manifest: bool,

    /// Re-read each written testset and verify full coverage
    #[arg(long)]
    pub verify: bool,

    // === Configuration File ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Dry run - validate configuration without generating
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// List supported access patterns and exit
    #[arg(long)]
    pub list_patterns: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.channels == Some(0) {
            anyhow::bail!("channels must be at least 1");
        }

        if self.block_sizes.iter().any(|b| b.trim().is_empty()) {
            anyhow::bail!("block-size list contains an empty entry");
        }

        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                anyhow::bail!("output path must not be empty");
            }
        }

        Ok(())
    }
}
