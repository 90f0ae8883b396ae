//! Testset manifest handling
//!
//! A manifest is a JSON sidecar written next to a testset. It records the generation
//! parameters and the seed actually used, so any testset (including one generated
//! from entropy) can be regenerated bit for bit, plus per-channel block counts for a
//! quick sanity check of the striping.

use crate::pattern::{self, BlockPlan, Strategy};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Generation record for one testset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsetManifest {
    /// When the testset was generated
    pub generated_at: DateTime<Utc>,
    /// Ordering strategy
    pub strategy: Strategy,
    /// Covered extent in bytes
    pub extent: u64,
    /// Block size in bytes
    pub block_size: u64,
    /// Backend page size in bytes
    pub page_size: u64,
    /// Number of backend channels
    pub channels: usize,
    /// Seed the PRNG was built from (absent for deterministic strategies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Number of offsets in the testset
    pub block_count: u64,
    /// Offsets owned by each channel
    pub channel_blocks: Vec<u64>,
    /// Testset file this manifest describes
    pub testset: PathBuf,
}

impl TestsetManifest {
    /// Describe a generated sequence
    pub fn new(plan: &BlockPlan, seed: Option<u64>, offsets: &[u64], testset: &Path) -> Self {
        let geometry = plan.geometry();
        Self {
            generated_at: Utc::now(),
            strategy: plan.strategy(),
            extent: plan.extent(),
            block_size: plan.block_size(),
            page_size: geometry.page_size,
            channels: geometry.channels,
            seed: seed.filter(|_| plan.strategy().is_randomized()),
            block_count: offsets.len() as u64,
            channel_blocks: pattern::channel_histogram(offsets, &geometry),
            testset: testset.to_path_buf(),
        }
    }

    /// Conventional manifest path for a testset: `<testset>.json`
    pub fn path_for(testset: &Path) -> PathBuf {
        let mut name = testset.as_os_str().to_owned();
        name.push(".json");
        PathBuf::from(name)
    }

    /// Parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read testset manifest: {}", path.display()))?;

        Self::from_string(&content)
            .with_context(|| format!("Failed to parse testset manifest: {}", path.display()))
    }

    /// Parse a manifest from a JSON string
    pub fn from_string(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid testset manifest JSON")
    }

    /// Export the manifest as pretty-printed JSON
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize testset manifest")?;
        fs::write(path, content + "\n")
            .with_context(|| format!("Failed to write testset manifest: {}", path.display()))?;
        Ok(())
    }

    /// Rebuild the plan this manifest was generated from
    pub fn plan(&self) -> std::result::Result<BlockPlan, crate::PatternError> {
        BlockPlan::new(
            self.strategy,
            self.extent,
            self.block_size,
            pattern::Geometry::new(self.page_size, self.channels),
        )
    }
}
