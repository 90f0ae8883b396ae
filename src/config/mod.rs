//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::error::PatternError;
use crate::pattern::{BlockPlan, Geometry, Strategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Complete generation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub testset: TestsetConfig,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// What to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsetConfig {
    /// Extent to cover in bytes
    #[serde(default = "default_size", deserialize_with = "deserialize_size")]
    pub size: u64,
    /// Block sizes in bytes; one testset is generated per entry
    #[serde(default = "default_block_sizes", deserialize_with = "deserialize_size_list")]
    pub block_sizes: Vec<u64>,
    /// Strategy name, resolved during validation
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Seed for randomized patterns (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TestsetConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            block_sizes: default_block_sizes(),
            pattern: default_pattern(),
            seed: None,
        }
    }
}

/// Where and how to write results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Testset file path (suffixed per block size when several are requested)
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Write a JSON manifest next to each testset
    #[serde(default)]
    pub manifest: bool,
    /// Re-read each written testset and check its coverage
    #[serde(default)]
    pub verify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            manifest: false,
            verify: false,
        }
    }
}

/// Runtime behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Validate and print the configuration without generating anything
    #[serde(default)]
    pub dry_run: bool,
}

fn default_size() -> u64 {
    4 * 1024 * 1024 * 1024
}

fn default_block_sizes() -> Vec<u64> {
    vec![4096]
}

fn default_pattern() -> String {
    Strategy::Linear.name().to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("testset.txt")
}

/// Size value in a config file: either a byte count or a size string
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

impl SizeValue {
    fn resolve<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            SizeValue::Bytes(n) => Ok(n),
            SizeValue::Text(s) => cli_convert::parse_size(&s).map_err(E::custom),
        }
    }
}

fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    SizeValue::deserialize(deserializer)?.resolve()
}

fn deserialize_size_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    Vec::<SizeValue>::deserialize(deserializer)?
        .into_iter()
        .map(SizeValue::resolve)
        .collect()
}

impl Config {
    /// Resolve the configured strategy name
    pub fn strategy(&self) -> Result<Strategy, PatternError> {
        self.testset.pattern.parse()
    }

    /// Validated plans, one per block size, in configuration order
    ///
    /// Fails on the first invalid combination; no plan is returned in that case.
    pub fn plans(&self) -> Result<Vec<BlockPlan>, PatternError> {
        let strategy = self.strategy()?;
        self.testset
            .block_sizes
            .iter()
            .map(|&block_size| BlockPlan::new(strategy, self.testset.size, block_size, self.geometry))
            .collect()
    }

    /// Testset path for a block size
    ///
    /// A single block size writes to the configured path unchanged. Several block
    /// sizes write `<stem>_<label>.<ext>`, e.g. `testset_8K.txt`.
    pub fn testset_path(&self, block_size: u64) -> PathBuf {
        if self.testset.block_sizes.len() <= 1 {
            return self.output.path.clone();
        }
        suffixed_path(&self.output.path, &cli_convert::format_size(block_size))
    }
}

fn suffixed_path(path: &Path, label: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, label, ext.to_string_lossy()),
        None => format!("{}_{}", stem, label),
    };
    path.with_file_name(name)
}
