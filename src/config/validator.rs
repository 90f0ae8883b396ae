//! Configuration validation

use super::*;
use anyhow::Result;
use std::collections::HashSet;

/// Offsets held in memory above which a warning is logged (8 bytes each)
const LARGE_TESTSET_BLOCKS: usize = 1 << 27;

/// Validate complete configuration
///
/// Every check runs before any testset is generated. Generator errors are kept as
/// [`PatternError`] inside the returned error so callers can downcast them.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_testset(&config.testset)?;
    validate_output(&config.output)?;

    let plans = config.plans()?;
    for plan in &plans {
        if !plan.block_size().is_power_of_two() {
            log::warn!("block_size {} is not a power of 2", plan.block_size());
        }
        if plan.block_count() > LARGE_TESTSET_BLOCKS {
            log::warn!(
                "block_size {} yields {} offsets (~{} MiB in memory)",
                plan.block_size(),
                plan.block_count(),
                plan.block_count().saturating_mul(8) / (1024 * 1024)
            );
        }
    }

    Ok(())
}

/// Validate testset configuration
pub fn validate_testset(testset: &TestsetConfig) -> Result<()> {
    if testset.block_sizes.is_empty() {
        anyhow::bail!("at least one block size is required");
    }

    let mut seen = HashSet::new();
    for &block_size in &testset.block_sizes {
        if !seen.insert(block_size) {
            anyhow::bail!("block size {} listed more than once", block_size);
        }
    }

    Ok(())
}

/// Validate output configuration
fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.path.as_os_str().is_empty() {
        anyhow::bail!("output path must not be empty");
    }
    if output.path.is_dir() {
        anyhow::bail!("output path {} is a directory", output.path.display());
    }
    Ok(())
}
