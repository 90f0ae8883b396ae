//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::parse_size;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the effective configuration: config file (if any), then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, base)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Override testset settings
    if let Some(ref size) = cli.size {
        config.testset.size = parse_size(size).context("Invalid size")?;
    }
    if !cli.block_sizes.is_empty() {
        config.testset.block_sizes = cli
            .block_sizes
            .iter()
            .map(|b| parse_size(b))
            .collect::<std::result::Result<_, _>>()
            .context("Invalid block size")?;
    }
    if let Some(ref pattern) = cli.pattern {
        config.testset.pattern = pattern.clone();
    }
    if cli.seed.is_some() {
        config.testset.seed = cli.seed;
    }

    // Override geometry
    if let Some(ref page_size) = cli.page_size {
        config.geometry.page_size = parse_size(page_size).context("Invalid page size")?;
    }
    if let Some(channels) = cli.channels {
        config.geometry.channels = channels;
    }

    // Override output settings
    if let Some(ref path) = cli.output {
        config.output.path = path.clone();
    }
    if cli.manifest {
        config.output.manifest = true;
    }
    if cli.verify {
        config.output.verify = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Geometry, Strategy};
    use clap::Parser;

    #[test]
    fn test_parse_toml_basic() {
        let toml = r#"
[testset]
size = "256K"
block_sizes = ["4K", 8192, "16k"]
pattern = "round_robin_random"
seed = 42

[geometry]
page_size = 32768
channels = 8

[output]
path = "/tmp/testset.txt"
manifest = true
"#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.testset.size, 262144);
        assert_eq!(config.testset.block_sizes, vec![4096, 8192, 16384]);
        assert_eq!(config.strategy().unwrap(), Strategy::RoundRobinRandom);
        assert_eq!(config.testset.seed, Some(42));
        assert_eq!(config.geometry, Geometry::new(32768, 8));
        assert!(config.output.manifest);
        assert!(!config.output.verify);
    }

    #[test]
    fn test_parse_toml_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config, Config::default());

        let config = parse_toml_string("[geometry]\nchannels = 2\n").unwrap();
        assert_eq!(config.geometry.page_size, 32768);
        assert_eq!(config.geometry.channels, 2);
    }

    #[test]
    fn test_parse_toml_bad_size() {
        let toml = r#"
[testset]
size = "4Q"
"#;
        assert!(parse_toml_string(toml).is_err());
    }

    #[test]
    fn test_unknown_pattern_surfaces_at_validation() {
        let config = parse_toml_string("[testset]\npattern = \"stride\"\n").unwrap();
        assert!(config.strategy().is_err());
    }

    #[test]
    fn test_merge_cli_overrides_file() {
        let file = parse_toml_string(
            r#"
[testset]
size = "1G"
block_sizes = ["4K"]
pattern = "random"
seed = 1

[output]
verify = true
"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "ftlpattern",
            "-s",
            "256K",
            "-b",
            "8K,16K",
            "--seed",
            "7",
            "--page-size",
            "64K",
            "--manifest",
        ])
        .unwrap();

        let config = merge_cli_with_config(&cli, file).unwrap();
        assert_eq!(config.testset.size, 262144);
        assert_eq!(config.testset.block_sizes, vec![8192, 16384]);
        assert_eq!(config.testset.pattern, "random");
        assert_eq!(config.testset.seed, Some(7));
        assert_eq!(config.geometry.page_size, 65536);
        assert!(config.output.manifest);
        assert!(config.output.verify);
    }

    #[test]
    fn test_merge_invalid_block_size() {
        let cli = Cli::try_parse_from(["ftlpattern", "-b", "4K,huge"]).unwrap();
        assert!(merge_cli_with_config(&cli, Config::default()).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ftlpattern.toml");
        std::fs::write(&path, "[testset]\nsize = \"1M\"\npattern = \"round_robin_per_pages\"\n").unwrap();

        let cli = Cli::try_parse_from(["ftlpattern", "-c", path.to_str().unwrap()]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.testset.size, 1024 * 1024);
        assert_eq!(config.strategy().unwrap(), Strategy::RoundRobinPerPages);
    }

    #[test]
    fn test_load_config_missing_file() {
        let cli = Cli::try_parse_from(["ftlpattern", "-c", "/nonexistent/ftlpattern.toml"]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
