//! ftlpattern CLI entry point

use anyhow::{Context, Result};
use ftlpattern::config::cli::Cli;
use ftlpattern::config::cli_convert::format_size;
use ftlpattern::config::{toml, validator, Config};
use ftlpattern::manifest::TestsetManifest;
use ftlpattern::pattern::{self, BlockPlan, RandomSource, Strategy};
use ftlpattern::testset;
use ftlpattern::verify::{self, CoverageResult};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Outcome of one generated testset
struct JobReport {
    path: PathBuf,
    block_size: u64,
    block_count: usize,
    seed: Option<u64>,
    channel_blocks: Vec<u64>,
    elapsed: Duration,
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    if cli.list_patterns {
        for strategy in Strategy::ALL {
            println!("{}", strategy);
        }
        return Ok(());
    }

    println!("ftlpattern v{}", env!("CARGO_PKG_VERSION"));
    println!("Access pattern generator for multi-channel FTL benchmarks");
    println!();

    cli.validate()?;

    let config = toml::load_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;
    let plans = config.plans()?;

    print_configuration(&config, &plans);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let start = Instant::now();

    // One job per block size; each job builds its own random source
    let reports: Vec<Result<JobReport>> = plans
        .par_iter()
        .map(|plan| run_job(&config, plan))
        .collect();

    println!();
    let mut failed = 0;
    for report in reports {
        match report {
            Ok(report) => print_report(&report),
            Err(e) => {
                log::error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} testsets failed", failed, plans.len());
    }

    log::info!(
        "generated {} testset(s) in {:.3}s",
        plans.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Generate, write, and optionally verify and describe one testset
fn run_job(config: &Config, plan: &BlockPlan) -> Result<JobReport> {
    let start = Instant::now();
    let path = config.testset_path(plan.block_size());

    let source = RandomSource::from(config.testset.seed);
    let seed = source.resolve_seed();
    if plan.strategy().is_randomized() && config.testset.seed.is_none() {
        log::info!("{}: entropy seed {}", path.display(), seed);
    }

    let mut rng = RandomSource::Seeded(seed).into_rng();
    let offsets = pattern::generate(plan, &mut rng);

    testset::write_testset(&path, &offsets)?;

    if config.output.verify {
        let written = testset::read_testset(&path)?;
        if written != offsets {
            anyhow::bail!("{}: file contents differ from generated sequence", path.display());
        }
        if let CoverageResult::Incomplete(fault) =
            verify::check_coverage(&written, plan.extent(), plan.block_size())
        {
            anyhow::bail!("{}: coverage check failed: {}", path.display(), fault);
        }
        log::debug!("{}: verified {} offsets", path.display(), written.len());
    }

    let seed = plan.strategy().is_randomized().then_some(seed);
    let manifest = TestsetManifest::new(plan, seed, &offsets, &path);
    if config.output.manifest {
        manifest.to_file(&TestsetManifest::path_for(&path))?;
    }

    Ok(JobReport {
        path,
        block_size: plan.block_size(),
        block_count: offsets.len(),
        seed,
        channel_blocks: manifest.channel_blocks,
        elapsed: start.elapsed(),
    })
}

fn print_configuration(config: &Config, plans: &[BlockPlan]) {
    println!("Configuration:");
    println!("  Pattern: {}", config.testset.pattern);
    println!("  Extent: {} ({} bytes)", format_size(config.testset.size), config.testset.size);
    println!(
        "  Block sizes: {}",
        config
            .testset
            .block_sizes
            .iter()
            .map(|&b| format_size(b))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Page size: {} bytes", config.geometry.page_size);
    println!("  Channels: {}", config.geometry.channels);
    match config.testset.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: entropy"),
    }
    println!("  Output: {}", config.output.path.display());
    if config.output.manifest {
        println!("  Manifest: enabled");
    }
    if config.output.verify {
        println!("  Verify: enabled");
    }

    for plan in plans {
        if plan.strategy().is_channel_striped() {
            println!(
                "  {} -> {} offsets, {} blocks/page",
                format_size(plan.block_size()),
                plan.block_count(),
                plan.blocks_per_page()
            );
        } else {
            println!("  {} -> {} offsets", format_size(plan.block_size()), plan.block_count());
        }
    }
}

fn print_report(report: &JobReport) {
    println!(
        "Wrote {} ({} offsets, block size {}) in {:.3}s",
        report.path.display(),
        report.block_count,
        format_size(report.block_size),
        report.elapsed.as_secs_f64()
    );
    if let Some(seed) = report.seed {
        println!("  Seed: {}", seed);
    }
    let channels = report
        .channel_blocks
        .iter()
        .enumerate()
        .map(|(channel, count)| format!("ch{}={}", channel, count))
        .collect::<Vec<_>>()
        .join(" ");
    println!("  Channel blocks: {}", channels);
}
