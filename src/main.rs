mod audio;
mod cache;
mod cli;
mod config;
mod error;
mod level;
mod series;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use cache::CacheOptions;
use cli::Cli;
use level::generator::GeneratorParams;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect ridgerun.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("ridgerun.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("ridgerun").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("ridgerun").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.window_size == 1024 { cli.window_size = cfg.analysis.window_size; }
            if cli.max_height == 8.0 { cli.max_height = cfg.analysis.max_height; }
            if cli.feature_smoothing == 5 { cli.feature_smoothing = cfg.analysis.feature_smoothing; }
            if cli.height_smoothing == 11 { cli.height_smoothing = cfg.analysis.height_smoothing; }
            if cli.cache_dir.is_none() {
                cli.cache_dir = cfg.cache.dir;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input MP3 file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    log::info!("ridgerun - audio-to-level generator");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "Window: {} samples, max height: {:.1}",
        cli.window_size,
        cli.max_height
    );

    let params = GeneratorParams {
        window_size: cli.window_size,
        max_height: cli.max_height,
        feature_smoothing: cli.feature_smoothing,
        height_smoothing: cli.height_smoothing,
    };

    let mut opts = CacheOptions::default();
    if let Some(dir) = cli.cache_dir.clone() {
        opts.cache_dir = dir;
    }
    opts.enabled = !cli.no_cache;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed_precise}]")
            .unwrap(),
    );
    pb.set_message("Generating level");
    pb.enable_steady_tick(Duration::from_millis(100));

    let level = cache::load(input, &params, &opts)
        .with_context(|| format!("Failed to load level for {}", input.display()))?;

    pb.finish_and_clear();

    if level.duration == 0 && level.features_low.is_empty() {
        log::warn!("Source produced no audio; writing an empty level");
    }

    std::fs::write(&cli.output, serde_json::to_string_pretty(&level)?)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    if let Some(ref heightmap_path) = cli.heightmap {
        // The cached form drops the height map; a fresh compute still has it.
        if level.height_map.is_empty() {
            log::warn!(
                "Height map unavailable (loaded from cache); rerun with --no-cache to regenerate"
            );
        } else {
            std::fs::write(
                heightmap_path,
                serde_json::to_string_pretty(&level.height_map)?,
            )
            .with_context(|| format!("Failed to write {}", heightmap_path.display()))?;
            log::info!(
                "Wrote {} height points to {}",
                level.height_map.len(),
                heightmap_path.display()
            );
        }
    }

    log::info!(
        "Done! {}s of level data, {}/{}/{} features (low/mid/high) -> {}",
        level.duration,
        level.features_low.len(),
        level.features_mid.len(),
        level.features_high.len(),
        cli.output.display()
    );
    Ok(())
}
