//! Versioned level-data cache. A load request walks
//! precompiled → cache → compute → persist, returning at the first success.
//! Precompiled data is developer-controlled and trusted: any defect there is
//! fatal. The user-writable cache self-heals: stale or unparseable entries
//! are deleted and recomputed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Deserialize;

use crate::audio::decode;
use crate::error::LevelError;
use crate::level::generator::{self, GeneratorParams};
use crate::level::{LevelData, SCHEMA_VERSION};

/// Tracks saved under this stem are user-editable; their cache key carries
/// the file's mtime so an edited track invalidates only its own entry.
pub const CUSTOM_TRACK_STEM: &str = "custom";

#[derive(Clone, Debug)]
pub struct CacheOptions {
    pub cache_dir: PathBuf,
    pub precompiled_dir: PathBuf,
    /// When false, skip both cache read and write (precompiled data is still
    /// honored: it is part of the shipped content, not a cache).
    pub enabled: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            precompiled_dir: find_precompiled_dir(),
            enabled: true,
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ridgerun")
}

/// Discover the read-only bundled data directory: next to the executable
/// first (including the target/debug layout), then the manifest dir for dev
/// runs.
pub fn find_precompiled_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(ref dir) = exe_dir {
        let precompiled = dir.join("precompiled");
        if precompiled.exists() {
            return precompiled;
        }
        if let Some(parent) = dir.parent() {
            let precompiled = parent.join("precompiled");
            if precompiled.exists() {
                return precompiled;
            }
            if let Some(grandparent) = parent.parent() {
                let precompiled = grandparent.join("precompiled");
                if precompiled.exists() {
                    return precompiled;
                }
            }
        }
    }

    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("precompiled")
}

/// Cache identity for a source file: its stem, with the custom track's
/// last-modified time appended so edits self-invalidate.
pub fn cache_key(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());

    if stem == CUSTOM_TRACK_STEM {
        let mtime = fs::metadata(source)
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("{}-{}", stem, mtime)
    } else {
        stem
    }
}

/// Load the level for `source`, computing and persisting it on a miss.
pub fn load(
    source: &Path,
    params: &GeneratorParams,
    opts: &CacheOptions,
) -> Result<LevelData, LevelError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());

    // Precompiled, developer-controlled data wins outright. Absence is
    // normal; any defect is a packaging error and must surface.
    let precompiled_path = opts.precompiled_dir.join(format!("{}.json", stem));
    if precompiled_path.exists() {
        let level = read_precompiled(&precompiled_path)?;
        log::info!("Loaded precompiled level from {}", precompiled_path.display());
        return Ok(level);
    }

    let cache_path = opts.cache_dir.join(format!("{}.json", cache_key(source)));
    if opts.enabled && cache_path.exists() {
        match read_cached(&cache_path) {
            Ok(level) => {
                log::info!("Loaded cached level from {}", cache_path.display());
                return Ok(level);
            }
            Err(reason) => {
                log::warn!(
                    "Discarding stale cache {}: {}",
                    cache_path.display(),
                    reason
                );
                let _ = fs::remove_file(&cache_path);
            }
        }
    }

    let pcm = decode::decode_path(source)?;
    let level = generator::generate(&pcm, params)?;

    if opts.enabled {
        // Direct overwrite, no locking: a torn write is repaired by the
        // parse-failure path on the next load.
        if let Err(err) = persist(&cache_path, &level) {
            log::warn!("Failed to write cache {}: {}", cache_path.display(), err);
        }
    }

    Ok(level)
}

/// Serialize the bundle (height map omitted by its serde contract) to the
/// cache location, creating the cache directory on demand.
pub fn persist(path: &Path, level: &LevelData) -> Result<(), LevelError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string(level)?)?;
    Ok(())
}

/// The version field is checked before the full payload is parsed, so a
/// reshaped file still reports a version drift rather than a parse error.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

fn read_precompiled(path: &Path) -> Result<LevelData, LevelError> {
    let text = fs::read_to_string(path)?;
    let probe: VersionProbe =
        serde_json::from_str(&text).map_err(|source| LevelError::CorruptPrecompiled {
            path: path.to_path_buf(),
            source,
        })?;
    if probe.version != SCHEMA_VERSION {
        return Err(LevelError::StalePrecompiled {
            path: path.to_path_buf(),
            expected: SCHEMA_VERSION,
            found: probe.version,
        });
    }
    serde_json::from_str(&text).map_err(|source| LevelError::CorruptPrecompiled {
        path: path.to_path_buf(),
        source,
    })
}

fn read_cached(path: &Path) -> Result<LevelData, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let probe: VersionProbe = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    if probe.version != SCHEMA_VERSION {
        return Err(format!(
            "schema version {} != current {}",
            probe.version, SCHEMA_VERSION
        ));
    }
    serde_json::from_str(&text).map_err(|e| e.to_string())
}
