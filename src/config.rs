use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_max_height")]
    pub max_height: f32,
    #[serde(default = "default_feature_smoothing")]
    pub feature_smoothing: usize,
    #[serde(default = "default_height_smoothing")]
    pub height_smoothing: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_height: default_max_height(),
            feature_smoothing: default_feature_smoothing(),
            height_smoothing: default_height_smoothing(),
        }
    }
}

fn default_window_size() -> usize { 1024 }
fn default_max_height() -> f32 { 8.0 }
fn default_feature_smoothing() -> usize { 5 }
fn default_height_smoothing() -> usize { 11 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
