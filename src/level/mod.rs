pub mod features;
pub mod generator;
pub mod heightmap;

use serde::{Deserialize, Serialize};

/// Cache JSON schema version. Bump whenever the persisted shape or the
/// numbers feeding it change; stale caches are discarded on read.
pub const SCHEMA_VERSION: u32 = 2;

/// A discrete, time-bounded "interesting" event used to place an obstacle.
/// Strength is batch-normalized to [0, 1] at extraction time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub strength: f32,
    #[serde(rename = "startTimeInSeconds")]
    pub start_time_in_seconds: f32,
    #[serde(rename = "durationInSeconds")]
    pub duration_in_seconds: f32,
}

/// One terrain elevation sample, one per FFT frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightMapPoint {
    #[serde(rename = "timeSeconds")]
    pub time_seconds: f32,
    pub height: f32,
}

/// The derived level bundle. The height map is cheap to recompute and is
/// intentionally not persisted, so it is empty after a cache load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub version: u32,
    /// Track length in whole seconds.
    pub duration: u32,
    #[serde(skip)]
    pub height_map: Vec<HeightMapPoint>,
    #[serde(rename = "featuresLow")]
    pub features_low: Vec<Feature>,
    #[serde(rename = "featuresMid")]
    pub features_mid: Vec<Feature>,
    #[serde(rename = "featuresHigh")]
    pub features_high: Vec<Feature>,
}

impl LevelData {
    /// A valid level for a source with no decodable audio.
    pub fn empty() -> Self {
        Self {
            version: SCHEMA_VERSION,
            duration: 0,
            height_map: Vec::new(),
            features_low: Vec::new(),
            features_mid: Vec::new(),
            features_high: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_json_uses_camel_case_and_skips_height_map() {
        let level = LevelData {
            version: SCHEMA_VERSION,
            duration: 5,
            height_map: vec![HeightMapPoint { time_seconds: 0.0, height: 1.0 }],
            features_low: vec![Feature {
                strength: 1.0,
                start_time_in_seconds: 0.5,
                duration_in_seconds: 0.25,
            }],
            features_mid: Vec::new(),
            features_high: Vec::new(),
        };
        let json = serde_json::to_string(&level).unwrap();
        assert!(json.contains("\"featuresLow\""));
        assert!(json.contains("\"startTimeInSeconds\""));
        assert!(json.contains("\"durationInSeconds\""));
        assert!(!json.contains("height"));

        let back: LevelData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.duration, 5);
        assert_eq!(back.features_low, level.features_low);
        assert!(back.height_map.is_empty());
    }
}
