use rayon::prelude::*;

use super::{features, heightmap, LevelData, SCHEMA_VERSION};
use crate::audio::decode::PcmAudio;
use crate::audio::fft;
use crate::audio::stats::{self, FrameStats};
use crate::error::LevelError;
use crate::series::{self, Aggregator};

/// Tunables for a generation pass. Smoothing windows must be odd.
#[derive(Clone, Debug)]
pub struct GeneratorParams {
    pub window_size: usize,
    pub max_height: f32,
    /// Moving-median window applied to each band series before run detection.
    pub feature_smoothing: usize,
    /// Moving-mean window applied to the log-dominant-frequency series.
    pub height_smoothing: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            window_size: fft::DEFAULT_WINDOW_SIZE,
            max_height: 8.0,
            feature_smoothing: 5,
            height_smoothing: 11,
        }
    }
}

/// Run the full pipeline over decoded PCM: FFT, per-frame statistics, band
/// series smoothing, feature extraction per band, height-map extraction.
///
/// A failed decode (zero sample rate) generates an empty level with duration
/// 0 rather than an error.
pub fn generate(pcm: &PcmAudio, params: &GeneratorParams) -> Result<LevelData, LevelError> {
    // Fail fast on bad config before any transform work.
    for (name, window) in [
        ("feature_smoothing", params.feature_smoothing),
        ("height_smoothing", params.height_smoothing),
    ] {
        if window == 0 || window % 2 == 0 {
            return Err(LevelError::InvalidArgument(format!(
                "{} window must be odd, got {}",
                name, window
            )));
        }
    }
    if params.window_size == 0 {
        return Err(LevelError::InvalidArgument(
            "window_size must be non-zero".into(),
        ));
    }

    if pcm.is_empty() {
        log::warn!("No decodable audio; generating empty level");
        return Ok(LevelData::empty());
    }

    log::info!("Transforming {} samples...", pcm.samples.len());
    let frames = fft::transform(pcm, params.window_size);

    log::info!("Summarizing {} frames...", frames.len());
    let frame_stats: Vec<FrameStats> = frames.par_iter().map(stats::summarize).collect();

    let band = |b: usize| -> Vec<f32> { frame_stats.iter().map(|s| s.band_means[b]).collect() };

    let mut band_features = Vec::with_capacity(stats::BAND_SPLIT);
    for b in 0..stats::BAND_SPLIT {
        let smoothed = series::smooth(&band(b), params.feature_smoothing, Aggregator::Median)?;
        band_features.push(features::extract_features(
            &smoothed,
            params.window_size,
            pcm.sample_rate,
        ));
    }
    let features_high = band_features.pop().unwrap_or_default();
    let features_mid = band_features.pop().unwrap_or_default();
    let features_low = band_features.pop().unwrap_or_default();

    // Terrain follows pitch: log-compressed dominant frequency, rolled off
    // with a wide mean window. The 1+ guard keeps DC-dominant frames finite.
    let log_dominant: Vec<f32> = frame_stats
        .iter()
        .map(|s| (1.0 + s.dominant_frequency).ln())
        .collect();
    let smoothed_dominant =
        series::smooth(&log_dominant, params.height_smoothing, Aggregator::Mean)?;
    let height_map = heightmap::extract_height_map(
        &smoothed_dominant,
        params.window_size,
        pcm.sample_rate,
        params.max_height,
    );

    let level = LevelData {
        version: SCHEMA_VERSION,
        duration: pcm.duration_seconds(),
        height_map,
        features_low,
        features_mid,
        features_high,
    };

    log::info!(
        "Generated level: {}s, {}/{}/{} features (low/mid/high), {} height points",
        level.duration,
        level.features_low.len(),
        level.features_mid.len(),
        level.features_high.len(),
        level.height_map.len()
    );

    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5 seconds of pulsed tones at 8kHz: three sines that land in the low,
    /// mid and high thirds of the spectrum, gated on and off four times per
    /// second so every band series has clear peaks.
    fn pulsed_tone_pcm() -> PcmAudio {
        let sample_rate = 8000u32;
        let total = (sample_rate * 5) as usize;
        let samples: Vec<i16> = (0..total)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                if (t * 4.0) as u32 % 2 == 1 {
                    return 0;
                }
                let tone = |hz: f32| (2.0 * std::f32::consts::PI * hz * t).sin();
                let mix = tone(600.0) + tone(2000.0) + tone(3400.0);
                (mix * 9000.0) as i16
            })
            .collect();
        PcmAudio {
            samples,
            sample_rate,
            channel_count: 1,
        }
    }

    #[test]
    fn pulsed_tone_end_to_end() {
        let pcm = pulsed_tone_pcm();
        let level = generate(&pcm, &GeneratorParams::default()).unwrap();

        assert_eq!(level.version, SCHEMA_VERSION);
        assert_eq!(level.duration, 5);

        // One height point per frame, frame count = floor(N/W) + 1.
        let expected_frames = pcm.samples.len() / 1024 + 1;
        assert_eq!(level.height_map.len(), expected_frames);

        assert!(!level.features_low.is_empty());
        assert!(!level.features_mid.is_empty());
        assert!(!level.features_high.is_empty());

        for feature in level
            .features_low
            .iter()
            .chain(&level.features_mid)
            .chain(&level.features_high)
        {
            assert!((0.0..=1.0).contains(&feature.strength));
            assert!(feature.start_time_in_seconds >= 0.0);
            assert!(feature.start_time_in_seconds <= 5.2);
            assert!(feature.duration_in_seconds > 0.0);
        }

        let max_height = GeneratorParams::default().max_height;
        for point in &level.height_map {
            assert!((0.0..=max_height).contains(&point.height));
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let pcm = pulsed_tone_pcm();
        let params = GeneratorParams::default();
        let a = generate(&pcm, &params).unwrap();
        let b = generate(&pcm, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_audio_generates_empty_level() {
        let level = generate(&PcmAudio::empty(), &GeneratorParams::default()).unwrap();
        assert_eq!(level, LevelData::empty());
    }

    #[test]
    fn even_smoothing_window_fails_before_work() {
        let params = GeneratorParams {
            feature_smoothing: 4,
            ..GeneratorParams::default()
        };
        let err = generate(&pulsed_tone_pcm(), &params).unwrap_err();
        assert!(matches!(err, LevelError::InvalidArgument(_)));
    }
}
