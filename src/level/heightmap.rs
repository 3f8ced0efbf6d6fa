use super::HeightMapPoint;
use crate::series;

/// Map a (typically smoothed log-dominant-frequency) series onto a terrain
/// curve with one point per frame. Heights scale linearly into
/// `[0, max_height]`; a zero-range series produces flat ground at 0.
pub fn extract_height_map(
    values: &[f32],
    window_size: usize,
    sample_rate: u32,
    max_height: f32,
) -> Vec<HeightMapPoint> {
    if sample_rate == 0 || window_size == 0 {
        return Vec::new();
    }

    let seconds_per_frame = window_size as f32 / sample_rate as f32;
    let norm = series::normalize(values);

    norm.values
        .iter()
        .enumerate()
        .map(|(i, &v)| HeightMapPoint {
            time_seconds: i as f32 * seconds_per_frame,
            height: v * max_height,
        })
        .collect()
}
