use super::Feature;
use crate::series;

/// Turn a (typically pre-smoothed) statistic series into discrete features.
///
/// Every maximal run of marked indices becomes one candidate whose raw
/// strength is the mean of the input values over the run; start and duration
/// come from the run's frame span. Strengths are then min-max normalized
/// across the whole batch (never per frame, never across calls). A batch
/// whose strengths are all equal maps to 1.0, so a lone feature still spawns
/// a full-strength obstacle.
pub fn extract_features(values: &[f32], window_size: usize, sample_rate: u32) -> Vec<Feature> {
    if sample_rate == 0 || window_size == 0 {
        return Vec::new();
    }

    let marks = series::detect_runs(values);
    let seconds_per_frame = window_size as f32 / sample_rate as f32;

    // (start index, length, raw strength) per maximal run of 1s
    let mut candidates: Vec<(usize, usize, f32)> = Vec::new();
    let mut i = 0;
    while i < marks.len() {
        if marks[i] != 1.0 {
            i += 1;
            continue;
        }
        let start = i;
        let mut sum = 0.0f32;
        while i < marks.len() && marks[i] == 1.0 {
            sum += values[i];
            i += 1;
        }
        let len = i - start;
        candidates.push((start, len, sum / len as f32));
    }

    if candidates.is_empty() {
        return Vec::new();
    }

    let strengths: Vec<f32> = candidates.iter().map(|&(_, _, s)| s).collect();
    let norm = series::normalize(&strengths);

    candidates
        .iter()
        .zip(norm.values.iter())
        .map(|(&(start, len, _), &mapped)| Feature {
            strength: if norm.range == 0.0 { 1.0 } else { mapped },
            start_time_in_seconds: start as f32 * seconds_per_frame,
            duration_in_seconds: len as f32 * seconds_per_frame,
        })
        .collect()
}
