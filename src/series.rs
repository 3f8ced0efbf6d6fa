//! Generic 1-D transforms over per-frame statistic series. Every transform
//! returns a new series; inputs are never mutated.

use crate::error::LevelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregator {
    Mean,
    Median,
}

/// Replace each value with the aggregate of the symmetric window around it.
///
/// The window must be odd so it centers on an index; an even (or zero) window
/// fails fast before any computation. Indices without a full window on both
/// sides are left at 0.0.
pub fn smooth(
    series: &[f32],
    window: usize,
    aggregator: Aggregator,
) -> Result<Vec<f32>, LevelError> {
    if window == 0 || window % 2 == 0 {
        return Err(LevelError::InvalidArgument(format!(
            "smoothing window must be odd, got {}",
            window
        )));
    }

    let half = window / 2;
    let mut out = vec![0.0f32; series.len()];
    if series.len() < window {
        return Ok(out);
    }

    for i in half..series.len() - half {
        let slice = &series[i - half..=i + half];
        out[i] = match aggregator {
            Aggregator::Mean => mean(slice),
            Aggregator::Median => median(slice),
        };
    }

    Ok(out)
}

/// Mark "interesting" indices as a binary series.
///
/// Index `i` (endpoints excluded) is marked when it is a local maximum with a
/// strict rise on the left (`s[i-1] < s[i] >= s[i+1]`), or when it extends a
/// plateau out of an already-marked index (`s[i] == s[i+1]` and `i-1` is
/// marked). This is a derivative-sign-change heuristic rather than true peak
/// detection; the lopsided plateau rule is part of the contract.
pub fn detect_runs(series: &[f32]) -> Vec<f32> {
    let mut marks = vec![0.0f32; series.len()];
    if series.len() < 3 {
        return marks;
    }
    for i in 1..series.len() - 1 {
        let peak = series[i - 1] < series[i] && series[i] >= series[i + 1];
        let plateau = series[i] == series[i + 1] && marks[i - 1] == 1.0;
        if peak || plateau {
            marks[i] = 1.0;
        }
    }
    marks
}

/// Result of a min-max scan: the batch extremes plus the series mapped
/// linearly onto [0, 1]. A zero range maps every value to 0.0; callers that
/// need a different degenerate policy must check `range` themselves.
#[derive(Clone, Debug)]
pub struct Normalization {
    pub min: f32,
    pub max: f32,
    pub range: f32,
    pub values: Vec<f32>,
}

pub fn normalize(series: &[f32]) -> Normalization {
    if series.is_empty() {
        return Normalization {
            min: 0.0,
            max: 0.0,
            range: 0.0,
            values: Vec::new(),
        };
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in series {
        min = min.min(v);
        max = max.max(v);
    }
    let range = max - min;

    let values = if range == 0.0 {
        vec![0.0; series.len()]
    } else {
        series.iter().map(|&v| (v - min) / range).collect()
    };

    Normalization { min, max, range, values }
}

/// Trailing-window integration: `out[i]` is the sum of the last `window`
/// values ending at `i` (fewer near the start of the series).
#[allow(dead_code)]
pub fn windowed_sum(series: &[f32], window: usize) -> Vec<f32> {
    if window == 0 {
        return vec![0.0; series.len()];
    }
    series
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            series[start..=i].iter().sum()
        })
        .collect()
}

fn mean(slice: &[f32]) -> f32 {
    slice.iter().sum::<f32>() / slice.len() as f32
}

fn median(slice: &[f32]) -> f32 {
    let mut sorted = slice.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_window_is_rejected() {
        let err = smooth(&[1.0, 2.0, 3.0], 4, Aggregator::Mean).unwrap_err();
        assert!(matches!(err, LevelError::InvalidArgument(_)));
        assert!(smooth(&[1.0, 2.0, 3.0, 4.0, 5.0], 5, Aggregator::Mean).is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(smooth(&[1.0], 0, Aggregator::Median).is_err());
    }

    #[test]
    fn mean_smoothing_leaves_edges_at_zero() {
        let out = smooth(&[3.0, 3.0, 3.0, 3.0, 3.0], 3, Aggregator::Mean).unwrap();
        assert_eq!(out, vec![0.0, 3.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn median_smoothing_suppresses_spikes() {
        let out = smooth(&[1.0, 1.0, 9.0, 1.0, 1.0], 3, Aggregator::Median).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn series_shorter_than_window_is_all_zero() {
        let out = smooth(&[5.0, 5.0], 5, Aggregator::Mean).unwrap();
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn triangle_marks_only_its_apex() {
        let marks = detect_runs(&[0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        assert_eq!(marks, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn plateau_extends_a_marked_rise() {
        let marks = detect_runs(&[0.0, 2.0, 2.0, 2.0, 0.0]);
        // Index 1 is a rise-then-hold peak; 2 continues the plateau; 3 does
        // not because the lookahead value (0.0) ends the plateau.
        assert_eq!(marks, vec![0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn plateau_without_marked_predecessor_stays_unmarked() {
        let marks = detect_runs(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(marks, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn endpoints_are_never_marked() {
        let marks = detect_runs(&[9.0, 1.0, 9.0]);
        assert_eq!(marks[0], 0.0);
        assert_eq!(marks[2], 0.0);
    }

    #[test]
    fn short_series_has_no_runs() {
        assert_eq!(detect_runs(&[1.0, 2.0]), vec![0.0, 0.0]);
        assert!(detect_runs(&[]).is_empty());
    }

    #[test]
    fn normalize_maps_onto_unit_interval() {
        let norm = normalize(&[2.0, 4.0, 6.0]);
        assert_eq!(norm.min, 2.0);
        assert_eq!(norm.max, 6.0);
        assert_eq!(norm.range, 4.0);
        assert_eq!(norm.values, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn normalize_zero_range_maps_to_zero() {
        let norm = normalize(&[3.0, 3.0, 3.0]);
        assert_eq!(norm.range, 0.0);
        assert_eq!(norm.values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_empty_series() {
        let norm = normalize(&[]);
        assert_eq!(norm.range, 0.0);
        assert!(norm.values.is_empty());
    }

    #[test]
    fn windowed_sum_integrates_trailing_values() {
        let out = windowed_sum(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn windowed_sum_with_window_one_is_identity() {
        let series = [4.0, 5.0, 6.0];
        assert_eq!(windowed_sum(&series, 1), series.to_vec());
    }
}
