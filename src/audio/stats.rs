use super::fft::{Frame, FrequencyBin};

/// Number of equal sub-bands backing the low/mid/high feature channels.
pub const BAND_SPLIT: usize = 3;

/// Scalar descriptors of one frame's magnitude spectrum.
///
/// Percentiles interpolate linearly between closest ranks
/// (`pos = p * (n - 1)`). Standard deviation, skewness and kurtosis are the
/// bias-corrected sample estimators; kurtosis is excess kurtosis. An empty
/// frame yields all-zero stats rather than NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    /// Sum of squared magnitudes.
    pub energy: f32,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
    pub kurtosis: f32,
    pub skewness: f32,
    /// Frequency of the strongest bin; the first bin wins a tie.
    pub dominant_frequency: f32,
    /// `sqrt(energy / bin_count)`.
    pub rms: f32,
    /// Mean magnitude over each of `BAND_SPLIT` equal contiguous bin groups.
    pub band_means: Vec<f32>,
}

impl FrameStats {
    fn zeroed() -> Self {
        Self {
            energy: 0.0,
            mean: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
            kurtosis: 0.0,
            skewness: 0.0,
            dominant_frequency: 0.0,
            rms: 0.0,
            band_means: vec![0.0; BAND_SPLIT],
        }
    }
}

pub fn summarize(frame: &Frame) -> FrameStats {
    let n = frame.bins.len();
    if n == 0 {
        return FrameStats::zeroed();
    }

    let magnitudes: Vec<f64> = frame.bins.iter().map(|b| b.magnitude as f64).collect();

    let energy: f64 = magnitudes.iter().map(|m| m * m).sum();
    let mean = magnitudes.iter().sum::<f64>() / n as f64;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &m in &magnitudes {
        min = min.min(m);
        max = max.max(m);
    }

    // Central moments about the mean
    let mut m2 = 0.0f64;
    let mut m3 = 0.0f64;
    let mut m4 = 0.0f64;
    for &m in &magnitudes {
        let d = m - mean;
        m2 += d * d;
        m3 += d * d * d;
        m4 += d * d * d * d;
    }

    let std_dev = if n > 1 { (m2 / (n - 1) as f64).sqrt() } else { 0.0 };

    let skewness = if n > 2 && std_dev > 0.0 {
        let nf = n as f64;
        nf / ((nf - 1.0) * (nf - 2.0)) * m3 / (std_dev * std_dev * std_dev)
    } else {
        0.0
    };

    let kurtosis = if n > 3 && std_dev > 0.0 {
        let nf = n as f64;
        let s4 = std_dev.powi(4);
        nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * m4 / s4
            - 3.0 * (nf - 1.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
    } else {
        0.0
    };

    let mut sorted = magnitudes.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let dominant_frequency = dominant_bin(&frame.bins).frequency;

    FrameStats {
        energy: energy as f32,
        mean: mean as f32,
        std_dev: std_dev as f32,
        min: min as f32,
        max: max as f32,
        q1: percentile(&sorted, 0.25) as f32,
        median: percentile(&sorted, 0.5) as f32,
        q3: percentile(&sorted, 0.75) as f32,
        kurtosis: kurtosis as f32,
        skewness: skewness as f32,
        dominant_frequency,
        rms: (energy / n as f64).sqrt() as f32,
        band_means: band_means(&frame.bins, BAND_SPLIT),
    }
}

/// Mean magnitude over `k` equal contiguous partitions of the bin sequence.
/// Partitions are half-open `[len*b/k, len*(b+1)/k)` slices with no overlap.
pub fn band_means(bins: &[FrequencyBin], k: usize) -> Vec<f32> {
    if k == 0 {
        return Vec::new();
    }
    (0..k)
        .map(|b| {
            let lo = bins.len() * b / k;
            let hi = bins.len() * (b + 1) / k;
            if lo == hi {
                return 0.0;
            }
            bins[lo..hi].iter().map(|bin| bin.magnitude).sum::<f32>() / (hi - lo) as f32
        })
        .collect()
}

fn dominant_bin(bins: &[FrequencyBin]) -> FrequencyBin {
    let mut best = bins[0];
    for &bin in &bins[1..] {
        // Strictly greater: the first bin keeps a tie.
        if bin.magnitude > best.magnitude {
            best = bin;
        }
    }
    best
}

/// Linear interpolation between closest ranks over an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(magnitudes: &[f32]) -> Frame {
        Frame {
            index: 0,
            bins: magnitudes
                .iter()
                .enumerate()
                .map(|(i, &magnitude)| FrequencyBin {
                    frequency: i as f32 * 10.0,
                    magnitude,
                })
                .collect(),
        }
    }

    #[test]
    fn basic_descriptors() {
        let stats = summarize(&frame_of(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(stats.energy, 30.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.rms - (30.0f32 / 4.0).sqrt()).abs() < 1e-6);
        // Sample standard deviation of 1..4
        assert!((stats.std_dev - 1.2909944).abs() < 1e-5);
    }

    #[test]
    fn percentiles_interpolate_between_ranks() {
        let stats = summarize(&frame_of(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn symmetric_data_has_zero_skew() {
        let stats = summarize(&frame_of(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        assert!(stats.skewness.abs() < 1e-6);
    }

    #[test]
    fn dominant_frequency_tie_goes_to_first_bin() {
        let stats = summarize(&frame_of(&[0.0, 5.0, 2.0, 5.0]));
        assert_eq!(stats.dominant_frequency, 10.0);
    }

    #[test]
    fn band_means_split_evenly() {
        let frame = frame_of(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(band_means(&frame.bins, 3), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn band_means_handle_non_divisible_lengths() {
        // 7 bins over 4 bands: slice boundaries 0,1,3,5,7
        let frame = frame_of(&[8.0, 1.0, 3.0, 5.0, 7.0, 2.0, 4.0]);
        let means = band_means(&frame.bins, 4);
        assert_eq!(means.len(), 4);
        assert_eq!(means[0], 8.0);
        assert_eq!(means[1], 2.0);
        assert_eq!(means[2], 6.0);
        assert_eq!(means[3], 3.0);
    }

    #[test]
    fn constant_frame_has_no_spread() {
        let stats = summarize(&frame_of(&[2.0; 8]));
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 2.0);
    }

    #[test]
    fn empty_frame_is_all_zero() {
        let stats = summarize(&Frame { index: 0, bins: Vec::new() });
        assert_eq!(stats, FrameStats::zeroed());
    }
}
