use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::PcmAudio;

pub const DEFAULT_WINDOW_SIZE: usize = 1024;

/// One frequency bin of a frame's spectrum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyBin {
    pub frequency: f32,
    pub magnitude: f32,
}

/// One FFT frame: `window_size/2 + 1` bins (the upper half of a real-input
/// transform is a mirror and is discarded).
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    pub bins: Vec<FrequencyBin>,
}

/// Split the PCM stream into fixed-size windows and transform each one.
///
/// Frame indices run `0..=samples.len() / window_size`: one extra, possibly
/// all-zero, frame is always processed past the last full window. Cached
/// level data depends on this frame count (`floor(N/W) + 1`), so it is kept
/// even though the final frame is often pure padding. The tail of a partial
/// window is zero-padded before the transform.
///
/// Output is deterministic: per-frame work is parallelized, but the indexed
/// map keeps frames in index order and each frame's accumulation is
/// sequential.
pub fn transform(pcm: &PcmAudio, window_size: usize) -> Vec<Frame> {
    if pcm.sample_rate == 0 || window_size == 0 {
        return Vec::new();
    }

    let samples = &pcm.samples;
    let num_windows = samples.len() / window_size;
    let freq_step = pcm.sample_rate as f32 / window_size as f32;

    let frames: Vec<Frame> = (0..=num_windows)
        .into_par_iter()
        .map(|index| {
            let start = index * window_size;
            let end = (start + window_size).min(samples.len());

            let mut buffer: Vec<Complex<f32>> =
                vec![Complex::new(0.0, 0.0); window_size];
            for (i, &sample) in samples[start..end].iter().enumerate() {
                buffer[i] = Complex::new(sample as f32, 0.0);
            }

            // Per-worker planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(window_size);
            fft.process(&mut buffer);

            let bins: Vec<FrequencyBin> = buffer[..window_size / 2 + 1]
                .iter()
                .enumerate()
                .map(|(bin, c)| FrequencyBin {
                    frequency: bin as f32 * freq_step,
                    magnitude: c.norm(),
                })
                .collect();

            Frame { index, bins }
        })
        .collect();

    log::debug!(
        "FFT: {} frames of {} bins at {:.2}Hz resolution",
        frames.len(),
        window_size / 2 + 1,
        freq_step
    );

    frames
}
