//! Fundamental frequency estimation
//!
//! Normalized cross-correlation (NCCF) of a chunk with itself, searched over
//! the lag range of a plausible fundamental band.
//!
//! # Algorithm
//!
//! 1. Unvoiced check: chunks with RMS below [`SILENCE_RMS_THRESHOLD`] report
//!    0 Hz with confidence 0.
//! 2. Remove the chunk mean.
//! 3. Autocorrelation via FFT: `ACF = IFFT(|FFT(x)|²)`, zero-padded past the
//!    largest lag so no circular wrap reaches the search range.
//! 4. Normalize each lag by the energy of the two overlapping windows:
//!    `nccf[k] = acf[k] / sqrt(E[0..n-k] * E[k..n])`. A perfectly periodic
//!    signal scores 1.0 at every multiple of its period.
//!    Lags are searched only up to half the chunk, so every candidate
//!    overlaps at least `n/2` samples. Short overlaps score near ±1 on any
//!    signal.
//! 5. Skip lags up to the first zero crossing of the NCCF (the main lobe).
//! 6. Collect positive local maxima and take the earliest one within
//!    [`PEAK_TOLERANCE`] of the highest. Period multiples score almost the
//!    same as the period itself; the earliest one is the fundamental.
//! 7. Refine the lag by parabolic interpolation and report `sample_rate / lag`
//!    with the peak NCCF value as confidence. Peaks below
//!    [`VOICING_THRESHOLD`] are reported as unvoiced.

use crate::features::energy::rms;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Lowest fundamental searched (Hz)
pub const MIN_FREQUENCY_HZ: f64 = 40.0;

/// Highest fundamental searched (Hz)
pub const MAX_FREQUENCY_HZ: f64 = 5000.0;

/// Chunks quieter than this RMS are unvoiced
pub const SILENCE_RMS_THRESHOLD: f64 = 1e-4;

/// Minimum peak NCCF for a chunk to count as voiced
pub const VOICING_THRESHOLD: f64 = 0.5;

/// Fraction of the highest peak an earlier peak must reach to be chosen
pub const PEAK_TOLERANCE: f64 = 0.9;

const EPSILON: f64 = 1e-12;

/// Pitch of one chunk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchEstimate {
    /// Dominant fundamental frequency in Hz, 0 when unvoiced
    pub frequency: f64,
    /// Peak NCCF value in [0, 1], 0 when unvoiced
    pub confidence: f64,
}

impl PitchEstimate {
    /// No detectable pitch
    pub const UNVOICED: PitchEstimate = PitchEstimate {
        frequency: 0.0,
        confidence: 0.0,
    };
}

/// NCCF pitch estimator
///
/// Holds an FFT planner so plans are reused across the chunks of a file.
pub struct PitchEstimator {
    min_frequency: f64,
    max_frequency: f64,
    planner: FftPlanner<f64>,
}

impl Default for PitchEstimator {
    fn default() -> Self {
        Self::new(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)
    }
}

impl PitchEstimator {
    /// Estimator searching fundamentals in `[min_frequency, max_frequency]`
    pub fn new(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            min_frequency,
            max_frequency,
            planner: FftPlanner::new(),
        }
    }

    /// Estimate the dominant fundamental of `chunk`
    pub fn estimate(&mut self, chunk: &[f32], sample_rate: u32) -> PitchEstimate {
        let n = chunk.len();
        if n < 4 || sample_rate == 0 {
            return PitchEstimate::UNVOICED;
        }
        if rms(chunk) < SILENCE_RMS_THRESHOLD {
            return PitchEstimate::UNVOICED;
        }

        let sr = sample_rate as f64;
        let min_lag = ((sr / self.max_frequency).floor() as usize).max(1);
        let max_lag = (sr / self.min_frequency).ceil() as usize;
        // One extra lag so the last candidate can be tested as a local maximum
        let limit = (max_lag + 1).min(n / 2);
        if min_lag + 1 >= limit {
            return PitchEstimate::UNVOICED;
        }

        let mean = chunk.iter().map(|&x| x as f64).sum::<f64>() / n as f64;
        let centered: Vec<f64> = chunk.iter().map(|&x| x as f64 - mean).collect();

        let acf = self.autocorrelation(&centered, limit);
        let nccf = normalize_acf(&centered, &acf);

        let Some(zero_crossing) = (1..=limit).find(|&k| nccf[k] <= 0.0) else {
            return PitchEstimate::UNVOICED;
        };

        let start = zero_crossing.max(min_lag);
        let peaks: Vec<(usize, f64)> = (start.max(1)..limit)
            .filter(|&k| nccf[k] > 0.0 && nccf[k] > nccf[k - 1] && nccf[k] >= nccf[k + 1])
            .map(|k| (k, nccf[k]))
            .collect();

        let Some(highest) = peaks.iter().map(|&(_, v)| v).reduce(f64::max) else {
            return PitchEstimate::UNVOICED;
        };

        let Some(&(lag, value)) = peaks.iter().find(|&&(_, v)| v >= PEAK_TOLERANCE * highest) else {
            return PitchEstimate::UNVOICED;
        };

        if value < VOICING_THRESHOLD {
            return PitchEstimate::UNVOICED;
        }

        let refined = lag as f64 + parabolic_offset(nccf[lag - 1], nccf[lag], nccf[lag + 1]);
        if refined <= 0.0 {
            return PitchEstimate::UNVOICED;
        }

        PitchEstimate {
            frequency: sr / refined,
            confidence: value.clamp(0.0, 1.0),
        }
    }

    /// Linear autocorrelation for lags `0..=limit`
    fn autocorrelation(&mut self, signal: &[f64], limit: usize) -> Vec<f64> {
        let fft_len = (signal.len() + limit + 1).next_power_of_two();
        let forward = self.planner.plan_fft_forward(fft_len);
        let inverse = self.planner.plan_fft_inverse(fft_len);

        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_len)
            .collect();

        forward.process(&mut buffer);
        for bin in buffer.iter_mut() {
            *bin = Complex::new(bin.norm_sqr(), 0.0);
        }
        inverse.process(&mut buffer);

        // rustfft does not scale the inverse transform
        let scale = fft_len as f64;
        buffer[..=limit].iter().map(|c| c.re / scale).collect()
    }
}

/// Normalize raw autocorrelation by the energies of the overlapping windows
fn normalize_acf(signal: &[f64], acf: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut running = 0.0;
    for &x in signal {
        running += x * x;
        prefix.push(running);
    }

    acf.iter()
        .enumerate()
        .map(|(k, &r)| {
            let head = prefix[n - k];
            let tail = prefix[n] - prefix[k];
            let denom = (head * tail).sqrt();
            if denom > EPSILON {
                (r / denom).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Vertex offset of the parabola through three equally spaced points
fn parabolic_offset(left: f64, center: f64, right: f64) -> f64 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < EPSILON {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}
