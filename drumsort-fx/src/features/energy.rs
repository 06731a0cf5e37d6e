//! RMS energy

/// Root-mean-square of a chunk, accumulated in `f64`
///
/// Returns 0.0 for an empty chunk.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    (sum / samples.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_exactly_zero() {
        assert_eq!(rms(&[0.0; 512]), 0.0);
    }

    #[test]
    fn test_constant_amplitude() {
        for a in [1.0f32, -1.0, 0.5, -0.25] {
            let value = rms(&vec![a; 1000]);
            assert!((value - a.abs() as f64).abs() < 1e-9, "a={}: {}", a, value);
        }
    }

    #[test]
    fn test_square_wave() {
        let samples: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        assert!((rms(&samples) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_chunk() {
        assert_eq!(rms(&[]), 0.0);
    }
}
