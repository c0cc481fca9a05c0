//! Amplitude signal feeding the reactive modulators.
//!
//! Amplitude lives in `[AMPLITUDE_MIN, AMPLITUDE_MAX]`: 1.0 means silence.
//! Sources are polled once per frame and must not block; `None` means "no
//! live value", in which case the simulated oscillation is used.

use crate::constants::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub trait AmplitudeSource {
    fn sample(&mut self, time: f32) -> Option<f32>;
}

/// Clamp into the amplitude range. Non-finite values read as silence.
#[inline]
pub fn clamp_amplitude(a: f32) -> f32 {
    if a.is_finite() {
        a.clamp(AMPLITUDE_MIN, AMPLITUDE_MAX)
    } else {
        AMPLITUDE_MIN
    }
}

/// Deterministic stand-in used when no live signal exists.
#[inline]
pub fn simulated_amplitude(time: f32) -> f32 {
    1.0 + (time * SIMULATED_AMPLITUDE_RATE).sin() * SIMULATED_AMPLITUDE_DEPTH
}

/// Average of the lowest analyser bins mapped to `[1, 3]`.
pub fn amplitude_from_spectrum(bins: &[u8]) -> Option<f32> {
    let bass = &bins[..bins.len().min(SPECTRUM_BASS_BINS)];
    if bass.is_empty() {
        return None;
    }
    let sum: u32 = bass.iter().map(|&b| b as u32).sum();
    let mean = sum as f32 / bass.len() as f32;
    Some(clamp_amplitude(1.0 + mean / 255.0 * 2.0))
}

/// RMS of a block of PCM samples mapped to `[1, 3]`.
pub fn amplitude_from_samples(samples: &[f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let energy: f32 = samples.iter().map(|s| s * s).sum();
    let rms = (energy / samples.len() as f32).sqrt();
    Some(clamp_amplitude(1.0 + rms * SAMPLE_RMS_GAIN))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedAmplitude;

impl AmplitudeSource for SimulatedAmplitude {
    fn sample(&mut self, time: f32) -> Option<f32> {
        Some(simulated_amplitude(time))
    }
}

/// Last-value cell written by a capture thread and read by the frame loop.
///
/// Stores raw `f32` bits; zero bits mean "nothing captured yet".
#[derive(Clone, Debug, Default)]
pub struct SharedAmplitude(Arc<AtomicU32>);

impl SharedAmplitude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, amplitude: f32) {
        self.0
            .store(clamp_amplitude(amplitude).to_bits(), Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    pub fn load(&self) -> Option<f32> {
        match self.0.load(Ordering::Relaxed) {
            0 => None,
            bits => Some(f32::from_bits(bits)),
        }
    }
}

impl AmplitudeSource for SharedAmplitude {
    fn sample(&mut self, _time: f32) -> Option<f32> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_and_non_finite() {
        assert_eq!(clamp_amplitude(0.2), 1.0);
        assert_eq!(clamp_amplitude(9.0), 3.0);
        assert_eq!(clamp_amplitude(f32::NAN), 1.0);
        assert_eq!(clamp_amplitude(f32::NEG_INFINITY), 1.0);
        assert_eq!(clamp_amplitude(2.2), 2.2);
    }

    #[test]
    fn spectrum_uses_bass_bins_only() {
        let mut bins = vec![0u8; 64];
        assert_eq!(amplitude_from_spectrum(&bins), Some(1.0));
        for b in bins.iter_mut().skip(SPECTRUM_BASS_BINS) {
            *b = 255;
        }
        assert_eq!(amplitude_from_spectrum(&bins), Some(1.0));
        for b in bins.iter_mut().take(SPECTRUM_BASS_BINS) {
            *b = 255;
        }
        assert!((amplitude_from_spectrum(&bins).unwrap() - 3.0).abs() < 1e-6);
        assert_eq!(amplitude_from_spectrum(&[]), None);
    }

    #[test]
    fn sample_rms_maps_into_range() {
        assert_eq!(amplitude_from_samples(&[0.0; 128]), Some(1.0));
        assert_eq!(amplitude_from_samples(&[1.0, -1.0]), Some(3.0));
        let quiet = amplitude_from_samples(&[0.05, -0.05]).unwrap();
        assert!(quiet > 1.0 && quiet < 3.0);
        assert_eq!(amplitude_from_samples(&[]), None);
    }

    #[test]
    fn simulated_stays_in_range() {
        for i in 0..1000 {
            let a = simulated_amplitude(i as f32 * 0.037);
            assert!((0.5..=1.5).contains(&a));
            assert_eq!(SimulatedAmplitude.sample(i as f32 * 0.037), Some(a));
        }
    }

    #[test]
    fn shared_cell_round_trips_latest_value() {
        let cell = SharedAmplitude::new();
        let mut reader = cell.clone();
        assert_eq!(reader.sample(0.0), None);
        cell.store(2.5);
        assert_eq!(reader.sample(0.0), Some(2.5));
        cell.store(10.0);
        assert_eq!(reader.sample(0.0), Some(3.0));
        cell.clear();
        assert_eq!(reader.sample(0.0), None);
    }
}
