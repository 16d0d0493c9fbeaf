//! Short-time Fourier transform engine.
//!
//! Consumes a mono waveform plus framing parameters and produces a
//! decibel-scaled time-frequency matrix. The transform is one-sided
//! (standard real-FFT convention): bin 0 is DC, bin `n_fft / 2` is Nyquist.

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use crate::constants::{DEFAULT_HOP_LENGTH, DEFAULT_N_FFT, POWER_EPSILON};
use crate::window::WindowKind;
use crate::SpectrogramError;

/// Framing parameters for the STFT.
///
/// `hop_length <= n_fft` gives overlapping frames and is the expected usage,
/// but larger hops are not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    /// Frame length in samples.
    pub n_fft: usize,
    /// Stride between successive frame starts in samples.
    pub hop_length: usize,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            n_fft: DEFAULT_N_FFT,
            hop_length: DEFAULT_HOP_LENGTH,
        }
    }
}

/// A decibel-scaled spectrogram of shape `(n_fft / 2 + 1) x num_segments`.
///
/// Row index is the frequency bin (DC..Nyquist), column index is the time
/// frame. Storage is a flat buffer with each time frame contiguous.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<f32>,
    bins: usize,
    segments: usize,
}

impl Spectrogram {
    /// Number of frequency bins (`n_fft / 2 + 1`).
    #[must_use]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of time frames.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// All dB values of one time frame, DC first.
    #[must_use]
    pub fn column(&self, segment: usize) -> &[f32] {
        &self.data[segment * self.bins..(segment + 1) * self.bins]
    }

    /// dB value at `(bin, segment)`.
    #[must_use]
    pub fn value(&self, bin: usize, segment: usize) -> f32 {
        self.data[segment * self.bins + bin]
    }

    /// Minimum and maximum dB values over the whole matrix.
    #[must_use]
    pub fn db_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    /// Frequency bin with the highest power averaged across all frames.
    ///
    /// Averaging dB values is fine for locating the peak row; the log is
    /// monotonic per bin and the comparison is relative.
    #[must_use]
    pub fn peak_bin(&self) -> usize {
        let mut best = 0usize;
        let mut best_avg = f32::NEG_INFINITY;
        for bin in 0..self.bins {
            let mut sum = 0.0f32;
            for segment in 0..self.segments {
                sum += self.value(bin, segment);
            }
            let avg = sum / self.segments as f32;
            if avg > best_avg {
                best_avg = avg;
                best = bin;
            }
        }
        best
    }
}

/// Compute the decibel-scaled STFT spectrogram of a mono waveform.
///
/// The waveform is peak-normalized (one global scalar) into an internal
/// buffer; the input slice is not modified. Each frame of `n_fft` samples at
/// stride `hop_length` is windowed, transformed with a one-sided real FFT,
/// and converted to `10 * log10(|X|^2 + 1e-10)`.
///
/// Pure function of its inputs: no retained state, identical inputs yield
/// bit-identical output.
pub fn compute_spectrogram(
    samples: &[f32],
    window: WindowKind,
    params: FrameParams,
) -> Result<Spectrogram, SpectrogramError> {
    let FrameParams { n_fft, hop_length } = params;
    if n_fft == 0 || hop_length == 0 {
        return Err(SpectrogramError::InvalidParameters { n_fft, hop_length });
    }

    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak == 0.0 {
        return Err(SpectrogramError::SilentInput);
    }

    if samples.len() < n_fft {
        return Err(SpectrogramError::InsufficientLength {
            samples: samples.len(),
            n_fft,
        });
    }
    let num_segments = 1 + (samples.len() - n_fft) / hop_length;

    let inv_peak = 1.0 / peak;
    let normalized: Vec<f32> = samples.iter().map(|&s| s * inv_peak).collect();
    let coeffs = window.coefficients(n_fft);

    let mut planner = RealFftPlanner::<f32>::new();
    let fft: Arc<dyn RealToComplex<f32>> = planner.plan_fft_forward(n_fft);
    let mut frame = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();
    let mut scratch = fft.make_scratch_vec();

    let bins = n_fft / 2 + 1;
    debug_assert_eq!(spectrum.len(), bins);

    let mut data = Vec::with_capacity(bins * num_segments);
    for segment in 0..num_segments {
        let start = segment * hop_length;
        for (slot, (&s, &w)) in frame
            .iter_mut()
            .zip(normalized[start..start + n_fft].iter().zip(coeffs.iter()))
        {
            *slot = s * w;
        }

        fft.process_with_scratch(&mut frame, &mut spectrum, &mut scratch)
            .expect("real FFT forward transform");

        // Power and dB directly per bin; no complex intermediate matrix.
        for c in &spectrum {
            data.push(10.0 * (c.norm_sqr() + POWER_EPSILON).log10());
        }
    }

    Ok(Spectrogram {
        data,
        bins,
        segments: num_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, sample_rate: u32, seconds: f32, amplitude: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (core::f32::consts::TAU * freq_hz * t).sin()
            })
            .collect()
    }

    #[test]
    fn shape_matches_segment_formula() {
        let samples = sine(440.0, 44_100, 2.0, 0.5);
        assert_eq!(samples.len(), 88_200);

        let spec =
            compute_spectrogram(&samples, WindowKind::Hann, FrameParams::default()).unwrap();
        assert_eq!(spec.bins(), 513);
        assert_eq!(spec.segments(), 1 + (88_200 - 1024) / 512);
        assert_eq!(spec.segments(), 171);
        assert_eq!(spec.column(170).len(), 513);
    }

    #[test]
    fn exactly_one_frame_when_len_equals_n_fft() {
        let samples = sine(440.0, 44_100, 1.0, 1.0);
        let params = FrameParams {
            n_fft: samples.len(),
            hop_length: 512,
        };
        let spec = compute_spectrogram(&samples, WindowKind::Hann, params).unwrap();
        assert_eq!(spec.segments(), 1);
        assert_eq!(spec.bins(), samples.len() / 2 + 1);
    }

    #[test]
    fn sine_energy_lands_in_expected_bin() {
        // 440 Hz @ 44100 Hz with n_fft = 1024 -> round(440 * 1024 / 44100) = 10.
        let samples = sine(440.0, 44_100, 2.0, 0.8);
        let spec =
            compute_spectrogram(&samples, WindowKind::Hann, FrameParams::default()).unwrap();
        assert_eq!(spec.peak_bin(), 10);
    }

    #[test]
    fn dc_signal_peaks_at_bin_zero() {
        let samples = vec![0.25f32; 8192];
        let spec =
            compute_spectrogram(&samples, WindowKind::Hann, FrameParams::default()).unwrap();
        assert_eq!(spec.peak_bin(), 0);
    }

    #[test]
    fn silent_input_is_an_error() {
        let samples = vec![0.0f32; 44_100];
        let err =
            compute_spectrogram(&samples, WindowKind::Hann, FrameParams::default()).unwrap_err();
        assert_eq!(err, SpectrogramError::SilentInput);
    }

    #[test]
    fn short_input_is_an_error() {
        let samples = sine(440.0, 44_100, 0.01, 1.0);
        assert!(samples.len() < 1024);
        let err =
            compute_spectrogram(&samples, WindowKind::Hann, FrameParams::default()).unwrap_err();
        assert_eq!(
            err,
            SpectrogramError::InsufficientLength {
                samples: samples.len(),
                n_fft: 1024
            }
        );
    }

    #[test]
    fn zero_parameters_are_an_error() {
        let samples = sine(440.0, 44_100, 0.5, 1.0);
        for (n_fft, hop_length) in [(0usize, 512usize), (1024, 0), (0, 0)] {
            let err = compute_spectrogram(
                &samples,
                WindowKind::Hann,
                FrameParams { n_fft, hop_length },
            )
            .unwrap_err();
            assert_eq!(err, SpectrogramError::InvalidParameters { n_fft, hop_length });
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let samples = sine(1000.0, 22_050, 0.5, 0.3);
        let a = compute_spectrogram(&samples, WindowKind::Hamming, FrameParams::default()).unwrap();
        let b = compute_spectrogram(&samples, WindowKind::Hamming, FrameParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn normalization_makes_amplitude_irrelevant() {
        // Global peak normalization: the same waveform at two amplitudes
        // produces the same spectrogram.
        let loud = sine(440.0, 44_100, 0.5, 0.9);
        let quiet: Vec<f32> = loud.iter().map(|&s| s * 0.01).collect();

        let a = compute_spectrogram(&loud, WindowKind::Hann, FrameParams::default()).unwrap();
        let b = compute_spectrogram(&quiet, WindowKind::Hann, FrameParams::default()).unwrap();

        for segment in 0..a.segments() {
            for (x, y) in a.column(segment).iter().zip(b.column(segment)) {
                assert!((x - y).abs() < 1e-2, "{x} vs {y}");
            }
        }
    }

    #[test]
    fn all_window_kinds_produce_the_same_shape() {
        let samples = sine(440.0, 44_100, 0.25, 1.0);
        for kind in [WindowKind::Hann, WindowKind::Hamming, WindowKind::Rectangular] {
            let spec = compute_spectrogram(&samples, kind, FrameParams::default()).unwrap();
            assert_eq!(spec.bins(), 513);
            assert_eq!(spec.segments(), 1 + (samples.len() - 1024) / 512);
        }
    }
}
