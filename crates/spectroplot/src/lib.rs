//! Spectroplot core library.
//!
//! This crate provides:
//! - WAV loading with mono downmix
//! - Windowed STFT -> decibel spectrogram (the engine)
//! - PNG rendering of the time-frequency matrix
//! - Batch job-list configuration

pub mod audio;
pub mod constants;
pub mod jobs;
pub mod render;
pub mod stft;
pub mod window;

/// Errors reported by the spectrogram engine.
///
/// Every input-shape or configuration violation is an immediate failure with
/// no partial result; the engine performs no recovery or retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpectrogramError {
    /// Window selector name not in the recognized set.
    #[error("unsupported window type: {0:?}")]
    UnsupportedWindow(String),
    /// Peak amplitude is zero, so peak normalization is undefined.
    #[error("waveform is silent (peak amplitude is zero)")]
    SilentInput,
    /// Waveform shorter than a single analysis frame.
    #[error("waveform has {samples} samples but one frame needs n_fft = {n_fft}")]
    InsufficientLength { samples: usize, n_fft: usize },
    /// Non-positive frame length or hop.
    #[error("invalid frame parameters: n_fft = {n_fft}, hop_length = {hop_length}")]
    InvalidParameters { n_fft: usize, hop_length: usize },
}
