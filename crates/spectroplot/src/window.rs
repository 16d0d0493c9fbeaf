//! Analysis window generation.

use crate::SpectrogramError;

/// Supported analysis window shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Hann,
    Hamming,
    Rectangular,
}

impl WindowKind {
    /// Resolve a window selector by name, as it appears in configuration or
    /// CLI input. Unknown names are rejected before any frame processing.
    pub fn from_name(name: &str) -> Result<Self, SpectrogramError> {
        match name {
            "hann" => Ok(Self::Hann),
            "hamming" => Ok(Self::Hamming),
            "rectangular" => Ok(Self::Rectangular),
            other => Err(SpectrogramError::UnsupportedWindow(other.to_string())),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hann => "hann",
            Self::Hamming => "hamming",
            Self::Rectangular => "rectangular",
        }
    }

    /// Capitalized form used in plot titles ("Hann Window" etc.).
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hann => "Hann",
            Self::Hamming => "Hamming",
            Self::Rectangular => "Rectangular",
        }
    }

    /// Generate the symmetric window of length `len`.
    ///
    /// Hann and Hamming use the symmetric convention with an `len - 1`
    /// denominator, so Hann is exactly zero at both ends.
    #[must_use]
    pub fn coefficients(self, len: usize) -> Vec<f32> {
        match self {
            Self::Hann => raised_cosine(len, 0.5, 0.5),
            Self::Hamming => raised_cosine(len, 0.54, 0.46),
            Self::Rectangular => vec![1.0; len],
        }
    }
}

fn raised_cosine(len: usize, a0: f32, a1: f32) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let span = (len - 1) as f32;
    (0..len)
        .map(|k| a0 - a1 * (core::f32::consts::TAU * k as f32 / span).cos())
        .collect()
}
