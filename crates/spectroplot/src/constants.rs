//! Analysis defaults and signal-processing constants.

/// Default analysis frame length in samples.
pub const DEFAULT_N_FFT: usize = 1024;
/// Default stride between successive frame starts in samples.
pub const DEFAULT_HOP_LENGTH: usize = 512;
/// Additive floor applied to power values before the log, avoiding log(0).
pub const POWER_EPSILON: f32 = 1e-10;
