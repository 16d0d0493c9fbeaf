//! Spectrogram plot rendering.
//!
//! Draws a decibel spectrogram as a PNG: time on the x-axis, frequency up to
//! Nyquist on the y-axis, dB values through a viridis colormap, and a
//! color-bar legend on the right.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::stft::Spectrogram;

/// Output image geometry.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
        }
    }
}

const COLORBAR_WIDTH: u32 = 110;

/// Render `spec` to a PNG at `out_path`.
///
/// Column `i` is placed at `i * hop_length / sample_rate_hz` seconds; bin `k`
/// at `k * sample_rate_hz / n_fft` Hz (linear up to Nyquist). The raster is
/// filled per pixel with bilinear interpolation between matrix cells.
pub fn render_spectrogram(
    spec: &Spectrogram,
    sample_rate_hz: u32,
    hop_length: usize,
    title: &str,
    genre: &str,
    out_path: &Path,
    options: RenderOptions,
) -> Result<()> {
    anyhow::ensure!(
        sample_rate_hz > 0 && hop_length > 0,
        "sample rate and hop length must be positive"
    );

    let (db_min, db_max) = spec.db_range();
    let db_span = (db_max - db_min).max(1e-6);

    let time_step = hop_length as f32 / sample_rate_hz as f32;
    let t_max = (spec.segments().saturating_sub(1)).max(1) as f32 * time_step;
    let nyquist = sample_rate_hz as f32 / 2.0;
    let max_bin = (spec.bins() - 1) as f32;

    let root = BitMapBackend::new(out_path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (plot_area, bar_area) =
        root.split_horizontally(options.width.saturating_sub(COLORBAR_WIDTH) as i32);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(format!("{genre}: {title}"), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f32..t_max, 0f32..nyquist)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Time (s)")
        .y_desc("Frequency (Hz)")
        .label_style(("sans-serif", 14))
        .draw()?;

    let raster = chart.plotting_area();
    let (x_pixels, y_pixels) = {
        let range = raster.get_pixel_range();
        (range.0.end - range.0.start, range.1.end - range.1.start)
    };

    for px in 0..x_pixels {
        let t = t_max * px as f32 / (x_pixels - 1).max(1) as f32;
        let col = t / time_step;
        for py in 0..y_pixels {
            let freq = nyquist * py as f32 / (y_pixels - 1).max(1) as f32;
            let bin = freq / nyquist * max_bin;
            let db = sample_bilinear(spec, col, bin);
            let norm = f64::from((db - db_min) / db_span).clamp(0.0, 1.0);
            raster.draw_pixel((t, freq), &ViridisRGB.get_color(norm))?;
        }
    }

    draw_colorbar(&bar_area, db_min, db_max)?;

    root.present()
        .with_context(|| format!("write spectrogram PNG {out_path:?}"))?;
    Ok(())
}

/// Vertical viridis gradient with dB tick labels, aligned with the plot.
fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    db_min: f32,
    db_max: f32,
) -> Result<()> {
    let db_span = (db_max - db_min).max(1e-6);

    let mut bar = ChartBuilder::on(area)
        .margin_top(42)
        .margin_bottom(50)
        .margin_left(8)
        .set_label_area_size(LabelAreaPosition::Right, 70)
        .build_cartesian_2d(0f32..1f32, db_min..db_max)?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|db| format!("{db:+.0} dB"))
        .label_style(("sans-serif", 12))
        .draw()?;

    let raster = bar.plotting_area();
    let (x_pixels, y_pixels) = {
        let range = raster.get_pixel_range();
        (range.0.end - range.0.start, range.1.end - range.1.start)
    };

    for py in 0..y_pixels {
        let db = db_min + db_span * py as f32 / (y_pixels - 1).max(1) as f32;
        let norm = f64::from((db - db_min) / db_span).clamp(0.0, 1.0);
        let color = ViridisRGB.get_color(norm);
        for px in 0..x_pixels {
            let x = px as f32 / (x_pixels - 1).max(1) as f32;
            raster.draw_pixel((x, db), &color)?;
        }
    }

    Ok(())
}

/// Bilinear sample of the dB matrix at fractional `(column, bin)`.
fn sample_bilinear(spec: &Spectrogram, col: f32, bin: f32) -> f32 {
    let max_col = (spec.segments() - 1) as f32;
    let max_bin = (spec.bins() - 1) as f32;
    let col = col.clamp(0.0, max_col);
    let bin = bin.clamp(0.0, max_bin);

    let c0 = col.floor() as usize;
    let b0 = bin.floor() as usize;
    let c1 = (c0 + 1).min(spec.segments() - 1);
    let b1 = (b0 + 1).min(spec.bins() - 1);
    let cf = col - c0 as f32;
    let bf = bin - b0 as f32;

    let low = spec.value(b0, c0) * (1.0 - cf) + spec.value(b0, c1) * cf;
    let high = spec.value(b1, c0) * (1.0 - cf) + spec.value(b1, c1) * cf;
    low * (1.0 - bf) + high * bf
}
