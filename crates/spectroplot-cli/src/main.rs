use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use spectroplot::audio::parse_wav_bytes;
use spectroplot::jobs::{load_jobs, Job};
use spectroplot::render::{render_spectrogram, RenderOptions};
use spectroplot::stft::{compute_spectrogram, FrameParams};
use spectroplot::window::WindowKind;

#[derive(Debug, Parser)]
#[command(name = "spectroplot")]
#[command(about = "Batch STFT spectrogram plots for audio files", long_about = None)]
struct Args {
    /// Path to a JSON job list: [{"genre": "...", "path": "..."}].
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Analyze a single WAV file instead of a job list.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Label used in the plot title for --audio runs.
    #[arg(long, default_value = "Audio")]
    genre: String,

    /// Window function: hann, hamming, or rectangular.
    #[arg(long, default_value = "hann")]
    window: String,

    /// Frame length in samples.
    #[arg(long, default_value_t = 1024)]
    n_fft: usize,

    /// Stride between frame starts in samples.
    #[arg(long, default_value_t = 512)]
    hop_length: usize,

    /// Output directory for rendered PNGs.
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,

    /// Output image width in pixels.
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info).context("init logger")?;
    let args = Args::parse();

    let modes = u32::from(args.jobs.is_some()) + u32::from(args.audio.is_some());
    if modes != 1 {
        anyhow::bail!("choose exactly one input mode: --jobs or --audio");
    }

    let window = WindowKind::from_name(&args.window)?;
    let params = FrameParams {
        n_fft: args.n_fft,
        hop_length: args.hop_length,
    };
    let options = RenderOptions {
        width: args.width,
        height: args.height,
    };

    let jobs = match &args.jobs {
        Some(path) => load_jobs(path)?,
        None => vec![Job {
            genre: args.genre.clone(),
            // Mode check above guarantees --audio is present here.
            path: args.audio.clone().expect("single-file mode"),
        }],
    };
    if jobs.is_empty() {
        anyhow::bail!("job list is empty");
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output directory {:?}", args.out_dir))?;

    let title = format!("{} Window", window.display_name());
    let mut failures = 0usize;
    for job in &jobs {
        info!("processing {}...", job.genre);
        match run_job(job, window, params, &title, &args.out_dir, options) {
            Ok(out) => info!("{}: wrote {:?}", job.genre, out),
            Err(e) => {
                error!("{} ({:?}): {e:#}", job.genre, job.path);
                failures += 1;
            }
        }
    }

    if failures == jobs.len() {
        anyhow::bail!("all {failures} jobs failed");
    }
    if failures > 0 {
        warn!("{failures} of {} jobs failed", jobs.len());
    }
    Ok(())
}

/// Process one job: load the WAV, compute the spectrogram, render the plot.
/// Returns the path of the written PNG.
fn run_job(
    job: &Job,
    window: WindowKind,
    params: FrameParams,
    title: &str,
    out_dir: &Path,
    options: RenderOptions,
) -> Result<PathBuf> {
    let bytes = std::fs::read(&job.path).with_context(|| format!("read file {:?}", job.path))?;
    let wav = parse_wav_bytes(&bytes).context("parse wav")?;

    let spec = compute_spectrogram(&wav.samples_mono, window, params)?;
    info!(
        "{}: {} Hz, {} bins x {} segments",
        job.genre,
        wav.sample_rate_hz,
        spec.bins(),
        spec.segments()
    );

    let out = out_dir.join(format!("{}.png", job.slug()));
    render_spectrogram(
        &spec,
        wav.sample_rate_hz,
        params.hop_length,
        title,
        &job.genre,
        &out,
        options,
    )?;
    Ok(out)
}
