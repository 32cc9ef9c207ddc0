//! arcgauge CLI — batch measurement of paired semicircular arcs.

use arcgauge::{
    draw_overlay, render_improvement_frame, BatchReport, ImageInfo, MeasureConfig,
    MeasurementPipeline, RegionOfInterest, Side, SlotTrace,
};
use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::time::Instant;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "arcgauge")]
#[command(about = "Measure left/right semicircular arcs in grayscale images with RANSAC")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure both arcs in every image of a directory.
    Measure(CliMeasureArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliMeasureArgs {
    /// Directory with the input images.
    #[arg(long)]
    src: PathBuf,

    /// Output directory for reports and overlays (created if missing).
    #[arg(long)]
    dst: PathBuf,

    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Batch seed for reproducible runs (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Left arc window as x,y,width,height.
    #[arg(long)]
    left_roi: Option<RegionOfInterest>,

    /// Right arc window as x,y,width,height.
    #[arg(long)]
    right_roi: Option<RegionOfInterest>,

    /// RANSAC trials per side.
    #[arg(long)]
    iterations: Option<usize>,

    /// Minimum inlier ratio in [0, 1] for a circle to be accepted.
    #[arg(long)]
    min_inlier_ratio: Option<f32>,

    /// File extension of the input images.
    #[arg(long, default_value = "bmp")]
    extension: String,

    /// Skip writing overlay images.
    #[arg(long)]
    no_overlay: bool,

    /// Path to write per-slot RANSAC traces (JSON).
    #[arg(long)]
    debug_json: Option<PathBuf>,

    /// Directory to write one frame per best-hypothesis improvement.
    #[arg(long)]
    debug_frames: Option<PathBuf>,

    /// Process slots on the calling thread only.
    #[arg(long)]
    sequential: bool,
}

impl CliMeasureArgs {
    fn to_config(&self) -> CliResult<MeasureConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                MeasureConfig::from_json_file(path)?
            }
            None => MeasureConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(roi) = self.left_roi {
            config.left.roi = roi;
        }
        if let Some(roi) = self.right_roi {
            config.right.roi = roi;
        }
        for side in Side::ALL {
            let ransac = &mut config.side_mut(side).ransac;
            if let Some(n) = self.iterations {
                ransac.iterations = n;
            }
            if let Some(r) = self.min_inlier_ratio {
                ransac.min_inlier_ratio = r;
            }
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

/// Per-slot traces written by `--debug-json`.
#[derive(serde::Serialize)]
struct DebugDump<'a> {
    seed: u64,
    images: &'a [ImageInfo],
    slots: &'a [SlotTrace],
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Measure(args) => run_measure(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&MeasureConfig::default())?);
    Ok(())
}

// ── measure ────────────────────────────────────────────────────────────

fn read_dir_error(dir: &Path, e: std::io::Error) -> CliError {
    format!("Failed to read directory {}: {}", dir.display(), e).into()
}

/// Files in `dir` with extension `ext` (case-insensitive), sorted by name.
fn list_images(dir: &Path, ext: &str) -> CliResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| read_dir_error(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| read_dir_error(dir, e))?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if path.is_file() && matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_gray(path: &Path) -> CliResult<GrayImage> {
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    Ok(img.to_luma8())
}

fn save_image(img: &GrayImage, path: &Path) -> CliResult<()> {
    img.save(path).map_err(|e| -> CliError {
        format!("Failed to write image {}: {}", path.display(), e).into()
    })
}

fn run_measure(args: &CliMeasureArgs) -> CliResult<()> {
    let start = Instant::now();

    let config = args.to_config()?;
    let pipeline = MeasurementPipeline::new(config)?;
    tracing::info!(
        "Left ROI {}, right ROI {}, stride {}",
        pipeline.config().left.roi,
        pipeline.config().right.roi,
        pipeline.config().sampling.stride
    );

    let paths = list_images(&args.src, &args.extension)?;
    if paths.is_empty() {
        return Err(format!(
            "no .{} images found in {}",
            args.extension,
            args.src.display()
        )
        .into());
    }
    tracing::info!("Found {} images in {}", paths.len(), args.src.display());

    let mut images = Vec::with_capacity(paths.len());
    let mut infos = Vec::with_capacity(paths.len());
    for path in &paths {
        tracing::info!("Loading image: {}", path.display());
        let gray = load_gray(path)?;
        infos.push(ImageInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            width: gray.width(),
            height: gray.height(),
        });
        images.push(gray);
    }

    let want_traces = args.debug_json.is_some() || args.debug_frames.is_some();
    let (batch, traces) = if want_traces {
        pipeline.measure_traced(&images)?
    } else {
        (pipeline.measure(&images)?, Vec::new())
    };

    tracing::info!(
        "Measured left {}/{}, right {}/{} (seed {})",
        batch.left.n_measured(),
        images.len(),
        batch.right.n_measured(),
        images.len(),
        batch.seed
    );

    std::fs::create_dir_all(&args.dst).map_err(|e| -> CliError {
        format!("Failed to create {}: {}", args.dst.display(), e).into()
    })?;

    let report = BatchReport::new(infos, &batch);

    let text_path = args.dst.join("results.txt");
    std::fs::write(&text_path, report.to_text())?;
    tracing::info!("Text report written to {}", text_path.display());

    let json_path = args.dst.join("results.json");
    std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
    tracing::info!("Results written to {}", json_path.display());

    if !args.no_overlay {
        for (i, (image, entry)) in images.iter().zip(&report.images).enumerate() {
            let path = args.dst.join(format!("{}.jpg", i + 1));
            save_image(&draw_overlay(image, entry), &path)?;
        }
        tracing::info!("Overlays written to {}", args.dst.display());
    }

    if let Some(debug_path) = &args.debug_json {
        let infos: Vec<ImageInfo> = report.images.iter().map(|e| e.image.clone()).collect();
        let dump = DebugDump {
            seed: batch.seed,
            images: &infos,
            slots: &traces,
        };
        std::fs::write(debug_path, serde_json::to_string_pretty(&dump)?)?;
        tracing::info!("Debug dump written to {}", debug_path.display());
    }

    if let Some(frames_dir) = &args.debug_frames {
        write_frames(&pipeline, &images, &traces, frames_dir)?;
    }

    tracing::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

/// One frame per improvement, drawn over the smoothed ROI of its slot.
fn write_frames(
    pipeline: &MeasurementPipeline,
    images: &[GrayImage],
    traces: &[SlotTrace],
    dir: &Path,
) -> CliResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| -> CliError {
        format!("Failed to create {}: {}", dir.display(), e).into()
    })?;

    let mut n_frames = 0usize;
    for trace in traces {
        if trace.ransac.improvements.is_empty() {
            continue;
        }
        let background = pipeline.smoothed_roi(&images[trace.image_index], trace.side);
        for (k, improvement) in trace.ransac.improvements.iter().enumerate() {
            let path = dir.join(format!(
                "{:04}_{}_{:02}.png",
                trace.image_index + 1,
                trace.side,
                k
            ));
            save_image(&render_improvement_frame(&background, improvement), &path)?;
            n_frames += 1;
        }
    }
    tracing::info!("{} debug frames written to {}", n_frames, dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("arcgauge-cli-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn list_images_filters_and_sorts() {
        let dir = scratch_dir("list");
        for name in ["b.bmp", "a.BMP", "c.png", "notes.txt"] {
            std::fs::write(dir.join(name), b"x").expect("write file");
        }
        std::fs::create_dir(dir.join("d.bmp")).expect("create subdir");

        let found = list_images(&dir, "bmp").expect("list");
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.BMP", "b.bmp"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_errors_name_the_directory() {
        let dir = std::env::temp_dir().join("arcgauge-cli-does-not-exist");
        let err = list_images(&dir, "bmp").unwrap_err();
        assert!(err.to_string().contains(&dir.display().to_string()), "{err}");

        let err = read_dir_error(&dir, std::io::Error::other("entry failed"));
        let msg = err.to_string();
        assert!(msg.contains(&dir.display().to_string()));
        assert!(msg.contains("entry failed"));
    }
}
