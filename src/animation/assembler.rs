use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame};
use log::{debug, info, warn};

use super::natural::natural_sort;
use crate::error::Error;

/// NeuQuant sampling factor (1 = best/slowest, 30 = fastest).
const GIF_ENCODE_SPEED: i32 = 10;

// ---------------------------------------------------------------------------
// Frame set → looping GIF
// ---------------------------------------------------------------------------

/// The animation written next to a frame directory: `output` → `output.gif`.
pub fn gif_path_for(dir: &Path) -> PathBuf {
    let mut name = dir.as_os_str().to_owned();
    name.push(".gif");
    PathBuf::from(name)
}

/// Every file in `dir`, in natural order of file name.
pub fn sorted_frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("listing frames in {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    natural_sort(&mut names);
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

/// Display time of each frame: `total_seconds / frame_count`.
pub fn frame_delay(total_seconds: f64, frame_count: usize) -> Result<Duration, Error> {
    if frame_count == 0 {
        return Err(Error::EmptyFrameSet);
    }
    if !total_seconds.is_finite() || total_seconds <= 0.0 {
        return Err(Error::InvalidDuration(total_seconds));
    }
    Ok(Duration::from_secs_f64(total_seconds / frame_count as f64))
}

/// Encode every image in `dir` (natural order) into an infinitely looping
/// GIF at `output`. Returns the number of frames written.
///
/// Frames whose size differs from the first frame are resized to match it.
pub fn assemble_gif(dir: &Path, output: &Path, total_seconds: f64) -> Result<usize> {
    let files = sorted_frame_files(dir)?;
    let delay = frame_delay(total_seconds, files.len())
        .with_context(|| format!("assembling {}", output.display()))?;
    debug!(
        "{} frames, {:.3}s each, from {}",
        files.len(),
        delay.as_secs_f64(),
        dir.display()
    );

    let file = File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_ENCODE_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let mut canvas: Option<(u32, u32)> = None;
    for path in &files {
        let mut rgba = image::open(path)
            .with_context(|| format!("decoding frame {}", path.display()))?
            .to_rgba8();
        let (width, height) = *canvas.get_or_insert(rgba.dimensions());
        if rgba.dimensions() != (width, height) {
            warn!(
                "frame {} is {}x{}, resizing to {width}x{height}",
                path.display(),
                rgba.width(),
                rgba.height()
            );
            rgba = imageops::resize(&rgba, width, height, FilterType::Triangle);
        }
        encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, Delay::from_saturating_duration(delay)))
            .with_context(|| format!("encoding frame {}", path.display()))?;
    }
    drop(encoder);

    info!("wrote {} ({} frames)", output.display(), files.len());
    Ok(files.len())
}
