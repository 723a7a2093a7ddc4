use std::path::PathBuf;

use anyhow::{bail, Result};
use log::{info, warn};

use crate::animation::sequencer::{build_distribution_gif, build_xy_gif, FrameJob};
use crate::chart::{FrameRenderer, PlottersRenderer, StyleFamily};
use crate::data::loader::{load_file, LoadOptions};
use crate::settings::StyleSettings;

// ---------------------------------------------------------------------------
// One run: table file → frames → GIF
// ---------------------------------------------------------------------------

/// Everything needed for one run, after command-line and config merging.
#[derive(Debug, Clone)]
pub struct GifJob {
    pub input: PathBuf,
    pub x: Option<String>,
    pub y: Option<String>,
    pub group: String,
    /// Distribution series; empty means "use `x`".
    pub series: Vec<String>,
    pub output: PathBuf,
    pub load: LoadOptions,
    pub settings: StyleSettings,
}

impl GifJob {
    /// Series columns for distribution styles.
    fn series_columns(&self) -> Result<Vec<String>> {
        if !self.series.is_empty() {
            return Ok(self.series.clone());
        }
        match &self.x {
            Some(x) => Ok(vec![x.clone()]),
            None => bail!(
                "style '{}' needs --series (or --xlabel) naming the value column",
                self.settings.style
            ),
        }
    }
}

/// Run with the plotters bitmap renderer at the configured frame size.
pub fn run(job: &GifJob) -> Result<PathBuf> {
    let renderer = PlottersRenderer {
        width: job.settings.width,
        height: job.settings.height,
    };
    run_with(job, &renderer)
}

/// Load the table, render one frame per group value and assemble the GIF.
/// Returns the GIF path.
pub fn run_with(job: &GifJob, renderer: &dyn FrameRenderer) -> Result<PathBuf> {
    let style = job.settings.frame_style()?;
    let table = load_file(&job.input, job.load)?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.num_rows(),
        table.column_names().len(),
        job.input.display()
    );
    if table.is_empty() {
        warn!("{} has no data rows", job.input.display());
    }

    let frame_job = FrameJob {
        group_column: &job.group,
        output_dir: &job.output,
        style: &style,
        hold: job.settings.hold,
    };

    let gif = match style.style.family() {
        StyleFamily::TwoVariable => {
            let (Some(x), Some(y)) = (&job.x, &job.y) else {
                bail!("style '{}' needs both --xlabel and --ylabel", style.style);
            };
            build_xy_gif(&table, renderer, x, y, &frame_job, job.settings.duration)?
        }
        StyleFamily::Distribution => {
            let series = job.series_columns()?;
            build_distribution_gif(&table, renderer, &series, &frame_job, job.settings.duration)?
        }
    };
    Ok(gif)
}
