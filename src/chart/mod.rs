/// Frame rendering: what one animation frame shows, and how it is drawn.
///
/// The sequencer builds a [`FramePlan`] per group value and hands it to a
/// [`FrameRenderer`]. Every call draws on a fresh canvas, so nothing leaks
/// from one frame into the next unless the plan itself carries it (hold).

pub mod distribution;
pub mod stats;
pub mod style;
pub mod xy;

use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

pub use style::{ChartStyle, LineStyle, Marker, StyleFamily};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE_TITLE: i32 = 22;
const FONT_SIZE_AXIS_LABEL: i32 = 14;
const MARKER_SIZE: i32 = 4;
const LINE_WIDTH: u32 = 2;

/// Bitmap canvas every frame is drawn on.
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// ---------------------------------------------------------------------------
// Frame plans
// ---------------------------------------------------------------------------

/// A two-variable frame: point sets sharing fixed axes.
#[derive(Debug, Clone)]
pub struct XyFrame {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    /// One point set per slice drawn on this frame, oldest first.
    pub layers: Vec<Vec<(f64, f64)>>,
}

/// A distribution frame: one value vector per series column.
#[derive(Debug, Clone)]
pub struct DistributionFrame {
    pub title: String,
    pub series: Vec<String>,
    pub value_range: Range<f64>,
    /// Per slice drawn on this frame (oldest first), one vector per series.
    pub layers: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone)]
pub enum FramePlan {
    Xy(XyFrame),
    Distribution(DistributionFrame),
}

impl FramePlan {
    pub fn title(&self) -> &str {
        match self {
            FramePlan::Xy(f) => &f.title,
            FramePlan::Distribution(f) => &f.title,
        }
    }
}

/// Visual parameters shared by every frame of a run.
#[derive(Debug, Clone)]
pub struct FrameStyle {
    pub style: ChartStyle,
    pub color: RGBColor,
    pub marker: Marker,
    pub line_style: LineStyle,
    /// Histogram bin count.
    pub bins: usize,
    /// Draw the median bar on violins.
    pub show_medians: bool,
}

/// Frame title, e.g. `month: Jan`.
pub fn frame_title(group_column: &str, value: &impl std::fmt::Display) -> String {
    format!("{group_column}: {value}")
}

/// Axis range from data bounds; degenerate spans are widened by ±0.5.
pub fn axis_range(bounds: Option<(f64, f64)>) -> Range<f64> {
    match bounds {
        None => 0.0..1.0,
        Some((lo, hi)) if (hi - lo).abs() < 1e-6 => (lo - 0.5)..(hi + 0.5),
        Some((lo, hi)) => lo..hi,
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Draws a frame plan into an image file.
pub trait FrameRenderer {
    fn render(&self, plan: &FramePlan, style: &FrameStyle, path: &Path) -> Result<()>;
}

/// PNG renderer backed by the plotters bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl FrameRenderer for PlottersRenderer {
    fn render(&self, plan: &FramePlan, style: &FrameStyle, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        match plan {
            FramePlan::Xy(frame) => xy::draw(&root, frame, style)?,
            FramePlan::Distribution(frame) => distribution::draw(&root, frame, style)?,
        }

        root.present()
            .with_context(|| format!("writing frame {}", path.display()))?;
        Ok(())
    }
}
