use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use super::assembler::{assemble_gif, gif_path_for};
use crate::chart::{
    axis_range, frame_title, DistributionFrame, FramePlan, FrameRenderer, FrameStyle,
    StyleFamily, XyFrame,
};
use crate::data::filter::{distinct_values, extract_slice, numeric_bounds};
use crate::data::model::{CellValue, Table};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Frame jobs
// ---------------------------------------------------------------------------

/// Parameters shared by every frame of one run.
#[derive(Debug, Clone, Copy)]
pub struct FrameJob<'a> {
    /// Column whose distinct values become frames.
    pub group_column: &'a str,
    /// Directory that receives one `<value>.png` per frame.
    pub output_dir: &'a Path,
    pub style: &'a FrameStyle,
    /// Keep earlier slices on later frames.
    pub hold: bool,
}

/// Frames written by one run, in data (first-occurrence) order.
#[derive(Debug, Clone)]
pub struct FrameSet {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Recreate `path` as an empty directory.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("clearing {}", path.display());
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing old frames in {}", path.display()))?;
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("creating output directory {}", path.display()))?;
    Ok(())
}

/// Fail if two group values would write the same frame file.
fn check_frame_names(values: &[CellValue]) -> Result<(), Error> {
    let mut seen: HashMap<String, &CellValue> = HashMap::new();
    for value in values {
        let stem = value.file_stem();
        if let Some(first) = seen.get(&stem) {
            return Err(Error::FrameNameCollision {
                first: first.to_string(),
                second: value.to_string(),
                stem,
            });
        }
        seen.insert(stem, value);
    }
    Ok(())
}

/// Shared loop: one frame per distinct group value.
///
/// `plan_for` receives the frame title and the slice for that value and
/// returns the plan to draw.
fn sequence<F>(
    table: &Table,
    renderer: &dyn FrameRenderer,
    job: &FrameJob<'_>,
    mut plan_for: F,
) -> Result<FrameSet>
where
    F: FnMut(String, &Table) -> Result<FramePlan>,
{
    prepare_output_dir(job.output_dir)?;
    let values = distinct_values(table, job.group_column)?;
    check_frame_names(&values)?;

    let mut files = Vec::with_capacity(values.len());
    for value in &values {
        let slice = extract_slice(table, job.group_column, value)?;
        let plan = plan_for(frame_title(job.group_column, value), &slice)?;
        let path = job.output_dir.join(format!("{}.png", value.file_stem()));
        renderer
            .render(&plan, job.style, &path)
            .with_context(|| format!("rendering frame for {}", plan.title()))?;
        debug!("{} ({} rows) -> {}", plan.title(), slice.num_rows(), path.display());
        files.push(path);
    }

    info!(
        "rendered {} frames into {}",
        files.len(),
        job.output_dir.display()
    );
    Ok(FrameSet {
        dir: job.output_dir.to_path_buf(),
        files,
    })
}

// ---------------------------------------------------------------------------
// Two-variable frames
// ---------------------------------------------------------------------------

/// Write one scatter/line/bar frame per group value. Axes are fixed to the
/// full table's x and y bounds.
pub fn render_xy_frames(
    table: &Table,
    renderer: &dyn FrameRenderer,
    x: &str,
    y: &str,
    job: &FrameJob<'_>,
) -> Result<FrameSet> {
    job.style.style.require(StyleFamily::TwoVariable)?;
    let x_range = axis_range(numeric_bounds(table, &[x])?);
    let y_range = axis_range(numeric_bounds(table, &[y])?);

    let mut layers: Vec<Vec<(f64, f64)>> = Vec::new();
    sequence(table, renderer, job, |title, slice| {
        let xs = slice.numeric_column(x)?;
        let ys = slice.numeric_column(y)?;
        let points: Vec<(f64, f64)> = xs
            .into_iter()
            .zip(ys)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .collect();
        if !job.hold {
            layers.clear();
        }
        layers.push(points);

        Ok(FramePlan::Xy(XyFrame {
            title,
            x_label: x.to_string(),
            y_label: y.to_string(),
            x_range: x_range.clone(),
            y_range: y_range.clone(),
            layers: layers.clone(),
        }))
    })
}

/// Render two-variable frames and assemble them into `<output_dir>.gif`.
pub fn build_xy_gif(
    table: &Table,
    renderer: &dyn FrameRenderer,
    x: &str,
    y: &str,
    job: &FrameJob<'_>,
    duration_secs: f64,
) -> Result<PathBuf> {
    let frames = render_xy_frames(table, renderer, x, y, job)?;
    finish(&frames, duration_secs)
}

// ---------------------------------------------------------------------------
// Distribution frames
// ---------------------------------------------------------------------------

/// Write one boxplot/violin/histogram frame per group value, one
/// distribution per series column. The value axis spans every series
/// column of the full table.
pub fn render_distribution_frames(
    table: &Table,
    renderer: &dyn FrameRenderer,
    series: &[String],
    job: &FrameJob<'_>,
) -> Result<FrameSet> {
    job.style.style.require(StyleFamily::Distribution)?;
    let value_range = axis_range(numeric_bounds(table, series)?);

    let mut layers: Vec<Vec<Vec<f64>>> = Vec::new();
    sequence(table, renderer, job, |title, slice| {
        let mut values = Vec::with_capacity(series.len());
        for column in series {
            let mut v = slice.numeric_column(column)?;
            v.retain(|x| x.is_finite());
            values.push(v);
        }
        if !job.hold {
            layers.clear();
        }
        layers.push(values);

        Ok(FramePlan::Distribution(DistributionFrame {
            title,
            series: series.to_vec(),
            value_range: value_range.clone(),
            layers: layers.clone(),
        }))
    })
}

/// Render distribution frames and assemble them into `<output_dir>.gif`.
pub fn build_distribution_gif(
    table: &Table,
    renderer: &dyn FrameRenderer,
    series: &[String],
    job: &FrameJob<'_>,
    duration_secs: f64,
) -> Result<PathBuf> {
    let frames = render_distribution_frames(table, renderer, series, job)?;
    finish(&frames, duration_secs)
}

fn finish(frames: &FrameSet, duration_secs: f64) -> Result<PathBuf> {
    let gif = gif_path_for(&frames.dir);
    let written = assemble_gif(&frames.dir, &gif, duration_secs)?;
    if written != frames.files.len() {
        warn!(
            "{} holds {written} files but {} frames were rendered",
            frames.dir.display(),
            frames.files.len()
        );
    }
    Ok(gif)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs::File;
    use std::io::BufReader;

    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba, RgbaImage};
    use plotters::prelude::BLUE;

    use super::*;
    use crate::chart::{ChartStyle, LineStyle, Marker};

    /// Records each plan and writes a tiny PNG instead of drawing a chart.
    #[derive(Default)]
    struct StubRenderer {
        plans: RefCell<Vec<FramePlan>>,
    }

    impl FrameRenderer for StubRenderer {
        fn render(&self, plan: &FramePlan, _style: &FrameStyle, path: &Path) -> Result<()> {
            let shade = (self.plans.borrow().len() * 40) as u8;
            RgbaImage::from_pixel(6, 4, Rgba([shade, 0, 0, 255])).save(path)?;
            self.plans.borrow_mut().push(plan.clone());
            Ok(())
        }
    }

    impl StubRenderer {
        fn titles(&self) -> Vec<String> {
            self.plans
                .borrow()
                .iter()
                .map(|p| p.title().to_string())
                .collect()
        }

        fn layer_counts(&self) -> Vec<usize> {
            self.plans
                .borrow()
                .iter()
                .map(|p| match p {
                    FramePlan::Xy(f) => f.layers.len(),
                    FramePlan::Distribution(f) => f.layers.len(),
                })
                .collect()
        }
    }

    fn style(style: ChartStyle) -> FrameStyle {
        FrameStyle {
            style,
            color: BLUE,
            marker: Marker::Circle,
            line_style: LineStyle::Solid,
            bins: 10,
            show_medians: true,
        }
    }

    fn month_table() -> Table {
        let rows = [
            ("Jan", 1, 10.0),
            ("Jan", 2, 12.5),
            ("Feb", 1, 20.0),
            ("Feb", 2, 18.0),
            ("Mar", 1, 30.0),
            ("Mar", 2, 33.0),
        ]
        .iter()
        .map(|&(m, x, y)| {
            vec![
                CellValue::String(m.into()),
                CellValue::Integer(x),
                CellValue::Float(y),
            ]
        })
        .collect();
        Table::from_rows(vec!["month".into(), "x".into(), "y".into()], rows).unwrap()
    }

    fn file_names(set: &FrameSet) -> Vec<String> {
        set.files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn gif_frame_delays_ms(path: &Path) -> Vec<f64> {
        let reader = BufReader::new(File::open(path).unwrap());
        GifDecoder::new(reader)
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap()
            .iter()
            .map(|f| {
                let (n, d) = f.delay().numer_denom_ms();
                n as f64 / d as f64
            })
            .collect()
    }

    #[test]
    fn one_frame_per_distinct_value_in_data_order() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let st = style(ChartStyle::Scatter);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };
        let renderer = StubRenderer::default();

        let set = render_xy_frames(&month_table(), &renderer, "x", "y", &job).unwrap();
        assert_eq!(file_names(&set), ["Jan.png", "Feb.png", "Mar.png"]);
        assert_eq!(
            renderer.titles(),
            ["month: Jan", "month: Feb", "month: Mar"]
        );
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
    }

    #[test]
    fn frames_share_full_table_axes() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("frames");
        let st = style(ChartStyle::Line);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };
        let renderer = StubRenderer::default();
        render_xy_frames(&month_table(), &renderer, "x", "y", &job).unwrap();

        for plan in renderer.plans.borrow().iter() {
            let FramePlan::Xy(frame) = plan else {
                panic!("expected an xy plan");
            };
            assert_eq!(frame.x_range, 1.0..2.0);
            assert_eq!(frame.y_range, 10.0..33.0);
            assert_eq!(frame.layers[0].len(), 2);
        }
    }

    #[test]
    fn builds_gif_with_one_frame_per_month() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let st = style(ChartStyle::Scatter);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        let gif = build_xy_gif(&month_table(), &StubRenderer::default(), "x", "y", &job, 3.0)
            .unwrap();
        assert_eq!(gif, tmp.path().join("output.gif"));
        for name in ["Jan.png", "Feb.png", "Mar.png"] {
            assert!(out.join(name).is_file(), "missing {name}");
        }
        assert_eq!(gif_frame_delays_ms(&gif), vec![1000.0; 3]);
    }

    #[test]
    fn rerun_replaces_previous_frames() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.png"), b"old").unwrap();
        let st = style(ChartStyle::Bar);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        for _ in 0..2 {
            build_xy_gif(&month_table(), &StubRenderer::default(), "x", "y", &job, 10.0)
                .unwrap();
            assert_eq!(std::fs::read_dir(&out).unwrap().count(), 3);
        }
        assert!(!out.join("stale.png").exists());
    }

    #[test]
    fn hold_accumulates_earlier_slices() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("held");
        let st = style(ChartStyle::Scatter);
        let mut job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: true,
        };

        let held = StubRenderer::default();
        render_xy_frames(&month_table(), &held, "x", "y", &job).unwrap();
        assert_eq!(held.layer_counts(), [1, 2, 3]);

        job.hold = false;
        let fresh = StubRenderer::default();
        render_xy_frames(&month_table(), &fresh, "x", "y", &job).unwrap();
        assert_eq!(fresh.layer_counts(), [1, 1, 1]);
    }

    #[test]
    fn distribution_frames_carry_every_series() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("dist");
        let st = style(ChartStyle::Violin);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };
        let renderer = StubRenderer::default();
        let series = vec!["x".to_string(), "y".to_string()];

        let gif = build_distribution_gif(&month_table(), &renderer, &series, &job, 6.0).unwrap();
        assert!(gif.is_file());

        let plans = renderer.plans.borrow();
        assert_eq!(plans.len(), 3);
        let FramePlan::Distribution(first) = &plans[0] else {
            panic!("expected a distribution plan");
        };
        assert_eq!(first.series, series);
        assert_eq!(first.value_range, 1.0..33.0);
        assert_eq!(first.layers[0], vec![vec![1.0, 2.0], vec![10.0, 12.5]]);
    }

    #[test]
    fn empty_table_fails_with_empty_frame_set() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let table =
            Table::from_rows(vec!["month".into(), "x".into(), "y".into()], Vec::new()).unwrap();
        let st = style(ChartStyle::Scatter);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        let err = build_xy_gif(&table, &StubRenderer::default(), "x", "y", &job, 10.0)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::EmptyFrameSet)
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let st = style(ChartStyle::Scatter);
        let job = FrameJob {
            group_column: "week",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        let err = render_xy_frames(&month_table(), &StubRenderer::default(), "x", "y", &job)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingColumn(c)) if c == "week"
        ));
    }

    #[test]
    fn style_family_must_match_frame_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let st = style(ChartStyle::Histogram);
        let job = FrameJob {
            group_column: "month",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        let err = render_xy_frames(&month_table(), &StubRenderer::default(), "x", "y", &job)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnsupportedStyle { .. })
        ));
    }

    #[test]
    fn colliding_frame_names_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output");
        let rows = ["a/b", "a:b"]
            .iter()
            .map(|g| {
                vec![
                    CellValue::String(g.to_string()),
                    CellValue::Float(1.0),
                    CellValue::Float(2.0),
                ]
            })
            .collect();
        let table =
            Table::from_rows(vec!["group".into(), "x".into(), "y".into()], rows).unwrap();
        let st = style(ChartStyle::Scatter);
        let job = FrameJob {
            group_column: "group",
            output_dir: &out,
            style: &st,
            hold: false,
        };

        let err = render_xy_frames(&table, &StubRenderer::default(), "x", "y", &job)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::FrameNameCollision { stem, .. }) if stem == "a_b"
        ));
    }
}
