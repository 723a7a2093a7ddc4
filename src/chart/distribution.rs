use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::stats::{histogram_counts, kde, BoxStats};
use super::{
    Canvas, ChartStyle, DistributionFrame, FrameStyle, FONT_FAMILY, FONT_SIZE_AXIS_LABEL,
    FONT_SIZE_TITLE, LINE_WIDTH,
};
use crate::color::generate_palette;
use crate::error::Error;

type DistChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Half-width of a box or violin body, in category units.
const BODY_HALF_WIDTH: f64 = 0.25;
const VIOLIN_HALF_WIDTH: f64 = 0.4;
const KDE_POINTS: usize = 100;
const OUTLIER_RADIUS: i32 = 3;

// ---------------------------------------------------------------------------
// One-variable-by-group frames: boxplot, violin, histogram
// ---------------------------------------------------------------------------

/// Draw a boxplot/violin/histogram frame. The value axis is fixed to
/// `frame.value_range` (vertical for box/violin, horizontal for histogram).
pub fn draw(root: &Canvas<'_>, frame: &DistributionFrame, style: &FrameStyle) -> Result<()> {
    match style.style {
        ChartStyle::Boxplot | ChartStyle::Violin => draw_categorical(root, frame, style),
        ChartStyle::Histogram => draw_histogram(root, frame, style),
        ChartStyle::Scatter | ChartStyle::Line | ChartStyle::Bar => {
            Err(Error::UnsupportedStyle {
                kind: "distribution chart style",
                name: style.style.to_string(),
            }
            .into())
        }
    }
}

/// Series sit at x = 1, 2, ..., n.
fn draw_categorical(
    root: &Canvas<'_>,
    frame: &DistributionFrame,
    style: &FrameStyle,
) -> Result<()> {
    let n = frame.series.len();
    let label_for = |x: &f64| {
        let pos = x.round();
        if (x - pos).abs() < 1e-6 && pos >= 1.0 && pos as usize <= n {
            frame.series[pos as usize - 1].clone()
        } else {
            String::new()
        }
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&frame.title, (FONT_FAMILY, FONT_SIZE_TITLE))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(0.5..n as f64 + 0.5, frame.value_range.clone())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&label_for)
        .axis_desc_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for layer in &frame.layers {
        for (i, values) in layer.iter().enumerate() {
            let pos = (i + 1) as f64;
            if style.style == ChartStyle::Violin {
                draw_violin(&mut chart, pos, values, style)?;
            } else {
                draw_box(&mut chart, pos, values, style)?;
            }
        }
    }
    Ok(())
}

fn draw_box(
    chart: &mut DistChart<'_, '_>,
    pos: f64,
    values: &[f64],
    style: &FrameStyle,
) -> Result<()> {
    let Some(stats) = BoxStats::from_data(values) else {
        return Ok(());
    };
    let outline = BLACK.stroke_width(1);
    let (left, right) = (pos - BODY_HALF_WIDTH, pos + BODY_HALF_WIDTH);
    let cap = BODY_HALF_WIDTH / 2.0;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        style.color.filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        outline,
    )))?;

    let segments = [
        vec![(pos, stats.q1), (pos, stats.min)],
        vec![(pos, stats.q3), (pos, stats.max)],
        vec![(pos - cap, stats.min), (pos + cap, stats.min)],
        vec![(pos - cap, stats.max), (pos + cap, stats.max)],
    ];
    chart.draw_series(segments.into_iter().map(|s| PathElement::new(s, outline)))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(left, stats.median), (right, stats.median)],
        BLACK.stroke_width(LINE_WIDTH),
    )))?;

    chart.draw_series(
        stats
            .outliers
            .iter()
            .map(|&v| Circle::new((pos, v), OUTLIER_RADIUS, outline)),
    )?;
    Ok(())
}

fn draw_violin(
    chart: &mut DistChart<'_, '_>,
    pos: f64,
    values: &[f64],
    style: &FrameStyle,
) -> Result<()> {
    let Some(stats) = BoxStats::from_data(values) else {
        return Ok(());
    };
    let density = kde(values, KDE_POINTS);
    if density.len() > 1 {
        let mut outline: Vec<(f64, f64)> = density
            .iter()
            .map(|&(y, d)| (pos + d * VIOLIN_HALF_WIDTH, y))
            .collect();
        outline.extend(
            density
                .iter()
                .rev()
                .map(|&(y, d)| (pos - d * VIOLIN_HALF_WIDTH, y)),
        );
        chart.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            style.color.mix(0.4).filled(),
        )))?;
        outline.push(outline[0]);
        chart.draw_series(std::iter::once(PathElement::new(
            outline,
            style.color.stroke_width(1),
        )))?;
    }

    // extrema bar with caps, plus the median when enabled
    let bar = style.color.stroke_width(LINE_WIDTH);
    let cap = VIOLIN_HALF_WIDTH / 4.0;
    let (lo, hi) = (
        stats.outliers.first().copied().unwrap_or(stats.min).min(stats.min),
        stats.outliers.last().copied().unwrap_or(stats.max).max(stats.max),
    );
    let mut segments = vec![
        vec![(pos, lo), (pos, hi)],
        vec![(pos - cap, lo), (pos + cap, lo)],
        vec![(pos - cap, hi), (pos + cap, hi)],
    ];
    if style.show_medians {
        segments.push(vec![
            (pos - 2.0 * cap, stats.median),
            (pos + 2.0 * cap, stats.median),
        ]);
    }
    chart.draw_series(segments.into_iter().map(|s| PathElement::new(s, bar)))?;
    Ok(())
}

/// Bins span the shared value range so every frame uses the same bin edges.
/// With several series, each bin is split into side-by-side bars.
fn draw_histogram(
    root: &Canvas<'_>,
    frame: &DistributionFrame,
    style: &FrameStyle,
) -> Result<()> {
    let bins = style.bins.max(1);
    let (lo, hi) = (frame.value_range.start, frame.value_range.end);
    let width = (hi - lo) / bins as f64;
    let n_series = frame.series.len().max(1);

    let counts: Vec<Vec<Vec<usize>>> = frame
        .layers
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|values| histogram_counts(values, bins, lo, hi))
                .collect()
        })
        .collect();
    let peak = counts
        .iter()
        .flatten()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(&frame.title, (FONT_FAMILY, FONT_SIZE_TITLE))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(frame.value_range.clone(), 0.0..peak as f64 * 1.05)?;

    chart
        .configure_mesh()
        .x_desc(frame.series.join(", "))
        .y_desc("count")
        .axis_desc_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let colors = if n_series == 1 {
        vec![style.color]
    } else {
        generate_palette(n_series)
    };
    let sub_width = width / n_series as f64;

    let last = counts.len().saturating_sub(1);
    for (layer_idx, layer) in counts.iter().enumerate() {
        for (s, series_counts) in layer.iter().enumerate() {
            let color = colors[s % colors.len()];
            let bars = series_counts.iter().enumerate().map(|(b, &c)| {
                let x0 = lo + b as f64 * width + s as f64 * sub_width;
                Rectangle::new([(x0, 0.0), (x0 + sub_width, c as f64)], color.filled())
            });
            let anno = chart.draw_series(bars)?;
            if n_series > 1 && layer_idx == last {
                anno.label(frame.series[s].as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }
    }

    if n_series > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}
