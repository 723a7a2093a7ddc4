use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{
    Canvas, ChartStyle, FrameStyle, LineStyle, Marker, XyFrame, FONT_FAMILY,
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_TITLE, LINE_WIDTH, MARKER_SIZE,
};
use crate::error::Error;

type XyChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

// ---------------------------------------------------------------------------
// Two-variable frames: scatter, line, bar
// ---------------------------------------------------------------------------

/// Draw a scatter/line/bar frame on fixed axes.
pub fn draw(root: &Canvas<'_>, frame: &XyFrame, style: &FrameStyle) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .caption(&frame.title, (FONT_FAMILY, FONT_SIZE_TITLE))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(frame.x_range.clone(), frame.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(frame.x_label.as_str())
        .y_desc(frame.y_label.as_str())
        .axis_desc_style((FONT_FAMILY, FONT_SIZE_AXIS_LABEL))
        .draw()?;

    match style.style {
        ChartStyle::Scatter => {
            for layer in &frame.layers {
                draw_markers(&mut chart, layer, style.marker, style.color)?;
            }
        }
        ChartStyle::Line => {
            for layer in &frame.layers {
                draw_line(&mut chart, layer, style.line_style, style.color)?;
                draw_markers(&mut chart, layer, style.marker, style.color)?;
            }
        }
        ChartStyle::Bar => {
            for layer in &frame.layers {
                draw_bars(&mut chart, layer, frame, style.color)?;
            }
        }
        ChartStyle::Boxplot | ChartStyle::Violin | ChartStyle::Histogram => {
            return Err(Error::UnsupportedStyle {
                kind: "two-variable chart style",
                name: style.style.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

fn draw_markers(
    chart: &mut XyChart<'_, '_>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
) -> Result<()> {
    let filled = color.filled();
    let stroke = color.stroke_width(LINE_WIDTH);
    let r = MARKER_SIZE;
    let pts = points.iter().copied();

    match marker {
        Marker::Point => {
            chart.draw_series(pts.map(|p| Circle::new(p, 1, filled)))?;
        }
        Marker::Circle => {
            chart.draw_series(pts.map(|p| Circle::new(p, r, filled)))?;
        }
        Marker::Square => {
            chart.draw_series(
                pts.map(|p| EmptyElement::at(p) + Rectangle::new([(-r, -r), (r, r)], filled)),
            )?;
        }
        Marker::Triangle => {
            chart.draw_series(pts.map(|p| TriangleMarker::new(p, r + 1, filled)))?;
        }
        Marker::Cross => {
            chart.draw_series(pts.map(|p| Cross::new(p, r, stroke)))?;
        }
        Marker::Plus => {
            chart.draw_series(pts.map(|p| {
                EmptyElement::at(p)
                    + PathElement::new(vec![(-r, 0), (r, 0)], stroke)
                    + PathElement::new(vec![(0, -r), (0, r)], stroke)
            }))?;
        }
    }
    Ok(())
}

/// Points are joined in row order, as they appear in the slice.
fn draw_line(
    chart: &mut XyChart<'_, '_>,
    points: &[(f64, f64)],
    line_style: LineStyle,
    color: RGBColor,
) -> Result<()> {
    let stroke = color.stroke_width(LINE_WIDTH);
    let pts = points.iter().copied();
    match line_style {
        LineStyle::Solid => {
            chart.draw_series(LineSeries::new(pts, stroke))?;
        }
        LineStyle::Dashed => {
            chart.draw_series(DashedLineSeries::new(pts, 10, 6, stroke))?;
        }
        LineStyle::Dotted => {
            chart.draw_series(DashedLineSeries::new(pts, 2, 4, stroke))?;
        }
        LineStyle::None => {}
    }
    Ok(())
}

/// Bars are 0.8 x-units wide, centred on x, rising from zero (clamped to
/// the visible y range).
fn draw_bars(
    chart: &mut XyChart<'_, '_>,
    points: &[(f64, f64)],
    frame: &XyFrame,
    color: RGBColor,
) -> Result<()> {
    let base = 0.0f64.clamp(frame.y_range.start, frame.y_range.end);
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Rectangle::new([(x - 0.4, base), (x + 0.4, y)], color.filled())),
    )?;
    Ok(())
}
