use std::path::Path;

use anyhow::{Context, Result};
use plotters::style::RGBColor;
use serde::Deserialize;

use crate::chart::{ChartStyle, FrameStyle, LineStyle, Marker, StyleFamily};
use crate::chart::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::color::parse_color;

pub const DEFAULT_DURATION_SECS: f64 = 10.0;
pub const DEFAULT_BINS: usize = 10;

const DEFAULT_XY_COLOR: RGBColor = RGBColor(0, 0, 255);
const DEFAULT_DISTRIBUTION_COLOR: RGBColor = RGBColor(255, 0, 0);

// ---------------------------------------------------------------------------
// Style settings
// ---------------------------------------------------------------------------

/// Visual settings for a run, independent of the input table.
///
/// Loaded from an optional JSON file; command-line flags then override
/// individual fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSettings {
    pub style: ChartStyle,
    /// `None` picks the family default (blue for xy, red for distributions).
    pub color: Option<String>,
    pub marker: Marker,
    pub linestyle: LineStyle,
    pub bins: usize,
    /// Median bar on violins.
    pub medians: bool,
    pub hold: bool,
    pub width: u32,
    pub height: u32,
    /// Total animation length in seconds.
    pub duration: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            style: ChartStyle::Scatter,
            color: None,
            marker: Marker::Circle,
            linestyle: LineStyle::Solid,
            bins: DEFAULT_BINS,
            medians: true,
            hold: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            duration: DEFAULT_DURATION_SECS,
        }
    }
}

impl StyleSettings {
    /// Read settings from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))
    }

    /// Resolve the per-frame style, parsing the colour.
    pub fn frame_style(&self) -> Result<FrameStyle> {
        let color = match &self.color {
            Some(text) => parse_color(text)?,
            None => match self.style.family() {
                StyleFamily::TwoVariable => DEFAULT_XY_COLOR,
                StyleFamily::Distribution => DEFAULT_DISTRIBUTION_COLOR,
            },
        };
        Ok(FrameStyle {
            style: self.style,
            color,
            marker: self.marker,
            line_style: self.linestyle,
            bins: self.bins,
            show_medians: self.medians,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_match_the_command_line() {
        let s = StyleSettings::default();
        assert_eq!(s.style, ChartStyle::Scatter);
        assert_eq!(s.duration, 10.0);
        assert_eq!((s.width, s.height), (640, 480));
        assert!(s.medians && !s.hold);
    }

    #[test]
    fn default_color_depends_on_style_family() {
        let xy = StyleSettings::default().frame_style().unwrap();
        assert_eq!(xy.color, RGBColor(0, 0, 255));

        let dist = StyleSettings {
            style: ChartStyle::Boxplot,
            ..Default::default()
        };
        assert_eq!(dist.frame_style().unwrap().color, RGBColor(255, 0, 0));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"style": "violin", "color": "green", "linestyle": "--", "bins": 4}}"#
        )
        .unwrap();

        let s = StyleSettings::from_json_file(file.path()).unwrap();
        assert_eq!(s.style, ChartStyle::Violin);
        assert_eq!(s.linestyle, LineStyle::Dashed);
        assert_eq!(s.bins, 4);
        assert_eq!(s.marker, Marker::Circle);

        let fs = s.frame_style().unwrap();
        assert_eq!(fs.color, RGBColor(0, 128, 0));
    }

    #[test]
    fn unknown_fields_and_styles_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"colour": "red"}}"#).unwrap();
        assert!(StyleSettings::from_json_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"style": "pie"}}"#).unwrap();
        assert!(StyleSettings::from_json_file(file.path()).is_err());
    }

    #[test]
    fn bad_color_surfaces_as_invalid_color() {
        let s = StyleSettings {
            color: Some("not-a-colour".into()),
            ..Default::default()
        };
        let err = s.frame_style().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidColor(_))
        ));
    }
}
