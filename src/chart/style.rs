use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

// ---------------------------------------------------------------------------
// ChartStyle – one case per supported chart
// ---------------------------------------------------------------------------

/// Which kind of data a chart style consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFamily {
    /// Two numeric columns plotted against each other.
    TwoVariable,
    /// One or more numeric columns summarised as distributions.
    Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ChartStyle {
    Scatter,
    Line,
    Bar,
    Boxplot,
    Violin,
    Histogram,
}

impl ChartStyle {
    pub fn family(self) -> StyleFamily {
        match self {
            ChartStyle::Scatter | ChartStyle::Line | ChartStyle::Bar => StyleFamily::TwoVariable,
            ChartStyle::Boxplot | ChartStyle::Violin | ChartStyle::Histogram => {
                StyleFamily::Distribution
            }
        }
    }

    /// Fail unless the style belongs to `family`.
    pub fn require(self, family: StyleFamily) -> Result<Self, Error> {
        if self.family() == family {
            Ok(self)
        } else {
            Err(Error::UnsupportedStyle {
                kind: match family {
                    StyleFamily::TwoVariable => "two-variable chart style",
                    StyleFamily::Distribution => "distribution chart style",
                },
                name: self.to_string(),
            })
        }
    }
}

impl FromStr for ChartStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scatter" => Ok(ChartStyle::Scatter),
            "line" => Ok(ChartStyle::Line),
            "bar" => Ok(ChartStyle::Bar),
            "boxplot" | "box" => Ok(ChartStyle::Boxplot),
            "violin" | "violinplot" => Ok(ChartStyle::Violin),
            "histogram" | "hist" => Ok(ChartStyle::Histogram),
            _ => Err(Error::UnsupportedStyle {
                kind: "chart style",
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ChartStyle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartStyle::Scatter => "scatter",
            ChartStyle::Line => "line",
            ChartStyle::Bar => "bar",
            ChartStyle::Boxplot => "boxplot",
            ChartStyle::Violin => "violin",
            ChartStyle::Histogram => "histogram",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Marker / LineStyle – matplotlib-style shorthands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Marker {
    Point,
    Circle,
    Square,
    Triangle,
    Cross,
    Plus,
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "." | "point" => Ok(Marker::Point),
            "o" | "circle" => Ok(Marker::Circle),
            "s" | "square" => Ok(Marker::Square),
            "^" | "triangle" => Ok(Marker::Triangle),
            "x" | "cross" => Ok(Marker::Cross),
            "+" | "plus" => Ok(Marker::Plus),
            _ => Err(Error::UnsupportedStyle {
                kind: "marker",
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Marker {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    /// Markers only.
    None,
}

impl FromStr for LineStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            "" | "none" | "None" => Ok(LineStyle::None),
            _ => Err(Error::UnsupportedStyle {
                kind: "line style",
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LineStyle {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_style_aliases() {
        assert_eq!("scatter".parse::<ChartStyle>().unwrap(), ChartStyle::Scatter);
        assert_eq!("violinplot".parse::<ChartStyle>().unwrap(), ChartStyle::Violin);
        assert_eq!("hist".parse::<ChartStyle>().unwrap(), ChartStyle::Histogram);
        assert_eq!("BoxPlot".parse::<ChartStyle>().unwrap(), ChartStyle::Boxplot);
    }

    #[test]
    fn unknown_style_is_an_explicit_error() {
        let err = "pie".parse::<ChartStyle>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedStyle { name, .. } if name == "pie"));
    }

    #[test]
    fn require_checks_family() {
        assert!(ChartStyle::Line.require(StyleFamily::TwoVariable).is_ok());
        assert!(ChartStyle::Violin.require(StyleFamily::TwoVariable).is_err());
        assert!(ChartStyle::Bar.require(StyleFamily::Distribution).is_err());
    }

    #[test]
    fn parses_matplotlib_marker_and_line_shorthands() {
        assert_eq!("o".parse::<Marker>().unwrap(), Marker::Circle);
        assert_eq!("^".parse::<Marker>().unwrap(), Marker::Triangle);
        assert!("*".parse::<Marker>().is_err());
        assert_eq!("--".parse::<LineStyle>().unwrap(), LineStyle::Dashed);
        assert_eq!(":".parse::<LineStyle>().unwrap(), LineStyle::Dotted);
        assert_eq!("".parse::<LineStyle>().unwrap(), LineStyle::None);
    }

    #[test]
    fn deserializes_from_strings() {
        let style: ChartStyle = serde_json::from_str("\"bar\"").unwrap();
        assert_eq!(style, ChartStyle::Bar);
        assert!(serde_json::from_str::<Marker>("\"?\"").is_err());
    }
}
