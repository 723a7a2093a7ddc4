mod animation;
mod app;
mod chart;
mod color;
mod data;
mod error;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;

use app::GifJob;
use chart::{ChartStyle, LineStyle, Marker};
use data::loader::LoadOptions;
use settings::StyleSettings;

/// Animate a table as a GIF: one chart frame per distinct value of a
/// grouping column.
#[derive(Parser, Debug)]
#[command(name = "csv2gif", version)]
struct Cli {
    /// Input table (.csv, .tsv, .txt, .json, .parquet).
    #[arg(short = 'f', long)]
    filepath: PathBuf,

    /// X column (two-variable styles; default series for distributions).
    #[arg(short = 'x', long)]
    xlabel: Option<String>,

    /// Y column (two-variable styles).
    #[arg(short = 'y', long)]
    ylabel: Option<String>,

    /// Grouping column: one frame per distinct value.
    #[arg(short = 'z', long)]
    zlabel: String,

    /// Total animation duration in seconds [default: 10].
    #[arg(short = 'd', long)]
    duration: Option<f64>,

    /// Frame directory; the GIF is written next to it as <DIR>.gif.
    #[arg(short = 'o', long, default_value = "output")]
    output: PathBuf,

    /// scatter, line, bar, boxplot, violin or histogram [default: scatter].
    #[arg(short = 's', long)]
    style: Option<ChartStyle>,

    /// Value columns for boxplot/violin/histogram.
    #[arg(long, num_args = 1..)]
    series: Vec<String>,

    /// Colour name, matplotlib letter or #rrggbb.
    #[arg(long)]
    color: Option<String>,

    /// Marker: . o s ^ x + [default: o].
    #[arg(long)]
    marker: Option<Marker>,

    /// Line style: - -- : none [default: -].
    #[arg(long, allow_hyphen_values = true)]
    linestyle: Option<LineStyle>,

    /// Histogram bin count [default: 10].
    #[arg(long)]
    bins: Option<usize>,

    /// Hide the median bar on violins.
    #[arg(long)]
    no_medians: bool,

    /// Keep earlier slices on later frames.
    #[arg(long)]
    hold: bool,

    /// Frame width in pixels [default: 640].
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels [default: 480].
    #[arg(long)]
    height: Option<u32>,

    /// Field delimiter for delimited text, overriding the extension default.
    #[arg(long)]
    delimiter: Option<char>,

    /// JSON file with style settings; explicit flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Config file (or defaults) with explicit flags applied on top.
    fn settings(&self) -> Result<StyleSettings> {
        let mut s = match &self.config {
            Some(path) => StyleSettings::from_json_file(path)?,
            None => StyleSettings::default(),
        };
        if let Some(style) = self.style {
            s.style = style;
        }
        if let Some(color) = &self.color {
            s.color = Some(color.clone());
        }
        if let Some(marker) = self.marker {
            s.marker = marker;
        }
        if let Some(linestyle) = self.linestyle {
            s.linestyle = linestyle;
        }
        if let Some(bins) = self.bins {
            s.bins = bins;
        }
        if self.no_medians {
            s.medians = false;
        }
        if self.hold {
            s.hold = true;
        }
        if let Some(width) = self.width {
            s.width = width;
        }
        if let Some(height) = self.height {
            s.height = height;
        }
        if let Some(duration) = self.duration {
            s.duration = duration;
        }
        Ok(s)
    }

    fn load_options(&self) -> Result<LoadOptions> {
        let delimiter = match self.delimiter {
            None => None,
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => bail!("delimiter must be a single ASCII character, got '{c}'"),
        };
        Ok(LoadOptions { delimiter })
    }

    fn into_job(self) -> Result<GifJob> {
        Ok(GifJob {
            settings: self.settings()?,
            load: self.load_options()?,
            input: self.filepath,
            x: self.xlabel,
            y: self.ylabel,
            group: self.zlabel,
            series: self.series,
            output: self.output,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let job = Cli::parse().into_job()?;
    let gif = app::run(&job)?;
    println!("{}", gif.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("csv2gif").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn short_flags_and_defaults() {
        let cli = parse(&["-f", "data.csv", "-x", "a", "-y", "b", "-z", "month"]);
        assert_eq!(cli.output, PathBuf::from("output"));
        let job = cli.into_job().unwrap();
        assert_eq!(job.group, "month");
        assert_eq!(job.settings, StyleSettings::default());
        assert!(job.load.delimiter.is_none());
    }

    #[test]
    fn style_flags_are_parsed() {
        let cli = parse(&[
            "-f", "d.tsv", "-z", "g", "-s", "violin", "--series", "a", "b",
            "--linestyle=--", "--marker", "^", "--no-medians", "--hold",
            "-d", "4.5", "--delimiter", ";",
        ]);
        let job = cli.into_job().unwrap();
        assert_eq!(job.series, ["a", "b"]);
        assert_eq!(job.settings.style, ChartStyle::Violin);
        assert_eq!(job.settings.linestyle, LineStyle::Dashed);
        assert_eq!(job.settings.marker, Marker::Triangle);
        assert!(!job.settings.medians);
        assert!(job.settings.hold);
        assert_eq!(job.settings.duration, 4.5);
        assert_eq!(job.load.delimiter, Some(b';'));
    }

    #[test]
    fn unknown_style_is_rejected_by_the_parser() {
        let args = ["csv2gif", "-f", "d.csv", "-z", "g", "-s", "pie"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"style": "bar", "bins": 7, "duration": 2.0}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = parse(&["-f", "d.csv", "-z", "g", "--config", &path, "--bins", "12"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.style, ChartStyle::Bar);
        assert_eq!(settings.bins, 12);
        assert_eq!(settings.duration, 2.0);
    }
}
