use crate::models::{Notation, PositionMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Where the gradient stops come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    File(PathBuf),
    Inline(Vec<String>),
    Preset { name: String, samples: usize },
    Settings(PathBuf),
}

#[derive(Debug, Parser)]
#[command(name = "gradientmap")]
#[command(version, about = "Recolour images through a luminance gradient", long_about = None)]
pub struct Config {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recolour an image, or every png/jpg under a directory
    Render(RenderArgs),
    /// Edit a stop list and print the resulting lines
    Stops(StopsArgs),
    /// List the built-in palettes
    Presets,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Text file with one colour stop per line
    #[arg(long)]
    pub stops: Option<PathBuf>,

    /// A colour stop such as `#ff8000`, `255,128,0` or `[0.5]#ff8000`; repeat per stop
    #[arg(short = 'c', long = "colour")]
    pub colours: Vec<String>,

    /// Built-in palette name (see `gradientmap presets`)
    #[arg(long)]
    pub preset: Option<String>,

    /// JSON gradient settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct GradientArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Read `[pos]` prefixes as explicit stop positions
    #[arg(long)]
    pub explicit: bool,

    /// Number of stops sampled from a built-in palette
    #[arg(long, default_value_t = 5)]
    pub samples: usize,

    /// Print a table of the stops and a preview of the ramp
    #[arg(long)]
    pub summary: bool,
}

impl GradientArgs {
    pub fn mode(&self) -> PositionMode {
        if self.explicit {
            PositionMode::Explicit
        } else {
            PositionMode::Uniform
        }
    }

    pub fn source(&self) -> Source {
        let args = &self.source;
        if let Some(path) = &args.stops {
            Source::File(path.clone())
        } else if let Some(name) = &args.preset {
            Source::Preset {
                name: name.clone(),
                samples: self.samples,
            }
        } else if let Some(path) = &args.settings {
            Source::Settings(path.clone())
        } else {
            Source::Inline(args.colours.clone())
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Image file or directory of images
    pub input: PathBuf,

    #[command(flatten)]
    pub gradient: GradientArgs,

    /// Read the stop colours in reverse order
    #[arg(long)]
    pub invert: bool,

    /// Output file (single image only); defaults to `<stem>_gradient<suffix>`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Edits applied to a loaded stop list, in field order.
#[derive(Debug, Clone, Default, Args)]
pub struct StopEdits {
    /// Move an explicit stop, as INDEX=POSITION
    #[arg(long = "set-position", value_parser = parse_index_value)]
    pub set_positions: Vec<(usize, f64)>,

    /// Delete the stop at INDEX (indices refer to the loaded list)
    #[arg(long = "delete")]
    pub delete: Vec<usize>,

    /// Append this many black stops
    #[arg(long, default_value_t = 0)]
    pub append: usize,

    /// Reverse the stop order
    #[arg(long)]
    pub reverse: bool,

    /// Switch the positioning mode
    #[arg(long, value_enum)]
    pub mode: Option<PositionMode>,
}

impl StopEdits {
    /// True when nothing would change the stops themselves.
    pub fn is_empty(&self) -> bool {
        self.set_positions.is_empty()
            && self.delete.is_empty()
            && self.append == 0
            && !self.reverse
            && self.mode.is_none()
    }
}

#[derive(Debug, Clone, Args)]
pub struct StopsArgs {
    #[command(flatten)]
    pub gradient: GradientArgs,

    #[command(flatten)]
    pub edits: StopEdits,

    /// Notation used for the printed lines
    #[arg(long, value_enum, default_value_t = Notation::Hex)]
    pub notation: Notation,

    /// Write the resulting gradient as JSON settings
    #[arg(long)]
    pub save_settings: Option<PathBuf>,
}

fn parse_index_value(s: &str) -> Result<(usize, f64), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=POSITION, got '{}'", s))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid index '{}': {}", index, e))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid position '{}': {}", value, e))?;
    Ok((index, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command_line() {
        let config = Config::parse_from([
            "gradientmap", "render", "cat.png", "-c", "#000000", "-c", "[0.5]255,0,0",
            "--explicit", "--invert", "-o", "out.png",
        ]);
        let Command::Render(args) = config.command else {
            panic!("expected render");
        };
        assert_eq!(args.input, PathBuf::from("cat.png"));
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert!(args.invert);
        assert_eq!(args.gradient.mode(), PositionMode::Explicit);
        assert_eq!(
            args.gradient.source(),
            Source::Inline(vec!["#000000".into(), "[0.5]255,0,0".into()])
        );
    }

    #[test]
    fn test_stops_command_line() {
        let config = Config::parse_from([
            "gradientmap", "-v", "stops", "--preset", "viridis", "--samples", "3",
            "--set-position", "1=0.25", "--delete", "0", "--append", "2", "--reverse",
            "--mode", "explicit", "--notation", "rgb",
        ]);
        assert!(config.verbose);
        let Command::Stops(args) = config.command else {
            panic!("expected stops");
        };
        assert_eq!(
            args.gradient.source(),
            Source::Preset {
                name: "viridis".into(),
                samples: 3
            }
        );
        assert_eq!(args.edits.set_positions, vec![(1, 0.25)]);
        assert_eq!(args.edits.delete, vec![0]);
        assert_eq!(args.edits.append, 2);
        assert!(args.edits.reverse);
        assert_eq!(args.edits.mode, Some(PositionMode::Explicit));
        assert_eq!(args.notation, Notation::Rgb);
        assert!(!args.edits.is_empty());
        assert!(StopEdits::default().is_empty());
    }

    #[test]
    fn test_exactly_one_source_is_required() {
        assert!(Config::try_parse_from(["gradientmap", "render", "cat.png"]).is_err());
        assert!(
            Config::try_parse_from([
                "gradientmap", "render", "cat.png", "--preset", "magma", "--stops", "s.txt",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_parse_index_value() {
        assert_eq!(parse_index_value("2=0.5"), Ok((2, 0.5)));
        assert!(parse_index_value("2").is_err());
        assert!(parse_index_value("x=0.5").is_err());
    }
}
