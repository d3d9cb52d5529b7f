use crate::config::{Command, Config, GradientArgs, RenderArgs, Source, StopEdits, StopsArgs};
use crate::error::Error;
use crate::gradient::ImageRecolorer;
use crate::models::colour::convert_notation;
use crate::models::{Notation, StopList};
use crate::reader::{BuiltinPalette, GradientSettings, InlineStops, SettingsFile, StopFile};
use crate::traits::StopSource;
use crate::utils::path::{is_rendered_output, is_supported_image, output_path_for};
use crate::utils::status::{print_palette_summary, print_stop_summary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct GradientApp {
    config: Config,
    source: Option<Box<dyn StopSource>>,
}

pub fn open_source(source: &Source) -> crate::Result<Box<dyn StopSource>> {
    let source: Box<dyn StopSource> = match source {
        Source::File(path) => Box::new(StopFile::new(path)),
        Source::Inline(lines) => Box::new(InlineStops::new(lines.clone())),
        Source::Preset { name, samples } => Box::new(BuiltinPalette::new(name, *samples)?),
        Source::Settings(path) => Box::new(SettingsFile::new(path)),
    };
    Ok(source)
}

/// Deletions use indices of the list as loaded, so they run highest first.
pub fn apply_edits(list: &mut StopList, edits: &StopEdits) -> crate::Result<()> {
    for &(index, position) in &edits.set_positions {
        list.set_position(index, position)?;
    }

    let mut delete = edits.delete.clone();
    delete.sort_unstable();
    delete.dedup();
    for &index in delete.iter().rev() {
        list.delete_at(index)?;
    }

    for _ in 0..edits.append {
        list.append_default();
    }

    if edits.reverse {
        list.reverse();
    }

    if let Some(mode) = edits.mode {
        list.set_mode(mode);
    }

    Ok(())
}

/// Rewrites stop lines in `notation`. Position prefixes are kept, and lines
/// that do not parse pass through unchanged. Blank lines are dropped.
pub fn convert_lines<S: AsRef<str>>(lines: &[S], notation: Notation) -> Vec<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.trim().is_empty())
        .map(|line| convert_notation(line, notation))
        .collect()
}

/// Supported images under `root`, sorted, skipping our own outputs.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported_image(p) && !is_rendered_output(p))
        .collect();
    images.sort();
    images
}

pub fn render_file(recolorer: &ImageRecolorer, input: &Path, output: &Path) -> crate::Result<()> {
    let image = recolorer.recolor_path(input)?;
    image.save(output).map_err(|source| Error::Encode {
        path: output.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub rendered: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Renders every image under `root` next to its original.
pub fn render_directory(recolorer: &ImageRecolorer, root: &Path) -> anyhow::Result<BatchReport> {
    let images = collect_images(root);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} {percent}%")?
            .progress_chars("█▇▆▅▄▃▂▁  "),
    );

    let mut report = BatchReport::default();
    for input in images {
        let name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("<unknown>")
            .to_string();
        pb.set_message(format!("Rendering {:<30}", name));

        let output = output_path_for(&input);
        match render_file(recolorer, &input, &output) {
            Ok(()) => report.rendered.push(output),
            Err(err) => {
                pb.println(format!("❌ Failed to render {:?}: {}", input, err));
                report.failed.push(input);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("✅ All images rendered!");

    Ok(report)
}

impl GradientApp {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let source = match &config.command {
            Command::Render(args) => Some(open_source(&args.gradient.source())?),
            Command::Stops(args) => Some(open_source(&args.gradient.source())?),
            Command::Presets => None,
        };
        Ok(Self { config, source })
    }

    pub fn run(self) -> anyhow::Result<()> {
        match &self.config.command {
            Command::Render(args) => self.render(args),
            Command::Stops(args) => self.edit_stops(args),
            Command::Presets => {
                print_palette_summary();
                Ok(())
            }
        }
    }

    fn stop_source(&self) -> anyhow::Result<&dyn StopSource> {
        self.source
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No stop source configured"))
    }

    fn load_stops(&self, args: &GradientArgs) -> anyhow::Result<StopList> {
        let source = self.stop_source()?;
        tracing::info!("Loading {}", source.describe());
        Ok(source.load(args.mode())?)
    }

    fn render(&self, args: &RenderArgs) -> anyhow::Result<()> {
        let stops = self.load_stops(&args.gradient)?;
        if args.gradient.summary {
            print_stop_summary(&stops, Notation::Hex, args.invert);
        }
        let recolorer = ImageRecolorer::new(&stops, args.invert)?;

        if args.input.is_dir() {
            if args.output.is_some() {
                anyhow::bail!("--output only applies to a single input image");
            }
            let report = render_directory(&recolorer, &args.input)?;
            println!("📦 Rendered: {}", report.rendered.len());
            if !report.failed.is_empty() {
                println!("⚠️ Failed: {}", report.failed.len());
            }
            if report.rendered.is_empty() && report.failed.is_empty() {
                println!(
                    "⚠️ No images found under {:?}. Supported: png, jpg, jpeg",
                    args.input
                );
            }
            return Ok(());
        }

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| output_path_for(&args.input));
        render_file(&recolorer, &args.input, &output)?;
        println!("✅ Saved to {}", output.display());
        Ok(())
    }

    fn edit_stops(&self, args: &StopsArgs) -> anyhow::Result<()> {
        let mut list = self.load_stops(&args.gradient)?;
        apply_edits(&mut list, &args.edits)?;

        // Without edits, text sources are only re-notated line by line.
        let raw = if args.edits.is_empty() {
            self.stop_source()?.lines()?
        } else {
            None
        };
        let lines = match raw {
            Some(raw) => convert_lines(&raw, args.notation),
            None => list.to_lines(args.notation),
        };
        for line in lines {
            println!("{}", line);
        }
        if args.gradient.summary {
            print_stop_summary(&list, args.notation, false);
        }
        if let Some(path) = &args.save_settings {
            GradientSettings::from_list(&list, args.notation).save(path)?;
            println!("💾 Saved gradient settings to {}", path.display());
        }
        Ok(())
    }
}
