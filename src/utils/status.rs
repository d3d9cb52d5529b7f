use crate::{
    gradient::GradientMapper,
    models::{Colour, Notation, StopList},
    reader::preset::{BUILTIN_PALETTES, get_builtin_gradient},
};
use colorgrad::Gradient;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

const RAMP_WIDTH: usize = 40;

fn swatch(colour: Colour) -> String {
    format!(
        "\x1b[38;2;{};{};{}m█\x1b[0m",
        colour.red, colour.green, colour.blue
    )
}

/// True-colour bar of the ramp as the mapper sees it, sampled left to right.
pub fn ramp_bar(mapper: &GradientMapper, width: usize) -> String {
    (0..width)
        .map(|i| swatch(mapper.colour_at(i as f64 / width as f64)))
        .collect()
}

/// Problems worth telling the user about before rendering.
pub fn stop_warnings(list: &StopList) -> Vec<String> {
    let mut warnings = Vec::new();

    if list.len() < 2 {
        warnings.push(format!(
            "  ⚠️ Gradient has {} stop(s), at least 2 are needed to render",
            list.len()
        ));
        return warnings;
    }

    for (i, pair) in list.stops().windows(2).enumerate() {
        if pair[1].position < pair[0].position {
            warnings.push(format!(
                "  ⚠️ Stop {} at {:.3} comes before stop {} at {:.3}, the ramp will be discontinuous",
                i + 1,
                pair[1].position,
                i,
                pair[0].position
            ));
        }
    }

    let (min_p, max_p) = list
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.position), hi.max(s.position))
        });
    if min_p > 0.0 || max_p < 1.0 {
        warnings.push(format!(
            "  ⚠️ Colour stops [{:.2}…{:.2}] do NOT cover luminance range [0.00…1.00], uncovered pixels render black",
            min_p, max_p
        ));
    }

    if let Ok(mapper) = GradientMapper::new(list, false) {
        for err in mapper.degenerate_segments() {
            warnings.push(format!("  ⚠️ {}", err));
        }
    }

    warnings
}

pub fn print_stop_summary(list: &StopList, notation: Notation, invert: bool) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("#")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Position")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new(format!("Colour ({})", notation))
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("").add_attribute(Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    for (i, stop) in list.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i).set_alignment(CellAlignment::Center),
            Cell::new(format!("{:.6}", stop.position)).set_alignment(CellAlignment::Center),
            Cell::new(notation.format(stop.colour)),
            Cell::new(swatch(stop.colour).repeat(3)),
        ]);
    }

    println!("\nGradient ({:?}, {} stops):\n{}", list.mode(), list.len(), table);

    if let Ok(mapper) = GradientMapper::new(list, invert) {
        let label = if invert { "Ramp (inverted)" } else { "Ramp" };
        println!("{}: {}", label, ramp_bar(&mapper, RAMP_WIDTH));
    }

    let warnings = stop_warnings(list);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in warnings {
            println!("{}", warning);
        }
    }

    // Segments are half-open, so the last stop's own position is never covered.
    if let Some(last) = list.iter().map(|s| s.position).reduce(f64::max) {
        if last <= 1.0 && list.len() >= 2 {
            println!("\nTips:");
            println!(
                "  Luminance of exactly {:.2} falls past the last segment and renders black",
                last
            );
        }
    }

    println!();
}

pub fn print_palette_summary() {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Palette")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Colourbar").add_attribute(Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    for name in BUILTIN_PALETTES {
        let Some(grad) = get_builtin_gradient(name) else {
            continue;
        };
        let n = 20;
        let bar: String = (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                let [r, g, b, _] = grad.at(t).to_rgba8();
                swatch(Colour::new(r, g, b))
            })
            .collect();
        table.add_row(vec![Cell::new(name), Cell::new(bar)]);
    }

    println!("\nBuilt-in palettes:\n{}\n", table);
}
