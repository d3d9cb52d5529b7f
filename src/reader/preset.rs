use crate::error::{Error, Result};
use crate::models::stop::uniform_position;
use crate::models::{Colour, PositionMode, StopList};
use crate::traits::StopSource;
use colorgrad::{Gradient, preset};

pub const BUILTIN_PALETTES: [&str; 9] = [
    "viridis",
    "magma",
    "plasma",
    "inferno",
    "turbo",
    "cubehelix_default",
    "rainbow",
    "spectral",
    "sinebow",
];

pub fn is_builtin_palette(name: &str) -> bool {
    BUILTIN_PALETTES.contains(&name)
}

pub fn get_builtin_gradient(name: &str) -> Option<Box<dyn Gradient>> {
    Some(match name {
        "viridis" => Box::new(preset::viridis()),
        "magma" => Box::new(preset::magma()),
        "plasma" => Box::new(preset::plasma()),
        "inferno" => Box::new(preset::inferno()),
        "turbo" => Box::new(preset::turbo()),
        "cubehelix_default" => Box::new(preset::cubehelix_default()),
        "rainbow" => Box::new(preset::rainbow()),
        "spectral" => Box::new(preset::spectral()),
        "sinebow" => Box::new(preset::sinebow()),
        _ => return None,
    })
}

/// A colorgrad preset sampled into evenly spaced stops.
pub struct BuiltinPalette {
    name: String,
    samples: usize,
}

impl BuiltinPalette {
    /// Fails with `UnknownPreset` for names outside [`BUILTIN_PALETTES`].
    /// At least two samples are always taken.
    pub fn new(name: &str, samples: usize) -> Result<Self> {
        if !is_builtin_palette(name) {
            return Err(Error::UnknownPreset(name.to_string()));
        }
        Ok(BuiltinPalette {
            name: name.to_string(),
            samples: samples.max(2),
        })
    }
}

impl StopSource for BuiltinPalette {
    fn load(&self, mode: PositionMode) -> Result<StopList> {
        let grad = get_builtin_gradient(&self.name)
            .ok_or_else(|| Error::UnknownPreset(self.name.clone()))?;
        let colours = (0..self.samples).map(|i| {
            let [r, g, b, _] = grad.at(uniform_position(i, self.samples) as f32).to_rgba8();
            Colour::new(r, g, b)
        });
        Ok(StopList::from_colours(colours, mode))
    }

    fn describe(&self) -> String {
        format!("palette '{}' ({} stops)", self.name, self.samples)
    }
}
