use crate::error::Result;
use crate::models::{ColourStop, Notation, PositionMode, StopList, colour};
use crate::traits::StopSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEntry {
    pub position: f64,
    pub color: String,
}

/// Saved gradient configuration.
///
/// ```json
/// { "mode": "explicit", "notation": "hex",
///   "gradient": [{ "position": 0.0, "color": "#000000" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSettings {
    #[serde(default)]
    pub mode: PositionMode,
    #[serde(default)]
    pub notation: Notation,
    pub gradient: Vec<StopEntry>,
}

impl GradientSettings {
    pub fn from_list(list: &StopList, notation: Notation) -> Self {
        GradientSettings {
            mode: list.mode(),
            notation,
            gradient: list
                .iter()
                .map(|stop| StopEntry {
                    position: stop.position,
                    color: notation.format(stop.colour),
                })
                .collect(),
        }
    }

    /// Converts to a stop list in `mode`. Entries with unreadable colours are
    /// skipped with a warning.
    pub fn to_list(&self, mode: PositionMode) -> StopList {
        let stops = self
            .gradient
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match colour::parse(&entry.color) {
                Ok(c) => Some(ColourStop::new(entry.position, c)),
                Err(err) => {
                    tracing::warn!("Skipping gradient entry {}: {}", i, err);
                    None
                }
            })
            .collect();
        StopList::from_stops(stops, mode)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// A saved settings file used as a stop source. The requested mode wins over
/// the mode stored in the file.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsFile { path: path.into() }
    }
}

impl StopSource for SettingsFile {
    fn load(&self, mode: PositionMode) -> Result<StopList> {
        Ok(GradientSettings::load(&self.path)?.to_list(mode))
    }

    fn describe(&self) -> String {
        format!("settings file {}", self.path.display())
    }
}
