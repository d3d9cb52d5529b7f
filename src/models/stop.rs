use super::colour::{self, Colour, Notation};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourStop {
    pub position: f64,
    pub colour: Colour,
}

impl ColourStop {
    pub fn new(position: f64, colour: Colour) -> Self {
        ColourStop { position, colour }
    }
}

/// How stop positions are determined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// Evenly spaced by list order.
    #[default]
    Uniform,
    /// Given per stop with a `[pos]` prefix.
    Explicit,
}

/// Evenly spaced position of stop `index` in a list of `count` stops.
pub fn uniform_position(index: usize, count: usize) -> f64 {
    if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    }
}

/// An ordered gradient definition.
///
/// Stops are kept in authored order. Explicit positions are not sorted or
/// checked for monotonicity; the mapper consumes them as written.
#[derive(Debug, Clone, Default)]
pub struct StopList {
    stops: Vec<ColourStop>,
    mode: PositionMode,
    /// Explicit positions as they stood before the last `reverse`. `1 - p` is
    /// not injective over floats, so the next `reverse` restores these instead
    /// of mirroring again. Any other position edit clears it.
    unmirrored: Option<Vec<f64>>,
}

impl PartialEq for StopList {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.stops == other.stops
    }
}

impl StopList {
    pub fn new(mode: PositionMode) -> Self {
        StopList {
            stops: Vec::new(),
            mode,
            unmirrored: None,
        }
    }

    /// Builds a list from colours alone, evenly spaced.
    pub fn from_colours<I>(colours: I, mode: PositionMode) -> Self
    where
        I: IntoIterator<Item = Colour>,
    {
        let stops = colours
            .into_iter()
            .map(|colour| ColourStop::new(0.0, colour))
            .collect();
        let mut list = StopList {
            stops,
            mode,
            unmirrored: None,
        };
        list.respace();
        list
    }

    /// Builds a list from positioned stops. In uniform mode the given
    /// positions are discarded.
    pub fn from_stops(stops: Vec<ColourStop>, mode: PositionMode) -> Self {
        let mut list = StopList {
            stops,
            mode,
            unmirrored: None,
        };
        if mode == PositionMode::Uniform {
            list.respace();
        }
        list
    }

    /// Parses one stop per line, skipping lines that fail to parse.
    pub fn from_lines<I, S>(lines: I, mode: PositionMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (list, rejected) = Self::parse_lines(lines, mode);
        for (line, err) in &rejected {
            tracing::warn!("Skipping stop on line {}: {}", line, err);
        }
        list
    }

    /// Parses one stop per line and reports every rejected line with its
    /// 1-based line number. Blank lines are ignored.
    ///
    /// In explicit mode every line must start with `[pos]`; a line without
    /// one is rejected. In uniform mode a prefix is tolerated and discarded.
    pub fn parse_lines<I, S>(lines: I, mode: PositionMode) -> (Self, Vec<(usize, Error)>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stops = Vec::new();
        let mut rejected = Vec::new();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line, mode) {
                Ok(stop) => stops.push(stop),
                Err(err) => rejected.push((i + 1, err)),
            }
        }

        (Self::from_stops(stops, mode), rejected)
    }

    /// Renders the list back to stop lines. Positions are written with six
    /// decimals, and only in explicit mode, so `from_lines(to_lines(..))` is
    /// lossy for positions with more precision than that.
    pub fn to_lines(&self, notation: Notation) -> Vec<String> {
        self.stops
            .iter()
            .map(|stop| match self.mode {
                PositionMode::Uniform => notation.format(stop.colour),
                PositionMode::Explicit => {
                    // Six decimals: finer positions are rounded, not round-tripped.
                    format!("[{:.6}]{}", stop.position, notation.format(stop.colour))
                }
            })
            .collect()
    }

    pub fn mode(&self) -> PositionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stops(&self) -> &[ColourStop] {
        &self.stops
    }

    pub fn get(&self, index: usize) -> Option<&ColourStop> {
        self.stops.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColourStop> {
        self.stops.iter()
    }

    /// Appends a stop at the far end of the ramp. Explicit lists place it at
    /// 1.0 (or 0.0 when the list was empty); uniform lists respace.
    pub fn push(&mut self, colour: Colour) {
        let position = match self.mode {
            PositionMode::Explicit if !self.stops.is_empty() => 1.0,
            _ => 0.0,
        };
        self.stops.push(ColourStop::new(position, colour));
        self.unmirrored = None;
        if self.mode == PositionMode::Uniform {
            self.respace();
        }
    }

    /// Appends the zero colour, the default for a freshly added stop.
    pub fn append_default(&mut self) {
        self.push(Colour::BLACK);
    }

    pub fn delete_at(&mut self, index: usize) -> Result<ColourStop> {
        if index >= self.stops.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.stops.len(),
            });
        }
        let removed = self.stops.remove(index);
        self.unmirrored = None;
        if self.mode == PositionMode::Uniform {
            self.respace();
        }
        Ok(removed)
    }

    /// Reverses stop order. Explicit positions are mirrored to `1 - p` so the
    /// ramp travels the other way along the luminance axis; reversing again
    /// gives back the exact positions from before.
    pub fn reverse(&mut self) {
        self.stops.reverse();
        match self.mode {
            PositionMode::Uniform => {
                self.unmirrored = None;
                self.respace();
            }
            PositionMode::Explicit => {
                // In list order, before the stops were reversed.
                let before: Vec<f64> = self.stops.iter().rev().map(|s| s.position).collect();
                match self.unmirrored.take() {
                    Some(restored) if restored.len() == self.stops.len() => {
                        for (stop, position) in self.stops.iter_mut().zip(restored) {
                            stop.position = position;
                        }
                    }
                    _ => {
                        for stop in &mut self.stops {
                            stop.position = 1.0 - stop.position;
                        }
                    }
                }
                self.unmirrored = Some(before);
            }
        }
    }

    /// Switches positioning mode. Going explicit keeps the current evenly
    /// spaced positions as explicit values; going uniform drops them.
    pub fn set_mode(&mut self, mode: PositionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.unmirrored = None;
        if mode == PositionMode::Uniform {
            self.respace();
        }
    }

    /// Moves one explicit stop. Only values in [0, 1] are accepted.
    pub fn set_position(&mut self, index: usize, position: f64) -> Result<()> {
        let len = self.stops.len();
        let stop = self
            .stops
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        if self.mode == PositionMode::Uniform {
            return Err(Error::InvalidPosition {
                index,
                position,
                reason: "positions are implied by order in uniform mode",
            });
        }
        if !(0.0..=1.0).contains(&position) {
            return Err(Error::InvalidPosition {
                index,
                position,
                reason: "must be within 0..=1",
            });
        }
        stop.position = position;
        self.unmirrored = None;
        Ok(())
    }

    pub fn set_colour(&mut self, index: usize, colour: Colour) -> Result<()> {
        let len = self.stops.len();
        let stop = self
            .stops
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        stop.colour = colour;
        Ok(())
    }

    fn respace(&mut self) {
        let count = self.stops.len();
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.position = uniform_position(i, count);
        }
    }
}

fn parse_line(line: &str, mode: PositionMode) -> Result<ColourStop> {
    let (prefix, rest) = colour::split_position_prefix(line)?;
    let position = match (mode, prefix) {
        (PositionMode::Explicit, Some(prefix)) => colour::parse_position(prefix)?,
        (PositionMode::Explicit, None) => {
            return Err(Error::format(line, "explicit stops must start with [position]"));
        }
        (PositionMode::Uniform, _) => 0.0,
    };
    Ok(ColourStop::new(position, colour::parse(rest)?))
}
