use crate::error::{Error, Result};
use crate::models::{Colour, StopList};

/// Colour written for luminance values no segment covers.
pub const UNMAPPED: Colour = Colour::BLACK;

/// Whether `t` falls inside the segment `[start, end)`.
///
/// Segments are half-open, so a value equal to the final stop's position is
/// left unmapped. This is the single place that boundary rule lives.
pub fn segment_contains(t: f64, start: f64, end: f64) -> bool {
    start <= t && t < end
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f64,
    end: f64,
    from: Colour,
    to: Colour,
}

impl Segment {
    fn colour_at(&self, t: f64) -> Colour {
        let ratio = (t - self.start) / (self.end - self.start);
        Colour::new(
            lerp_channel(self.from.red, self.to.red, ratio),
            lerp_channel(self.from.green, self.to.green, ratio),
            lerp_channel(self.from.blue, self.to.blue, ratio),
        )
    }
}

// `as u8` saturates, which clamps overshoot from out-of-order stops.
fn lerp_channel(from: u8, to: u8, ratio: f64) -> u8 {
    let from = from as f64;
    (from + (to as f64 - from) * ratio).floor() as u8
}

/// Maps luminance in [0, 1] to a colour through a stop list.
///
/// Segment `i` runs from stop `i` to stop `i + 1` in list order. Zero-width
/// segments are dropped at construction and reported by
/// [`GradientMapper::degenerate_segments`]. When segments overlap (out-of-order
/// explicit positions) the later segment wins.
#[derive(Debug)]
pub struct GradientMapper {
    segments: Vec<Segment>,
    degenerate: Vec<Error>,
}

impl GradientMapper {
    /// Builds a mapper. With `invert`, the colours are read in reverse order
    /// while each position stays where it is; the list itself is untouched.
    pub fn new(stops: &StopList, invert: bool) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::EmptyGradient(stops.len()));
        }

        let positions = stops.iter().map(|s| s.position);
        let anchors: Vec<(f64, Colour)> = if invert {
            positions.zip(stops.iter().rev().map(|s| s.colour)).collect()
        } else {
            positions.zip(stops.iter().map(|s| s.colour)).collect()
        };

        let mut segments = Vec::with_capacity(anchors.len() - 1);
        let mut degenerate = Vec::new();
        for (index, pair) in anchors.windows(2).enumerate() {
            let (start, from) = pair[0];
            let (end, to) = pair[1];
            if start == end {
                tracing::debug!("Skipping zero-width segment {} at {}", index, start);
                degenerate.push(Error::DegenerateSegment {
                    index,
                    position: start,
                });
                continue;
            }
            segments.push(Segment {
                start,
                end,
                from,
                to,
            });
        }

        Ok(GradientMapper {
            segments,
            degenerate,
        })
    }

    /// Colour for `t`, or `None` when no segment covers it.
    pub fn map(&self, t: f64) -> Option<Colour> {
        self.segments
            .iter()
            .rev()
            .find(|s| segment_contains(t, s.start, s.end))
            .map(|s| s.colour_at(t))
    }

    /// Colour for `t`, with uncovered values written as [`UNMAPPED`].
    pub fn colour_at(&self, t: f64) -> Colour {
        self.map(t).unwrap_or(UNMAPPED)
    }

    /// Zero-width segments that were skipped, as `DegenerateSegment` errors.
    pub fn degenerate_segments(&self) -> &[Error] {
        &self.degenerate
    }
}
