pub mod colour;
pub mod stop;

pub use colour::{Colour, Notation};
pub use stop::{ColourStop, PositionMode, StopList};
