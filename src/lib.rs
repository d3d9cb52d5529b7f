pub mod app;
pub mod config;
pub mod error;
pub mod gradient;
pub mod models;
pub mod reader;
pub mod traits;
pub mod utils;

pub use app::GradientApp;
pub use config::{Config, Source};
pub use error::{Error, Result};
pub use gradient::{GradientMapper, ImageRecolorer, LuminancePlane};
pub use models::{Colour, ColourStop, Notation, PositionMode, StopList};
