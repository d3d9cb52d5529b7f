pub mod lines;
pub mod preset;
pub mod settings;

pub use lines::{InlineStops, StopFile};
pub use preset::BuiltinPalette;
pub use settings::{GradientSettings, SettingsFile};
