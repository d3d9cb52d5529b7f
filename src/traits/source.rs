use crate::error::Result;
use crate::models::{PositionMode, StopList};

/// Somewhere a gradient definition can be loaded from.
pub trait StopSource: Send + Sync {
    fn load(&self, mode: PositionMode) -> Result<StopList>;
    fn describe(&self) -> String;

    /// The stop lines as authored, for sources that are plain text.
    fn lines(&self) -> Result<Option<Vec<String>>> {
        Ok(None)
    }
}
