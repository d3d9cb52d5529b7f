use crate::error::Result;
use crate::models::{PositionMode, StopList};
use crate::traits::StopSource;
use std::fs;
use std::path::PathBuf;

/// A text file with one stop per line.
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StopFile { path: path.into() }
    }
}

impl StopSource for StopFile {
    fn load(&self, mode: PositionMode) -> Result<StopList> {
        let content = fs::read_to_string(&self.path)?;
        Ok(StopList::from_lines(content.lines(), mode))
    }

    fn describe(&self) -> String {
        format!("stops file {}", self.path.display())
    }

    fn lines(&self) -> Result<Option<Vec<String>>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(content.lines().map(str::to_string).collect()))
    }
}

/// Stop lines given directly, e.g. on the command line.
pub struct InlineStops {
    lines: Vec<String>,
}

impl InlineStops {
    pub fn new(lines: Vec<String>) -> Self {
        InlineStops { lines }
    }
}

impl StopSource for InlineStops {
    fn load(&self, mode: PositionMode) -> Result<StopList> {
        Ok(StopList::from_lines(&self.lines, mode))
    }

    fn describe(&self) -> String {
        format!("{} inline stops", self.lines.len())
    }

    fn lines(&self) -> Result<Option<Vec<String>>> {
        Ok(Some(self.lines.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Notation;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stop_file_loads_each_mode() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("stops.txt");
        fs::write(&path, "[0.0]#000000\n[0.4]255,0,0\n\n[1.0]#ffffff\n").unwrap();

        let source = StopFile::new(&path);
        let explicit = source.load(PositionMode::Explicit).unwrap();
        assert_eq!(
            explicit.to_lines(Notation::Hex),
            ["[0.000000]#000000", "[0.400000]#ff0000", "[1.000000]#ffffff"]
        );
        let uniform = source.load(PositionMode::Uniform).unwrap();
        assert_eq!(uniform.to_lines(Notation::Rgb), ["0,0,0", "255,0,0", "255,255,255"]);
        assert_eq!(source.lines().unwrap().map(|l| l.len()), Some(4));
    }

    #[test]
    fn test_missing_stop_file_is_io_error() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let source = StopFile::new(tmp.path().join("nope.txt"));
        assert!(matches!(source.load(PositionMode::Uniform), Err(Error::Io(_))));
    }

    #[test]
    fn test_inline_stops() {
        let source = InlineStops::new(vec!["#ff0000".into(), "bogus".into(), "0,0,255".into()]);
        let list = source.load(PositionMode::Uniform).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(source.describe(), "3 inline stops");
        assert_eq!(source.lines().unwrap().unwrap()[1], "bogus");
    }
}
