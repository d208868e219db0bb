use std::path::PathBuf;

/// Source table read when no path is given.
pub const DEFAULT_SOURCE: &str = "clinic-texts.csv";
/// JSON store rewritten when no path is given.
pub const DEFAULT_DESTINATION: &str = "clinic-texts.json";

/// Where to read from and write to. Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Start from an empty document when `destination` does not exist yet.
    pub create_missing: bool,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            create_missing: false,
        }
    }

    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, DEFAULT_DESTINATION)
    }
}
