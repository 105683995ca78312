use crate::graph::ChartOptions;
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint the spreadsheet is posted to when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/upload";

/// Directory exported charts are written to when nothing else is configured
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Runtime configuration for the application
///
/// Built from command line arguments by the binary; tests construct it
/// directly.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL receiving the multipart upload
    pub endpoint: String,

    /// Where exported PNG files are written
    pub export_dir: PathBuf,

    /// Size of rendered charts
    pub chart: ChartOptions,

    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            chart: ChartOptions::default(),
            timeout: None,
        }
    }
}
