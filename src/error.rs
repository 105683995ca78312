//! Error types for each failure class of the application.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while sending a spreadsheet to the upload endpoint.
///
/// Every variant is recoverable: the roster is left unchanged and the
/// message is shown to the user.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The upload was triggered before any file was selected
    #[error("no file selected")]
    NoFileSelected,

    /// The selected file could not be read from disk
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, TLS or protocol failure
    #[error("upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("upload endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not a list of student records
    #[error("malformed upload response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while drawing or exporting a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Draw(String),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("chart buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Transitions refused by the application state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("an upload is already in progress")]
    UploadInFlight,
}

/// Top-level error returned by the coordinator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    State(#[from] StateError),
}
