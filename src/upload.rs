use crate::config::Config;
use crate::error::UploadError;
use crate::student::{self, Student};
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

/// Name of the multipart field carrying the spreadsheet
pub const FILE_FIELD: &str = "file";

/// Extensions the file picker hints at
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Holds the spreadsheet the user picked but has not uploaded yet
#[derive(Clone, Debug, Default)]
pub struct FileUpload {
    selected: Option<PathBuf>,
}

/// A selected file read into memory, ready to post
#[derive(Clone, Debug)]
pub struct PreparedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the file to upload next
    ///
    /// Files without a spreadsheet extension are still accepted; the
    /// endpoint decides what it can parse.
    pub fn select(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !has_spreadsheet_extension(&path) {
            warn!(
                "{} does not look like a spreadsheet (expected .xlsx or .xls)",
                path.display()
            );
        }
        self.selected = Some(path);
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Reads the selected file for sending
    ///
    /// # Returns
    /// * The file contents, `NoFileSelected` when nothing was picked, or the
    ///   read error
    pub async fn prepare(&self) -> Result<PreparedFile, UploadError> {
        let path = self.selected.as_ref().ok_or(UploadError::NoFileSelected)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read {
                path: path.clone(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(PreparedFile { file_name, bytes })
    }
}

fn has_spreadsheet_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// MIME type sent with the file part
fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else if lower.ends_with(".xls") {
        "application/vnd.ms-excel"
    } else {
        "application/octet-stream"
    }
}

/// HTTP client for the spreadsheet upload endpoint
#[derive(Clone, Debug)]
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
}

impl UploadClient {
    /// Builds a client from the application config
    ///
    /// No timeout is applied unless the config sets one.
    pub fn new(config: &Config) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a file as multipart form data and decodes the student list
    ///
    /// # Arguments
    /// * `file` - The prepared spreadsheet
    ///
    /// # Returns
    /// * The records from the response body, in response order
    ///
    /// # Errors
    /// * `Transport` when the request cannot be completed
    /// * `Status` for any non-2xx answer
    /// * `Decode` when the body is not a JSON list of students
    pub async fn upload(&self, file: &PreparedFile) -> Result<Vec<Student>, UploadError> {
        info!(
            "uploading {} ({} bytes) to {}",
            file.file_name,
            file.bytes.len(),
            self.endpoint
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(mime_for(&file.file_name))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.http.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Status { status, body });
        }

        let body = response.bytes().await?;
        let students = student::parse_students(&body)?;
        info!("upload returned {} students", students.len());
        Ok(students)
    }
}
