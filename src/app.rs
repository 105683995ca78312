use crate::config::Config;
use crate::error::{AppError, ChartError, UploadError};
use crate::graph::{RenderedChart, StudentGraph};
use crate::search::SearchBar;
use crate::state::{AppState, UploadOutcome, UploadTicket};
use crate::student::Student;
use crate::upload::{FileUpload, PreparedFile, UploadClient};
use std::path::{Path, PathBuf};

pub const TITLE: &str = "Dynamic Student Test Graphs";

/// Top-level coordinator
///
/// Owns the state and the child components, and routes data between them:
/// upload results go into the roster, search input goes into the filter,
/// and the filtered view comes out as one graph per student.
pub struct App {
    config: Config,
    state: AppState,
    search: SearchBar,
    file_upload: FileUpload,
    client: UploadClient,
}

/// An upload that has been started and read from disk but not yet sent
///
/// Owns everything it needs, so it can be sent from a spawned task while
/// the app keeps handling input.
#[derive(Debug)]
pub struct PendingUpload {
    ticket: UploadTicket,
    file: PreparedFile,
    client: UploadClient,
}

impl PendingUpload {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn file_name(&self) -> &str {
        &self.file.file_name
    }

    /// Performs the network call
    pub async fn send(self) -> (UploadTicket, Result<Vec<Student>, UploadError>) {
        let result = self.client.upload(&self.file).await;
        (self.ticket, result)
    }
}

/// Snapshot of what the page shows
#[derive(Debug, Clone)]
pub struct AppView {
    pub title: &'static str,
    pub selected: Option<PathBuf>,
    pub uploading: bool,
    pub error: Option<String>,
    pub query: String,
    pub graphs: Vec<StudentGraph>,
}

impl App {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = UploadClient::new(&config)?;
        Ok(Self {
            config,
            state: AppState::new(),
            search: SearchBar::new(),
            file_upload: FileUpload::new(),
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.file_upload.select(path);
    }

    /// Feeds a new search input value through to the filtered view
    pub fn search(&mut self, value: impl Into<String>) {
        let query = self.search.input(value);
        self.state.apply_query(query);
    }

    /// Starts an upload of the selected file
    ///
    /// Nothing changes when no file is selected. A file that cannot be
    /// read counts as a failed upload and is shown like one.
    ///
    /// # Returns
    /// * A `PendingUpload` to send, or the reason the upload did not start
    pub async fn start_upload(&mut self) -> Result<PendingUpload, AppError> {
        if self.file_upload.selected().is_none() {
            return Err(UploadError::NoFileSelected.into());
        }
        let ticket = self.state.begin_upload()?;

        match self.file_upload.prepare().await {
            Ok(file) => Ok(PendingUpload {
                ticket,
                file,
                client: self.client.clone(),
            }),
            Err(e) => {
                self.state.fail_upload(ticket, &e);
                Err(e.into())
            }
        }
    }

    /// Completion callback for an upload started with `start_upload`
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Vec<Student>, UploadError>,
    ) -> UploadOutcome {
        self.state.finish_upload(ticket, result)
    }

    /// Starts, sends and applies an upload in one step
    ///
    /// Upload failures are recorded in the state and reported as
    /// `UploadOutcome::Failed`, not as an error.
    pub async fn upload(&mut self) -> Result<UploadOutcome, AppError> {
        let pending = self.start_upload().await?;
        let (ticket, result) = pending.send().await;
        Ok(self.finish_upload(ticket, result))
    }

    pub fn view(&self) -> AppView {
        AppView {
            title: TITLE,
            selected: self.file_upload.selected().map(Path::to_path_buf),
            uploading: self.state.is_uploading(),
            error: self.state.last_error().map(str::to_string),
            query: self.search.query().to_string(),
            graphs: self
                .state
                .filtered()
                .iter()
                .cloned()
                .map(StudentGraph::new)
                .collect(),
        }
    }

    /// Renders every visible graph
    ///
    /// # Returns
    /// * One handle per student in the filtered view, in view order
    pub fn render_charts(&self) -> Result<Vec<RenderedChart>, ChartError> {
        self.view()
            .graphs
            .iter()
            .map(|graph| graph.render(&self.config.chart))
            .collect()
    }

    /// Writes a rendered chart to the export directory
    pub fn export(&self, chart: &RenderedChart) -> Result<PathBuf, ChartError> {
        chart.export(&self.config.export_dir)
    }
}
