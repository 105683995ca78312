use crate::error::{StateError, UploadError};
use crate::filter;
use crate::student::{self, Roster, Student};
use log::{error, info, warn};

/// Token for one started upload
///
/// Only the ticket from the most recent `begin_upload` can change the
/// roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `finish_upload` did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The roster was replaced with this many students
    Applied { students: usize },

    /// The upload failed; the roster was kept and the error recorded
    Failed,

    /// The response belonged to an older request and was dropped
    Stale,
}

/// Roster, filtered view and upload bookkeeping
///
/// All mutation goes through the transition methods. The filtered view is
/// always derived from the whole roster and shares its records.
#[derive(Debug, Default)]
pub struct AppState {
    roster: Roster,
    filtered: Roster,
    generation: u64,
    in_flight: bool,
    last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn filtered(&self) -> &Roster {
        &self.filtered
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts an upload and hands out its ticket
    ///
    /// Refused while another upload is outstanding. Clears the previous
    /// error so the view reflects the new attempt.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, StateError> {
        if self.in_flight {
            return Err(StateError::UploadInFlight);
        }
        self.generation += 1;
        self.in_flight = true;
        self.last_error = None;
        Ok(UploadTicket {
            generation: self.generation,
        })
    }

    /// Applies the result of an upload
    ///
    /// # Arguments
    /// * `ticket` - The ticket from `begin_upload`
    /// * `result` - Decoded students or the upload failure
    ///
    /// # Returns
    /// * `Stale` for a ticket that is not the latest; nothing changes
    /// * `Applied` after replacing the roster; the filtered view becomes the
    ///   whole roster
    /// * `Failed` after recording the error; the roster is untouched
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Vec<Student>, UploadError>,
    ) -> UploadOutcome {
        if self.is_stale(ticket) {
            return UploadOutcome::Stale;
        }

        match result {
            Ok(students) => {
                let count = students.len();
                self.in_flight = false;
                self.roster = student::into_roster(students);
                self.filtered = self.roster.clone();
                info!("roster replaced with {} students", count);
                UploadOutcome::Applied { students: count }
            }
            Err(e) => self.fail_upload(ticket, &e),
        }
    }

    /// Records a failed upload without touching the roster
    pub fn fail_upload(&mut self, ticket: UploadTicket, e: &UploadError) -> UploadOutcome {
        if self.is_stale(ticket) {
            return UploadOutcome::Stale;
        }
        self.in_flight = false;
        error!("Error uploading file: {}", e);
        self.last_error = Some(e.to_string());
        UploadOutcome::Failed
    }

    fn is_stale(&self, ticket: UploadTicket) -> bool {
        if ticket.generation == self.generation {
            return false;
        }
        warn!(
            "dropping upload response {} (current request is {})",
            ticket.generation, self.generation
        );
        true
    }

    /// Recomputes the filtered view for a query
    pub fn apply_query(&mut self, query: &str) {
        self.filtered = filter::filter_roster(&self.roster, query);
    }
}
