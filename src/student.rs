use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One student's row from the uploaded spreadsheet
///
/// The position of a score in `tests` is its test number, earliest first.
/// Extra fields in the upload payload are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier, unique within a roster
    pub id: String,

    /// Display name
    pub name: String,

    /// Test scores in chronological order
    #[serde(default)]
    pub tests: Vec<f64>,
}

/// The full list of students held by the application
pub type Roster = Vec<Arc<Student>>;

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tests: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tests,
        }
    }
}

/// Decodes an upload response body into student records
///
/// # Arguments
/// * `body` - Raw JSON bytes returned by the upload endpoint
///
/// # Returns
/// * The records in response order, or the JSON error
pub fn parse_students(body: &[u8]) -> Result<Vec<Student>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Wraps decoded records into a shared roster
pub fn into_roster(students: Vec<Student>) -> Roster {
    students.into_iter().map(Arc::new).collect()
}
