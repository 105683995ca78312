/*!
# Score Graphs

Upload a spreadsheet of student test scores, get one line chart per student,
filter the charts by name or ID, and export any chart as a PNG.

## Overview

Parsing the spreadsheet is not done here. The file is posted to an upload
endpoint, which answers with the students as JSON. Everything after that
happens in memory: the roster is held by the coordinator, filtered on every
search keystroke, and drawn with `plotters`.

## Architecture

### Components
- **SearchBar** (`search`) - Owns the query text and reports each change
- **FileUpload** (`upload`) - Owns the selected file and posts it as
  `multipart/form-data` under the field `file`
- **StudentGraph** (`graph`) - Chart configuration and PNG rendering for one
  student; rendering returns a handle that export works on
- **App** (`app`) - Coordinator wiring uploads into the roster and the query
  into the filtered view

### State
- **AppState** (`state`) - Roster, filtered view, upload generation and last
  error, changed only through named transitions
- **Filter** (`filter`) - Case-insensitive substring match on name or ID,
  always against the full roster

## Data Flow

FileUpload → App (roster) → filter by query → App (filtered view) →
StudentGraph per student

## Upload Endpoint

- `POST <endpoint>` with one multipart field `file`
- Success body: `[{"id": "1", "name": "Alice", "tests": [80, 90]}, ...]`
- Default endpoint: `http://localhost:5000/api/upload`
*/

pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod search;
pub mod state;
pub mod student;
pub mod upload;

pub use app::*;
pub use config::*;
pub use error::*;
pub use filter::*;
pub use graph::*;
pub use search::*;
pub use state::*;
pub use student::*;
pub use upload::*;
