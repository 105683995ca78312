use crate::student::{Roster, Student};
use std::sync::Arc;

/// Checks whether a student matches a search query
///
/// The match is a case-insensitive substring test against the name or the
/// id; either one is enough. An empty query matches every student.
pub fn matches(student: &Student, query: &str) -> bool {
    let needle = query.to_lowercase();
    matches_lowered(student, &needle)
}

fn matches_lowered(student: &Student, needle: &str) -> bool {
    student.name.to_lowercase().contains(needle) || student.id.to_lowercase().contains(needle)
}

/// Computes the filtered view of a roster
///
/// Always works from the full roster, so successive queries never narrow
/// each other. The result keeps roster order and shares the same records.
///
/// # Arguments
/// * `roster` - The complete roster
/// * `query` - Raw text from the search bar
///
/// # Returns
/// * Clones of the matching `Arc`s, in roster order
pub fn filter_roster(roster: &[Arc<Student>], query: &str) -> Roster {
    let needle = query.to_lowercase();
    roster
        .iter()
        .filter(|student| matches_lowered(student, &needle))
        .cloned()
        .collect()
}
