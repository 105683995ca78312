#![cfg(not(tarpaulin_include))]

use score_graphs::{ChartOptions, Student, StudentGraph, into_roster};
use std::path::PathBuf;

/// Renders a fixed sample roster to PNG files
///
/// Useful for eyeballing chart output without an upload endpoint.
///
/// # Arguments
/// * Optional output directory (defaults to "graph_output")
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("graph_output"));

    let roster = into_roster(vec![
        Student::new("1", "Alice", vec![80.0, 90.0, 85.0, 95.0]),
        Student::new("2", "Bob", vec![70.0]),
        Student::new("3", "Chandra", vec![55.0, 62.5, 71.0, 68.0, 88.0, 91.0, 97.0]),
        Student::new("4", "Dana", Vec::new()),
    ]);

    let options = ChartOptions {
        width: 600,
        height: 400,
    };

    for student in roster {
        let chart = StudentGraph::new(student).render(&options)?;
        let path = chart.export(&output_dir)?;
        println!("Created chart for {} at {}", chart.student().name, path.display());
    }

    Ok(())
}
