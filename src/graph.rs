use crate::error::ChartError;
use crate::student::Student;
use log::{debug, info, warn};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Line color for the score series
const SERIES_COLOR: RGBColor = RGBColor(75, 192, 192);

/// Size options for rendered charts
///
/// Mirrors the pixel dimensions the PNG export is produced at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartOptions {
    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartOptions {
    /// 800x400, wide enough for a dozen test labels
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

/// Everything needed to draw one student's chart
///
/// Built purely from the student record; rendering never looks at anything
/// else.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    /// Caption drawn above the plot
    pub title: String,

    /// Legend entry for the single data series
    pub series_label: String,

    /// X axis labels, `Test 1` through `Test N`
    pub labels: Vec<String>,

    /// Scores in test order
    pub data: Vec<f64>,

    /// Forces the Y axis to include zero
    pub y_begins_at_zero: bool,
}

impl ChartConfig {
    /// Builds the chart configuration for a student
    ///
    /// # Arguments
    /// * `student` - The record to chart
    ///
    /// # Returns
    /// * A configuration with one label per test (1-indexed) and the scores
    ///   as the only series
    pub fn for_student(student: &Student) -> Self {
        Self {
            title: format!("{} (ID: {})", student.name, student.id),
            series_label: "Test Scores".to_string(),
            labels: (1..=student.tests.len())
                .map(|n| format!("Test {}", n))
                .collect(),
            data: student.tests.clone(),
            y_begins_at_zero: true,
        }
    }

    /// Y range covering every score, plus zero when requested
    ///
    /// Fails when the scores span more than an `f64` can represent; such a
    /// range cannot be laid out on an axis.
    fn y_range(&self) -> Result<(f64, f64), ChartError> {
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);

        let (mut low, mut high) = if self.data.is_empty() {
            (0.0, 1.0)
        } else {
            (min, max)
        };
        if self.y_begins_at_zero {
            low = low.min(0.0);
            high = high.max(0.0);
        }

        // Leave a little room above the highest point, unless that overflows
        let span = (high - low).max(1.0);
        let top = high + span * 0.1;
        let top = if top.is_finite() { top } else { high };

        if !low.is_finite() || !top.is_finite() || !(top - low).is_finite() {
            return Err(ChartError::Draw(format!(
                "score range {}..{} is too large to plot",
                min, max
            )));
        }
        Ok((low, top))
    }

    /// X range placing test `i` at `i`, half a slot of padding each side
    fn x_range(&self) -> (f64, f64) {
        let n = self.data.len().max(1) as f64;
        (-0.5, n - 0.5)
    }
}

/// Chart view for a single student
///
/// Purely presentational: it holds a shared reference to the record and
/// derives everything from it.
#[derive(Clone, Debug)]
pub struct StudentGraph {
    student: Arc<Student>,
}

impl StudentGraph {
    pub fn new(student: Arc<Student>) -> Self {
        Self { student }
    }

    /// Identity key of this view, the student id
    pub fn key(&self) -> &str {
        &self.student.id
    }

    pub fn student(&self) -> &Arc<Student> {
        &self.student
    }

    pub fn heading(&self) -> String {
        format!("{} (ID: {})", self.student.name, self.student.id)
    }

    pub fn config(&self) -> ChartConfig {
        ChartConfig::for_student(&self.student)
    }

    /// Renders the chart to PNG and returns a handle to it
    ///
    /// The handle is the only way to export the chart, so an export can
    /// never target a chart that was not drawn.
    ///
    /// # Arguments
    /// * `options` - Output dimensions
    ///
    /// # Returns
    /// * A `RenderedChart` owning the PNG bytes, or a drawing/encoding error
    ///
    /// # Implementation Notes
    /// * Draws into an in-memory RGB buffer, no temporary files
    /// * If the decorated pass fails (usually missing system fonts), the
    ///   chart is redrawn without any text
    pub fn render(&self, options: &ChartOptions) -> Result<RenderedChart, ChartError> {
        let config = self.config();
        let (width, height) = (options.width, options.height);
        let y_range = config.y_range()?;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        if let Err(e) = draw_line_chart(&mut buffer, &config, y_range, options, true) {
            warn!(
                "chart for student {} drawn without text: {}",
                self.student.id, e
            );
            draw_line_chart(&mut buffer, &config, y_range, options, false)?;
        }

        let png = encode_png(buffer, width, height)?;
        debug!(
            "rendered chart for student {} ({} points, {} bytes)",
            self.student.id,
            config.data.len(),
            png.len()
        );

        Ok(RenderedChart {
            student: Arc::clone(&self.student),
            png,
            width,
            height,
        })
    }
}

/// A drawn chart, ready for export
#[derive(Clone, Debug)]
pub struct RenderedChart {
    student: Arc<Student>,
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderedChart {
    pub fn key(&self) -> &str {
        &self.student.id
    }

    pub fn student(&self) -> &Arc<Student> {
        &self.student
    }

    /// Encoded PNG image
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Default export file name, `<name>_<id>.png`
    ///
    /// Path separators are replaced so the file always lands directly in
    /// the export directory.
    pub fn file_name(&self) -> String {
        let raw = format!("{}_{}.png", self.student.name, self.student.id);
        raw.replace(['/', '\\'], "_")
    }

    /// Saves the PNG into a directory
    ///
    /// # Arguments
    /// * `dir` - Export directory; created if it does not exist
    ///
    /// # Returns
    /// * The path of the written file
    pub fn export(&self, dir: &Path) -> Result<PathBuf, ChartError> {
        std::fs::create_dir_all(dir).map_err(|source| ChartError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.png).map_err(|source| ChartError::Write {
            path: path.clone(),
            source,
        })?;

        info!("exported chart for student {} to {}", self.student.id, path.display());
        Ok(path)
    }
}

/// Draws a line chart into an RGB buffer
///
/// With `decorated` off, only the series itself is drawn so that no font
/// is ever loaded.
fn draw_line_chart(
    buffer: &mut [u8],
    config: &ChartConfig,
    (y_low, y_high): (f64, f64),
    options: &ChartOptions,
    decorated: bool,
) -> Result<(), ChartError> {
    let root = BitMapBackend::with_buffer(buffer, (options.width, options.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let (x_low, x_high) = config.x_range();

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if decorated {
        builder
            .caption(&config.title, ("sans-serif", 24).into_font())
            .x_label_area_size(30)
            .y_label_area_size(40);
    }
    let mut chart = builder
        .build_cartesian_2d(x_low..x_high, y_low..y_high)
        .map_err(draw_error)?;

    if decorated {
        let label_for = |x: &f64| {
            let slot = x.round();
            if (x - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            config
                .labels
                .get(slot as usize)
                .cloned()
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(config.labels.len().max(1))
            .x_label_formatter(&label_for)
            .disable_x_mesh()
            .draw()
            .map_err(draw_error)?;
    }

    let points: Vec<(f64, f64)> = config
        .data
        .iter()
        .enumerate()
        .map(|(i, &score)| (i as f64, score))
        .collect();

    let series = chart
        .draw_series(LineSeries::new(points.iter().copied(), &SERIES_COLOR))
        .map_err(draw_error)?;
    if decorated {
        series
            .label(config.series_label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SERIES_COLOR));
    }

    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 3, SERIES_COLOR.filled())),
        )
        .map_err(draw_error)?;

    if decorated && !points.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

fn draw_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or(ChartError::Buffer { width, height })?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
    Ok(png)
}
