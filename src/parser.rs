//! CSV parser for course lists.
//!
//! Expected header: `semester,name,grade,credits,category,excluded`. Only
//! `grade` and `credits` are required; blank cells are allowed anywhere.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::engine::types::{CourseCategory, CourseRecord, GradeInput, Semester, SemesterPlan};

const DEFAULT_SEMESTER: &str = "Semester 1";

#[derive(Debug, Deserialize)]
struct CourseRow {
    #[serde(default)]
    semester: Option<String>,
    #[serde(default)]
    name: Option<String>,
    grade: Option<String>,
    credits: Option<String>,
    #[serde(default)]
    category: Option<CourseCategory>,
    #[serde(default)]
    excluded: Option<bool>,
}

impl CourseRow {
    fn into_record(self) -> CourseRecord {
        let grade = self.grade.as_deref().and_then(GradeInput::parse);
        // Unparseable credits behave like a blank cell: the row is not counted.
        let credits = self
            .credits
            .as_deref()
            .and_then(|c| c.trim().parse::<f64>().ok())
            .unwrap_or(0.0);

        CourseRecord::new(
            self.name.as_deref().unwrap_or("").trim(),
            grade,
            credits,
            self.category.unwrap_or_default(),
        )
        .with_excluded(self.excluded.unwrap_or(false))
    }
}

/// Decodes a course CSV into a [`SemesterPlan`].
///
/// Rows are grouped by their `semester` cell in order of first appearance.
/// An input with no rows yields a fresh plan with one blank row.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or a `category`/`excluded`
/// cell holds an unknown value.
pub fn parse_courses<R: Read>(reader: R) -> Result<SemesterPlan> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut groups: Vec<(String, Vec<CourseRecord>)> = Vec::new();

    for (line, result) in rdr.deserialize::<CourseRow>().enumerate() {
        let mut row = result.with_context(|| format!("invalid course row {}", line + 1))?;
        let label = row
            .semester
            .take()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEMESTER.to_string());
        let record = row.into_record();

        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, courses)) => courses.push(record),
            None => groups.push((label, vec![record])),
        }
    }

    debug!(semesters = groups.len(), "Parsed course list");

    let semesters = groups
        .into_iter()
        .map(|(label, courses)| Semester::with_courses(&label, courses))
        .collect();
    Ok(SemesterPlan::from_semesters(semesters))
}

/// Reads and parses a course CSV from disk.
pub fn load_courses(path: &Path) -> Result<SemesterPlan> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open course list {}", path.display()))?;
    parse_courses(file)
}
