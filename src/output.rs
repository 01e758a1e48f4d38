//! Output formatting and persistence for evaluations.
//!
//! Supports pretty-printing, JSON serialization, and CSV summary append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::engine::calculator::Evaluation;
use crate::engine::utility::round2;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV line per evaluation, for tracking a GPA over time.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub generated_at: DateTime<Utc>,
    pub profile: String,
    pub gpa: Option<f64>,
    pub science_gpa: Option<f64>,
    pub total_credits: f64,
    pub counted_courses: usize,
    pub skipped_courses: usize,
    pub labels: String,
}

impl SummaryRecord {
    /// Summarizes an evaluation exported at `generated_at`.
    pub fn from_evaluation(evaluation: &Evaluation, generated_at: DateTime<Utc>) -> Self {
        let labels: Vec<&str> = evaluation
            .classifications
            .iter()
            .map(|c| c.label.as_str())
            .collect();

        SummaryRecord {
            generated_at,
            profile: evaluation.profile.clone(),
            gpa: evaluation.overall.gpa.map(round2),
            science_gpa: evaluation.science_gpa().map(round2),
            total_credits: evaluation.overall.total_credits,
            counted_courses: evaluation.overall.counted_courses,
            skipped_courses: evaluation.overall.skipped_courses,
            labels: labels.join("; "),
        }
    }
}

/// Logs an evaluation using Rust's debug pretty-print format.
pub fn print_pretty(evaluation: &Evaluation) {
    debug!("{:#?}", evaluation);
}

/// Serializes an evaluation as pretty-printed JSON.
pub fn to_json(evaluation: &Evaluation) -> Result<String> {
    Ok(serde_json::to_string_pretty(evaluation)?)
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, record: &SummaryRecord) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculator::GpaCalculator;
    use crate::engine::types::{CourseRecord, Semester, SemesterPlan};
    use crate::profile::ProfileCatalog;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn evaluation() -> Evaluation {
        let catalog = ProfileCatalog::builtin().unwrap();
        let calc = GpaCalculator::new(catalog.get("standard").unwrap().clone());
        let plan = SemesterPlan::from_semesters(vec![Semester::with_courses(
            "Fall",
            vec![
                CourseRecord::letter("Biology", "A", 3.0),
                CourseRecord::letter("History", "B+", 3.0),
                CourseRecord::letter("Chemistry", "A-", 4.0),
                CourseRecord::letter("English", "B", 3.0),
            ],
        )]);
        calc.evaluate(&plan, None)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&evaluation());
    }

    #[test]
    fn test_to_json_contains_figures() {
        let json = to_json(&evaluation()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["profile"], "standard");
        assert_eq!(value["overall"]["total_credits"], 13.0);
        assert_eq!(value["classifications"][0]["kind"], "standing");
        assert!(value.get("generated_at").is_none());
    }

    #[test]
    fn test_summary_record_rounds() {
        let stamp = Utc::now();
        let record = SummaryRecord::from_evaluation(&evaluation(), stamp);
        assert_eq!(record.generated_at, stamp);
        assert_eq!(record.gpa, Some(3.52));
        assert_eq!(record.science_gpa, None);
        assert_eq!(record.labels, "Good Standing");
    }

    #[test]
    fn test_append_summary_creates_file() {
        let path = temp_path("gpa_rater_test_create.csv");
        let _ = fs::remove_file(&path);

        let record = SummaryRecord::from_evaluation(&evaluation(), Utc::now());
        append_summary(&path, &record).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("gpa_rater_test_header.csv");
        let _ = fs::remove_file(&path);

        let record = SummaryRecord::from_evaluation(&evaluation(), Utc::now());
        append_summary(&path, &record).unwrap();
        append_summary(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        let header_count = lines.iter().filter(|l| l.starts_with("generated_at")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }
}
