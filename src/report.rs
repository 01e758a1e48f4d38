//! Markdown report export.
//!
//! Renders figures the calculator has already computed; nothing is
//! recomputed here.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::engine::calculator::Evaluation;
use crate::engine::policy::Bucket;
use crate::engine::types::{CourseRecord, GradeInput, SemesterPlan};
use crate::engine::utility::{display_credits, display_gpa};
use crate::profile::CalculatorProfile;

fn grade_cell(course: &CourseRecord) -> String {
    match &course.grade {
        Some(GradeInput::Letter(letter)) => letter.clone(),
        Some(GradeInput::Percentage(p)) => format!("{p}%"),
        None => "—".to_string(),
    }
}

/// Renders a markdown report from an already computed evaluation.
pub fn build_report(
    profile: &CalculatorProfile,
    evaluation: &Evaluation,
    plan: &SemesterPlan,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();
    let overall = &evaluation.overall;

    let _ = writeln!(output, "# GPA Report");
    let _ = writeln!(
        output,
        "Profile: {} ({} scale, generated {})",
        profile.name,
        profile.scale_table().name,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Overall GPA: {}", display_gpa(overall.gpa));

    for bucket in [Bucket::Science, Bucket::NonScience] {
        if overall.buckets.contains_key(&bucket) {
            let _ = writeln!(
                output,
                "- {} GPA: {}",
                bucket.label(),
                display_gpa(overall.bucket_gpa(bucket))
            );
        }
    }

    let _ = writeln!(
        output,
        "- Credits counted: {} across {} courses",
        display_credits(overall.total_credits),
        overall.counted_courses
    );
    if overall.baseline_applied {
        let _ = writeln!(output, "- Includes prior coursework baseline");
    }
    if overall.skipped_courses > 0 {
        let _ = writeln!(
            output,
            "- {} row(s) not counted (no grade, excluded, or invalid credits)",
            overall.skipped_courses
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Standing & Honors");

    if evaluation.classifications.is_empty() {
        let _ = writeln!(output, "No classifications for this profile yet.");
    } else {
        for classification in &evaluation.classifications {
            let _ = writeln!(
                output,
                "- {}: {}",
                classification.kind.title(),
                classification.label
            );
        }
    }

    for (semester, outcome) in plan.semesters().iter().zip(&evaluation.semesters) {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", semester.label);
        let _ = writeln!(
            output,
            "Term GPA {} · Cumulative {}",
            display_gpa(outcome.term.gpa),
            display_gpa(outcome.cumulative.gpa)
        );

        for course in semester.courses() {
            let name = if course.name.is_empty() {
                "(unnamed)"
            } else {
                course.name.as_str()
            };
            let _ = writeln!(
                output,
                "- {} | {} | {} cr{}",
                name,
                grade_cell(course),
                display_credits(course.credits),
                if course.excluded { " | excluded" } else { "" }
            );
        }
    }

    output
}
