use crate::engine::policy::{Bucket, WeightingPolicy};
use crate::engine::scale::GradeScaleTable;
use crate::engine::types::{Baseline, CourseRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Largest credit weight a single course may carry.
pub const MAX_CREDITS: f64 = 15.0;

/// Running quality-point and credit sums. Kept unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    pub quality_points: f64,
    pub credits: f64,
    pub courses: usize,
}

impl Tally {
    fn add(&mut self, points: f64, credits: f64) {
        self.quality_points += points * credits;
        self.credits += credits;
        self.courses += 1;
    }

    /// `None` until some credit has been counted.
    pub fn gpa(&self) -> Option<f64> {
        (self.credits > 0.0).then(|| self.quality_points / self.credits)
    }
}

/// Result of aggregating one course list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GpaResult {
    pub gpa: Option<f64>,
    pub total_credits: f64,
    pub quality_points: f64,
    pub counted_courses: usize,
    pub skipped_courses: usize,
    pub baseline_applied: bool,
    pub buckets: BTreeMap<Bucket, Tally>,
}

impl GpaResult {
    pub fn bucket_gpa(&self, bucket: Bucket) -> Option<f64> {
        self.buckets.get(&bucket).and_then(Tally::gpa)
    }
}

/// Whether a credit weight can take part in aggregation.
pub fn credits_valid(credits: f64) -> bool {
    credits.is_finite() && credits > 0.0 && credits <= MAX_CREDITS
}

/// Adjusted points for a course, or `None` when the row does not count:
/// excluded, no grade, a grade the scale does not know, or bad credits.
pub fn countable_points(
    course: &CourseRecord,
    policy: &dyn WeightingPolicy,
    scale: &GradeScaleTable,
) -> Option<f64> {
    if course.excluded || !credits_valid(course.credits) {
        return None;
    }
    let base = scale.resolve(course.grade.as_ref()?)?;
    Some(policy.adjusted_points(base, course.category))
}

/// Reduces courses into an overall GPA plus any per-bucket sub-GPAs.
///
/// A valid `baseline` is folded into the overall figure as one extra
/// pseudo-course; it never enters a bucket. An invalid one is ignored.
pub fn aggregate<'a, I>(
    courses: I,
    policy: &dyn WeightingPolicy,
    scale: &GradeScaleTable,
    baseline: Option<&Baseline>,
) -> GpaResult
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    let mut overall = Tally::default();
    let mut buckets: BTreeMap<Bucket, Tally> = BTreeMap::new();
    let mut skipped = 0usize;

    for course in courses {
        let Some(points) = countable_points(course, policy, scale) else {
            trace!(course = %course.name, credits = course.credits, "Course not counted");
            skipped += 1;
            continue;
        };

        overall.add(points, course.credits);
        if let Some(bucket) = policy.bucket(course.category) {
            buckets.entry(bucket).or_default().add(points, course.credits);
        }
    }

    let counted_courses = overall.courses;

    let baseline_applied = match baseline {
        Some(b) if b.is_valid() => {
            overall.add(b.prior_gpa, b.prior_credits);
            true
        }
        Some(b) => {
            debug!(
                prior_gpa = b.prior_gpa,
                prior_credits = b.prior_credits,
                "Ignoring out-of-range baseline"
            );
            false
        }
        None => false,
    };

    GpaResult {
        gpa: overall.gpa(),
        total_credits: overall.credits,
        quality_points: overall.quality_points,
        counted_courses,
        skipped_courses: skipped,
        baseline_applied,
        buckets,
    }
}
