//! Weighting policies: per-category point adjustment and sub-GPA routing.

use serde::{Deserialize, Serialize};

use crate::engine::scale::GradeScaleTable;
use crate::engine::types::CourseCategory;

/// Added to honors courses, capped at [`HONORS_CAP`].
pub const HONORS_BONUS: f64 = 0.5;
pub const HONORS_CAP: f64 = 4.5;
/// Added to AP/IB courses, capped at [`AP_IB_CAP`].
pub const AP_IB_BONUS: f64 = 1.0;
pub const AP_IB_CAP: f64 = 5.0;

/// A separately reported sub-GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Science,
    NonScience,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Science => "Science (BCPM)",
            Bucket::NonScience => "Non-Science",
        }
    }
}

/// Adjusts base points for a course category.
pub trait WeightingPolicy: Send + Sync {
    fn adjusted_points(&self, base_points: f64, category: CourseCategory) -> f64;

    /// Sub-GPA bucket a category feeds, if the policy splits any.
    fn bucket(&self, _category: CourseCategory) -> Option<Bucket> {
        None
    }

    /// Highest GPA reachable on `scale` once adjustments are applied.
    fn max_points(&self, scale: &GradeScaleTable) -> f64 {
        scale.max_points()
    }
}

/// Every course counts at its base value.
pub struct Unweighted;

impl WeightingPolicy for Unweighted {
    fn adjusted_points(&self, base_points: f64, _category: CourseCategory) -> f64 {
        base_points
    }
}

/// High-school weighting: +0.5 honors, +1.0 AP/IB.
pub struct HonorsWeighted;

impl WeightingPolicy for HonorsWeighted {
    fn adjusted_points(&self, base_points: f64, category: CourseCategory) -> f64 {
        match category {
            CourseCategory::Honors => with_bonus(base_points, HONORS_BONUS, HONORS_CAP),
            CourseCategory::ApIb => with_bonus(base_points, AP_IB_BONUS, AP_IB_CAP),
            _ => base_points,
        }
    }

    fn max_points(&self, scale: &GradeScaleTable) -> f64 {
        with_bonus(scale.max_points(), AP_IB_BONUS, AP_IB_CAP).max(scale.max_points())
    }
}

/// Health-professional split: points unchanged, science courses reported
/// as their own sub-GPA next to everything else.
pub struct ScienceSplit;

impl WeightingPolicy for ScienceSplit {
    fn adjusted_points(&self, base_points: f64, _category: CourseCategory) -> f64 {
        base_points
    }

    fn bucket(&self, category: CourseCategory) -> Option<Bucket> {
        match category {
            CourseCategory::Science => Some(Bucket::Science),
            _ => Some(Bucket::NonScience),
        }
    }
}

// A failing grade earns no bonus.
fn with_bonus(base_points: f64, bonus: f64, cap: f64) -> f64 {
    if base_points <= 0.0 {
        return 0.0;
    }
    (base_points + bonus).min(cap)
}

/// Names a policy in profile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Unweighted,
    Weighted,
    ScienceSplit,
}

impl PolicyKind {
    pub fn policy(self) -> &'static dyn WeightingPolicy {
        match self {
            PolicyKind::Unweighted => &Unweighted,
            PolicyKind::Weighted => &HonorsWeighted,
            PolicyKind::ScienceSplit => &ScienceSplit,
        }
    }
}
