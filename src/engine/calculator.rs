use crate::engine::aggregate::{GpaResult, aggregate};
use crate::engine::policy::Bucket;
use crate::engine::types::{Baseline, SemesterPlan};
use crate::profile::CalculatorProfile;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationKind {
    Standing,
    LatinHonors,
    Competitiveness,
    ApplicantTier,
    DeansList,
}

impl ClassificationKind {
    pub fn title(self) -> &'static str {
        match self {
            ClassificationKind::Standing => "Academic standing",
            ClassificationKind::LatinHonors => "Latin honors",
            ClassificationKind::Competitiveness => "Competitiveness",
            ClassificationKind::ApplicantTier => "Applicant tier",
            ClassificationKind::DeansList => "Dean's list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub kind: ClassificationKind,
    pub label: String,
}

/// One semester's own GPA and the running cumulative through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterOutcome {
    pub semester_id: Uuid,
    pub label: String,
    pub term: GpaResult,
    pub cumulative: GpaResult,
    pub deans_list: bool,
}

/// Everything a calculator displays for the current plan.
///
/// Carries no timestamp: the same plan always evaluates to an equal value.
/// Exports stamp their own time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub profile: String,
    pub overall: GpaResult,
    pub semesters: Vec<SemesterOutcome>,
    pub classifications: Vec<Classification>,
}

impl Evaluation {
    pub fn label(&self, kind: ClassificationKind) -> Option<&str> {
        self.classifications
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.label.as_str())
    }

    pub fn science_gpa(&self) -> Option<f64> {
        self.overall.bucket_gpa(Bucket::Science)
    }
}

/// A calculator variant: the aggregation engine bound to one profile.
pub struct GpaCalculator {
    profile: CalculatorProfile,
}

impl GpaCalculator {
    pub fn new(profile: CalculatorProfile) -> Self {
        GpaCalculator { profile }
    }

    pub fn profile(&self) -> &CalculatorProfile {
        &self.profile
    }

    /// Aggregates a flat course list under this profile.
    pub fn aggregate_plan(&self, plan: &SemesterPlan, baseline: Option<&Baseline>) -> GpaResult {
        aggregate(
            plan.courses(),
            self.profile.weighting(),
            self.profile.scale_table(),
            baseline,
        )
    }

    /// Recomputes every figure and label from scratch.
    pub fn evaluate(&self, plan: &SemesterPlan, baseline: Option<&Baseline>) -> Evaluation {
        let policy = self.profile.weighting();
        let scale = self.profile.scale_table();

        let mut semesters = Vec::with_capacity(plan.semesters().len());
        for (idx, semester) in plan.semesters().iter().enumerate() {
            let term = aggregate(semester.courses(), policy, scale, None);
            let through = plan.semesters()[..=idx].iter().flat_map(|s| s.courses().iter());
            let cumulative = aggregate(through, policy, scale, baseline);
            let deans_list = self
                .profile
                .deans_list
                .is_some_and(|rule| rule.qualifies(&term));

            semesters.push(SemesterOutcome {
                semester_id: semester.id,
                label: semester.label.clone(),
                term,
                cumulative,
                deans_list,
            });
        }

        let overall = self.aggregate_plan(plan, baseline);
        let classifications = self.classify(&overall, &semesters);

        debug!(
            profile = %self.profile.name,
            gpa = ?overall.gpa,
            credits = overall.total_credits,
            counted = overall.counted_courses,
            skipped = overall.skipped_courses,
            "Evaluated plan"
        );

        Evaluation {
            profile: self.profile.name.clone(),
            overall,
            semesters,
            classifications,
        }
    }

    fn classify(&self, overall: &GpaResult, semesters: &[SemesterOutcome]) -> Vec<Classification> {
        let mut labels = Vec::new();
        let Some(gpa) = overall.gpa else {
            return labels;
        };

        let mut push = |kind: ClassificationKind, label: &str| {
            labels.push(Classification {
                kind,
                label: label.to_string(),
            })
        };

        if let Some(table) = &self.profile.standing {
            push(ClassificationKind::Standing, table.classify(gpa).as_str());
        }
        if let Some(table) = &self.profile.latin_honors {
            push(ClassificationKind::LatinHonors, table.classify(gpa).as_str());
        }
        if let Some(table) = &self.profile.competitiveness {
            push(ClassificationKind::Competitiveness, table.classify(gpa).as_str());
        }
        if let (Some(table), Some(science)) = (
            &self.profile.applicant_tiers,
            overall.bucket_gpa(Bucket::Science),
        ) {
            push(ClassificationKind::ApplicantTier, table.classify(gpa, science));
        }
        for outcome in semesters.iter().filter(|s| s.deans_list) {
            push(
                ClassificationKind::DeansList,
                &format!("Dean's List ({})", outcome.label),
            );
        }

        labels
    }
}
