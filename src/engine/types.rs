//! Data types consumed by the GPA engine.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Course category as entered on a calculator row.
///
/// `Honors` and `ApIb` carry weighting bonuses under the weighted policy.
/// `Science` marks BCPM coursework (biology, chemistry, physics, math) for
/// health-professional calculators that report a separate science GPA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    #[default]
    Regular,
    Honors,
    #[serde(alias = "ap", alias = "ib")]
    ApIb,
    #[serde(alias = "bcpm")]
    Science,
    NonScience,
}

/// A grade as typed by the user: a letter or a numeric percentage.
///
/// Deserializes from a JSON number (a percentage) or from text read the
/// same way as a CSV cell, so `"91"` and `91` are both percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GradeInput {
    Percentage(f64),
    Letter(String),
}

impl GradeInput {
    /// Interprets free text from a form field or CSV cell.
    ///
    /// Blank text means no grade was selected. Anything that parses as a
    /// number is a percentage; everything else is treated as a letter.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match trimmed.parse::<f64>() {
            Ok(p) => Some(GradeInput::Percentage(p)),
            Err(_) => Some(GradeInput::Letter(trimmed.to_ascii_uppercase())),
        }
    }

    pub fn letter(label: &str) -> Self {
        GradeInput::Letter(label.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGrade {
    Number(f64),
    Text(String),
}

impl RawGrade {
    fn into_grade(self) -> Option<GradeInput> {
        match self {
            RawGrade::Number(p) => Some(GradeInput::Percentage(p)),
            RawGrade::Text(text) => GradeInput::parse(&text),
        }
    }
}

impl<'de> Deserialize<'de> for GradeInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawGrade::deserialize(deserializer)?
            .into_grade()
            .ok_or_else(|| serde::de::Error::custom("grade must not be blank"))
    }
}

// Null, a missing field and blank text all mean "no grade selected".
fn optional_grade<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GradeInput>, D::Error> {
    Ok(Option::<RawGrade>::deserialize(deserializer)?.and_then(RawGrade::into_grade))
}

/// One course row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "optional_grade")]
    pub grade: Option<GradeInput>,
    pub credits: f64,
    #[serde(default)]
    pub category: CourseCategory,
    #[serde(default)]
    pub excluded: bool,
}

impl CourseRecord {
    pub fn new(name: &str, grade: Option<GradeInput>, credits: f64, category: CourseCategory) -> Self {
        CourseRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            grade,
            credits,
            category,
            excluded: false,
        }
    }

    /// Shorthand for a regular course with a letter grade.
    pub fn letter(name: &str, grade: &str, credits: f64) -> Self {
        Self::new(name, Some(GradeInput::letter(grade)), credits, CourseCategory::Regular)
    }

    /// An empty row, as created by "add course".
    pub fn blank() -> Self {
        Self::new("", None, 0.0, CourseCategory::Regular)
    }

    pub fn with_category(mut self, category: CourseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_excluded(mut self, excluded: bool) -> Self {
        self.excluded = excluded;
        self
    }
}

/// An ordered group of courses. Row order is for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Semester {
    pub id: Uuid,
    pub label: String,
    courses: Vec<CourseRecord>,
}

impl Semester {
    /// Builds a semester; an empty course list gets one blank row.
    pub fn with_courses(label: &str, mut courses: Vec<CourseRecord>) -> Self {
        if courses.is_empty() {
            courses.push(CourseRecord::blank());
        }
        Semester {
            id: Uuid::new_v4(),
            label: label.to_string(),
            courses,
        }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }
}

/// The course collection behind a calculator.
///
/// Always holds at least one semester, and every semester holds at least
/// one row. Operations that would break this are refused and return `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterPlan {
    semesters: Vec<Semester>,
}

impl Default for SemesterPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl SemesterPlan {
    pub fn new() -> Self {
        SemesterPlan {
            semesters: vec![Semester::with_courses("Semester 1", Vec::new())],
        }
    }

    pub fn from_semesters(semesters: Vec<Semester>) -> Self {
        if semesters.is_empty() {
            return Self::new();
        }
        SemesterPlan { semesters }
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn semester(&self, id: Uuid) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    /// All rows across all semesters, in display order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseRecord> {
        self.semesters.iter().flat_map(|s| s.courses.iter())
    }

    pub fn add_semester(&mut self, label: &str) -> Uuid {
        let semester = Semester::with_courses(label, Vec::new());
        let id = semester.id;
        self.semesters.push(semester);
        id
    }

    pub fn remove_semester(&mut self, id: Uuid) -> bool {
        if self.semesters.len() <= 1 {
            return false;
        }
        let before = self.semesters.len();
        self.semesters.retain(|s| s.id != id);
        self.semesters.len() != before
    }

    pub fn rename_semester(&mut self, id: Uuid, label: &str) -> bool {
        match self.semesters.iter_mut().find(|s| s.id == id) {
            Some(semester) => {
                semester.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends a row to a semester, returning the row id.
    pub fn add_course(&mut self, semester_id: Uuid, course: CourseRecord) -> Option<Uuid> {
        let semester = self.semesters.iter_mut().find(|s| s.id == semester_id)?;
        let id = course.id;
        semester.courses.push(course);
        Some(id)
    }

    pub fn remove_course(&mut self, course_id: Uuid) -> bool {
        for semester in &mut self.semesters {
            if let Some(pos) = semester.courses.iter().position(|c| c.id == course_id) {
                if semester.courses.len() <= 1 {
                    return false;
                }
                semester.courses.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn course_mut(&mut self, course_id: Uuid) -> Option<&mut CourseRecord> {
        self.semesters
            .iter_mut()
            .flat_map(|s| s.courses.iter_mut())
            .find(|c| c.id == course_id)
    }
}

/// Previously earned history merged into a cumulative GPA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub prior_gpa: f64,
    pub prior_credits: f64,
}

impl Baseline {
    pub const MAX_PRIOR_GPA: f64 = 4.0;

    pub fn new(prior_gpa: f64, prior_credits: f64) -> Self {
        Baseline {
            prior_gpa,
            prior_credits,
        }
    }

    /// A baseline is applied only when both values are in range.
    pub fn is_valid(&self) -> bool {
        self.prior_gpa.is_finite()
            && self.prior_credits.is_finite()
            && (0.0..=Self::MAX_PRIOR_GPA).contains(&self.prior_gpa)
            && self.prior_credits > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_input_parse() {
        assert_eq!(GradeInput::parse("  "), None);
        assert_eq!(GradeInput::parse("91"), Some(GradeInput::Percentage(91.0)));
        assert_eq!(GradeInput::parse(" b+ "), Some(GradeInput::Letter("B+".into())));
    }

    #[test]
    fn test_grade_deserializes_like_parse() {
        let text: GradeInput = serde_json::from_str(r#""91""#).unwrap();
        assert_eq!(text, GradeInput::Percentage(91.0));
        assert_eq!(Some(text), GradeInput::parse("91"));

        let number: GradeInput = serde_json::from_str("87.5").unwrap();
        assert_eq!(number, GradeInput::Percentage(87.5));

        let letter: GradeInput = serde_json::from_str(r#"" b+ ""#).unwrap();
        assert_eq!(letter, GradeInput::Letter("B+".into()));

        assert!(serde_json::from_str::<GradeInput>(r#""  ""#).is_err());
    }

    #[test]
    fn test_course_record_grade_from_json() {
        let id = Uuid::new_v4();
        let row = |grade: &str| {
            format!(r#"{{"id":"{id}","name":"Statistics","grade":{grade},"credits":3.0}}"#)
        };

        let course: CourseRecord = serde_json::from_str(&row(r#""91""#)).unwrap();
        assert_eq!(course.grade, Some(GradeInput::Percentage(91.0)));
        assert_eq!(course.category, CourseCategory::Regular);

        let course: CourseRecord = serde_json::from_str(&row(r#""A-""#)).unwrap();
        assert_eq!(course.grade, Some(GradeInput::Letter("A-".into())));

        let course: CourseRecord = serde_json::from_str(&row(r#"" ""#)).unwrap();
        assert_eq!(course.grade, None);

        let course: CourseRecord = serde_json::from_str(&row("null")).unwrap();
        assert_eq!(course.grade, None);

        let missing = format!(r#"{{"id":"{id}","name":"Audit","credits":3.0}}"#);
        let course: CourseRecord = serde_json::from_str(&missing).unwrap();
        assert_eq!(course.grade, None);
    }

    #[test]
    fn test_new_plan_has_one_blank_row() {
        let plan = SemesterPlan::new();
        assert_eq!(plan.semesters().len(), 1);
        assert_eq!(plan.courses().count(), 1);
        assert!(plan.courses().all(|c| c.grade.is_none()));
    }

    #[test]
    fn test_last_semester_cannot_be_removed() {
        let mut plan = SemesterPlan::new();
        let only = plan.semesters()[0].id;
        assert!(!plan.remove_semester(only));

        let second = plan.add_semester("Spring");
        assert!(plan.remove_semester(second));
        assert_eq!(plan.semesters().len(), 1);
    }

    #[test]
    fn test_last_course_row_cannot_be_removed() {
        let mut plan = SemesterPlan::new();
        let semester = plan.semesters()[0].id;
        let blank = plan.semesters()[0].courses()[0].id;
        assert!(!plan.remove_course(blank));

        let added = plan
            .add_course(semester, CourseRecord::letter("Calculus", "A", 4.0))
            .unwrap();
        assert!(plan.remove_course(blank));
        assert!(!plan.remove_course(added));
    }

    #[test]
    fn test_course_mut_edits_in_place() {
        let mut plan = SemesterPlan::new();
        let id = plan.semesters()[0].courses()[0].id;
        let course = plan.course_mut(id).unwrap();
        course.grade = GradeInput::parse("A-");
        course.credits = 3.0;

        let stored = plan.courses().next().unwrap();
        assert_eq!(stored.grade, Some(GradeInput::Letter("A-".into())));
        assert_eq!(stored.credits, 3.0);
    }

    #[test]
    fn test_rename_semester() {
        let mut plan = SemesterPlan::new();
        let id = plan.add_semester("Spring");
        assert!(plan.rename_semester(id, "Spring 2026"));
        assert_eq!(plan.semester(id).unwrap().label, "Spring 2026");
        assert_eq!(plan.semester(id).unwrap().courses().len(), 1);
        assert!(!plan.rename_semester(Uuid::new_v4(), "x"));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut plan = SemesterPlan::new();
        assert!(plan.add_course(Uuid::new_v4(), CourseRecord::blank()).is_none());
        assert!(!plan.remove_course(Uuid::new_v4()));
        assert!(plan.course_mut(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_baseline_validity() {
        assert!(Baseline::new(3.2, 30.0).is_valid());
        assert!(Baseline::new(0.0, 1.0).is_valid());
        assert!(Baseline::new(4.0, 1.0).is_valid());
        assert!(!Baseline::new(4.1, 30.0).is_valid());
        assert!(!Baseline::new(-0.1, 30.0).is_valid());
        assert!(!Baseline::new(3.0, 0.0).is_valid());
        assert!(!Baseline::new(f64::NAN, 12.0).is_valid());
    }
}
