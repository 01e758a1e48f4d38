//! Grade-point scales.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::engine::bands::{Band, BandTable};
use crate::engine::types::GradeInput;

/// Immutable mapping from grade label to base grade points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeScaleTable {
    pub name: &'static str,
    entries: &'static [(&'static str, f64)],
}

pub const STANDARD: GradeScaleTable = GradeScaleTable::new(
    "standard",
    &[
        ("A+", 4.0),
        ("A", 4.0),
        ("A-", 3.7),
        ("B+", 3.3),
        ("B", 3.0),
        ("B-", 2.7),
        ("C+", 2.3),
        ("C", 2.0),
        ("C-", 1.7),
        ("D+", 1.3),
        ("D", 1.0),
        ("D-", 0.7),
        ("F", 0.0),
    ],
);

pub const PLUS_433: GradeScaleTable = GradeScaleTable::new(
    "plus433",
    &[
        ("A+", 4.33),
        ("A", 4.0),
        ("A-", 3.7),
        ("B+", 3.3),
        ("B", 3.0),
        ("B-", 2.7),
        ("C+", 2.3),
        ("C", 2.0),
        ("C-", 1.7),
        ("D+", 1.3),
        ("D", 1.0),
        ("D-", 0.7),
        ("F", 0.0),
    ],
);

/// CASPA's conversion. A+ is pinned to 4.0 even where the school awards 4.33.
pub const CASPA: GradeScaleTable = GradeScaleTable::new(
    "caspa",
    &[
        ("A+", 4.0),
        ("A", 4.0),
        ("A-", 3.7),
        ("B+", 3.3),
        ("B", 3.0),
        ("B-", 2.7),
        ("C+", 2.3),
        ("C", 2.0),
        ("C-", 1.7),
        ("D+", 1.3),
        ("D", 1.0),
        ("D-", 0.7),
        ("F", 0.0),
        ("WF", 0.0),
    ],
);

/// Standard points, fed by [`bandify`] for percentage entry.
pub const PERCENTAGE: GradeScaleTable = GradeScaleTable::new("percentage", STANDARD.entries);

impl GradeScaleTable {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, f64)]) -> Self {
        GradeScaleTable { name, entries }
    }

    /// Points for a letter, or `None` when the scale has no such label.
    pub fn lookup(&self, grade: &str) -> Option<f64> {
        let key = grade.trim().to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(label, _)| *label == key)
            .map(|(_, points)| *points)
    }

    /// Points for a letter; an unknown label counts as 0.0.
    ///
    /// Callers that must tell "no grade" apart from "F" use [`Self::lookup`].
    pub fn points_for(&self, grade: &str) -> f64 {
        self.lookup(grade).unwrap_or(0.0)
    }

    /// Resolves a letter or a percentage into base points.
    pub fn resolve(&self, grade: &GradeInput) -> Option<f64> {
        match grade {
            GradeInput::Letter(letter) => self.lookup(letter),
            GradeInput::Percentage(p) => bandify(*p).and_then(|letter| self.lookup(letter)),
        }
    }

    /// Highest base value on the scale.
    pub fn max_points(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, points)| *points)
            .fold(0.0, f64::max)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(label, _)| *label)
    }
}

const PERCENTAGE_CUTOFFS: [(&str, f64); 12] = [
    ("A+", 97.0),
    ("A", 93.0),
    ("A-", 90.0),
    ("B+", 87.0),
    ("B", 83.0),
    ("B-", 80.0),
    ("C+", 77.0),
    ("C", 73.0),
    ("C-", 70.0),
    ("D+", 67.0),
    ("D", 63.0),
    ("D-", 60.0),
];

static PERCENTAGE_BANDS: LazyLock<BandTable<&'static str>> = LazyLock::new(|| {
    let bands = PERCENTAGE_CUTOFFS
        .iter()
        .map(|&(label, min)| Band { label, min })
        .collect();
    BandTable::new(bands, "F").expect("percentage cutoffs must descend")
});

/// The validated percentage-to-letter table behind [`bandify`].
pub fn percentage_bands() -> &'static BandTable<&'static str> {
    &PERCENTAGE_BANDS
}

/// Converts a percentage (0–100) into a letter grade.
///
/// | Range   | Grade |
/// |---------|-------|
/// | >= 97   | A+    |
/// | >= 93   | A     |
/// | >= 90   | A-    |
/// | >= 87   | B+    |
/// | >= 83   | B     |
/// | >= 80   | B-    |
/// | >= 77   | C+    |
/// | >= 73   | C     |
/// | >= 70   | C-    |
/// | >= 67   | D+    |
/// | >= 63   | D     |
/// | >= 60   | D-    |
/// | < 60    | F     |
///
/// Returns `None` outside 0–100.
pub fn bandify(percentage: f64) -> Option<&'static str> {
    if !(0.0..=100.0).contains(&percentage) {
        return None;
    }
    Some(*percentage_bands().classify(percentage))
}

/// Names a built-in scale in profile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Standard,
    Plus433,
    Caspa,
    Percentage,
}

impl ScaleKind {
    pub fn table(self) -> &'static GradeScaleTable {
        match self {
            ScaleKind::Standard => &STANDARD,
            ScaleKind::Plus433 => &PLUS_433,
            ScaleKind::Caspa => &CASPA,
            ScaleKind::Percentage => &PERCENTAGE,
        }
    }
}
