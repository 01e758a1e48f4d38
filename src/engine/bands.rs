//! Threshold bands that turn a GPA into a label.
//!
//! Every table is ordered from the highest band down, each band's minimum is
//! inclusive, and anything below the last band gets the floor label, so
//! every input maps to exactly one label.

use std::fmt;

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize};

/// A labelled minimum. Labels are owned strings in profile files and
/// `&'static str` in built-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band<L = String> {
    pub label: L,
    pub min: f64,
}

impl Band<String> {
    pub fn new(label: &str, min: f64) -> Self {
        Band {
            label: label.to_string(),
            min,
        }
    }
}

/// One-dimensional classification, e.g. Latin honors, standing, or the
/// percentage-to-letter conversion.
///
/// | Example             | Min  |
/// |---------------------|------|
/// | Summa Cum Laude     | 3.90 |
/// | Magna Cum Laude     | 3.70 |
/// | Cum Laude           | 3.50 |
/// | (floor) No Honors   |      |
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable<L = String> {
    bands: Vec<Band<L>>,
    floor: L,
}

impl<L: fmt::Display> BandTable<L> {
    /// Validates that minimums are finite and strictly descending.
    pub fn new(bands: Vec<Band<L>>, floor: impl Into<L>) -> Result<Self> {
        for band in &bands {
            if !band.min.is_finite() {
                bail!("band '{}' has a non-finite minimum", band.label);
            }
        }
        for pair in bands.windows(2) {
            if pair[1].min >= pair[0].min {
                bail!(
                    "band '{}' ({}) must sit strictly below '{}' ({})",
                    pair[1].label,
                    pair[1].min,
                    pair[0].label,
                    pair[0].min
                );
            }
        }

        Ok(BandTable {
            bands,
            floor: floor.into(),
        })
    }

    pub fn classify(&self, value: f64) -> &L {
        self.bands
            .iter()
            .find(|band| value >= band.min)
            .map(|band| &band.label)
            .unwrap_or(&self.floor)
    }

    pub fn bands(&self) -> &[Band<L>] {
        &self.bands
    }

    pub fn floor(&self) -> &L {
        &self.floor
    }
}

#[derive(Deserialize)]
struct RawBandTable {
    bands: Vec<Band>,
    floor: String,
}

impl<'de> Deserialize<'de> for BandTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBandTable::deserialize(deserializer)?;
        BandTable::new(raw.bands, raw.floor).map_err(serde::de::Error::custom)
    }
}

/// A tier that needs both an overall and a science minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualTier {
    pub label: String,
    pub overall_min: f64,
    pub science_min: f64,
}

impl DualTier {
    pub fn new(label: &str, overall_min: f64, science_min: f64) -> Self {
        DualTier {
            label: label.to_string(),
            overall_min,
            science_min,
        }
    }

    fn admits(&self, overall: f64, science: f64) -> bool {
        overall >= self.overall_min && science >= self.science_min
    }
}

/// Two-axis classification: the first tier whose minimums are BOTH met wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualTierTable {
    tiers: Vec<DualTier>,
    floor: String,
}

impl DualTierTable {
    /// Each tier must be no stricter than the one above it on either axis,
    /// and strictly looser on at least one.
    pub fn new(tiers: Vec<DualTier>, floor: &str) -> Result<Self> {
        for tier in &tiers {
            if !tier.overall_min.is_finite() || !tier.science_min.is_finite() {
                bail!("tier '{}' has a non-finite minimum", tier.label);
            }
        }
        for pair in tiers.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            let looser_overall = lower.overall_min <= upper.overall_min;
            let looser_science = lower.science_min <= upper.science_min;
            let distinct =
                lower.overall_min < upper.overall_min || lower.science_min < upper.science_min;
            if !(looser_overall && looser_science && distinct) {
                bail!(
                    "tier '{}' must be looser than '{}' on both axes",
                    lower.label,
                    upper.label
                );
            }
        }

        Ok(DualTierTable {
            tiers,
            floor: floor.to_string(),
        })
    }

    pub fn classify(&self, overall: f64, science: f64) -> &str {
        self.tiers
            .iter()
            .find(|tier| tier.admits(overall, science))
            .map(|tier| tier.label.as_str())
            .unwrap_or(self.floor.as_str())
    }

    pub fn tiers(&self) -> &[DualTier] {
        &self.tiers
    }
}

#[derive(Deserialize)]
struct RawDualTierTable {
    tiers: Vec<DualTier>,
    floor: String,
}

impl<'de> Deserialize<'de> for DualTierTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDualTierTable::deserialize(deserializer)?;
        DualTierTable::new(raw.tiers, &raw.floor).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitiveness() -> BandTable {
        BandTable::new(
            vec![
                Band::new("Highly Competitive", 3.7),
                Band::new("Competitive", 3.5),
                Band::new("Moderately Competitive", 3.2),
                Band::new("Meets Minimum", 3.0),
            ],
            "Below Minimum",
        )
        .unwrap()
    }

    fn applicant_tiers() -> DualTierTable {
        DualTierTable::new(
            vec![
                DualTier::new("Top-Tier", 3.6, 3.5),
                DualTier::new("Competitive", 3.3, 3.2),
                DualTier::new("Meets Minimums", 3.0, 3.0),
            ],
            "Below Minimums",
        )
        .unwrap()
    }

    #[test]
    fn test_band_boundaries() {
        let table = competitiveness();
        assert_eq!(table.classify(4.0), "Highly Competitive");
        assert_eq!(table.classify(3.7), "Highly Competitive");
        assert_eq!(table.classify(3.69), "Competitive");
        assert_eq!(table.classify(3.5), "Competitive");
        assert_eq!(table.classify(3.49), "Moderately Competitive");
        assert_eq!(table.classify(3.0), "Meets Minimum");
        assert_eq!(table.classify(2.99), "Below Minimum");
        assert_eq!(table.classify(0.0), "Below Minimum");
    }

    #[test]
    fn test_nan_falls_to_floor() {
        assert_eq!(competitiveness().classify(f64::NAN), "Below Minimum");
    }

    #[test]
    fn test_overlapping_bands_rejected() {
        let result = BandTable::new(vec![Band::new("High", 3.0), Band::new("Higher", 3.5)], "Low");
        assert!(result.is_err());

        let duplicate = BandTable::new(vec![Band::new("A", 3.0), Band::new("B", 3.0)], "Low");
        assert!(duplicate.is_err());

        let infinite = BandTable::new(vec![Band::new("A", f64::INFINITY)], "Low");
        assert!(infinite.is_err());
    }

    #[test]
    fn test_empty_table_is_all_floor() {
        let table: BandTable = BandTable::new(Vec::new(), "Unranked").unwrap();
        assert_eq!(table.classify(4.0), "Unranked");
    }

    #[test]
    fn test_band_table_deserialize_validates() {
        let ok: BandTable = serde_json::from_str(
            r#"{"bands":[{"label":"Cum Laude","min":3.5}],"floor":"None"}"#,
        )
        .unwrap();
        assert_eq!(ok.classify(3.6), "Cum Laude");

        let bad = serde_json::from_str::<BandTable>(
            r#"{"bands":[{"label":"Low","min":2.0},{"label":"High","min":3.0}],"floor":"None"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_static_labels() {
        let table: BandTable<&'static str> = BandTable::new(
            vec![Band { label: "Pass", min: 60.0 }],
            "Fail",
        )
        .unwrap();
        assert_eq!(*table.classify(72.5), "Pass");
        assert_eq!(*table.classify(59.9), "Fail");
        assert_eq!(*table.floor(), "Fail");

        let unordered = BandTable::<&'static str>::new(
            vec![Band { label: "D", min: 60.0 }, Band { label: "C", min: 70.0 }],
            "F",
        );
        assert!(unordered.is_err());
    }

    #[test]
    fn test_dual_tier_requires_both_axes() {
        let table = applicant_tiers();
        assert_eq!(table.classify(3.8, 3.6), "Top-Tier");
        assert_eq!(table.classify(3.8, 3.4), "Competitive");
        assert_eq!(table.classify(3.5, 3.9), "Competitive");
        assert_eq!(table.classify(3.9, 2.9), "Below Minimums");
        assert_eq!(table.classify(3.0, 3.0), "Meets Minimums");
    }

    #[test]
    fn test_dual_tier_rejects_stricter_lower_tier() {
        let result = DualTierTable::new(
            vec![DualTier::new("Top", 3.6, 3.0), DualTier::new("Next", 3.3, 3.2)],
            "Floor",
        );
        assert!(result.is_err());
    }
}
