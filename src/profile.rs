//! Calculator profiles: one scale, one weighting policy and the label
//! tables a given calculator variant reports.
//!
//! Built-in profiles ship in `profiles/builtin.json`. More can be loaded
//! from a JSON file of the same shape:
//! ```json
//! [
//!   {
//!     "name": "state-honors",
//!     "scale": "standard",
//!     "policy": "weighted",
//!     "latin_honors": {
//!       "bands": [{ "label": "With Distinction", "min": 3.6 }],
//!       "floor": "No Distinction"
//!     }
//!   }
//! ]
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::engine::aggregate::GpaResult;
use crate::engine::bands::{BandTable, DualTierTable};
use crate::engine::policy::{PolicyKind, WeightingPolicy};
use crate::engine::scale::{GradeScaleTable, ScaleKind};

const BUILTIN_PROFILES: &str = include_str!("../profiles/builtin.json");

/// Per-semester Dean's list requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeansListRule {
    pub min_gpa: f64,
    pub min_credits: f64,
}

impl DeansListRule {
    /// Both the term GPA and the counted term credits must reach the minimum.
    pub fn qualifies(&self, term: &GpaResult) -> bool {
        match term.gpa {
            Some(gpa) => gpa >= self.min_gpa && term.total_credits >= self.min_credits,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scale: ScaleKind,
    pub policy: PolicyKind,
    #[serde(default)]
    pub standing: Option<BandTable>,
    #[serde(default)]
    pub latin_honors: Option<BandTable>,
    #[serde(default)]
    pub competitiveness: Option<BandTable>,
    #[serde(default)]
    pub applicant_tiers: Option<DualTierTable>,
    #[serde(default)]
    pub deans_list: Option<DeansListRule>,
}

impl CalculatorProfile {
    /// A bare profile with no label tables.
    pub fn new(name: &str, scale: ScaleKind, policy: PolicyKind) -> Self {
        CalculatorProfile {
            name: name.to_string(),
            description: String::new(),
            scale,
            policy,
            standing: None,
            latin_honors: None,
            competitiveness: None,
            applicant_tiers: None,
            deans_list: None,
        }
    }

    pub fn scale_table(&self) -> &'static GradeScaleTable {
        self.scale.table()
    }

    pub fn weighting(&self) -> &'static dyn WeightingPolicy {
        self.policy.policy()
    }

    /// Ceiling for GPAs under this profile, bonuses included.
    pub fn max_points(&self) -> f64 {
        self.weighting().max_points(self.scale_table())
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("profile name must not be empty");
        }
        if let Some(rule) = &self.deans_list {
            if !rule.min_gpa.is_finite() || !rule.min_credits.is_finite() || rule.min_credits < 0.0 {
                bail!("profile '{}' has an invalid Dean's list rule", self.name);
            }
        }
        Ok(())
    }
}

/// Named set of calculator profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, CalculatorProfile>,
}

impl ProfileCatalog {
    /// The profiles compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_PROFILES).context("built-in profiles are malformed")
    }

    /// Parses a JSON array of profiles. Band tables are validated while
    /// parsing; duplicate names are rejected.
    pub fn from_json(content: &str) -> Result<Self> {
        let list: Vec<CalculatorProfile> = serde_json::from_str(content)?;
        let mut profiles = BTreeMap::new();

        for profile in list {
            profile.validate()?;
            let name = profile.name.clone();
            if profiles.insert(name.clone(), profile).is_some() {
                bail!("duplicate profile '{}'", name);
            }
        }

        Ok(Self { profiles })
    }

    /// Loads profiles from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profiles from {}", path.display()))?;
        let catalog = Self::from_json(&content)
            .with_context(|| format!("invalid profile file {}", path.display()))?;
        debug!(path = %path.display(), count = catalog.profiles.len(), "Loaded profiles");
        Ok(catalog)
    }

    /// Adds `other`'s profiles, replacing any with the same name.
    pub fn merge(&mut self, other: ProfileCatalog) {
        self.profiles.extend(other.profiles);
    }

    pub fn get(&self, name: &str) -> Result<&CalculatorProfile> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile),
            None => {
                let known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
                bail!("unknown profile '{}' (available: {})", name, known.join(", "))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalculatorProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_builtin_profiles_parse() {
        let catalog = ProfileCatalog::builtin().unwrap();
        for name in ["standard", "weighted", "college", "caspa", "percentage"] {
            assert!(catalog.get(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_builtin_caspa_profile() {
        let catalog = ProfileCatalog::builtin().unwrap();
        let caspa = catalog.get("caspa").unwrap();
        assert_eq!(caspa.scale, ScaleKind::Caspa);
        assert_eq!(caspa.policy, PolicyKind::ScienceSplit);
        let tiers = caspa.applicant_tiers.as_ref().unwrap();
        assert_eq!(tiers.classify(3.65, 3.55), "Top-Tier");
        let bands = caspa.competitiveness.as_ref().unwrap();
        assert_eq!(bands.classify(3.69), "Competitive");
    }

    #[test]
    fn test_unknown_profile_lists_choices() {
        let catalog = ProfileCatalog::builtin().unwrap();
        let err = catalog.get("nope").unwrap_err().to_string();
        assert!(err.contains("standard"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"[
            {"name": "a", "scale": "standard", "policy": "unweighted"},
            {"name": "a", "scale": "caspa", "policy": "unweighted"}
        ]"#;
        assert!(ProfileCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_band_order_rejected() {
        let json = r#"[{
            "name": "broken",
            "scale": "standard",
            "policy": "unweighted",
            "standing": {"bands": [{"label": "Low", "min": 1.0}, {"label": "High", "min": 2.0}], "floor": "x"}
        }]"#;
        assert!(ProfileCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_load_and_merge_overrides_builtin() {
        let path = temp_path("gpa_rater_test_profiles.json");
        fs::write(
            &path,
            r#"[{"name": "standard", "description": "custom", "scale": "plus433", "policy": "weighted"}]"#,
        )
        .unwrap();

        let mut catalog = ProfileCatalog::builtin().unwrap();
        let before = catalog.len();
        catalog.merge(ProfileCatalog::load(&path).unwrap());

        let standard = catalog.get("standard").unwrap();
        assert_eq!(standard.scale, ScaleKind::Plus433);
        assert_eq!(standard.description, "custom");
        assert_eq!(catalog.len(), before);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ProfileCatalog::load(&temp_path("gpa_rater_does_not_exist.json")).is_err());
    }

    #[test]
    fn test_deans_list_rule() {
        let rule = DeansListRule {
            min_gpa: 3.5,
            min_credits: 12.0,
        };
        let term = |gpa: Option<f64>, credits: f64| GpaResult {
            gpa,
            total_credits: credits,
            ..Default::default()
        };

        assert!(rule.qualifies(&term(Some(3.5), 12.0)));
        assert!(!rule.qualifies(&term(Some(3.9), 9.0)));
        assert!(!rule.qualifies(&term(Some(3.4), 15.0)));
        assert!(!rule.qualifies(&term(None, 15.0)));
    }
}
