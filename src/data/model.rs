use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Launch outcome. Stored in source tables as `1` (success) / `0` (failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Numeric class value as it appears in the source table.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.class())
    }
}

impl From<Outcome> for u8 {
    fn from(o: Outcome) -> Self {
        o.class()
    }
}

impl TryFrom<i64> for Outcome {
    type Error = RecordError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(RecordError::InvalidOutcome(other.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

// ---------------------------------------------------------------------------
// Record validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("payload mass must be finite and non-negative, got {0}")]
    InvalidPayload(f64),
    #[error("launch outcome must be 0 or 1, got '{0}'")]
    InvalidOutcome(String),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Kilograms.
    pub payload_mass: f64,
    #[serde(rename = "class")]
    pub outcome: Outcome,
    #[serde(rename = "Booster Version Category")]
    pub booster_category: String,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass: f64,
        outcome: Outcome,
        booster_category: impl Into<String>,
    ) -> Result<Self, RecordError> {
        if !payload_mass.is_finite() || payload_mass < 0.0 {
            return Err(RecordError::InvalidPayload(payload_mass));
        }
        Ok(Self {
            launch_site: launch_site.into(),
            payload_mass,
            outcome,
            booster_category: booster_category.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full immutable table with pre-computed category indices.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-seen order (drives the dropdown).
    sites: Vec<String>,
    /// Distinct booster categories, sorted (drives scatter colours).
    booster_categories: BTreeSet<String>,
}

impl Dataset {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        for rec in &records {
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_category.clone());
        }
        Dataset {
            records,
            sites,
            booster_categories,
        }
    }

    /// The built-in five-row illustrative table.
    pub fn sample() -> Self {
        const ROWS: [(&str, f64, Outcome, &str); 5] = [
            ("CCAFS LC-40", 1000.0, Outcome::Success, "v1.0"),
            ("VAFB SLC-4E", 2000.0, Outcome::Failure, "v1.1"),
            ("CCAFS LC-40", 1500.0, Outcome::Success, "v1.2"),
            ("KSC LC-39A", 2500.0, Outcome::Success, "v1.1"),
            ("VAFB SLC-4E", 3000.0, Outcome::Failure, "v1.0"),
        ];
        let records = ROWS
            .iter()
            .map(|&(site, mass, outcome, booster)| LaunchRecord {
                launch_site: site.to_string(),
                payload_mass: mass,
                outcome,
                booster_category: booster.to_string(),
            })
            .collect();
        Self::from_records(records)
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_five_rows_and_three_sites() {
        let ds = Dataset::sample();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        let boosters: Vec<&str> = ds.booster_categories().iter().map(String::as_str).collect();
        assert_eq!(boosters, ["v1.0", "v1.1", "v1.2"]);
    }

    #[test]
    fn negative_payload_is_rejected() {
        let err = LaunchRecord::new("KSC LC-39A", -1.0, Outcome::Success, "v1.0").unwrap_err();
        assert_eq!(err, RecordError::InvalidPayload(-1.0));
        assert!(LaunchRecord::new("KSC LC-39A", f64::NAN, Outcome::Success, "v1.0").is_err());
    }

    #[test]
    fn outcome_parses_only_binary_classes() {
        assert_eq!(Outcome::try_from(1_i64), Ok(Outcome::Success));
        assert_eq!(Outcome::try_from(0_i64), Ok(Outcome::Failure));
        assert!(Outcome::try_from(2_i64).is_err());
    }

    #[test]
    fn record_serializes_with_source_column_names() {
        let rec = LaunchRecord::new("CCAFS LC-40", 1000.0, Outcome::Success, "v1.0").unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["class"], 1);
        assert_eq!(json["Booster Version Category"], "v1.0");

        let failed = LaunchRecord::new("VAFB SLC-4E", 2000.0, Outcome::Failure, "v1.1").unwrap();
        assert_eq!(serde_json::to_value(&failed).unwrap()["class"], 0);
    }
}
