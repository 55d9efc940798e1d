use std::fmt;

use thiserror::Error;

use super::model::{Dataset, LaunchRecord};

/// Dropdown token meaning "no site constraint".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Control state: payload interval + site selection
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("payload bounds must be finite, got [{0}, {1}]")]
    NonFinite(f64, f64),
    #[error("payload minimum must be non-negative, got {0}")]
    NegativeMin(f64),
    #[error("payload minimum {min} exceeds maximum {max}")]
    Inverted { min: f64, max: f64 },
}

/// Closed payload interval `[min, max]` in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    pub fn new(min: f64, max: f64) -> Result<Self, FilterError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(FilterError::NonFinite(min, max));
        }
        if min < 0.0 {
            return Err(FilterError::NegativeMin(min));
        }
        if min > max {
            return Err(FilterError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, mass: f64) -> bool {
        self.min <= mass && mass <= self.max
    }
}

impl fmt::Display for PayloadRange {
    /// `1000-2000`; integral bounds are printed without a fraction.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_mass(self.min), format_mass(self.max))
    }
}

pub fn format_mass(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// Dropdown selection: the `ALL` sentinel or one launch site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown token; `ALL` maps to [`SiteSelection::All`].
    pub fn from_token(token: &str) -> Self {
        if token == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(token.to_string())
        }
    }

    pub fn token(&self) -> &str {
        match self {
            SiteSelection::All => ALL_SITES,
            SiteSelection::Site(s) => s,
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

/// Current values of the two controls. Passed by reference into every
/// callback; never shared mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub payload_range: PayloadRange,
    pub site: SiteSelection,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records with payload in `range` and, unless `site` is `All`, launched
/// from `site`. Order-preserving; an empty result is valid.
pub fn filter<'a>(
    dataset: &'a Dataset,
    range: &PayloadRange,
    site: &SiteSelection,
) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|rec| passes(rec, range, site))
        .collect()
}

/// Same selection as [`filter`], as row indices into the dataset.
pub fn filtered_indices(dataset: &Dataset, controls: &ControlState) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| passes(rec, &controls.payload_range, &controls.site))
        .map(|(i, _)| i)
        .collect()
}

fn passes(rec: &LaunchRecord, range: &PayloadRange, site: &SiteSelection) -> bool {
    range.contains(rec.payload_mass) && site.matches(&rec.launch_site)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64) -> PayloadRange {
        PayloadRange::new(min, max).unwrap()
    }

    #[test]
    fn full_range_all_sites_is_identity() {
        let ds = Dataset::sample();
        let out = filter(&ds, &range(0.0, 10000.0), &SiteSelection::All);
        let expected: Vec<&LaunchRecord> = ds.records().iter().collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn only_records_inside_closed_interval_are_kept() {
        let ds = Dataset::sample();
        for (min, max) in [(0.0, 0.0), (1000.0, 1000.0), (1500.0, 2500.0), (2600.0, 9000.0)] {
            let r = range(min, max);
            let out = filter(&ds, &r, &SiteSelection::All);
            assert!(out.iter().all(|rec| rec.payload_mass >= min && rec.payload_mass <= max));
            let expected = ds.records().iter().filter(|rec| r.contains(rec.payload_mass)).count();
            assert_eq!(out.len(), expected);
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = Dataset::sample();
        let out = filter(&ds, &range(1000.0, 3000.0), &SiteSelection::All);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn site_and_range_combine() {
        let ds = Dataset::sample();
        let site = SiteSelection::from_token("CCAFS LC-40");
        let out = filter(&ds, &range(1000.0, 2000.0), &site);
        let masses: Vec<f64> = out.iter().map(|r| r.payload_mass).collect();
        assert_eq!(masses, [1000.0, 1500.0]);
    }

    #[test]
    fn unknown_site_yields_empty() {
        let ds = Dataset::sample();
        let out = filter(&ds, &range(0.0, 10000.0), &SiteSelection::from_token("LC-99"));
        assert!(out.is_empty());
    }

    #[test]
    fn indices_match_filtered_records() {
        let ds = Dataset::sample();
        let controls = ControlState {
            payload_range: range(1500.0, 3000.0),
            site: SiteSelection::from_token("VAFB SLC-4E"),
        };
        assert_eq!(filtered_indices(&ds, &controls), [1, 4]);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert_eq!(
            PayloadRange::new(2000.0, 1000.0),
            Err(FilterError::Inverted { min: 2000.0, max: 1000.0 })
        );
        assert!(matches!(PayloadRange::new(-1.0, 5.0), Err(FilterError::NegativeMin(_))));
        assert!(matches!(PayloadRange::new(0.0, f64::INFINITY), Err(FilterError::NonFinite(..))));
    }

    #[test]
    fn all_token_round_trips() {
        assert_eq!(SiteSelection::from_token("ALL"), SiteSelection::All);
        assert_eq!(SiteSelection::All.token(), "ALL");
        assert_eq!(range(0.0, 10000.0).to_string(), "0-10000");
        assert_eq!(range(0.5, 2.0).to_string(), "0.5-2");
    }
}
