use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::{LoadError, QueryError};

/// Column names every source must provide.
pub const LAUNCH_SITE: &str = "Launch_Site";
pub const PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const CLASS: &str = "class";

pub const REQUIRED_COLUMNS: [&str; 4] = [LAUNCH_SITE, PAYLOAD_MASS, BOOSTER_CATEGORY, CLASS];

// ---------------------------------------------------------------------------
// OutcomeClass – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome. Ordered so that `Failure < Success`, matching 0 < 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    /// Numeric value of the class: 0 or 1.
    pub fn value(self) -> u8 {
        match self {
            OutcomeClass::Failure => 0,
            OutcomeClass::Success => 1,
        }
    }
}

impl From<OutcomeClass> for u8 {
    fn from(class: OutcomeClass) -> Self {
        class.value()
    }
}

impl TryFrom<i64> for OutcomeClass {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OutcomeClass::Failure),
            1 => Ok(OutcomeClass::Success),
            other => Err(format!("class must be 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    pub outcome: OutcomeClass,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded dataset with its statistics pre-computed.
///
/// Built once through [`LaunchDataset::from_records`] and never mutated, so a
/// single `Arc<LaunchDataset>` can be read from anywhere without locking.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Unique sites in first-seen order.
    sites: Vec<String>,
    /// Sorted unique booster categories.
    booster_categories: BTreeSet<String>,
    /// `(min, max)` payload; `None` for an empty dataset.
    payload_bounds: Option<(f64, f64)>,
}

impl LaunchDataset {
    /// Validate the rows and build the derived indices.
    ///
    /// Fails on the first row with an empty site or booster category, or a
    /// negative / non-finite payload. Row numbers in errors are zero-based data rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<(f64, f64)> = None;

        for (row, rec) in records.iter().enumerate() {
            if rec.launch_site.trim().is_empty() {
                return Err(LoadError::invalid_field(row, LAUNCH_SITE, "empty value"));
            }
            if rec.booster_version_category.trim().is_empty() {
                return Err(LoadError::invalid_field(row, BOOSTER_CATEGORY, "empty value"));
            }
            let mass = rec.payload_mass_kg;
            if !mass.is_finite() || mass < 0.0 {
                return Err(LoadError::invalid_field(
                    row,
                    PAYLOAD_MASS,
                    format!("payload must be a non-negative number, got {mass}"),
                ));
            }

            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_version_category.clone());
            payload_bounds = Some(match payload_bounds {
                None => (mass, mass),
                Some((lo, hi)) => (lo.min(mass), hi.max(mass)),
            });
        }

        Ok(LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Unique launch sites in the order they first appear in the source.
    pub fn distinct_sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    pub fn min_payload(&self) -> Result<f64, QueryError> {
        self.payload_bounds().map(|(lo, _)| lo)
    }

    pub fn max_payload(&self) -> Result<f64, QueryError> {
        self.payload_bounds().map(|(_, hi)| hi)
    }

    /// `(min, max)` payload mass over all records.
    pub fn payload_bounds(&self) -> Result<(f64, f64), QueryError> {
        self.payload_bounds.ok_or(QueryError::EmptyDataset)
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

// ---------------------------------------------------------------------------
// Request values
// ---------------------------------------------------------------------------

/// Which launch site a query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SiteFilter {
    #[default]
    AllSites,
    Site(String),
}

impl SiteFilter {
    /// Selection-list value standing for every site.
    pub const ALL: &'static str = "All";

    pub fn site(name: impl Into<String>) -> Self {
        SiteFilter::Site(name.into())
    }

    /// Human-readable label for selection lists and chart titles.
    pub fn label(&self) -> &str {
        match self {
            SiteFilter::AllSites => "All Launch Sites",
            SiteFilter::Site(name) => name,
        }
    }
}

impl fmt::Display for SiteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteFilter::AllSites => write!(f, "{}", Self::ALL),
            SiteFilter::Site(name) => write!(f, "{name}"),
        }
    }
}

/// Inclusive payload-mass interval `[low, high]`.
///
/// Only the shape is checked (`0 <= low <= high`, both finite); the bounds may
/// lie outside the dataset's own min/max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, QueryError> {
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err(QueryError::InvalidRange { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, mass: f64) -> bool {
        self.low <= mass && mass <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

#[cfg(test)]
pub(crate) fn record(site: &str, mass: f64, booster: &str, class: i64) -> LaunchRecord {
    LaunchRecord {
        launch_site: site.to_string(),
        payload_mass_kg: mass,
        booster_version_category: booster.to_string(),
        outcome: OutcomeClass::try_from(class).unwrap(),
    }
}
