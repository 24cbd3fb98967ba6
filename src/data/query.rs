use std::collections::BTreeMap;

use serde::Serialize;

use super::error::QueryError;
use super::model::{LaunchDataset, LaunchRecord, OutcomeClass, PayloadRange, SiteFilter};

// ---------------------------------------------------------------------------
// Result tables
// ---------------------------------------------------------------------------

/// Sum of `class` over one site's launches, i.e. its number of successes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSuccessWeight {
    pub site: String,
    pub success_weight: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub outcome: OutcomeClass,
    pub count: u64,
}

/// Result of [`outcome_breakdown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Breakdown {
    /// All sites: success weight per site, in first-seen site order.
    BySite(Vec<SiteSuccessWeight>),
    /// One site: launch count per outcome class present, ascending class.
    ByOutcome {
        site: String,
        counts: Vec<OutcomeCount>,
    },
}

impl Breakdown {
    /// Sum of all slice values.
    pub fn total(&self) -> u64 {
        match self {
            Breakdown::BySite(rows) => rows.iter().map(|r| r.success_weight).sum(),
            Breakdown::ByOutcome { counts, .. } => counts.iter().map(|c| c.count).sum(),
        }
    }

    /// `(label, value)` pairs in result order, ready for a proportion chart.
    pub fn slices(&self) -> Vec<(String, u64)> {
        match self {
            Breakdown::BySite(rows) => rows
                .iter()
                .map(|r| (r.site.clone(), r.success_weight))
                .collect(),
            Breakdown::ByOutcome { counts, .. } => counts
                .iter()
                .map(|c| (c.outcome.to_string(), c.count))
                .collect(),
        }
    }

    pub fn value_label(&self) -> &'static str {
        match self {
            Breakdown::BySite(_) => "Number of launches",
            Breakdown::ByOutcome { .. } => "Launch result",
        }
    }
}

/// One point of the payload / outcome scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub payload_mass_kg: f64,
    pub outcome: OutcomeClass,
    pub booster_version_category: String,
}

impl From<&LaunchRecord> for CorrelationPoint {
    fn from(rec: &LaunchRecord) -> Self {
        CorrelationPoint {
            payload_mass_kg: rec.payload_mass_kg,
            outcome: rec.outcome,
            booster_version_category: rec.booster_version_category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Outcome proportions for the selected site(s).
///
/// * `AllSites` → success weight (sum of `class`) per site. Failures add
///   nothing, so this is a success-share-by-site view rather than a
///   success/failure split. Every site of the dataset gets an entry.
/// * a specific site → count per outcome class present at that site.
///   Fails with [`QueryError::UnknownSite`] when the site has no records.
pub fn outcome_breakdown(
    dataset: &LaunchDataset,
    site: &SiteFilter,
) -> Result<Breakdown, QueryError> {
    match site {
        SiteFilter::AllSites => {
            let mut weights: BTreeMap<&str, u64> = BTreeMap::new();
            for rec in dataset.records() {
                *weights.entry(rec.launch_site.as_str()).or_default() +=
                    u64::from(rec.outcome.value());
            }
            let rows = dataset
                .distinct_sites()
                .iter()
                .map(|s| SiteSuccessWeight {
                    site: s.clone(),
                    success_weight: weights.get(s.as_str()).copied().unwrap_or(0),
                })
                .collect();
            Ok(Breakdown::BySite(rows))
        }
        SiteFilter::Site(name) => {
            let mut counts: BTreeMap<OutcomeClass, u64> = BTreeMap::new();
            for rec in dataset.records().iter().filter(|r| &r.launch_site == name) {
                *counts.entry(rec.outcome).or_default() += 1;
            }
            if counts.is_empty() {
                return Err(QueryError::UnknownSite(name.clone()));
            }
            Ok(Breakdown::ByOutcome {
                site: name.clone(),
                counts: counts
                    .into_iter()
                    .map(|(outcome, count)| OutcomeCount { outcome, count })
                    .collect(),
            })
        }
    }
}

/// Per-launch `(payload, class, booster category)` projection.
///
/// With `AllSites` the payload range is ignored and every record is returned.
/// With a specific site the records are filtered to that site and to the
/// inclusive payload range. Dataset order is preserved; an empty match is an
/// empty vector.
pub fn payload_correlation(
    dataset: &LaunchDataset,
    site: &SiteFilter,
    range: &PayloadRange,
) -> Vec<CorrelationPoint> {
    match site {
        SiteFilter::AllSites => dataset.records().iter().map(CorrelationPoint::from).collect(),
        SiteFilter::Site(name) => dataset
            .records()
            .iter()
            .filter(|r| &r.launch_site == name && range.contains(r.payload_mass_kg))
            .map(CorrelationPoint::from)
            .collect(),
    }
}
