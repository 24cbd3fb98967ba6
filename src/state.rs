use std::path::PathBuf;
use std::sync::Arc;

use launch_dash::data::error::QueryError;
use launch_dash::data::model::{LaunchDataset, PayloadRange, SiteFilter, BOOSTER_CATEGORY};
use launch_dash::data::query::{
    outcome_breakdown, payload_correlation, Breakdown, CorrelationPoint,
};

use crate::cli::SliderConfig;
use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared read-only with every query.
    pub dataset: Arc<LaunchDataset>,

    /// File the dataset came from.
    pub source: PathBuf,

    /// Current site selection.
    pub site: SiteFilter,

    /// Current payload slider selection.
    pub payload_range: PayloadRange,

    pub slider: SliderConfig,

    /// Outcome breakdown for `site` (cached).
    pub breakdown: Result<Breakdown, QueryError>,

    /// Scatter points for `site` and `payload_range` (cached).
    pub correlation: Vec<CorrelationPoint>,

    /// Booster category colours for the scatter.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the initial state: all sites, slider at the dataset's payload bounds.
    ///
    /// Fails with [`QueryError::EmptyDataset`] when there is nothing to show.
    pub fn new(
        dataset: Arc<LaunchDataset>,
        source: PathBuf,
        slider: SliderConfig,
    ) -> Result<Self, QueryError> {
        let payload_range = initial_range(&dataset)?;
        let color_map = ColorMap::new(BOOSTER_CATEGORY, dataset.booster_categories());

        let mut state = Self {
            dataset,
            source,
            site: SiteFilter::AllSites,
            payload_range,
            slider,
            breakdown: Ok(Breakdown::BySite(Vec::new())),
            correlation: Vec::new(),
            color_map,
            status_message: None,
        };
        state.refresh();
        Ok(state)
    }

    /// Replace the dataset with a newly loaded one.
    ///
    /// An empty dataset is refused and the current one is kept.
    pub fn set_dataset(
        &mut self,
        dataset: LaunchDataset,
        source: PathBuf,
    ) -> Result<(), QueryError> {
        let payload_range = initial_range(&dataset)?;

        self.color_map = ColorMap::new(BOOSTER_CATEGORY, dataset.booster_categories());
        self.dataset = Arc::new(dataset);
        self.source = source;
        self.site = SiteFilter::AllSites;
        self.payload_range = payload_range;
        self.status_message = None;
        self.refresh();
        Ok(())
    }

    /// Change the site selection; both views depend on it.
    pub fn set_site(&mut self, site: SiteFilter) {
        if self.site != site {
            self.site = site;
            self.refresh();
        }
    }

    /// Change the payload selection; only the correlation view depends on it.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if self.payload_range != range {
            self.payload_range = range;
            self.recompute_correlation();
        }
    }

    /// Recompute both views from scratch.
    pub fn refresh(&mut self) {
        self.breakdown = outcome_breakdown(&self.dataset, &self.site);
        match &self.breakdown {
            Ok(b) => log::debug!("breakdown for {}: {} slices", self.site, b.slices().len()),
            Err(e) => log::warn!("breakdown for {}: {e}", self.site),
        }
        self.recompute_correlation();
    }

    fn recompute_correlation(&mut self) {
        self.correlation = payload_correlation(&self.dataset, &self.site, &self.payload_range);
        log::debug!(
            "correlation for {} in {}: {} points",
            self.site,
            self.payload_range,
            self.correlation.len()
        );
    }
}

/// Slider starts at the dataset's own `[min, max]` payload.
fn initial_range(dataset: &LaunchDataset) -> Result<PayloadRange, QueryError> {
    let (low, high) = dataset.payload_bounds()?;
    PayloadRange::new(low, high)
}
