use crate::color::ConferenceColors;
use crate::config::{AppConfig, MetricSpec, Projection};
use crate::data::filter::{FilterEvent, FilterReducer, FilterState, filtered_indices};
use crate::data::model::{Dataset, Record, RecordKey, WIN_PCT};
use crate::layout::{Positioned, Simulation, Viewport};
use crate::select::{
    AngularRangeSelector, ArcGeometry, LinearRangeSelector, SeedSelector, YearSelector,
};

/// Pixel extent used until a widget reports its real width.
const INITIAL_PIXEL_RANGE: (f64, f64) = (0.0, 200.0);

const INITIAL_ARC: ArcGeometry = ArcGeometry {
    center: (100.0, 100.0),
    radius: 80.0,
    tolerance: 14.0,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A selector plus the label shown above it.
#[derive(Debug, Clone)]
pub struct MetricSelector<S> {
    pub label: String,
    pub selector: S,
}

/// The full UI state, independent of rendering.
///
/// Owns the only [`FilterReducer`]; widgets hand their events to
/// [`AppState::dispatch`] and never touch the filter state directly.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    reducer: FilterReducer,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub years: YearSelector,
    pub seeds: SeedSelector,
    pub win_pct: Option<LinearRangeSelector>,
    pub linear: Vec<MetricSelector<LinearRangeSelector>>,
    pub angular: Vec<MetricSelector<AngularRangeSelector>>,

    pub simulation: Simulation,
    pub colors: ConferenceColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let viewport = Viewport::new(800.0, 600.0, config.layout.margin);
        Self {
            simulation: Simulation::new(viewport, config.layout),
            years: YearSelector::new(std::iter::empty(), config.blocked_year),
            config,
            dataset: None,
            reducer: FilterReducer::new(),
            visible_indices: Vec::new(),
            seeds: SeedSelector::new(),
            win_pct: None,
            linear: Vec::new(),
            angular: Vec::new(),
            colors: ConferenceColors::new(std::iter::empty()),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset: fresh selectors, no filters, and a
    /// layout restarted from scratch.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.years = YearSelector::new(dataset.years(), self.config.blocked_year);
        self.seeds = SeedSelector::new();
        self.win_pct = Some(LinearRangeSelector::win_pct(
            &dataset.values(WIN_PCT),
            INITIAL_PIXEL_RANGE,
            self.config.win_pct_bins,
        ));

        let bins = self.config.metric_bins;
        self.linear = self
            .config
            .metrics_with(Projection::Linear)
            .filter_map(|spec| {
                let (values, domain) = metric_inputs(&dataset, spec)?;
                Some(MetricSelector {
                    label: spec.label.clone(),
                    selector: LinearRangeSelector::new(
                        spec.name.as_str(),
                        &values,
                        domain,
                        INITIAL_PIXEL_RANGE,
                        bins,
                    ),
                })
            })
            .collect();
        self.angular = self
            .config
            .metrics_with(Projection::Angular)
            .filter_map(|spec| {
                let (values, domain) = metric_inputs(&dataset, spec)?;
                Some(MetricSelector {
                    label: spec.label.clone(),
                    selector: AngularRangeSelector::new(
                        spec.name.as_str(),
                        &values,
                        domain,
                        INITIAL_ARC,
                        bins,
                    ),
                })
            })
            .collect();

        self.colors = ConferenceColors::new(&dataset.records);
        self.reducer.clear_all();
        self.visible_indices = (0..dataset.len()).collect();
        self.years.set_counts(&dataset.records);
        self.simulation.replace(dataset.records.iter().map(Record::key));

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    pub fn filters(&self) -> &FilterState {
        self.reducer.state()
    }

    /// Apply one selector event and bring the view up to date.
    pub fn dispatch(&mut self, event: FilterEvent) {
        self.reducer.dispatch(event);
        self.refilter();
    }

    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = FilterEvent>) {
        let mut changed = false;
        for event in events {
            self.reducer.dispatch(event);
            changed = true;
        }
        if changed {
            self.refilter();
        }
    }

    /// Clear every selector and every filter.
    pub fn reset_all(&mut self) {
        self.years.reset();
        self.seeds.reset();
        if let Some(sel) = &mut self.win_pct {
            sel.reset();
        }
        for m in &mut self.linear {
            m.selector.reset();
        }
        for m in &mut self.angular {
            m.selector.reset();
        }
        self.reducer.clear_all();
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter change. Surviving bubbles
    /// keep their positions.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(&ds.records, self.reducer.state());
        let visible = self.visible_indices.iter().map(|&i| &ds.records[i]);
        self.years.set_counts(visible.clone());
        self.simulation.set_items(visible.map(Record::key));
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        let records = self
            .dataset
            .as_ref()
            .map(|ds| ds.records.as_slice())
            .unwrap_or(&[]);
        self.visible_indices.iter().filter_map(move |&i| records.get(i))
    }

    /// The record a layout slot stands for.
    pub fn record_at(&self, placed: &Positioned) -> Option<&Record> {
        let ds = self.dataset.as_ref()?;
        let &index = self.visible_indices.get(placed.index)?;
        ds.records.get(index)
    }

    pub fn visible_record(&self, key: &RecordKey) -> Option<&Record> {
        self.visible_records()
            .find(|r| r.team == key.team && r.year == key.year)
    }
}

/// Values and observed domain for a configured metric, `None` (with a warning)
/// when the dataset has no numeric values for it.
fn metric_inputs(dataset: &Dataset, spec: &MetricSpec) -> Option<(Vec<f64>, (f64, f64))> {
    let Some(domain) = dataset.domain(&spec.name) else {
        log::warn!("metric {} has no numeric values, selector skipped", spec.name);
        return None;
    };
    Some((dataset.values(&spec.name), domain))
}
