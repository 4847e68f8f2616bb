use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Deserialize;

use super::model::{Record, WIN_PCT};

// ---------------------------------------------------------------------------
// Dimensions and per-dimension specs
// ---------------------------------------------------------------------------

/// One independent filter axis. Every named metric is its own dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seed,
    Metric(String),
}

impl Dimension {
    pub fn metric(name: impl Into<String>) -> Self {
        Dimension::Metric(name.into())
    }

    pub fn win_pct() -> Self {
        Dimension::Metric(WIN_PCT.to_string())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Year => write!(f, "year"),
            Dimension::Seed => write!(f, "seed"),
            Dimension::Metric(name) => write!(f, "{name}"),
        }
    }
}

/// A single dimension's constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterSpec {
    #[default]
    None,
    SingleValue(i32),
    Set(BTreeSet<u8>),
    Range {
        metric: String,
        low: f64,
        high: f64,
    },
}

impl FilterSpec {
    /// Build a range spec with NaN bounds opened up and reversed bounds swapped.
    pub fn range(metric: impl Into<String>, low: f64, high: f64) -> Self {
        let (low, high) = normalize_bounds(low, high);
        FilterSpec::Range {
            metric: metric.into(),
            low,
            high,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FilterSpec::None)
    }

    /// The dimension this spec constrains; `None` constrains nothing.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            FilterSpec::None => None,
            FilterSpec::SingleValue(_) => Some(Dimension::Year),
            FilterSpec::Set(_) => Some(Dimension::Seed),
            FilterSpec::Range { metric, .. } => Some(Dimension::Metric(metric.clone())),
        }
    }

    /// Whether `record` satisfies this spec alone.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FilterSpec::None => true,
            FilterSpec::SingleValue(year) => record.year == Some(*year),
            // An empty set is stored as `None`; treat a stray one the same way.
            FilterSpec::Set(seeds) if seeds.is_empty() => true,
            FilterSpec::Set(seeds) => record.seed.is_some_and(|s| seeds.contains(&s)),
            FilterSpec::Range { metric, low, high } => {
                let (low, high) = normalize_bounds(*low, *high);
                record
                    .value(metric)
                    .is_some_and(|v| low <= v && v <= high)
            }
        }
    }

    /// Canonical storage form: empty sets collapse to `None`, ranges are ordered.
    fn normalized(self) -> Self {
        match self {
            FilterSpec::Set(seeds) if seeds.is_empty() => FilterSpec::None,
            FilterSpec::Range { metric, low, high } => FilterSpec::range(metric, low, high),
            other => other,
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::None => write!(f, "any"),
            FilterSpec::SingleValue(v) => write!(f, "{v}"),
            FilterSpec::Set(values) => {
                let joined: Vec<String> = values.iter().map(u8::to_string).collect();
                write!(f, "{{{}}}", joined.join(","))
            }
            FilterSpec::Range { low, high, .. } => write!(f, "{low:.1}–{high:.1}"),
        }
    }
}

/// NaN bounds become open-ended, then the pair is put in ascending order.
pub fn normalize_bounds(low: f64, high: f64) -> (f64, f64) {
    let low = if low.is_nan() { f64::NEG_INFINITY } else { low };
    let high = if high.is_nan() { f64::INFINITY } else { high };
    if low > high {
        (high, low)
    } else {
        (low, high)
    }
}

// ---------------------------------------------------------------------------
// FilterState: dimension → spec
// ---------------------------------------------------------------------------

/// The full set of active constraints. An absent dimension means "no filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    specs: BTreeMap<Dimension, FilterSpec>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// New state with `spec` in force. `None` removes `dimension`.
    ///
    /// A non-empty spec is always stored under its own dimension, so a range
    /// on `W %` replaces the `W %` entry whatever `dimension` says.
    pub fn apply(&self, dimension: Dimension, spec: FilterSpec) -> FilterState {
        let mut next = self.clone();
        let spec = spec.normalized();
        let Some(key) = spec.dimension() else {
            next.specs.remove(&dimension);
            return next;
        };
        if key != dimension {
            log::warn!("{key} filter offered under {dimension}, stored under {key}");
        }
        next.specs.insert(key, spec);
        next
    }

    pub fn clear(&self, dimension: &Dimension) -> FilterState {
        let mut next = self.clone();
        next.specs.remove(dimension);
        next
    }

    pub fn get(&self, dimension: &Dimension) -> &FilterSpec {
        const NONE: &FilterSpec = &FilterSpec::None;
        self.specs.get(dimension).unwrap_or(NONE)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.specs.len()
    }

    /// The effective predicate: AND over every active dimension.
    pub fn matches(&self, record: &Record) -> bool {
        self.specs.values().all(|spec| spec.matches(record))
    }

    /// One-line summary such as `seed {1,2} · W % 60.0–72.0`.
    pub fn describe(&self) -> String {
        if self.specs.is_empty() {
            return "no filters".to_string();
        }
        self.specs
            .iter()
            .map(|(dim, spec)| format!("{dim} {spec}"))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Records passing `state`, in input order.
pub fn evaluate<'a>(records: &'a [Record], state: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|r| state.matches(r)).collect()
}

/// Indices of records passing `state`, in input order.
pub fn filtered_indices(records: &[Record], state: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| state.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Update events emitted by selectors
// ---------------------------------------------------------------------------

/// What a selector reports after a user gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    Clear(Dimension),
    Range {
        metric: String,
        low: f64,
        high: f64,
    },
    SingleValue(i32),
    Set(BTreeSet<u8>),
}

impl FilterEvent {
    pub fn dimension(&self) -> Dimension {
        match self {
            FilterEvent::Clear(dimension) => dimension.clone(),
            FilterEvent::Range { metric, .. } => Dimension::Metric(metric.clone()),
            FilterEvent::SingleValue(_) => Dimension::Year,
            FilterEvent::Set(_) => Dimension::Seed,
        }
    }

    fn into_spec(self) -> FilterSpec {
        match self {
            FilterEvent::Clear(_) => FilterSpec::None,
            FilterEvent::Range { metric, low, high } => FilterSpec::range(metric, low, high),
            FilterEvent::SingleValue(v) => FilterSpec::SingleValue(v),
            FilterEvent::Set(values) => FilterSpec::Set(values),
        }
    }
}

/// A range bound as it may arrive on the wire: number, numeric string, or junk.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Bound {
    fn value(&self) -> f64 {
        match self {
            Bound::Number(v) => *v,
            Bound::Text(s) => s
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse()
                .unwrap_or(f64::NAN),
            Bound::Other(_) => f64::NAN,
        }
    }
}

/// The three payload shapes a range selector may send:
/// `null`, `[low, high]`, or `{ "metric": "...", "range": [low, high] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RangePayload {
    Named {
        metric: String,
        range: (Bound, Bound),
    },
    Pair(Bound, Bound),
    Clear(()),
}

impl RangePayload {
    /// Resolve to an event; unlabeled pairs bind to `default_metric`.
    pub fn into_event(self, default_metric: &str) -> FilterEvent {
        match self {
            RangePayload::Clear(()) => FilterEvent::Clear(Dimension::metric(default_metric)),
            RangePayload::Pair(low, high) => FilterEvent::Range {
                metric: default_metric.to_string(),
                low: low.value(),
                high: high.value(),
            },
            RangePayload::Named { metric, range } => FilterEvent::Range {
                metric,
                low: range.0.value(),
                high: range.1.value(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Reducer: the only writer of FilterState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FilterReducer {
    state: FilterState,
}

impl FilterReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn apply(&mut self, dimension: Dimension, spec: FilterSpec) -> &FilterState {
        self.state = self.state.apply(dimension, spec);
        &self.state
    }

    pub fn clear(&mut self, dimension: &Dimension) -> &FilterState {
        self.state = self.state.clear(dimension);
        &self.state
    }

    pub fn clear_all(&mut self) -> &FilterState {
        self.state = FilterState::new();
        &self.state
    }

    /// Route a selector event to `apply`.
    pub fn dispatch(&mut self, event: FilterEvent) -> &FilterState {
        let dimension = event.dimension();
        let spec = event.into_spec();
        log::debug!("filter {dimension} ← {spec}");
        self.apply(dimension, spec)
    }

    pub fn evaluate<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        evaluate(records, &self.state)
    }
}
