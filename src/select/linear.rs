use crate::data::filter::{Dimension, FilterEvent};

use super::histogram::Histogram;
use super::scale::LinearScale;

/// Pointer travel below this (in pixels) counts as a click, not a drag.
pub const CLICK_TOLERANCE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Linear range selector (brush over a histogram)
// ---------------------------------------------------------------------------

/// Drag-select a sub-range of one numeric field laid along a line.
#[derive(Debug, Clone)]
pub struct LinearRangeSelector {
    metric: String,
    scale: LinearScale,
    histogram: Histogram,
    bin_count: usize,
    values: Vec<f64>,
    /// Pixel where the current gesture began.
    drag_origin: Option<f64>,
    travel: f64,
    /// Current selection in domain units.
    selection: Option<(f64, f64)>,
}

impl LinearRangeSelector {
    pub fn new(
        metric: impl Into<String>,
        values: &[f64],
        domain: (f64, f64),
        pixel_range: (f64, f64),
        bin_count: usize,
    ) -> Self {
        let scale = LinearScale::new(domain, pixel_range);
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        LinearRangeSelector {
            metric: metric.into(),
            histogram: Histogram::new(&values, &scale, bin_count),
            scale,
            bin_count,
            values,
            drag_origin: None,
            travel: 0.0,
            selection: None,
        }
    }

    /// Domain spans the observed `[min, max]`.
    pub fn observed(
        metric: impl Into<String>,
        values: &[f64],
        pixel_range: (f64, f64),
        bin_count: usize,
    ) -> Self {
        let domain = observed_domain(values);
        Self::new(metric, values, domain, pixel_range, bin_count)
    }

    /// Win percentages: `[floor(min), 100]`.
    pub fn win_pct(values: &[f64], pixel_range: (f64, f64), bin_count: usize) -> Self {
        let (min, max) = observed_domain(values);
        let domain = (min.floor(), max.max(100.0));
        Self::new(crate::data::model::WIN_PCT, values, domain, pixel_range, bin_count)
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn dimension(&self) -> Dimension {
        Dimension::Metric(self.metric.clone())
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn selection(&self) -> Option<(f64, f64)> {
        self.selection
    }

    /// Current selection in pixel coordinates.
    pub fn selection_pixels(&self) -> Option<(f64, f64)> {
        self.selection
            .map(|(low, high)| (self.scale.apply(low), self.scale.apply(high)))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Re-map to a new pixel extent; the domain selection is kept.
    pub fn set_pixel_range(&mut self, pixel_range: (f64, f64)) {
        if self.scale.range() == pixel_range {
            return;
        }
        self.scale = LinearScale::new(self.scale.domain(), pixel_range);
        self.histogram = Histogram::new(&self.values, &self.scale, self.bin_count);
    }

    /// A new gesture supersedes whatever selection was in progress.
    pub fn drag_start(&mut self, pixel: f64) {
        self.drag_origin = Some(self.scale.clamp_output(pixel));
        self.travel = 0.0;
    }

    /// Emits the live range on every move.
    pub fn drag_move(&mut self, pixel: f64) -> Option<FilterEvent> {
        let origin = self.drag_origin?;
        let current = self.scale.clamp_output(pixel);
        self.travel = self.travel.max((current - origin).abs());

        let (a, b) = if origin <= current {
            (origin, current)
        } else {
            (current, origin)
        };
        let (low, high) = ordered(self.scale.invert(a), self.scale.invert(b));
        self.selection = Some((low, high));
        Some(FilterEvent::Range {
            metric: self.metric.clone(),
            low,
            high,
        })
    }

    /// A gesture that never really moved is a click and clears the selection.
    pub fn drag_end(&mut self) -> Option<FilterEvent> {
        self.drag_origin.take()?;
        (self.travel < CLICK_TOLERANCE).then(|| self.reset())
    }

    pub fn reset(&mut self) -> FilterEvent {
        self.drag_origin = None;
        self.selection = None;
        FilterEvent::Clear(self.dimension())
    }
}

/// A flipped output range makes inversion descending; keep `(low, high)` ascending.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub(crate) fn observed_domain(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}
