use crate::data::filter::{Dimension, FilterEvent};

use super::histogram::Histogram;
use super::linear::observed_domain;
use super::scale::LinearScale;

/// Angular extent of the arc, in degrees. 0° points straight up from the
/// centre, negative angles to the left, positive to the right.
pub const MIN_ANGLE: f64 = -90.0;
pub const MAX_ANGLE: f64 = 90.0;

/// Angular travel below this (degrees) counts as a click.
const CLICK_TOLERANCE_DEG: f64 = 0.5;

// ---------------------------------------------------------------------------
// Geometry of the arc, in screen coordinates (y grows downward)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: (f64, f64),
    /// Reference radius the gesture must start near.
    pub radius: f64,
    /// Half-width of the band around `radius` that arms a gesture.
    pub tolerance: f64,
}

impl ArcGeometry {
    /// Angle of a point, clamped into `[MIN_ANGLE, MAX_ANGLE]`.
    pub fn angle_of(&self, point: (f64, f64)) -> f64 {
        let dx = point.0 - self.center.0;
        let dy = point.1 - self.center.1;
        dx.atan2(-dy).to_degrees().clamp(MIN_ANGLE, MAX_ANGLE)
    }

    pub fn in_band(&self, point: (f64, f64)) -> bool {
        let dx = point.0 - self.center.0;
        let dy = point.1 - self.center.1;
        ((dx * dx + dy * dy).sqrt() - self.radius).abs() <= self.tolerance
    }

    pub fn point_at(&self, angle_deg: f64, radius: f64) -> (f64, f64) {
        let a = angle_deg.to_radians();
        (self.center.0 + radius * a.sin(), self.center.1 - radius * a.cos())
    }

    /// `segments + 1` points along the reference arc from left to right.
    pub fn arc_points(&self, from_deg: f64, to_deg: f64, segments: usize) -> Vec<(f64, f64)> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as f64 / segments as f64;
                self.point_at(from_deg + (to_deg - from_deg) * t, self.radius)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Angular range selector
// ---------------------------------------------------------------------------

/// Same contract as the linear selector, with the domain laid along an arc.
#[derive(Debug, Clone)]
pub struct AngularRangeSelector {
    metric: String,
    geometry: ArcGeometry,
    /// domain ↔ degrees
    scale: LinearScale,
    histogram: Histogram,
    /// Start angle of the current gesture; `None` when it did not begin in the band.
    armed: Option<f64>,
    travel: f64,
    selection: Option<(f64, f64)>,
}

impl AngularRangeSelector {
    pub fn new(
        metric: impl Into<String>,
        values: &[f64],
        domain: (f64, f64),
        geometry: ArcGeometry,
        bin_count: usize,
    ) -> Self {
        let scale = LinearScale::new(domain, (MIN_ANGLE, MAX_ANGLE));
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        AngularRangeSelector {
            metric: metric.into(),
            geometry,
            histogram: Histogram::new(&values, &scale, bin_count),
            scale,
            armed: None,
            travel: 0.0,
            selection: None,
        }
    }

    pub fn observed(
        metric: impl Into<String>,
        values: &[f64],
        geometry: ArcGeometry,
        bin_count: usize,
    ) -> Self {
        let domain = observed_domain(values);
        Self::new(metric, values, domain, geometry, bin_count)
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn dimension(&self) -> Dimension {
        Dimension::Metric(self.metric.clone())
    }

    pub fn geometry(&self) -> &ArcGeometry {
        &self.geometry
    }

    /// The arc moves with the widget; angles and the selection do not change.
    pub fn set_geometry(&mut self, geometry: ArcGeometry) {
        self.geometry = geometry;
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

    /// Current selection as `(from_deg, to_deg)`.
    pub fn selection_angles(&self) -> Option<(f64, f64)> {
        self.selection
            .map(|(low, high)| (self.scale.apply(low), self.scale.apply(high)))
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Arms the gesture only if it starts within the tolerance band.
    pub fn drag_start(&mut self, point: (f64, f64)) -> bool {
        self.travel = 0.0;
        self.armed = self
            .geometry
            .in_band(point)
            .then(|| self.geometry.angle_of(point));
        self.armed.is_some()
    }

    /// No-op unless the gesture is armed.
    pub fn drag_move(&mut self, point: (f64, f64)) -> Option<FilterEvent> {
        let start = self.armed?;
        let current = self.geometry.angle_of(point);
        self.travel = self.travel.max((current - start).abs());

        let (a, b) = if start <= current {
            (start, current)
        } else {
            (current, start)
        };
        let low = self.scale.invert(a);
        let high = self.scale.invert(b);
        self.selection = Some((low, high));
        Some(FilterEvent::Range {
            metric: self.metric.clone(),
            low,
            high,
        })
    }

    pub fn drag_end(&mut self) -> Option<FilterEvent> {
        self.armed.take()?;
        (self.travel < CLICK_TOLERANCE_DEG).then(|| self.reset())
    }

    pub fn reset(&mut self) -> FilterEvent {
        self.armed = None;
        self.selection = None;
        FilterEvent::Clear(self.dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() <= epsilon
    }

    fn geometry() -> ArcGeometry {
        ArcGeometry {
            center: (100.0, 100.0),
            radius: 80.0,
            tolerance: 10.0,
        }
    }

    fn selector() -> AngularRangeSelector {
        AngularRangeSelector::new("3P_O", &[30.0, 35.0, 40.0], (30.0, 40.0), geometry(), 10)
    }

    #[test]
    fn angles_follow_screen_compass() {
        let g = geometry();
        assert!(approx_eq(g.angle_of((100.0, 20.0)), 0.0, 1e-9));
        assert!(approx_eq(g.angle_of((180.0, 100.0)), 90.0, 1e-9));
        assert!(approx_eq(g.angle_of((20.0, 100.0)), -90.0, 1e-9));
        assert!(approx_eq(g.angle_of((160.0, 40.0)), 45.0, 1e-9));
        // Below the centre clamps to the nearer end of the arc.
        assert_eq!(g.angle_of((110.0, 180.0)), 90.0);
        assert_eq!(g.angle_of((90.0, 180.0)), -90.0);
    }

    #[test]
    fn point_at_round_trips_through_angle_of() {
        let g = geometry();
        for angle in [-80.0, -30.0, 0.0, 15.0, 60.0] {
            let p = g.point_at(angle, g.radius);
            assert!(approx_eq(g.angle_of(p), angle, 1e-9));
            assert!(g.in_band(p));
        }
        assert_eq!(g.arc_points(MIN_ANGLE, MAX_ANGLE, 8).len(), 9);
    }

    #[test]
    fn gesture_outside_band_stays_unarmed() {
        let mut sel = selector();
        assert!(!sel.drag_start((100.0, 100.0)));
        assert!(!sel.is_armed());
        assert!(sel.drag_move((180.0, 100.0)).is_none());
        assert!(sel.drag_move((20.0, 100.0)).is_none());
        assert!(sel.drag_end().is_none());
        assert!(sel.selection().is_none());
    }

    #[test]
    fn armed_drag_inverts_angles_into_domain() {
        let mut sel = selector();
        // Start at 0° (domain midpoint 35) on the reference radius.
        assert!(sel.drag_start((100.0, 20.0)));
        // Move to 45° → 37.5; the pointer may leave the band once armed.
        let event = sel.drag_move((200.0, 0.0));
        match event {
            Some(FilterEvent::Range { metric, low, high }) => {
                assert_eq!(metric, "3P_O");
                assert!(approx_eq(low, 35.0, 1e-9), "low = {low}");
                assert!(approx_eq(high, 37.5, 1e-9), "high = {high}");
            }
            other => panic!("expected range, got {other:?}"),
        }

        // Reversing past the start flips the endpoints.
        match sel.drag_move((20.0, 100.0)) {
            Some(FilterEvent::Range { low, high, .. }) => {
                assert!(approx_eq(low, 30.0, 1e-9));
                assert!(approx_eq(high, 35.0, 1e-9));
            }
            other => panic!("expected range, got {other:?}"),
        }
        assert!(sel.drag_end().is_none());
        let (from, to) = sel.selection_angles().unwrap();
        assert!(approx_eq(from, -90.0, 1e-9) && approx_eq(to, 0.0, 1e-9));
    }

    #[test]
    fn tap_in_band_clears_selection() {
        let mut sel = selector();
        sel.drag_start((100.0, 20.0));
        sel.drag_move((180.0, 100.0));
        sel.drag_end();
        assert!(sel.selection().is_some());

        sel.drag_start((100.0, 25.0));
        assert_eq!(sel.drag_end(), Some(FilterEvent::Clear(Dimension::metric("3P_O"))));
        assert!(sel.selection().is_none());
    }
}
