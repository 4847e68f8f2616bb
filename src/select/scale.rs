/// Width substituted for a zero-variance domain.
pub const DEGENERATE_SPAN: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Continuous linear scale: domain [d0, d1] ↔ range [r0, r1]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A domain with no width (all values equal) widens to `[v, v + DEGENERATE_SPAN]`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d0, mut d1) = domain;
        if !d0.is_finite() {
            d0 = 0.0;
        }
        if !d1.is_finite() || (d1 - d0).abs() < DEGENERATE_SPAN {
            d1 = d0 + DEGENERATE_SPAN;
        }
        if d0 > d1 {
            std::mem::swap(&mut d0, &mut d1);
        }
        LinearScale {
            domain: (d0, d1),
            range,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, output: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        d0 + (output - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Clamp an output coordinate into the range extent.
    pub fn clamp_output(&self, output: f64) -> f64 {
        let (r0, r1) = self.range;
        output.clamp(r0.min(r1), r0.max(r1))
    }

    /// Round 1/2/5 × 10ᵏ ticks covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let step = tick_step(d0, d1, count);
        if step <= 0.0 || !step.is_finite() {
            return vec![d0];
        }
        let first = (d0 / step).ceil() as i64;
        let last = (d1 / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn tick_step(d0: f64, d1: f64, count: usize) -> f64 {
    let raw = (d1 - d0) / count.max(1) as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}
