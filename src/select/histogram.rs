use super::scale::LinearScale;

/// One sub-interval `[x0, x1)` of a domain and how many values fell in it.
/// The last bin is closed on the right so the domain maximum is counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

impl Bin {
    pub fn midpoint(&self) -> f64 {
        self.x0 + (self.x1 - self.x0) / 2.0
    }
}

/// Fixed-count histogram over a scale's domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Values outside the domain (or non-finite) are ignored.
    pub fn new(values: &[f64], scale: &LinearScale, bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);
        let (d0, d1) = scale.domain();
        let width = (d1 - d0) / bin_count as f64;

        let mut bins: Vec<Bin> = (0..bin_count)
            .map(|i| Bin {
                x0: d0 + width * i as f64,
                x1: if i + 1 == bin_count { d1 } else { d0 + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for &v in values {
            if !v.is_finite() || v < d0 || v > d1 {
                continue;
            }
            let index = (((v - d0) / width) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Histogram { bins }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
