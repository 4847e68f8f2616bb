use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Reserved metric name for the win percentage column.
pub const WIN_PCT: &str = "W %";

/// Seeds handed out by the tournament committee.
pub const SEED_RANGE: std::ops::RangeInclusive<u8> = 1..=16;

// ---------------------------------------------------------------------------
// RecordKey – layout identity of one team-season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub team: String,
    pub year: Option<i32>,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} {year}", self.team),
            None => write!(f, "{} (unknown year)", self.team),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single team-season entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub team: String,
    /// `None` when the year cell could not be parsed.
    pub year: Option<i32>,
    /// `None` when the team did not enter the tournament.
    pub seed: Option<u8>,
    pub conference: String,
    /// Win percentage as a decimal number of percent (`"75.0%"` → `75.0`).
    pub win_pct: Option<f64>,
    /// The win percentage exactly as it appeared in the source.
    pub win_pct_display: String,
    /// Numeric metric columns: column_name → value. Non-numeric cells are absent.
    pub metrics: BTreeMap<String, f64>,
    pub postseason: Option<String>,
}

impl Record {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            team: self.team.clone(),
            year: self.year,
        }
    }

    /// Numeric value of a named metric, `WIN_PCT` included.
    pub fn value(&self, metric: &str) -> Option<f64> {
        let value = if metric == WIN_PCT {
            self.win_pct
        } else {
            self.metrics.get(metric).copied()
        };
        value.filter(|v| v.is_finite())
    }

    /// Whether the team entered the tournament.
    pub fn is_eligible(&self) -> bool {
        self.seed.is_some_and(|seed| SEED_RANGE.contains(&seed))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the eligible records plus observed domains
// ---------------------------------------------------------------------------

/// The loaded dataset, restricted to tournament teams.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Eligible records in ingestion order.
    pub records: Vec<Record>,
    /// Number of rows dropped because their seed was absent or invalid.
    pub ineligible: usize,
    years: BTreeSet<i32>,
}

impl Dataset {
    /// Keep only eligible records and build the year index.
    pub fn from_records(rows: Vec<Record>) -> Self {
        let total = rows.len();
        let records: Vec<Record> = rows.into_iter().filter(Record::is_eligible).collect();

        let years = records.iter().filter_map(|r| r.year).collect();

        Dataset {
            ineligible: total - records.len(),
            records,
            years,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct parsed years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.iter().copied()
    }

    /// All finite values of a metric, in record order.
    pub fn values(&self, metric: &str) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.value(metric)).collect()
    }

    /// Observed `[min, max]` of a metric, `None` when no record has a value.
    pub fn domain(&self, metric: &str) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.value(metric))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
