use std::collections::BTreeMap;

use crate::data::filter::{Dimension, FilterEvent};
use crate::data::model::Record;

/// The 2020 tournament was cancelled, so that season carries no usable data.
pub const DEFAULT_BLOCKED_YEAR: i32 = 2020;

/// Single-select over a continuous year scale.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSelector {
    years: Vec<i32>,
    blocked: Option<i32>,
    selected: Option<i32>,
    counts: BTreeMap<i32, usize>,
}

impl YearSelector {
    /// The scale spans every year from the earliest to the latest observed one,
    /// so a blocked year inside that span keeps its slot even with no records.
    pub fn new(observed: impl IntoIterator<Item = i32>, blocked: Option<i32>) -> Self {
        let observed: Vec<i32> = observed.into_iter().collect();
        let years = match (observed.iter().min(), observed.iter().max()) {
            (Some(&start), Some(&end)) => (start..=end).collect(),
            _ => Vec::new(),
        };
        YearSelector {
            years,
            blocked,
            selected: None,
            counts: BTreeMap::new(),
        }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn selected(&self) -> Option<i32> {
        self.selected
    }

    pub fn is_blocked(&self, year: i32) -> bool {
        self.blocked == Some(year)
    }

    /// Clicking the selected year clears it; the blocked year ignores clicks.
    pub fn click(&mut self, year: i32) -> Option<FilterEvent> {
        if self.is_blocked(year) || !self.years.contains(&year) {
            return None;
        }
        if self.selected == Some(year) {
            self.selected = None;
            Some(FilterEvent::Clear(Dimension::Year))
        } else {
            self.selected = Some(year);
            Some(FilterEvent::SingleValue(year))
        }
    }

    pub fn reset(&mut self) -> FilterEvent {
        self.selected = None;
        FilterEvent::Clear(Dimension::Year)
    }

    /// Tally records per year for display next to each slot.
    pub fn set_counts<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        self.counts.clear();
        for year in records.into_iter().filter_map(|r| r.year) {
            *self.counts.entry(year).or_default() += 1;
        }
    }

    pub fn count(&self, year: i32) -> usize {
        self.counts.get(&year).copied().unwrap_or(0)
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn scale_is_continuous_and_keeps_blocked_year() {
        let sel = YearSelector::new([2019, 2021, 2017], Some(2020));
        assert_eq!(sel.years(), &[2017, 2018, 2019, 2020, 2021]);
        assert!(sel.is_blocked(2020));
    }

    #[test]
    fn blocked_year_outside_observed_range_is_not_added() {
        let sel = YearSelector::new([2013, 2015], Some(2020));
        assert_eq!(sel.years(), &[2013, 2014, 2015]);
        assert!(YearSelector::new([], Some(2020)).years().is_empty());
    }

    #[test]
    fn clicking_toggles_single_selection() {
        let mut sel = YearSelector::new([2018, 2019, 2021], Some(2020));
        assert_eq!(sel.click(2018), Some(FilterEvent::SingleValue(2018)));
        assert_eq!(sel.click(2019), Some(FilterEvent::SingleValue(2019)));
        assert_eq!(sel.click(2019), Some(FilterEvent::Clear(Dimension::Year)));
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn blocked_year_ignores_clicks_entirely() {
        let mut sel = YearSelector::new([2018, 2019, 2021], Some(2020));
        sel.click(2019);
        assert_eq!(sel.click(2020), None);
        assert_eq!(sel.selected(), Some(2019));
        assert_eq!(sel.click(1999), None);
    }

    #[test]
    fn counts_follow_the_given_records() {
        let rs = vec![
            record("A", 2018, Some(1), 80.0),
            record("B", 2018, Some(2), 70.0),
            record("C", 2019, Some(3), 60.0),
        ];
        let mut sel = YearSelector::new([2018, 2019], None);
        sel.set_counts(&rs);
        assert_eq!(sel.count(2018), 2);
        assert_eq!(sel.count(2019), 1);
        assert_eq!(sel.count(2017), 0);
        assert_eq!(sel.max_count(), 2);
    }
}
