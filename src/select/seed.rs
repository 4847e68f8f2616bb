use std::collections::BTreeSet;

use crate::data::filter::{Dimension, FilterEvent};
use crate::data::model::SEED_RANGE;

/// Toggle set over seeds 1–16.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSelector {
    selected: BTreeSet<u8>,
}

impl SeedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All seeds in display order.
    pub fn seeds() -> impl Iterator<Item = u8> {
        SEED_RANGE
    }

    pub fn is_selected(&self, seed: u8) -> bool {
        self.selected.contains(&seed)
    }

    pub fn selected(&self) -> &BTreeSet<u8> {
        &self.selected
    }

    /// Add or remove `seed`. An empty set means no restriction.
    /// Seeds outside 1–16 are ignored.
    pub fn toggle(&mut self, seed: u8) -> Option<FilterEvent> {
        if !SEED_RANGE.contains(&seed) {
            return None;
        }
        if !self.selected.remove(&seed) {
            self.selected.insert(seed);
        }
        Some(self.event())
    }

    pub fn reset(&mut self) -> FilterEvent {
        self.selected.clear();
        self.event()
    }

    fn event(&self) -> FilterEvent {
        if self.selected.is_empty() {
            FilterEvent::Clear(Dimension::Seed)
        } else {
            FilterEvent::Set(self.selected.clone())
        }
    }
}
