//! Packed bubble layout: one equal-radius circle per filtered record, kept
//! apart by a collision force, drawn weakly toward the centre, and hard
//! clamped inside the viewport margin after every tick.

mod forces;

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::f32::consts::PI;
use std::hash::{Hash, Hasher};

use eframe::egui::{Pos2, Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::data::model::RecordKey;
pub use forces::Bounds;
use forces::CollisionParams;

/// Golden-angle step of the initial phyllotaxis spiral.
const SPIRAL_ANGLE: f32 = PI * 0.763_932; // π(3 − √5)
/// Spiral spacing relative to the item radius.
const SPIRAL_SPACING: f32 = 1.4;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub margin: f32,
    /// Compensates for the gaps between packed circles.
    pub packing_efficiency: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Extra distance kept between neighbouring circles.
    pub padding: f32,
    pub centering_strength: f32,
    pub collision_iterations: usize,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
    pub continuation_alpha: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            margin: 20.0,
            packing_efficiency: 0.75,
            min_radius: 15.0,
            max_radius: 100.0,
            padding: 1.0,
            centering_strength: 0.05,
            collision_iterations: 4,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            continuation_alpha: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// Viewport and radius rule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            margin: margin.max(0.0),
        }
    }

    pub fn safe_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    pub fn safe_height(&self) -> f32 {
        (self.height - 2.0 * self.margin).max(0.0)
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Where a centre may sit so a circle of `radius` stays inside the margin.
    pub fn bounds_for(&self, radius: f32) -> Bounds {
        let inset = self.margin + radius;
        Bounds {
            min: vec2(inset, inset),
            max: vec2(self.width - inset, self.height - inset),
        }
    }
}

/// Shared radius for `n` items. The cap (half the safe area, `max_radius`)
/// wins over the `min_radius` floor so a circle never crosses the margin.
pub fn item_radius(n: usize, viewport: &Viewport, config: &LayoutConfig) -> f32 {
    let safe_w = viewport.safe_width();
    let safe_h = viewport.safe_height();
    if n == 0 {
        return 0.0;
    }
    let area_per_item = safe_w * safe_h / n as f32;
    let raw = (area_per_item / PI).sqrt() * config.packing_efficiency;
    let cap = config.max_radius.min(safe_h * 0.5).min(safe_w * 0.5).max(0.0);
    raw.max(config.min_radius).min(cap)
}

// ---------------------------------------------------------------------------
// Items and output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutItem {
    pub key: RecordKey,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Fixed position while the item is being dragged.
    pub pinned: Option<Vec2>,
}

/// One placed circle; `index` points into the record slice given to the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Positioned {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Positioned {
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub struct Simulation {
    config: LayoutConfig,
    viewport: Viewport,
    items: Vec<LayoutItem>,
    index_by_key: HashMap<RecordKey, usize>,
    radius: f32,
    alpha: f32,
    alpha_target: f32,
    ticks: u64,
}

impl Simulation {
    pub fn new(viewport: Viewport, config: LayoutConfig) -> Self {
        Self {
            config,
            viewport,
            items: Vec::new(),
            index_by_key: HashMap::new(),
            radius: 0.0,
            alpha: 0.0,
            alpha_target: 0.0,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Ticks since the last restart or continuation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Still cooling, or held warm by a drag.
    pub fn is_warm(&self) -> bool {
        !self.items.is_empty() && (self.alpha >= self.config.alpha_min || self.alpha_target > 0.0)
    }

    pub fn bounds(&self) -> Bounds {
        self.viewport.bounds_for(self.radius)
    }

    /// Throw away every position and start cold from the spiral.
    pub fn replace(&mut self, keys: impl IntoIterator<Item = RecordKey>) {
        let keys: Vec<RecordKey> = keys.into_iter().collect();
        self.radius = item_radius(keys.len(), &self.viewport, &self.config);
        let center = self.viewport.center();
        self.items = keys
            .into_iter()
            .enumerate()
            .map(|(slot, key)| LayoutItem {
                pos: center + spiral_offset(slot, self.radius),
                key,
                velocity: Vec2::ZERO,
                radius: self.radius,
                pinned: None,
            })
            .collect();
        self.reindex();
        self.clamp_all();
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.ticks = 0;
        log::debug!("layout restart with {} items, r = {:.1}", self.items.len(), self.radius);
    }

    /// Continue from the current layout when any key survives, restart otherwise.
    pub fn set_items(&mut self, keys: impl IntoIterator<Item = RecordKey>) {
        let keys: Vec<RecordKey> = keys.into_iter().collect();
        let unchanged = keys.len() == self.items.len()
            && keys.iter().zip(&self.items).all(|(k, item)| *k == item.key);
        if unchanged && !keys.is_empty() {
            return;
        }
        if !keys.iter().any(|k| self.index_by_key.contains_key(k)) {
            self.replace(keys);
            return;
        }

        let mut previous: HashMap<RecordKey, LayoutItem> = self
            .items
            .drain(..)
            .map(|item| (item.key.clone(), item))
            .collect();
        let survivors = keys.iter().filter(|k| previous.contains_key(*k)).count();
        self.radius = item_radius(keys.len(), &self.viewport, &self.config);
        let center = self.viewport.center();
        let radius = self.radius;

        self.items = keys
            .into_iter()
            .enumerate()
            .map(|(slot, key)| match previous.remove(&key) {
                Some(mut item) => {
                    item.radius = radius;
                    item
                }
                None => {
                    let (jx, jy) = stable_pair(&key);
                    let jitter = vec2(jx, jy) * radius * 0.5;
                    LayoutItem {
                        pos: center + spiral_offset(slot, radius) + jitter,
                        key,
                        velocity: Vec2::ZERO,
                        radius,
                        pinned: None,
                    }
                }
            })
            .collect();
        self.reindex();
        self.clamp_all();
        self.alpha = self.alpha.max(self.config.continuation_alpha);
        self.ticks = 0;
        log::debug!(
            "layout continuation: {survivors} kept, {} total, r = {:.1}",
            self.items.len(),
            self.radius
        );
    }

    /// New canvas size: radius and bounds follow, positions are reclamped.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.radius = item_radius(self.items.len(), &self.viewport, &self.config);
        for item in &mut self.items {
            item.radius = self.radius;
        }
        self.clamp_all();
        if !self.items.is_empty() {
            self.alpha = self.alpha.max(self.config.continuation_alpha);
        }
    }

    /// Grab an item: it holds still and the rest of the layout reheats.
    pub fn pin(&mut self, key: &RecordKey, pos: Pos2) -> bool {
        let Some(&index) = self.index_by_key.get(key) else {
            return false;
        };
        self.items[index].pinned = Some(pos.to_vec2());
        self.alpha_target = self.config.drag_alpha_target;
        true
    }

    pub fn drag_to(&mut self, key: &RecordKey, pos: Pos2) {
        if let Some(&index) = self.index_by_key.get(key) {
            if self.items[index].pinned.is_some() {
                self.items[index].pinned = Some(pos.to_vec2());
            }
        }
    }

    /// Release an item; temperature decays back to rest once nothing is held.
    pub fn unpin(&mut self, key: &RecordKey) {
        if let Some(&index) = self.index_by_key.get(key) {
            self.items[index].pinned = None;
        }
        if self.items.iter().all(|item| item.pinned.is_none()) {
            self.alpha_target = 0.0;
        }
    }

    /// One step: integrate, resolve collisions, clamp. Returns `is_warm()`.
    pub fn tick(&mut self) -> bool {
        if !self.is_warm() {
            return false;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        forces::apply_centering(
            &mut self.items,
            self.viewport.center(),
            self.config.centering_strength,
            self.alpha,
        );
        let mut candidates = forces::integrate(&mut self.items, self.config.velocity_decay);
        let pinned: Vec<bool> = self.items.iter().map(|item| item.pinned.is_some()).collect();
        forces::resolve_collisions(
            &mut candidates,
            &pinned,
            CollisionParams {
                min_distance: 2.0 * self.radius + self.config.padding,
                iterations: self.config.collision_iterations,
            },
        );
        let bounds = self.bounds();
        forces::clamp_pass(&mut self.items, &candidates, bounds);

        self.ticks += 1;
        self.is_warm()
    }

    /// Tick until cold or `max_ticks` is reached; returns ticks taken.
    pub fn run_to_rest(&mut self, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && self.tick() {
            taken += 1;
        }
        taken
    }

    pub fn positioned(&self) -> Vec<Positioned> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| Positioned {
                index,
                x: item.pos.x,
                y: item.pos.y,
                radius: item.radius,
            })
            .collect()
    }

    /// Key of the circle under `pos`, nearest centre first.
    pub fn hit_test(&self, pos: Pos2) -> Option<&RecordKey> {
        let point = pos.to_vec2();
        self.items
            .iter()
            .map(|item| (item, (item.pos - point).length()))
            .filter(|(item, distance)| *distance <= item.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(item, _)| &item.key)
    }

    fn reindex(&mut self) {
        self.index_by_key.clear();
        for (index, item) in self.items.iter().enumerate() {
            self.index_by_key.entry(item.key.clone()).or_insert(index);
        }
    }

    fn clamp_all(&mut self) {
        let bounds = self.bounds();
        for item in &mut self.items {
            item.pos = bounds.clamp(item.pos);
        }
    }
}

fn spiral_offset(slot: usize, radius: f32) -> Vec2 {
    let distance = radius.max(1.0) * SPIRAL_SPACING * (0.5 + slot as f32).sqrt();
    let angle = slot as f32 * SPIRAL_ANGLE;
    vec2(angle.cos(), angle.sin()) * distance
}

/// Deterministic jitter in `[-1, 1]²` derived from the key.
fn stable_pair(key: &RecordKey) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(team: &str, year: i32) -> RecordKey {
        RecordKey {
            team: team.to_string(),
            year: Some(year),
        }
    }

    fn keys(n: usize) -> Vec<RecordKey> {
        (0..n).map(|i| key(&format!("Team {i}"), 2019)).collect()
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 20.0)
    }

    #[test]
    fn radius_follows_area_rule() {
        let config = LayoutConfig::default();
        let vp = viewport();
        // 760 × 560 / 30 = 14186.7 → sqrt(/π) = 67.2 → × 0.75 = 50.4
        let r = item_radius(30, &vp, &config);
        assert!((r - 50.40).abs() < 0.05, "r = {r}");
        assert_eq!(item_radius(1, &vp, &config), 100.0);
        assert_eq!(item_radius(5000, &vp, &config), 15.0);
        assert_eq!(item_radius(0, &vp, &config), 0.0);
    }

    #[test]
    fn radius_never_exceeds_half_the_safe_area() {
        let config = LayoutConfig::default();
        let tiny = Viewport::new(60.0, 50.0, 10.0);
        assert_eq!(item_radius(3, &tiny, &config), 15.0);
        let tinier = Viewport::new(40.0, 30.0, 10.0);
        assert_eq!(item_radius(3, &tinier, &config), 5.0);
    }

    #[test]
    fn empty_input_is_an_empty_layout() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(Vec::new());
        assert!(sim.is_empty());
        assert!(!sim.tick());
        assert!(sim.positioned().is_empty());
    }

    #[test]
    fn continuation_keeps_surviving_positions() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(10));
        sim.run_to_rest(1000);
        let before: HashMap<RecordKey, Vec2> =
            sim.items().iter().map(|i| (i.key.clone(), i.pos)).collect();

        let mut next = keys(10);
        next.truncate(6);
        next.push(key("Newcomer", 2019));
        sim.set_items(next);
        assert_eq!(sim.len(), 7);
        assert!((sim.alpha() - sim.config().continuation_alpha).abs() < 1e-6);
        for item in sim.items().iter().take(6) {
            let old = before[&item.key];
            let bounds = sim.bounds();
            assert_eq!(item.pos, bounds.clamp(old));
        }
    }

    #[test]
    fn disjoint_keys_restart_from_scratch() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(5));
        sim.run_to_rest(1000);
        assert!(!sim.is_warm());
        sim.set_items(vec![key("Other", 2001), key("Else", 2002)]);
        assert_eq!(sim.alpha(), 1.0);
        assert_eq!(sim.len(), 2);
    }

    #[test]
    fn tick_counter_restarts_with_the_layout() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(8));
        for _ in 0..3 {
            assert!(sim.tick());
        }
        assert_eq!(sim.ticks(), 3);

        let mut fewer = keys(8);
        fewer.pop();
        sim.set_items(fewer);
        assert_eq!(sim.ticks(), 0);
        sim.tick();
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn unchanged_key_list_does_not_reheat() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(4));
        sim.run_to_rest(1000);
        let alpha = sim.alpha();
        sim.set_items(keys(4));
        assert_eq!(sim.alpha(), alpha);
    }

    #[test]
    fn pinned_item_holds_still_and_keeps_simulation_warm() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(12));
        sim.run_to_rest(1000);
        let grabbed = key("Team 3", 2019);
        assert!(sim.pin(&grabbed, Pos2::new(300.0, 250.0)));
        for _ in 0..500 {
            assert!(sim.tick());
        }
        let item = sim.items().iter().find(|i| i.key == grabbed).unwrap();
        assert_eq!(item.pos, vec2(300.0, 250.0));
        assert!(sim.alpha() > 0.25);

        sim.drag_to(&grabbed, Pos2::new(-500.0, 250.0));
        sim.tick();
        let item = sim.items().iter().find(|i| i.key == grabbed).unwrap();
        assert_eq!(item.pos.x, sim.bounds().min.x, "clamp wins over the pin");

        sim.unpin(&grabbed);
        let taken = sim.run_to_rest(5000);
        assert!(taken < 5000);
        assert!(!sim.is_warm());
    }

    #[test]
    fn hit_test_finds_the_circle_under_pointer() {
        let mut sim = Simulation::new(viewport(), LayoutConfig::default());
        sim.replace(keys(3));
        sim.run_to_rest(1000);
        let first = &sim.items()[0];
        let at = Pos2::new(first.pos.x, first.pos.y);
        assert_eq!(sim.hit_test(at), Some(&first.key));
        assert_eq!(sim.hit_test(Pos2::new(1.0, 1.0)), None);
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let k = key("Duke", 2015);
        let (x, y) = stable_pair(&k);
        assert_eq!((x, y), stable_pair(&k));
        assert!((-1.0..=1.0).contains(&x) && (-1.0..=1.0).contains(&y));
    }
}
