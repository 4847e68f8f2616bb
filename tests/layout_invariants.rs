use bracket_lens::data::model::RecordKey;
use bracket_lens::layout::{LayoutConfig, Simulation, Viewport};
use eframe::egui::Pos2;
use proptest::prelude::*;

fn keys(n: usize) -> Vec<RecordKey> {
    (0..n)
        .map(|i| RecordKey {
            team: format!("Team {i}"),
            year: Some(2013 + (i % 10) as i32),
        })
        .collect()
}

/// Every centre sits in `[margin + r, dim - margin - r]` on both axes.
fn inside_margin(sim: &Simulation) -> bool {
    let vp = sim.viewport();
    let r = sim.radius();
    let eps = 1e-3;
    sim.positioned().iter().all(|p| {
        p.x >= vp.margin + r - eps
            && p.x <= vp.width - vp.margin - r + eps
            && p.y >= vp.margin + r - eps
            && p.y <= vp.height - vp.margin - r + eps
    })
}

fn default_sim(width: f32, height: f32) -> Simulation {
    Simulation::new(Viewport::new(width, height, 20.0), LayoutConfig::default())
}

fn min_pair_distance(sim: &Simulation) -> f32 {
    let placed = sim.positioned();
    let mut min = f32::INFINITY;
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            min = min.min((a.center() - b.center()).length());
        }
    }
    min
}

#[test]
fn clamp_holds_after_every_tick() {
    let mut sim = default_sim(800.0, 600.0);
    sim.replace(keys(60));
    assert!(inside_margin(&sim));
    for _ in 0..400 {
        sim.tick();
        assert!(inside_margin(&sim));
    }
}

#[test]
fn clamp_wins_over_a_pin_dragged_off_canvas() {
    let mut sim = default_sim(640.0, 480.0);
    sim.replace(keys(12));
    let grabbed = keys(1).remove(0);
    assert!(sim.pin(&grabbed, Pos2::new(320.0, 240.0)));
    for step in 0..100 {
        let x = -200.0 + step as f32 * 12.0;
        sim.drag_to(&grabbed, Pos2::new(x, -50.0));
        sim.tick();
        assert!(inside_margin(&sim));
    }
    sim.unpin(&grabbed);
    sim.run_to_rest(5000);
    assert!(inside_margin(&sim));
}

#[test]
fn few_large_bubbles_do_not_overlap_at_rest() {
    let mut sim = default_sim(800.0, 600.0);
    sim.replace(keys(6));
    assert_eq!(sim.radius(), 100.0);
    sim.run_to_rest(5000);
    assert!(!sim.is_warm());
    let r = sim.radius();
    assert!(min_pair_distance(&sim) >= 2.0 * r - 1.0);
}

#[test]
fn many_bubbles_do_not_overlap_at_rest() {
    let config = LayoutConfig {
        packing_efficiency: 0.5,
        ..LayoutConfig::default()
    };
    let mut sim = Simulation::new(Viewport::new(800.0, 600.0, 20.0), config);
    sim.replace(keys(40));
    sim.run_to_rest(5000);
    let r = sim.radius();
    assert!(min_pair_distance(&sim) >= 2.0 * r - 1.0, "radius {r}");
}

#[test]
fn default_packing_does_not_overlap_at_rest() {
    for (width, height) in [(800.0, 600.0), (1000.0, 700.0), (600.0, 400.0)] {
        for n in [40, 100] {
            let mut sim = default_sim(width, height);
            sim.replace(keys(n));
            sim.run_to_rest(5000);
            assert!(!sim.is_warm());
            let r = sim.radius();
            assert!(
                min_pair_distance(&sim) >= 2.0 * r - 1.0,
                "{n} items on {width}x{height}, radius {r}"
            );
        }
    }
}

#[test]
fn default_packing_continuation_settles_without_overlap() {
    let mut sim = default_sim(800.0, 600.0);
    sim.replace(keys(100));
    sim.run_to_rest(5000);

    let mut next = keys(100);
    next.drain(..60);
    sim.set_items(next);
    assert_eq!(sim.len(), 40);
    sim.run_to_rest(5000);
    assert!(min_pair_distance(&sim) >= 2.0 * sim.radius() - 1.0);
}

#[test]
fn continuation_settles_without_overlap() {
    let config = LayoutConfig {
        packing_efficiency: 0.5,
        ..LayoutConfig::default()
    };
    let mut sim = Simulation::new(Viewport::new(800.0, 600.0, 20.0), config);
    sim.replace(keys(30));
    sim.run_to_rest(5000);

    let mut next = keys(40);
    next.drain(..10);
    sim.set_items(next);
    assert_eq!(sim.len(), 30);
    sim.run_to_rest(5000);
    assert!(min_pair_distance(&sim) >= 2.0 * sim.radius() - 1.0);
}

#[test]
fn zero_items_is_an_empty_layout() {
    let mut sim = default_sim(800.0, 600.0);
    sim.replace(keys(5));
    sim.set_items(Vec::new());
    assert!(sim.is_empty());
    assert!(sim.positioned().is_empty());
    assert_eq!(sim.run_to_rest(100), 0);
    assert_eq!(sim.hit_test(Pos2::new(400.0, 300.0)), None);
}

proptest! {
    #[test]
    fn clamp_holds_for_any_viewport(
        width in 100.0f32..1400.0,
        height in 100.0f32..1000.0,
        margin in 0.0f32..40.0,
        n in 0usize..80,
    ) {
        let viewport = Viewport::new(width, height, margin);
        let mut sim = Simulation::new(viewport, LayoutConfig::default());
        sim.replace(keys(n));
        prop_assert!(inside_margin(&sim));
        for _ in 0..40 {
            sim.tick();
            prop_assert!(inside_margin(&sim));
        }
        sim.resize(Viewport::new(height, width, margin));
        prop_assert!(inside_margin(&sim));
    }
}
