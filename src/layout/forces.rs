use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use super::LayoutItem;

/// Axis-aligned box the item centres must stay inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn clamp(self, point: Vec2) -> Vec2 {
        vec2(
            clamp_axis(point.x, self.min.x, self.max.x),
            clamp_axis(point.y, self.min.y, self.max.y),
        )
    }
}

fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        return (min + max) * 0.5;
    }
    if value.is_nan() {
        return (min + max) * 0.5;
    }
    value.clamp(min, max)
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) min_distance: f32,
    pub(super) iterations: usize,
}

/// Weak pull of every free item toward `center`.
pub(super) fn apply_centering(items: &mut [LayoutItem], center: Vec2, strength: f32, alpha: f32) {
    let k = strength * alpha;
    for item in items.iter_mut().filter(|item| item.pinned.is_none()) {
        item.velocity += (center - item.pos) * k;
    }
}

/// Integration pass: decay velocities and propose candidate positions.
/// Pinned items propose their pin and lose all velocity.
pub(super) fn integrate(items: &mut [LayoutItem], velocity_decay: f32) -> Vec<Vec2> {
    let keep = (1.0 - velocity_decay).clamp(0.0, 1.0);
    items
        .iter_mut()
        .map(|item| match item.pinned {
            Some(pin) => {
                item.velocity = Vec2::ZERO;
                pin
            }
            None => {
                item.velocity *= keep;
                item.pos + item.velocity
            }
        })
        .collect()
}

fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Push overlapping candidates apart until no two centres are closer than
/// `min_distance`. A pinned item never moves; its partner takes the whole push.
pub(super) fn resolve_collisions(
    candidates: &mut [Vec2],
    pinned: &[bool],
    params: CollisionParams,
) {
    let n = candidates.len();
    if n < 2 || params.min_distance <= 0.0 {
        return;
    }
    let min_distance = params.min_distance;
    let min_distance_sq = min_distance * min_distance;
    let cell = min_distance;

    for _ in 0..params.iterations {
        let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::with_capacity(n);
        for (index, point) in candidates.iter().enumerate() {
            grid.entry(cell_of(*point, cell)).or_default().push(index);
        }

        let mut any_overlap = false;
        for from in 0..n {
            let (cx, cy) = cell_of(candidates[from], cell);
            for gx in (cx - 1)..=(cx + 1) {
                for gy in (cy - 1)..=(cy + 1) {
                    let Some(bucket) = grid.get(&(gx, gy)) else {
                        continue;
                    };
                    for &to in bucket {
                        if to <= from || (pinned[from] && pinned[to]) {
                            continue;
                        }
                        let delta = candidates[from] - candidates[to];
                        let distance_sq = delta.length_sq();
                        if distance_sq >= min_distance_sq {
                            continue;
                        }
                        let distance = distance_sq.sqrt();
                        let direction = if distance > 0.0001 {
                            delta / distance
                        } else {
                            fallback_direction(from, to)
                        };
                        let push = direction * (min_distance - distance);
                        match (pinned[from], pinned[to]) {
                            (true, _) => candidates[to] -= push,
                            (_, true) => candidates[from] += push,
                            _ => {
                                candidates[from] += push * 0.5;
                                candidates[to] -= push * 0.5;
                            }
                        }
                        any_overlap = true;
                    }
                }
            }
        }

        if !any_overlap {
            break;
        }
    }
}

fn cell_of(point: Vec2, cell: f32) -> (i32, i32) {
    ((point.x / cell).floor() as i32, (point.y / cell).floor() as i32)
}

/// Clamping pass: the only writer of final positions. Velocity along a
/// clamped axis is dropped so items do not keep pressing into the wall.
pub(super) fn clamp_pass(items: &mut [LayoutItem], candidates: &[Vec2], bounds: Bounds) {
    for (item, &candidate) in items.iter_mut().zip(candidates) {
        let clamped = bounds.clamp(candidate);
        if clamped.x != candidate.x {
            item.velocity.x = 0.0;
        }
        if clamped.y != candidate.y {
            item.velocity.y = 0.0;
        }
        item.pos = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_inverted_bounds() {
        let bounds = Bounds {
            min: vec2(50.0, 10.0),
            max: vec2(30.0, 90.0),
        };
        let p = bounds.clamp(vec2(0.0, 200.0));
        assert_eq!(p, vec2(40.0, 90.0));
    }

    #[test]
    fn collisions_separate_coincident_points() {
        let mut points = vec![vec2(100.0, 100.0); 3];
        resolve_collisions(
            &mut points,
            &[false, false, false],
            CollisionParams {
                min_distance: 10.0,
                iterations: 50,
            },
        );
        for i in 0..3 {
            for j in (i + 1)..3 {
                let d = (points[i] - points[j]).length();
                assert!(d >= 10.0 - 1e-3, "pair {i},{j} at {d}");
            }
        }
    }

    #[test]
    fn pinned_point_does_not_move() {
        let mut points = vec![vec2(0.0, 0.0), vec2(3.0, 0.0)];
        resolve_collisions(
            &mut points,
            &[true, false],
            CollisionParams {
                min_distance: 10.0,
                iterations: 1,
            },
        );
        assert_eq!(points[0], vec2(0.0, 0.0));
        assert!((points[1].x - 10.0).abs() < 1e-4);
    }
}
