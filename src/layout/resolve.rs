use std::f32::consts::TAU;

use eframe::egui::{Pos2, Rect, Vec2, vec2};

/// Bounded force relaxation that pushes overlapping marker boxes apart while
/// pulling each one back toward its own target. Pairs whose boxes do not
/// intersect exert no force on each other.
///
/// The step count is fixed rather than run to convergence: a frame costs
/// `steps × n²` pair evaluations no matter how crowded the canvas is, and the
/// cap on per-step movement bounds how far any marker strays from its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapResolver {
    pub steps: usize,
    pub restore_strength: f32,
    /// Scale of the `1/d` push between intersecting boxes; it fades to zero at
    /// the pair's separation.
    pub repulsion_strength: f32,
    pub collision_strength: f32,
    /// Extra clearance kept between two boxes.
    pub gap: f32,
    /// Largest displacement a marker may take in one step.
    pub max_step: f32,
}

impl Default for OverlapResolver {
    fn default() -> Self {
        Self {
            steps: 10,
            restore_strength: 0.35,
            repulsion_strength: 240.0,
            collision_strength: 0.9,
            gap: 4.0,
            max_step: 24.0,
        }
    }
}

impl OverlapResolver {
    /// Upper bound on the distance between any output position and its target.
    pub fn max_drift(&self) -> f32 {
        self.steps as f32 * self.max_step
    }

    /// Returns one relaxed position per target. `sizes[i]` is the full width and
    /// height of marker `i`; a missing size counts as a zero-size marker. Every
    /// step ends with each position clamped into `bounds`, which should contain
    /// all targets.
    pub fn resolve(&self, targets: &[Pos2], sizes: &[Vec2], bounds: Rect) -> Vec<Pos2> {
        let n = targets.len();
        let mut positions = targets.to_vec();
        if n < 2 {
            return positions;
        }

        let half_extents = (0..n)
            .map(|index| sizes.get(index).copied().unwrap_or(Vec2::ZERO) * 0.5)
            .collect::<Vec<_>>();
        let mut disp = vec![Vec2::ZERO; n];

        for _ in 0..self.steps {
            disp.fill(Vec2::ZERO);

            for i in 0..n {
                for j in (i + 1)..n {
                    let delta = positions[i] - positions[j];
                    let reach = half_extents[i] + half_extents[j];
                    if delta.x.abs() >= reach.x || delta.y.abs() >= reach.y {
                        continue;
                    }

                    let distance = delta.length();
                    let direction = if distance > 0.0001 {
                        delta / distance
                    } else {
                        pair_direction(i, j)
                    };

                    let separation =
                        support(half_extents[i], direction) + support(half_extents[j], direction) + self.gap;
                    let clamped = distance.max(1.0);
                    let repulsion = self.repulsion_strength * (1.0 / clamped - 1.0 / separation).max(0.0);
                    let overlap_push = (separation - distance).max(0.0) * self.collision_strength * 0.5;
                    let push = direction * (repulsion + overlap_push);
                    disp[i] += push;
                    disp[j] -= push;
                }
            }

            for (index, d) in disp.iter_mut().enumerate() {
                *d += (targets[index] - positions[index]) * self.restore_strength;
            }

            for (position, d) in positions.iter_mut().zip(&disp) {
                let length = d.length();
                if length > self.max_step {
                    *position += *d / length * self.max_step;
                } else {
                    *position += *d;
                }
                *position = clamp_into(*position, bounds);
            }
        }

        positions
    }
}

/// `Rect::clamp` without the panic on an inverted rect: a flipped axis pins to
/// its midpoint.
fn clamp_into(point: Pos2, bounds: Rect) -> Pos2 {
    let axis = |value: f32, min: f32, max: f32| {
        if min <= max {
            value.clamp(min, max)
        } else {
            (min + max) * 0.5
        }
    };
    Pos2::new(
        axis(point.x, bounds.min.x, bounds.max.x),
        axis(point.y, bounds.min.y, bounds.max.y),
    )
}

/// Half-extent of an axis-aligned box along a unit direction.
fn support(half_extent: Vec2, direction: Vec2) -> f32 {
    half_extent.x * direction.x.abs() + half_extent.y * direction.y.abs()
}

/// Deterministic unit direction for coincident particles.
fn pair_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

/// Whether the axis-aligned boxes centred on `a` and `b` intersect.
pub fn boxes_overlap(a: Pos2, size_a: Vec2, b: Pos2, size_b: Vec2) -> bool {
    let reach = (size_a + size_b) * 0.5;
    (a.x - b.x).abs() < reach.x && (a.y - b.y).abs() < reach.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;
    use proptest::prelude::*;

    const MARKER: Vec2 = Vec2 { x: 80.0, y: 26.0 };

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    fn assert_unmoved(targets: &[Pos2]) {
        let sizes = vec![MARKER; targets.len()];
        let resolved = OverlapResolver::default().resolve(targets, &sizes, canvas());
        for (resolved, target) in resolved.iter().zip(targets) {
            assert!(resolved.distance(*target) < 1e-4, "{target:?} moved to {resolved:?}");
        }
    }

    #[test]
    fn distant_markers_stay_on_target() {
        assert_unmoved(&[pos2(100.0, 100.0), pos2(700.0, 500.0)]);
    }

    #[test]
    fn touching_but_clear_markers_stay_on_target() {
        assert_unmoved(&[pos2(400.0, 300.0), pos2(400.0, 330.0)]);
        assert_unmoved(&[pos2(400.0, 300.0), pos2(490.0, 300.0)]);
        assert_unmoved(&[pos2(400.0, 300.0), pos2(400.0, 326.0)]);
        assert_unmoved(&[pos2(400.0, 300.0), pos2(480.0, 320.0), pos2(320.0, 274.0)]);
    }

    #[test]
    fn single_marker_is_untouched() {
        let targets = [pos2(12.5, 99.0)];
        assert_eq!(
            OverlapResolver::default().resolve(&targets, &[MARKER], canvas()),
            targets.to_vec()
        );
    }

    #[test]
    fn coincident_markers_separate_within_bounds() {
        let resolver = OverlapResolver::default();
        let target = pos2(400.0, 300.0);
        let resolved = resolver.resolve(&[target, target], &[MARKER, MARKER], canvas());

        let gap = resolved[0].distance(resolved[1]);
        assert!(gap > 1.0, "markers still coincide: {gap}");
        for position in &resolved {
            assert!(position.x.is_finite() && position.y.is_finite());
            assert!(position.distance(target) <= resolver.max_drift());
        }
    }

    #[test]
    fn overlapping_pair_ends_with_less_overlap() {
        let targets = [pos2(300.0, 300.0), pos2(310.0, 304.0)];
        let resolved = OverlapResolver::default().resolve(&targets, &[MARKER, MARKER], canvas());
        assert!(resolved[0].distance(resolved[1]) > targets[0].distance(targets[1]));
    }

    #[test]
    fn crowd_on_the_edge_stays_inside_bounds() {
        let bounds = Rect::from_min_max(pos2(40.0, 40.0), pos2(760.0, 560.0));
        let mut targets = vec![pos2(760.0, 117.8); 8];
        targets.extend([pos2(40.0, 40.0), pos2(400.0, 560.0)]);
        let sizes = vec![vec2(73.0, 26.0); targets.len()];

        let resolved = OverlapResolver::default().resolve(&targets, &sizes, bounds);
        for position in &resolved {
            assert!(bounds.contains(*position), "{position:?} left {bounds:?}");
        }
        assert!(resolved[..8].iter().any(|position| position.x < 760.0));
        assert_eq!(resolved[8..], targets[8..]);
    }

    #[test]
    fn inverted_bounds_pin_to_the_midpoint() {
        let bounds = Rect::from_min_max(pos2(40.0, 40.0), pos2(20.0, 560.0));
        assert_eq!(clamp_into(pos2(5.0, 600.0), bounds), pos2(30.0, 560.0));
    }

    #[test]
    fn resolution_is_deterministic() {
        let targets = [
            pos2(200.0, 200.0),
            pos2(205.0, 200.0),
            pos2(200.0, 210.0),
            pos2(600.0, 100.0),
        ];
        let sizes = [MARKER, vec2(120.0, 26.0), vec2(40.0, 26.0), MARKER];
        let resolver = OverlapResolver::default();
        assert_eq!(
            resolver.resolve(&targets, &sizes, canvas()),
            resolver.resolve(&targets, &sizes, canvas())
        );
    }

    #[test]
    fn boxes_overlap_checks_both_axes() {
        assert!(boxes_overlap(pos2(0.0, 0.0), MARKER, pos2(79.0, 25.0), MARKER));
        assert!(!boxes_overlap(pos2(0.0, 0.0), MARKER, pos2(81.0, 0.0), MARKER));
        assert!(!boxes_overlap(pos2(0.0, 0.0), MARKER, pos2(0.0, 27.0), MARKER));
    }

    proptest! {
        #[test]
        fn every_marker_gets_a_bounded_finite_position(
            raw in proptest::collection::vec((0.0_f32..800.0, 0.0_f32..600.0, 10.0_f32..200.0), 1..24)
        ) {
            let targets = raw.iter().map(|&(x, y, _)| pos2(x, y)).collect::<Vec<_>>();
            let sizes = raw.iter().map(|&(_, _, w)| vec2(w, 26.0)).collect::<Vec<_>>();
            let resolver = OverlapResolver::default();
            let resolved = resolver.resolve(&targets, &sizes, canvas());

            prop_assert_eq!(resolved.len(), targets.len());
            for (position, target) in resolved.iter().zip(&targets) {
                prop_assert!(position.x.is_finite() && position.y.is_finite());
                prop_assert!(canvas().contains(*position));
                prop_assert!(position.distance(*target) <= resolver.max_drift() + 1e-3);
            }
        }
    }
}
