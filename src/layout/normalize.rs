use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Rescales each axis independently into `[0, 1]`. An axis without spread maps
/// every point to exactly `0.5`.
pub fn normalize(points: &[Vec2]) -> Vec<Vec2> {
    let mut min = vec2(f32::INFINITY, f32::INFINITY);
    let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for point in points {
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }

    points
        .iter()
        .map(|point| {
            vec2(
                normalize_axis(point.x, min.x, max.x),
                normalize_axis(point.y, min.y, max.y),
            )
        })
        .collect()
}

fn normalize_axis(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Maps unit-square points into `[padding, width - padding] × [padding,
/// height - padding]`. An axis narrower than twice the padding collapses to the
/// center of that axis.
pub fn to_screen(points: &[Vec2], width: f32, height: f32, padding: f32) -> Vec<Pos2> {
    let padding = padding.max(0.0);
    points
        .iter()
        .map(|point| {
            pos2(
                screen_axis(point.x, width, padding),
                screen_axis(point.y, height, padding),
            )
        })
        .collect()
}

/// The rect `to_screen` maps into. A collapsed axis has zero extent at its
/// center.
pub fn drawable_rect(width: f32, height: f32, padding: f32) -> Rect {
    let padding = padding.max(0.0);
    Rect::from_min_max(
        pos2(screen_axis(0.0, width, padding), screen_axis(0.0, height, padding)),
        pos2(screen_axis(1.0, width, padding), screen_axis(1.0, height, padding)),
    )
}

fn screen_axis(value: f32, extent: f32, padding: f32) -> f32 {
    let drawable = extent - (2.0 * padding);
    if drawable <= 0.0 {
        return extent * 0.5;
    }
    padding + (value * drawable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn spans_unit_square() {
        let normalized = normalize(&[vec2(-2.0, 10.0), vec2(2.0, 30.0), vec2(0.0, 20.0)]);
        assert_eq!(
            normalized,
            vec![vec2(0.0, 0.0), vec2(1.0, 1.0), vec2(0.5, 0.5)]
        );
    }

    #[test]
    fn single_point_lands_in_center() {
        assert_eq!(normalize(&[vec2(3.0, -4.0)]), vec![vec2(0.5, 0.5)]);

        let screen = to_screen(&normalize(&[Vec2::ZERO]), 800.0, 600.0, 40.0);
        assert_eq!(screen, vec![pos2(400.0, 300.0)]);
    }

    #[test]
    fn flat_axis_is_centered() {
        let normalized = normalize(&[vec2(1.0, 0.0), vec2(5.0, 0.0)]);
        assert_eq!(normalized, vec![vec2(0.0, 0.5), vec2(1.0, 0.5)]);
    }

    #[test]
    fn corners_map_to_padded_rectangle() {
        let screen = to_screen(&[vec2(0.0, 0.0), vec2(1.0, 1.0)], 800.0, 600.0, 40.0);
        assert_eq!(screen, vec![pos2(40.0, 40.0), pos2(760.0, 560.0)]);
    }

    #[test]
    fn narrow_canvas_collapses_to_center() {
        let screen = to_screen(&[vec2(0.0, 1.0)], 60.0, 600.0, 40.0);
        assert_eq!(screen, vec![pos2(30.0, 560.0)]);
    }

    #[test]
    fn drawable_rect_matches_mapped_corners() {
        let rect = drawable_rect(800.0, 600.0, 40.0);
        assert_eq!(rect, Rect::from_min_max(pos2(40.0, 40.0), pos2(760.0, 560.0)));

        let narrow = drawable_rect(60.0, 600.0, 40.0);
        assert_eq!(narrow.min.x, 30.0);
        assert_eq!(narrow.width(), 0.0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
        assert!(to_screen(&[], 800.0, 600.0, 40.0).is_empty());
    }

    fn points(max_len: usize) -> impl Strategy<Value = Vec<Vec2>> {
        proptest::collection::vec(
            (-1.0e6_f32..1.0e6, -1.0e6_f32..1.0e6).prop_map(|(x, y)| vec2(x, y)),
            1..=max_len,
        )
    }

    proptest! {
        #[test]
        fn normalized_points_stay_in_unit_square(points in points(64)) {
            for point in normalize(&points) {
                prop_assert!((0.0..=1.0).contains(&point.x));
                prop_assert!((0.0..=1.0).contains(&point.y));
            }
        }

        #[test]
        fn constant_axis_is_exactly_half(x in -1.0e6_f32..1.0e6, ys in proptest::collection::vec(-1.0e6_f32..1.0e6, 1..32)) {
            let points = ys.iter().map(|&y| vec2(x, y)).collect::<Vec<_>>();
            for point in normalize(&points) {
                prop_assert_eq!(point.x, 0.5);
            }
        }

        #[test]
        fn screen_points_stay_in_padded_rectangle(
            points in points(64),
            width in 100.0_f32..4000.0,
            height in 100.0_f32..4000.0,
            padding in 0.0_f32..45.0,
        ) {
            let first = to_screen(&normalize(&points), width, height, padding);
            let second = to_screen(&normalize(&points), width, height, padding);
            prop_assert_eq!(&first, &second);

            for point in first {
                prop_assert!(point.x >= padding - 1e-3 && point.x <= width - padding + 1e-3);
                prop_assert!(point.y >= padding - 1e-3 && point.y <= height - padding + 1e-3);
            }
        }
    }
}
