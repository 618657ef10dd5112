use eframe::egui::Pos2;

use semantic_canvas::config::LayoutConfig;
use semantic_canvas::error::LayoutError;
use semantic_canvas::layout::{
    Canvas, LayoutEngine, LayoutFrame, MarkerSet, MarkerStyle, VectorStore, boxes_overlap,
};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const PADDING: f32 = 40.0;

fn measure(text: &str) -> f32 {
    text.chars().count() as f32 * 7.0
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(&LayoutConfig::default(), MarkerStyle::default())
}

fn canvas() -> Canvas {
    Canvas::new(WIDTH, HEIGHT)
}

fn assert_in_bounds(frame: &LayoutFrame, width: f32, height: f32) {
    assert_eq!(frame.positions.len(), frame.targets.len());
    for point in frame.targets.iter().chain(&frame.positions) {
        assert!(point.x.is_finite() && point.y.is_finite(), "{point:?}");
        assert!(
            (PADDING - 1e-3..=width - PADDING + 1e-3).contains(&point.x),
            "x out of bounds: {point:?}"
        );
        assert!(
            (PADDING - 1e-3..=height - PADDING + 1e-3).contains(&point.y),
            "y out of bounds: {point:?}"
        );
    }
}

fn assert_positions_near_targets(frame: &LayoutFrame) {
    let max_drift = LayoutConfig::default().resolver().max_drift();
    for (position, target) in frame.positions.iter().zip(&frame.targets) {
        assert!(position.x.is_finite() && position.y.is_finite());
        assert!(position.distance(*target) <= max_drift + 1e-3);
    }
}

#[test]
fn basis_vectors_are_placed_one_by_one() {
    let engine = engine();
    let mut store = VectorStore::new();
    let inputs = [
        ("alpha", vec![1.0, 0.0, 0.0]),
        ("beta", vec![0.0, 1.0, 0.0]),
        ("gamma", vec![0.0, 0.0, 1.0]),
    ];

    let mut frames = Vec::new();
    for (count, (label, vector)) in inputs.into_iter().enumerate() {
        let committed = engine
            .insert(&store, label, vector, canvas(), &measure)
            .unwrap();
        store = committed.store;

        let frame = committed.frame;
        assert_eq!(frame.len(), count + 1);
        assert_eq!(store.len(), count + 1);
        assert_in_bounds(&frame, WIDTH, HEIGHT);
        assert_positions_near_targets(&frame);
        frames.push(frame);
    }

    assert_eq!(frames[0].targets, vec![Pos2::new(WIDTH / 2.0, HEIGHT / 2.0)]);

    let mut xs = frames[1].targets.iter().map(|p| p.x).collect::<Vec<_>>();
    xs.sort_by(f32::total_cmp);
    assert!((xs[0] - PADDING).abs() < 1e-3);
    assert!((xs[1] - (WIDTH - PADDING)).abs() < 1e-3);
    assert!(frames[1].targets.iter().all(|p| (p.y - HEIGHT / 2.0).abs() < 1e-3));

    let last = &frames[2];
    for i in 0..last.len() {
        for j in (i + 1)..last.len() {
            assert!(last.targets[i].distance(last.targets[j]) > 1.0);
            assert!(!boxes_overlap(
                last.positions[i],
                last.sizes[i],
                last.positions[j],
                last.sizes[j]
            ));
        }
    }
}

#[test]
fn recomputing_the_same_store_gives_the_same_frame() {
    let engine = engine();
    let mut store = VectorStore::new();
    for (index, vector) in [[0.3_f32, 0.1, 0.9], [0.8, 0.2, 0.1], [0.5, 0.5, 0.5], [0.1, 0.9, 0.3]]
        .into_iter()
        .enumerate()
    {
        store.append(format!("item {index}"), vector.to_vec()).unwrap();
    }

    let first = engine.compute(&store, canvas(), &measure).unwrap();
    let second = engine.compute(&store, canvas(), &measure).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mismatched_dimension_leaves_store_unchanged() {
    let engine = engine();
    let committed = engine
        .insert(&VectorStore::new(), "first", vec![1.0, 2.0, 3.0], canvas(), &measure)
        .unwrap();
    let store = committed.store;

    let err = engine
        .insert(&store, "second", vec![1.0, 2.0], canvas(), &measure)
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.dimensions(), Some(3));
}

#[test]
fn resized_canvas_keeps_every_target_inside() {
    let engine = engine();
    let mut store = VectorStore::new();
    for (index, vector) in [[1.0_f32, 0.0], [0.0, 1.0], [0.7, 0.7], [-0.4, 0.2], [0.1, -0.9]]
        .into_iter()
        .enumerate()
    {
        store.append(format!("n{index}"), vector.to_vec()).unwrap();
    }

    let wide = engine.compute(&store, canvas(), &measure).unwrap();
    let small = engine
        .compute(&store, Canvas::new(400.0, 300.0), &measure)
        .unwrap();

    assert_in_bounds(&wide, WIDTH, HEIGHT);
    assert_in_bounds(&small, 400.0, 300.0);
    assert_eq!(wide.normalized, small.normalized);
    assert_eq!(small.canvas, Canvas::new(400.0, 300.0));
}

#[test]
fn crowded_targets_are_spread_apart() {
    let engine = engine();
    let mut store = VectorStore::new();
    for index in 0..6 {
        store
            .append(format!("close {index}"), vec![1.0, 0.5, 0.0])
            .unwrap();
    }
    store.append("far away", vec![-5.0, 4.0, 3.0]).unwrap();

    let frame = engine.compute(&store, canvas(), &measure).unwrap();
    let overlaps = |points: &[Pos2]| {
        let mut count = 0;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if boxes_overlap(points[i], frame.sizes[i], points[j], frame.sizes[j]) {
                    count += 1;
                }
            }
        }
        count
    };

    let before = overlaps(&frame.targets);
    let after = overlaps(&frame.positions);
    assert!(before > 0);
    assert!(after < before, "overlaps before {before}, after {after}");
    assert_positions_near_targets(&frame);
    assert_in_bounds(&frame, WIDTH, HEIGHT);
}

#[test]
fn crowd_at_the_canvas_edge_is_kept_on_canvas() {
    let engine = engine();
    let mut store = VectorStore::new();
    for index in 0..8 {
        store
            .append(format!("crowd {index}"), vec![1.0, 0.0, 0.0])
            .unwrap();
    }
    store.append("left", vec![0.0, 1.0, 0.0]).unwrap();
    store.append("right", vec![0.0, 0.0, 1.0]).unwrap();

    for canvas in [canvas(), Canvas::new(400.0, 300.0)] {
        let frame = engine.compute(&store, canvas, &measure).unwrap();
        assert_in_bounds(&frame, canvas.width, canvas.height);
        assert_positions_near_targets(&frame);

        let crowd = &frame.positions[..8];
        assert!(
            crowd.iter().any(|position| position.distance(crowd[0]) > 1.0),
            "crowd never spread: {crowd:?}"
        );
    }
}

#[test]
fn marker_sync_follows_insertions() {
    let engine = engine();
    let mut markers = MarkerSet::new();

    let first = engine
        .insert(&VectorStore::new(), "one", vec![0.0, 1.0], canvas(), &measure)
        .unwrap();
    let plan = markers.plan_sync(&first.frame);
    assert_eq!(plan.to_create.len(), 1);
    assert!(plan.to_update.is_empty());
    markers.apply(plan);

    let second = engine
        .insert(&first.store, "two", vec![1.0, 0.0], canvas(), &measure)
        .unwrap();
    let plan = markers.plan_sync(&second.frame);
    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].id, second.id);
    assert_eq!(plan.to_update.len(), 1);
    assert_eq!(plan.to_update[0].id, first.id);
    assert_eq!(plan.to_update[0].from, first.frame.positions[0]);
    markers.apply(plan);

    assert_eq!(markers.len(), 2);
    assert_eq!(
        markers.get(first.id).map(|marker| marker.position),
        Some(second.frame.positions[0])
    );
}

#[test]
fn earlier_snapshots_do_not_see_later_appends() {
    let engine = engine();
    let first = engine
        .insert(&VectorStore::new(), "one", vec![0.5, 0.5], canvas(), &measure)
        .unwrap();
    let second = engine
        .insert(&first.store, "two", vec![0.1, 0.9], canvas(), &measure)
        .unwrap();

    assert_eq!(first.store.len(), 1);
    assert_eq!(second.store.len(), 2);
    assert_eq!(
        second.store.items()[0].vector,
        first.store.items()[0].vector
    );
}
