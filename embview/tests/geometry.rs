use embview::geometry::polygon::{classify_all, is_inside_polygon, on_boundary, winding_number};
use embview::geometry::transform::{build_transform, screen_to_world, world_to_screen};
use embview::Vec2;
use proptest::prelude::*;

fn triangle() -> impl Strategy<Value = Vec<Vec2>> {
    prop::collection::vec((-20i32..=20, -20i32..=20), 3).prop_filter_map(
        "degenerate triangle",
        |v| {
            let p: Vec<Vec2> = v.into_iter().map(|(x, y)| Vec2::new(x as f32, y as f32)).collect();
            let area2 = (p[1].x - p[0].x) * (p[2].y - p[0].y) - (p[2].x - p[0].x) * (p[1].y - p[0].y);
            if area2 == 0.0 {
                None
            } else {
                Some(p)
            }
        },
    )
}

fn rectangle() -> impl Strategy<Value = Vec<Vec2>> {
    (-20i32..=19, -20i32..=19, 1i32..=20, 1i32..=20).prop_map(|(x, y, w, h)| {
        let (x0, y0) = (x as f32, y as f32);
        let (x1, y1) = ((x + w).min(20) as f32, (y + h).min(20) as f32);
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    })
}

// Exact test on the quarter grid: scale by 4 so every coordinate is an integer.
fn on_edge_exact(p: Vec2, poly: &[Vec2]) -> bool {
    let q = |v: f32| (v * 4.0).round() as i64;
    let (px, py) = (q(p.x), q(p.y));
    (0..poly.len()).any(|i| {
        let (a, b) = (poly[i], poly[(i + 1) % poly.len()]);
        let (ax, ay, bx, by) = (q(a.x), q(a.y), q(b.x), q(b.y));
        let cross = (bx - ax) * (py - ay) - (px - ax) * (by - ay);
        cross == 0
            && px >= ax.min(bx)
            && px <= ax.max(bx)
            && py >= ay.min(by)
            && py <= ay.max(by)
    })
}

fn quarter_grid_point() -> impl Strategy<Value = Vec2> {
    (-100i32..=100, -100i32..=100).prop_map(|(x, y)| Vec2::new(x as f32 * 0.25, y as f32 * 0.25))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn even_odd_agrees_with_winding_off_boundary(
        poly in prop_oneof![triangle(), rectangle()],
        p in quarter_grid_point(),
        reversed in any::<bool>(),
    ) {
        let mut poly = poly;
        if reversed {
            poly.reverse();
        }
        let inside = is_inside_polygon(p, &poly);
        if on_edge_exact(p, &poly) || on_boundary(p, &poly, 1e-6) {
            // Boundary answers only need to be repeatable.
            prop_assert_eq!(inside, is_inside_polygon(p, &poly));
        } else {
            prop_assert_eq!(inside, winding_number(p, &poly) != 0);
        }
    }

    #[test]
    fn closing_vertex_does_not_change_classification(
        poly in triangle(),
        p in quarter_grid_point(),
    ) {
        let mut closed = poly.clone();
        closed.push(poly[0]);
        prop_assert_eq!(is_inside_polygon(p, &closed), is_inside_polygon(p, &poly));
    }

    #[test]
    fn screen_world_round_trip(
        sx in 0.1f32..10.0,
        sy in 0.1f32..10.0,
        rot in -std::f32::consts::PI..std::f32::consts::PI,
        tx in -2.0f32..2.0,
        ty in -2.0f32..2.0,
        px in -10.0f32..10.0,
        py in -10.0f32..10.0,
    ) {
        let m = build_transform(Vec2::new(tx, ty), rot, Vec2::new(sx, sy));
        let (w, h) = (800.0, 600.0);
        let p = Vec2::new(px, py);
        let back = screen_to_world(world_to_screen(p, w, h, &m), w, h, &m);
        prop_assert!(back.is_valid());
        prop_assert!((back.x - p.x).abs() <= 1e-3 * (1.0 + p.x.abs()), "x {} vs {}", back.x, p.x);
        prop_assert!((back.y - p.y).abs() <= 1e-3 * (1.0 + p.y.abs()), "y {} vs {}", back.y, p.y);
    }
}

#[test]
fn classify_all_matches_single_tests() {
    let poly = vec![
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(0.0, 1.5),
    ];
    let pts: Vec<Vec2> = (-8..=8)
        .flat_map(|i| (-8..=8).map(move |j| Vec2::new(i as f32 * 0.2, j as f32 * 0.2)))
        .collect();
    let mask = classify_all(&pts, &poly);
    for (p, m) in pts.iter().zip(&mask) {
        assert_eq!(*m, is_inside_polygon(*p, &poly));
    }
    assert!(mask.iter().any(|&m| m));
    assert!(mask.iter().any(|&m| !m));
}

#[test]
fn singular_transform_maps_to_sentinel() {
    let m = build_transform(Vec2::new(0.0, 0.0), 0.3, Vec2::new(0.0, 1.0));
    let w = screen_to_world(embview::ScreenPos::new(10.0, 10.0), 100.0, 100.0, &m);
    assert_eq!(w, Vec2::INVALID);
}
