//! Point-in-polygon classification for lasso selection.
//!
//! The lasso is tested with the even-odd rule using horizontal ray casting.
//! A winding-number routine is kept alongside as a reference for checking
//! the even-odd result on simple (non self-intersecting) polygons.

use crate::model::Vec2;

/// Even-odd containment of `p` in the polygon formed by `polygon`.
///
/// The polygon is implicitly closed from the last vertex back to the first.
/// A closed lasso repeats its first vertex at the end; that closing edge has
/// zero length, never straddles the ray and so is never double counted.
/// Points exactly on an edge get an implementation-defined but stable answer.
pub fn is_inside_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut prev = polygon[n - 1];
    for &cur in polygon {
        let straddles = (cur.y < p.y && prev.y >= p.y) || (prev.y < p.y && cur.y >= p.y);
        if straddles && (cur.x <= p.x || prev.x <= p.x) {
            let x_cross = cur.x + (p.y - cur.y) / (prev.y - cur.y) * (prev.x - cur.x);
            if x_cross < p.x {
                inside = !inside;
            }
        }
        prev = cur;
    }
    inside
}

/// Classify every position against the polygon.
///
/// Each test is independent, so with the `threads` feature the work is split
/// across the rayon pool; results are identical either way.
pub fn classify_all(points: &[Vec2], polygon: &[Vec2]) -> Vec<bool> {
    #[cfg(feature = "threads")]
    {
        use rayon::prelude::*;
        points.par_iter().map(|&p| is_inside_polygon(p, polygon)).collect()
    }
    #[cfg(not(feature = "threads"))]
    {
        points.iter().map(|&p| is_inside_polygon(p, polygon)).collect()
    }
}

/// Same as [`classify_all`] over flat `[x0, y0, x1, y1, ..]` positions.
pub fn classify_flat(positions: &[f32], polygon: &[Vec2]) -> Vec<bool> {
    let points: Vec<Vec2> = vertices_from_flat(positions);
    classify_all(&points, polygon)
}

/// Interpret a flat coordinate array as vertices. A trailing odd scalar is ignored.
pub fn vertices_from_flat(flat: &[f32]) -> Vec<Vec2> {
    flat.chunks_exact(2).map(|c| Vec2::new(c[0], c[1])).collect()
}

/// Compute the winding number of a point relative to a polygon.
///
/// - Positive = counter-clockwise winding
/// - Negative = clockwise winding
/// - Zero = point is outside
pub fn winding_number(p: Vec2, polygon: &[Vec2]) -> i32 {
    if polygon.len() < 3 {
        return 0;
    }

    let mut winding = 0i32;
    let n = polygon.len();

    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        if p1.y <= p.y {
            if p2.y > p.y && cross(p1, p2, p) > 0.0 {
                // Upward crossing with p on the left
                winding += 1;
            }
        } else if p2.y <= p.y && cross(p1, p2, p) < 0.0 {
            // Downward crossing with p on the right
            winding -= 1;
        }
    }

    winding
}

/// True when `p` lies within `tol` of any polygon edge, closing edge included.
pub fn on_boundary(p: Vec2, polygon: &[Vec2], tol: f32) -> bool {
    let n = polygon.len();
    let tol_sq = tol * tol;
    (0..n).any(|i| seg_distance_sq(p, polygon[i], polygon[(i + 1) % n]) <= tol_sq)
}

fn seg_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let vv = vx * vx + vy * vy;
    let t = if vv > 0.0 {
        (((p.x - a.x) * vx + (p.y - a.y) * vy) / vv).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = p.x - (a.x + t * vx);
    let dy = p.y - (a.y + t * vy);
    dx * dx + dy * dy
}

/// Signed area of the triangle (a, b, p), doubled.
#[inline]
fn cross(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    fn square() -> Vec<Vec2> {
        vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 10.0),
            vec2(0.0, 10.0),
        ]
    }

    #[test]
    fn test_square_inside_outside() {
        let sq = square();
        assert!(is_inside_polygon(vec2(5.0, 5.0), &sq));
        assert!(!is_inside_polygon(vec2(-5.0, 5.0), &sq));
        assert!(!is_inside_polygon(vec2(15.0, 5.0), &sq));
        assert!(!is_inside_polygon(vec2(5.0, -5.0), &sq));
        assert!(!is_inside_polygon(vec2(5.0, 15.0), &sq));
    }

    #[test]
    fn test_closed_lasso_is_not_double_counted() {
        let mut closed = square();
        closed.push(closed[0]);
        for p in [vec2(5.0, 5.0), vec2(0.5, 9.5), vec2(-1.0, 0.0), vec2(11.0, 10.0)] {
            assert_eq!(is_inside_polygon(p, &closed), is_inside_polygon(p, &square()));
        }
    }

    #[test]
    fn test_segment_pair_layout_matches_plain_polygon() {
        // Lasso paths repeat each interior vertex so consecutive pairs form segments.
        let sq = square();
        let pairs = vec![sq[0], sq[1], sq[1], sq[2], sq[2], sq[3], sq[3], sq[0]];
        for p in [vec2(5.0, 5.0), vec2(9.9, 0.1), vec2(12.0, 3.0), vec2(-0.1, 5.0)] {
            assert_eq!(is_inside_polygon(p, &pairs), is_inside_polygon(p, &sq));
        }
    }

    #[test]
    fn test_concave_polygon() {
        let l_shape = vec![
            vec2(0.0, 0.0),
            vec2(10.0, 0.0),
            vec2(10.0, 5.0),
            vec2(5.0, 5.0),
            vec2(5.0, 10.0),
            vec2(0.0, 10.0),
        ];
        assert!(is_inside_polygon(vec2(2.0, 2.0), &l_shape));
        assert!(is_inside_polygon(vec2(2.0, 7.0), &l_shape));
        assert!(!is_inside_polygon(vec2(7.0, 7.0), &l_shape));
        assert_eq!(winding_number(vec2(7.0, 7.0), &l_shape), 0);
    }

    #[test]
    fn test_winding_direction() {
        let ccw = square();
        let mut cw = square();
        cw.reverse();
        assert_eq!(winding_number(vec2(5.0, 5.0), &ccw), 1);
        assert_eq!(winding_number(vec2(5.0, 5.0), &cw), -1);
    }

    #[test]
    fn test_edge_points_are_stable() {
        let sq = square();
        for p in [vec2(5.0, 0.0), vec2(10.0, 5.0), vec2(0.0, 5.0), vec2(10.0, 10.0)] {
            let first = is_inside_polygon(p, &sq);
            for _ in 0..4 {
                assert_eq!(is_inside_polygon(p, &sq), first);
            }
        }
    }

    #[test]
    fn test_on_boundary() {
        let sq = square();
        assert!(on_boundary(vec2(5.0, 0.0), &sq, 1e-3));
        assert!(on_boundary(vec2(0.0, 5.0), &sq, 1e-3));
        assert!(on_boundary(vec2(10.0, 10.0), &sq, 1e-3));
        assert!(!on_boundary(vec2(5.0, 5.0), &sq, 1e-3));
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert!(!is_inside_polygon(vec2(0.0, 0.0), &[]));
        assert!(!is_inside_polygon(vec2(0.0, 0.0), &[vec2(0.0, 0.0), vec2(1.0, 1.0)]));
        assert_eq!(winding_number(vec2(0.0, 0.0), &[vec2(0.0, 0.0)]), 0);
    }

    #[test]
    fn test_classify_flat_matches_per_point() {
        let sq = square();
        let flat = [1.0, 1.0, 20.0, 1.0, 9.0, 9.0, 5.0, 11.0];
        assert_eq!(classify_flat(&flat, &sq), vec![true, false, true, false]);
    }
}
