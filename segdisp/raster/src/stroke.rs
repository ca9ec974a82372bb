//! Converts the contours of an outline into polygons covering its stroke.
use cgmath::{prelude::*, Point2, Vector2};
use segdisp_geom::signed_area;
use std::f32::consts::PI;

/// The number of vertices of a join polygon.
const JOIN_VERTICES: usize = 8;

/// Build polygons that, filled together using the non-zero winding number
/// rule, cover a stroke of width `width` along every (closed) contour.
///
/// Every edge is expanded to a rectangle and every vertex to a regular
/// octagon. All output polygons have the same orientation so that they never
/// cancel each other out.
pub fn stroke_polygons(contours: &[Vec<Point2<f32>>], width: f32) -> Vec<Vec<Point2<f32>>> {
    let half = width * 0.5;
    let mut out = Vec::new();

    if !(half > 0.0) {
        return out;
    }

    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let p = contour[i];
            let q = contour[(i + 1) % n];

            out.push(join(p, half));

            let d = q - p;
            let len = d.magnitude();
            if !(len > 1.0e-6) {
                continue;
            }

            let normal = Vector2::new(-d.y, d.x) * (half / len);
            let mut quad = vec![p + normal, q + normal, q - normal, p - normal];
            if signed_area(&quad) < 0.0 {
                quad.reverse();
            }
            out.push(quad);
        }
    }

    out
}

/// A regular polygon approximating a round join. The vertices go clockwise in
/// a y-down space, which gives a positive signed area.
fn join(center: Point2<f32>, radius: f32) -> Vec<Point2<f32>> {
    (0..JOIN_VERTICES)
        .map(|k| {
            let theta = (k as f32 + 0.5) * (2.0 * PI / JOIN_VERTICES as f32);
            center + Vector2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}
