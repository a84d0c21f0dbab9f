//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in scene units.

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Two triangles covering the quad `a b c d` (counter-clockwise)
fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Filled axis-aligned rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = r.min;
    let max = r.max();
    quad(
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        color,
    )
    .to_vec()
}

/// Filled rectangle of `size` rotated by `angle` around `center`
pub fn rotated_rect(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let half = size * 0.5;
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));

    quad(
        corner(-half.x, -half.y),
        corner(half.x, -half.y),
        corner(half.x, half.y),
        corner(-half.x, half.y),
        color,
    )
    .to_vec()
}

/// Thick line segment. Zero-length segments produce nothing.
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);

    quad(from - perp, to - perp, to + perp, from + perp, color).to_vec()
}

/// Rectangle border drawn as four lines
pub fn rect_outline(r: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let min = r.min;
    let max = r.max();
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ];

    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        vertices.extend(line(corners[i], corners[(i + 1) % 4], thickness, color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_rect_covers_bounds() {
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
        let vertices = rect(&r, [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(bounds(&vertices), (Vec2::new(10.0, 20.0), Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let vertices = rotated_rect(Vec2::new(100.0, 100.0), Vec2::new(60.0, 24.0), FRAC_PI_2, [1.0; 4]);
        let (lo, hi) = bounds(&vertices);
        assert!((hi.x - lo.x - 24.0).abs() < 1e-3);
        assert!((hi.y - lo.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, [1.0; 4]).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 2.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_outline_has_four_sides() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert_eq!(rect_outline(&r, 1.0, [1.0; 4]).len(), 24);
    }
}
