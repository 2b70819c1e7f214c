//! Geometric primitives for anti-aliased rendering
//!
//! Signed distance functions for the shapes a card is built from,
//! and the functions that turn a distance into pixel coverage.
//! All SDFs here return positive values inside the shape.

/// Smoothstep interpolation for anti-aliasing.
///
/// Returns smooth transition from 0 to 1 as t goes from 0 to 1.
/// Uses Hermite interpolation: 3t² - 2t³
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Compute anti-aliased alpha from signed distance.
///
/// # Arguments
/// * `d` - Signed distance to shape boundary (positive = inside)
/// * `aa_width` - Width of the anti-aliasing transition zone
///
/// # Returns
/// * `d >= 0`: 1.0 (fully inside)
/// * `d < -aa_width`: 0.0 (fully outside)
/// * Otherwise: smooth transition using smoothstep
#[inline]
pub fn aa_alpha_from_distance(d: f32, aa_width: f32) -> f32 {
    if d >= 0.0 {
        1.0
    } else {
        let t = (d / aa_width + 1.0).clamp(0.0, 1.0);
        smoothstep(t)
    }
}

/// Signed distance to a circle (positive inside).
#[inline]
pub fn circle_sdf(px: f32, py: f32, cx: f32, cy: f32, radius: f32) -> f32 {
    let dx = px - cx;
    let dy = py - cy;
    radius - (dx * dx + dy * dy).sqrt()
}

/// Signed distance to an axis-aligned rounded rectangle (positive inside).
///
/// The corner radius is clamped to half the shorter side.
///
/// # Algorithm
/// Fold the point into the first quadrant around the rectangle center,
/// then measure against the inner rectangle shrunk by the corner radius:
/// outside distance is the length of the positive overhang, inside distance
/// is the (negative) largest overhang.
pub fn rounded_rect_sdf(px: f32, py: f32, x: f32, y: f32, w: f32, h: f32, radius: f32) -> f32 {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let r = radius.clamp(0.0, hw.min(hh));

    let qx = (px - (x + hw)).abs() - (hw - r);
    let qy = (py - (y + hh)).abs() - (hh - r);

    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    r - (outside + inside)
}

/// Calculate shortest distance from point P to line segment AB.
///
/// Used for anti-aliased separator lines.
///
/// # Algorithm
/// Uses point-to-line projection to find the closest point on segment AB:
///
/// 1. Compute vectors: v = B - A (segment direction), w = P - A (point offset)
/// 2. Project P onto infinite line AB: t = dot(v, w) / dot(v, v)
/// 3. Clamp t to [0, 1] to stay within segment
/// 4. Return distance from P to the clamped projection point
#[inline]
pub fn distance_to_segment(px: f32, py: f32, ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let vx = bx - ax;
    let vy = by - ay;
    let wx = px - ax;
    let wy = py - ay;

    let c1 = vx * wx + vy * wy;
    if c1 <= 0.0 {
        return (wx * wx + wy * wy).sqrt();
    }

    let c2 = vx * vx + vy * vy;
    if c2 <= c1 {
        let dx = px - bx;
        let dy = py - by;
        return (dx * dx + dy * dy).sqrt();
    }

    let t = c1 / c2;
    let proj_x = ax + t * vx;
    let proj_y = ay + t * vy;
    let dx = px - proj_x;
    let dy = py - proj_y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_boundaries() {
        assert!((smoothstep(0.0) - 0.0).abs() < 1e-6);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-6);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_circle_sdf_sign() {
        assert!(circle_sdf(0.0, 0.0, 0.0, 0.0, 10.0) > 0.0);
        assert!((circle_sdf(10.0, 0.0, 0.0, 0.0, 10.0)).abs() < 1e-6);
        assert!(circle_sdf(20.0, 0.0, 0.0, 0.0, 10.0) < 0.0);
    }

    #[test]
    fn test_rounded_rect_sdf() {
        // Center is inside by half the short side
        let d = rounded_rect_sdf(50.0, 25.0, 0.0, 0.0, 100.0, 50.0, 10.0);
        assert!((d - 25.0).abs() < 1e-4);
        // On a straight edge
        let d = rounded_rect_sdf(50.0, 0.0, 0.0, 0.0, 100.0, 50.0, 10.0);
        assert!(d.abs() < 1e-4);
        // The sharp corner is cut away by the radius
        assert!(rounded_rect_sdf(0.5, 0.5, 0.0, 0.0, 100.0, 50.0, 10.0) < 0.0);
        // Zero radius keeps the corner
        assert!(rounded_rect_sdf(0.5, 0.5, 0.0, 0.0, 100.0, 50.0, 0.0) > 0.0);
    }

    #[test]
    fn test_distance_to_segment() {
        assert!((distance_to_segment(0.5, 0.0, 0.0, 0.0, 1.0, 0.0)).abs() < 1e-6);

        let d = distance_to_segment(0.5, 1.0, 0.0, 0.0, 1.0, 0.0);
        assert!((d - 1.0).abs() < 1e-6);

        assert!((distance_to_segment(0.0, 0.0, 0.0, 0.0, 1.0, 0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_aa_alpha() {
        assert_eq!(aa_alpha_from_distance(1.0, 1.0), 1.0);
        assert_eq!(aa_alpha_from_distance(-2.0, 1.0), 0.0);
        let mid = aa_alpha_from_distance(-0.5, 1.0);
        assert!(mid > 0.0 && mid < 1.0);
    }
}
