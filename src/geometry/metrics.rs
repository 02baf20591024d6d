//! Small vector helpers for cell metrics.
//!
//! Points are `[f64; 3]`; 2D meshes are lifted with `z = 0` by
//! [`Mesh::point3`](crate::data::mesh::Mesh::point3) before reaching here.

#[inline]
pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    norm(sub(a, b))
}

/// Magnitude of `(v1 - v0) x (v2 - v0)`, i.e. twice the triangle area.
///
/// Degenerate-facet detection compares this value, not the area, against
/// its tolerance.
#[inline]
pub fn cross_magnitude(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> f64 {
    norm(cross(sub(v1, v0), sub(v2, v0)))
}

/// Triangle area.
#[inline]
pub fn triangle_area(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> f64 {
    0.5 * cross_magnitude(v0, v1, v2)
}
