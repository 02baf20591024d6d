//! Closed-form geometry transforms applied between read and write.
//!
//! All three operate in place and check their arguments before touching the
//! mesh, so an error leaves the mesh unchanged.

use crate::data::mesh::Mesh;
use crate::geometry::metrics::{add, cross, dot, norm, scale, sub};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::f64::consts::PI;

/// Rotation about an axis through an optional pivot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub pivot: [f64; 3],
    /// Rotation axis; need not be normalised.
    pub axis: [f64; 3],
    /// Angle in units of π radians (`1.0` is a half turn).
    pub angle: f64,
}

impl Rotation {
    /// Parse `[ax, ay, az, angle]` or `[px, py, pz, ax, ay, az, angle]`.
    pub fn from_params(params: &[f64]) -> Result<Self, MeshConvertError> {
        match *params {
            [ax, ay, az, angle] => Ok(Self {
                pivot: [0.0; 3],
                axis: [ax, ay, az],
                angle,
            }),
            [px, py, pz, ax, ay, az, angle] => Ok(Self {
                pivot: [px, py, pz],
                axis: [ax, ay, az],
                angle,
            }),
            _ => Err(MeshConvertError::InvalidParameterCount {
                operation: "rotate",
                expected: "4 or 7",
                found: params.len(),
            }),
        }
    }

    /// Rotate one point (Rodrigues' formula).
    fn apply(&self, unit_axis: [f64; 3], sin: f64, cos: f64, p: [f64; 3]) -> [f64; 3] {
        let v = sub(p, self.pivot);
        let rotated = add(
            add(scale(v, cos), scale(cross(unit_axis, v), sin)),
            scale(unit_axis, dot(unit_axis, v) * (1.0 - cos)),
        );
        add(rotated, self.pivot)
    }
}

/// Rotate every vertex by `angle * π` radians.
///
/// `params` is `[ax, ay, az, angle]` (axis through the origin) or
/// `[px, py, pz, ax, ay, az, angle]` (axis through the pivot `p`).
pub fn rotate(mesh: &mut Mesh, params: &[f64]) -> Result<(), MeshConvertError> {
    let rotation = Rotation::from_params(params)?;
    if mesh.dimension() != 3 {
        return Err(MeshConvertError::InvalidDimension(mesh.dimension()));
    }
    let length = norm(rotation.axis);
    if length == 0.0 || !length.is_finite() {
        return Err(MeshConvertError::DegenerateAxis);
    }
    let unit = scale(rotation.axis, 1.0 / length);
    let (sin, cos) = (rotation.angle * PI).sin_cos();

    log::info!(
        "rotating {} vertices by {}π about {:?} through {:?}",
        mesh.num_vertices(),
        rotation.angle,
        rotation.axis,
        rotation.pivot
    );
    for v in mesh.vertices_mut() {
        let p = rotation.apply(unit, sin, cos, [v[0], v[1], v[2]]);
        v.copy_from_slice(&p);
    }
    Ok(())
}

/// Corner signs in emission order: z outermost, then y, then x; `+` first.
const BOX_CORNERS: [[f64; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
];

/// Two triangles per face, indices into [`BOX_CORNERS`]. Every triangle
/// faces into the box, towards the enclosed mesh.
const BOX_TRIANGLES: [[usize; 3]; 12] = [
    [0, 3, 1],
    [0, 2, 3],
    [4, 5, 7],
    [4, 7, 6],
    [4, 2, 0],
    [4, 6, 2],
    [5, 1, 3],
    [5, 3, 7],
    [6, 7, 3],
    [6, 3, 2],
    [4, 0, 1],
    [4, 1, 5],
];

/// Median of one coordinate: the element at `n / 2` after sorting.
fn median(mesh: &Mesh, axis: usize) -> f64 {
    let mut values: Vec<f64> = mesh.vertices().map(|v| v[axis]).collect();
    values.sort_by(f64::total_cmp);
    values[values.len() / 2]
}

/// Append a cuboid of 8 vertices and 12 triangles around the mesh.
///
/// `params` is `[length, width, height]`, the full edge lengths along x, y
/// and z. The cuboid is centred on the per-axis median vertex coordinate.
/// When the mesh carries one mark per cell the new triangles get
/// `max(mark) + 1`.
pub fn add_bounding_box(mesh: &mut Mesh, params: &[f64]) -> Result<(), MeshConvertError> {
    let &[length, width, height] = params else {
        return Err(MeshConvertError::InvalidParameterCount {
            operation: "bounding box",
            expected: "3",
            found: params.len(),
        });
    };
    if mesh.cell_type() != CellType::Triangle {
        return Err(MeshConvertError::UnsupportedTopology {
            format: "bounding box",
            width: mesh.cell_width(),
        });
    }
    if mesh.dimension() != 3 {
        return Err(MeshConvertError::InvalidDimension(mesh.dimension()));
    }
    if mesh.num_vertices() == 0 {
        return Err(MeshConvertError::EmptyMesh("bounding box needs vertices"));
    }

    let center = [median(mesh, 0), median(mesh, 1), median(mesh, 2)];
    let half = [length / 2.0, width / 2.0, height / 2.0];
    log::info!("adding bounding box {length} x {width} x {height} at {center:?}");

    let box_mark = if mesh.marks().is_empty() {
        None
    } else if mesh.marks_match_cells() {
        Some(mesh.max_mark().map_or(0, |m| m.saturating_add(1)))
    } else {
        log::warn!(
            "bounding box: {} marks for {} cells; box triangles left unmarked",
            mesh.marks().len(),
            mesh.num_cells()
        );
        None
    };

    let base = mesh.num_vertices();
    for signs in BOX_CORNERS {
        let corner = [
            center[0] + signs[0] * half[0],
            center[1] + signs[1] * half[1],
            center[2] + signs[2] * half[2],
        ];
        mesh.push_vertex(&corner)?;
    }
    for tri in BOX_TRIANGLES {
        mesh.push_cell(&[base + tri[0], base + tri[1], base + tri[2]])?;
        if let Some(mark) = box_mark {
            mesh.push_mark(mark);
        }
    }
    Ok(())
}

/// Flip every cell by swapping its first and last vertex.
pub fn reverse_orientation(mesh: &mut Mesh) {
    log::info!("reversing {} cells", mesh.num_cells());
    for cell in mesh.cells_mut() {
        let last = cell.len() - 1;
        cell.swap(0, last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_rotation_forms() {
        let r = Rotation::from_params(&[0.0, 0.0, 1.0, 0.5]).unwrap();
        assert_eq!(r.pivot, [0.0; 3]);
        let r = Rotation::from_params(&[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.5]).unwrap();
        assert_eq!(r.pivot, [1.0, 2.0, 3.0]);
        assert!(matches!(
            Rotation::from_params(&[1.0; 5]),
            Err(MeshConvertError::InvalidParameterCount { found: 5, .. })
        ));
    }

    #[test]
    fn box_triangles_face_inward() {
        for tri in BOX_TRIANGLES {
            let [a, b, c] = tri.map(|i| BOX_CORNERS[i]);
            let normal = cross(sub(b, a), sub(c, a));
            let centroid = scale(add(add(a, b), c), 1.0 / 3.0);
            assert!(dot(normal, centroid) < 0.0, "{tri:?} points outward");
        }
    }
}
