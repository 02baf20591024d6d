//! Vertex welding and degenerate-facet removal.
//!
//! [`repair_with`] runs two passes over the input mesh and then rebuilds it:
//!
//! 1. **Degenerate detection.** A triangle is degenerate when
//!    `|(v1 - v0) x (v2 - v0)|` is below `area_tolerance`. Detection uses the
//!    coordinates *before* welding. Only triangle meshes are checked.
//! 2. **Welding.** Vertices are sorted by `(x, y, z, index)`; every run of
//!    sorted neighbours closer than `weld_tolerance` collapses onto the first
//!    vertex of the run. Surviving vertices are renumbered in sorted order.
//!    `-0.0` and `0.0` sort as equal.
//!
//! Degenerate cells are dropped and the rest are remapped through the weld
//! map. Marks follow [`MarkPolicy`].

use crate::data::mesh::Mesh;
use crate::geometry::metrics::{cross_magnitude, distance};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::cmp::Ordering;

/// Weld distance and area threshold used unless overridden.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// What happens to marks when degenerate cells are removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MarkPolicy {
    /// Drop the marks of removed cells so marks stay aligned with cells.
    #[default]
    Compact,
    /// Leave marks untouched. After removals the mark array is longer than
    /// the cell array and writers omit it.
    Preserve,
}

/// Parameters for [`repair_with`].
///
/// # Example
///
/// ```
/// use mesh_convert::algs::repair::{MarkPolicy, RepairOptions};
///
/// let opts = RepairOptions::default()
///     .with_weld_tolerance(1e-6)
///     .with_mark_policy(MarkPolicy::Preserve);
/// assert_eq!(opts.area_tolerance, 1e-8);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    /// Sorted neighbours closer than this are merged.
    pub weld_tolerance: f64,
    /// Triangles whose edge cross product is shorter than this are removed.
    pub area_tolerance: f64,
    pub mark_policy: MarkPolicy,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            weld_tolerance: DEFAULT_TOLERANCE,
            area_tolerance: DEFAULT_TOLERANCE,
            mark_policy: MarkPolicy::Compact,
        }
    }
}

impl RepairOptions {
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_area_tolerance(mut self, tolerance: f64) -> Self {
        self.area_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_mark_policy(mut self, policy: MarkPolicy) -> Self {
        self.mark_policy = policy;
        self
    }
}

/// Counts before and after a repair pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepairReport {
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub cells_before: usize,
    pub cells_after: usize,
    /// Indices (into the input cells) of removed degenerate cells, ascending.
    pub degenerate_cells: Vec<usize>,
}

impl RepairReport {
    /// True when the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.vertices_before == self.vertices_after && self.degenerate_cells.is_empty()
    }
}

/// Result of the welding pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeldMap {
    /// New index of every original vertex.
    pub old_to_new: Vec<usize>,
    /// Original index kept for each new vertex, in new-index order.
    pub representatives: Vec<usize>,
}

impl WeldMap {
    pub fn num_welded(&self) -> usize {
        self.old_to_new.len() - self.representatives.len()
    }
}

/// Ascending indices of triangles whose cross-product magnitude is below
/// `tolerance`. Non-triangle meshes have none.
pub fn find_degenerate_cells(mesh: &Mesh, tolerance: f64) -> Vec<usize> {
    if mesh.cell_type() != CellType::Triangle {
        return Vec::new();
    }
    mesh.cells()
        .enumerate()
        .filter(|(_, c)| {
            cross_magnitude(mesh.point3(c[0]), mesh.point3(c[1]), mesh.point3(c[2])) < tolerance
        })
        .map(|(i, _)| i)
        .collect()
}

/// Total order on coordinates with both zeros folded onto `+0.0`.
fn coord_cmp(a: f64, b: f64) -> Ordering {
    let fold = |v: f64| if v == 0.0 { 0.0 } else { v };
    fold(a).total_cmp(&fold(b))
}

fn lexicographic(a: &[f64; 3], b: &[f64; 3]) -> Ordering {
    coord_cmp(a[0], b[0])
        .then_with(|| coord_cmp(a[1], b[1]))
        .then_with(|| coord_cmp(a[2], b[2]))
}

/// Sort-merge weld of near-duplicate vertices.
pub fn weld_map(mesh: &Mesh, tolerance: f64) -> WeldMap {
    let n = mesh.num_vertices();
    let points: Vec<[f64; 3]> = (0..n).map(|i| mesh.point3(i)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| lexicographic(&points[a], &points[b]).then(a.cmp(&b)));

    let mut old_to_new = vec![0usize; n];
    let mut representatives = Vec::new();
    let mut i = 0;
    while i < n {
        let id = representatives.len();
        representatives.push(order[i]);
        old_to_new[order[i]] = id;
        while i + 1 < n && distance(points[order[i]], points[order[i + 1]]) < tolerance {
            i += 1;
            old_to_new[order[i]] = id;
        }
        i += 1;
    }
    WeldMap {
        old_to_new,
        representatives,
    }
}

/// [`repair_with`] using [`RepairOptions::default`].
pub fn repair(mesh: &mut Mesh) -> Result<RepairReport, MeshConvertError> {
    repair_with(mesh, &RepairOptions::default())
}

/// Remove degenerate triangles and weld duplicate vertices in place.
///
/// On error the mesh is left unchanged.
pub fn repair_with(
    mesh: &mut Mesh,
    options: &RepairOptions,
) -> Result<RepairReport, MeshConvertError> {
    mesh.validate_indices()?;
    let mut report = RepairReport {
        vertices_before: mesh.num_vertices(),
        cells_before: mesh.num_cells(),
        ..Default::default()
    };
    log::info!(
        "repair: {} vertices x {}, {} cells x {}, {} marks before clean",
        mesh.num_vertices(),
        mesh.dimension(),
        mesh.num_cells(),
        mesh.cell_width(),
        mesh.marks().len()
    );

    report.degenerate_cells = find_degenerate_cells(mesh, options.area_tolerance);
    log::info!(
        "repair: {} cells with zero area",
        report.degenerate_cells.len()
    );
    let mut keep = vec![true; mesh.num_cells()];
    for &i in &report.degenerate_cells {
        keep[i] = false;
    }

    let weld = weld_map(mesh, options.weld_tolerance);

    let mut vertices = Vec::with_capacity(weld.representatives.len() * mesh.dimension());
    for &old in &weld.representatives {
        vertices.extend_from_slice(mesh.vertex(old));
    }

    let width = mesh.cell_width();
    let mut cells = Vec::with_capacity((mesh.num_cells() - report.degenerate_cells.len()) * width);
    for (cell, _) in mesh.cells().zip(&keep).filter(|(_, k)| **k) {
        cells.extend(cell.iter().map(|&v| weld.old_to_new[v]));
    }

    let marks = match options.mark_policy {
        MarkPolicy::Compact if mesh.marks_match_cells() => Some(
            mesh.marks()
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(m, _)| *m)
                .collect::<Vec<_>>(),
        ),
        MarkPolicy::Compact => {
            if !mesh.marks().is_empty() {
                log::warn!(
                    "repair: {} marks for {} cells cannot be compacted; left as is",
                    mesh.marks().len(),
                    mesh.num_cells()
                );
            }
            None
        }
        MarkPolicy::Preserve => None,
    };

    mesh.replace_vertices(vertices);
    mesh.replace_cells(cells);
    if let Some(marks) = marks {
        mesh.set_marks(marks);
    }

    report.vertices_after = mesh.num_vertices();
    report.cells_after = mesh.num_cells();
    log::info!(
        "repair: {} vertices, {} cells, {} marks after clean ({} welded)",
        mesh.num_vertices(),
        mesh.num_cells(),
        mesh.marks().len(),
        weld.num_welded()
    );
    Ok(report)
}
