//! In-memory mesh: vertex coordinates, uniform-width cell connectivity and an
//! optional integer mark per cell.
//!
//! # Layout
//! Vertices are stored as one flat `Vec<f64>` with stride [`Mesh::dimension`]
//! and cells as one flat `Vec<usize>` with stride [`CellType::width`], so
//! every tuple in a mesh has the same width by construction.
//!
//! # Invariants
//! - every cell index is `< num_vertices()` (checked by [`Mesh::validate`]);
//! - `marks` is either empty or exactly one entry per cell;
//! - `dimension` is 2 or 3.
//!
//! Indices are always 0-based in memory; codecs convert on the way in and out.

use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;

/// A single-cell-type mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    dimension: usize,
    cell_type: CellType,
    vertices: Vec<f64>,
    cells: Vec<usize>,
    marks: Vec<i32>,
}

fn check_dimension(dimension: usize) -> Result<(), MeshConvertError> {
    if dimension == 2 || dimension == 3 {
        Ok(())
    } else {
        Err(MeshConvertError::InvalidDimension(dimension))
    }
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new(dimension: usize, cell_type: CellType) -> Result<Self, MeshConvertError> {
        Self::with_capacity(dimension, cell_type, 0, 0)
    }

    /// Create an empty mesh with room for `num_vertices` and `num_cells`.
    ///
    /// Readers call this with the counts from the file header so the data
    /// loops never reallocate.
    pub fn with_capacity(
        dimension: usize,
        cell_type: CellType,
        num_vertices: usize,
        num_cells: usize,
    ) -> Result<Self, MeshConvertError> {
        check_dimension(dimension)?;
        Ok(Self {
            dimension,
            cell_type,
            vertices: Vec::with_capacity(num_vertices * dimension),
            cells: Vec::with_capacity(num_cells * cell_type.width()),
            marks: Vec::new(),
        })
    }

    /// Build a 3D mesh from point and cell tuples.
    ///
    /// # Example
    /// ```rust
    /// use mesh_convert::data::mesh::Mesh;
    /// use mesh_convert::topology::cell_type::CellType;
    ///
    /// let mesh = Mesh::from_tuples(
    ///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    ///     CellType::Triangle,
    ///     &[0, 1, 2],
    /// )?;
    /// assert_eq!(mesh.num_cells(), 1);
    /// # Ok::<(), mesh_convert::mesh_error::MeshConvertError>(())
    /// ```
    pub fn from_tuples(
        points: &[[f64; 3]],
        cell_type: CellType,
        cells: &[usize],
    ) -> Result<Self, MeshConvertError> {
        let width = cell_type.width();
        if cells.len() % width != 0 {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "mesh",
                width: cells.len() % width,
            });
        }
        let mut mesh = Self::with_capacity(3, cell_type, points.len(), cells.len() / width)?;
        for p in points {
            mesh.push_vertex(p)?;
        }
        for cell in cells.chunks_exact(width) {
            mesh.push_cell(cell)?;
        }
        mesh.validate()?;
        Ok(mesh)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Number of vertex indices per cell.
    #[inline]
    pub fn cell_width(&self) -> usize {
        self.cell_type.width()
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / self.dimension
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len() / self.cell_width()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.cells.is_empty()
    }

    /// Coordinates of vertex `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_vertices()`.
    #[inline]
    pub fn vertex(&self, i: usize) -> &[f64] {
        &self.vertices[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Mutable coordinates of vertex `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_vertices()`.
    #[inline]
    pub fn vertex_mut(&mut self, i: usize) -> &mut [f64] {
        let d = self.dimension;
        &mut self.vertices[i * d..(i + 1) * d]
    }

    /// Vertex `i` as an `(x, y, z)` triple; 2D meshes get `z = 0`.
    ///
    /// # Panics
    /// Panics if `i >= num_vertices()`.
    #[inline]
    pub fn point3(&self, i: usize) -> [f64; 3] {
        let v = self.vertex(i);
        [v[0], v[1], if self.dimension == 3 { v[2] } else { 0.0 }]
    }

    /// Iterate over vertex tuples in order.
    pub fn vertices(&self) -> std::slice::ChunksExact<'_, f64> {
        self.vertices.chunks_exact(self.dimension)
    }

    /// Iterate mutably over vertex tuples in order.
    pub fn vertices_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        self.vertices.chunks_exact_mut(self.dimension)
    }

    /// Connectivity of cell `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_cells()`.
    #[inline]
    pub fn cell(&self, i: usize) -> &[usize] {
        let w = self.cell_width();
        &self.cells[i * w..(i + 1) * w]
    }

    /// Iterate over cell tuples in order.
    pub fn cells(&self) -> std::slice::ChunksExact<'_, usize> {
        self.cells.chunks_exact(self.cell_width())
    }

    /// Iterate mutably over cell tuples in order.
    pub fn cells_mut(&mut self) -> std::slice::ChunksExactMut<'_, usize> {
        let w = self.cell_width();
        self.cells.chunks_exact_mut(w)
    }

    /// Per-cell marks; empty when the mesh carries none.
    #[inline]
    pub fn marks(&self) -> &[i32] {
        &self.marks
    }

    /// True when there is exactly one mark per cell.
    ///
    /// An empty mesh with no marks counts as matching.
    #[inline]
    pub fn marks_match_cells(&self) -> bool {
        self.marks.len() == self.num_cells()
    }

    /// Largest mark, if any.
    pub fn max_mark(&self) -> Option<i32> {
        self.marks.iter().copied().max()
    }

    /// Append one vertex. `coords.len()` must equal the mesh dimension.
    pub fn push_vertex(&mut self, coords: &[f64]) -> Result<(), MeshConvertError> {
        if coords.len() != self.dimension {
            return Err(MeshConvertError::InvalidDimension(coords.len()));
        }
        self.vertices.extend_from_slice(coords);
        Ok(())
    }

    /// Grow or shrink the vertex array to `n` vertices; new vertices are zero.
    pub fn resize_vertices(&mut self, n: usize) {
        self.vertices.resize(n * self.dimension, 0.0);
    }

    /// Overwrite vertex `i`.
    pub fn set_vertex(&mut self, i: usize, coords: &[f64]) -> Result<(), MeshConvertError> {
        if i >= self.num_vertices() {
            return Err(MeshConvertError::IndexOutOfRange {
                index: i as i64,
                len: self.num_vertices(),
            });
        }
        if coords.len() != self.dimension {
            return Err(MeshConvertError::InvalidDimension(coords.len()));
        }
        self.vertex_mut(i).copy_from_slice(coords);
        Ok(())
    }

    /// Append one cell. `indices.len()` must equal the cell width.
    ///
    /// Indices are not range-checked here; see [`Mesh::validate`].
    pub fn push_cell(&mut self, indices: &[usize]) -> Result<(), MeshConvertError> {
        if indices.len() != self.cell_width() {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "mesh",
                width: indices.len(),
            });
        }
        self.cells.extend_from_slice(indices);
        Ok(())
    }

    pub fn push_mark(&mut self, mark: i32) {
        self.marks.push(mark);
    }

    /// Replace the mark array. Length is checked by [`Mesh::validate_marks`].
    pub fn set_marks(&mut self, marks: Vec<i32>) {
        self.marks = marks;
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    /// Replace the cell array with `cells` (flat, stride = cell width).
    pub(crate) fn replace_cells(&mut self, cells: Vec<usize>) {
        debug_assert_eq!(cells.len() % self.cell_width(), 0);
        self.cells = cells;
    }

    /// Replace the vertex array with `vertices` (flat, stride = dimension).
    pub(crate) fn replace_vertices(&mut self, vertices: Vec<f64>) {
        debug_assert_eq!(vertices.len() % self.dimension, 0);
        self.vertices = vertices;
    }

    /// Error unless marks are empty or one per cell.
    pub fn validate_marks(&self) -> Result<(), MeshConvertError> {
        if self.marks.is_empty() || self.marks_match_cells() {
            Ok(())
        } else {
            Err(MeshConvertError::AttributeCountMismatch {
                marks: self.marks.len(),
                cells: self.num_cells(),
            })
        }
    }

    /// Error if any cell references a missing vertex.
    pub fn validate_indices(&self) -> Result<(), MeshConvertError> {
        let n = self.num_vertices();
        match self.cells.iter().find(|&&idx| idx >= n) {
            Some(&bad) => Err(MeshConvertError::IndexOutOfRange {
                index: bad as i64,
                len: n,
            }),
            None => Ok(()),
        }
    }

    /// Check every invariant listed in the module docs.
    pub fn validate(&self) -> Result<(), MeshConvertError> {
        check_dimension(self.dimension)?;
        self.validate_indices()?;
        self.validate_marks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Mesh {
        Mesh::from_tuples(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            CellType::Triangle,
            &[0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_dimension() {
        assert_eq!(
            Mesh::new(4, CellType::Triangle).unwrap_err(),
            MeshConvertError::InvalidDimension(4)
        );
    }

    #[test]
    fn push_cell_enforces_width() {
        let mut mesh = tri();
        let err = mesh.push_cell(&[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            MeshConvertError::UnsupportedTopology { width: 2, .. }
        ));
    }

    #[test]
    fn validate_catches_out_of_range_index() {
        let mut mesh = tri();
        mesh.push_cell(&[0, 1, 7]).unwrap();
        assert_eq!(
            mesh.validate().unwrap_err(),
            MeshConvertError::IndexOutOfRange { index: 7, len: 3 }
        );
    }

    #[test]
    fn validate_catches_mark_mismatch() {
        let mut mesh = tri();
        mesh.set_marks(vec![1, 2]);
        assert_eq!(
            mesh.validate().unwrap_err(),
            MeshConvertError::AttributeCountMismatch { marks: 2, cells: 1 }
        );
    }

    #[test]
    fn point3_pads_2d_meshes() {
        let mut mesh = Mesh::new(2, CellType::Segment).unwrap();
        mesh.push_vertex(&[1.5, -2.0]).unwrap();
        assert_eq!(mesh.point3(0), [1.5, -2.0, 0.0]);
    }

    #[test]
    fn resize_zero_fills() {
        let mut mesh = tri();
        mesh.resize_vertices(5);
        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(mesh.vertex(4), &[0.0, 0.0, 0.0]);
    }
}
