//! Cell type metadata for mesh cells.
//!
//! A [`Mesh`](crate::data::mesh::Mesh) stores cells of a single type; the
//! type is fixed when the mesh is created and determines the tuple width.

/// Cell types a mesh can hold, keyed by the number of vertices per cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex cell (used by the epsilon VTK export).
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 3D simplex (tet).
    Tetrahedron,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::Triangle
    }
}

impl CellType {
    /// Number of vertex indices per cell.
    pub fn width(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Tetrahedron => 4,
        }
    }

    /// Cell type for a tuple width, if supported.
    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(CellType::Vertex),
            2 => Some(CellType::Segment),
            3 => Some(CellType::Triangle),
            4 => Some(CellType::Tetrahedron),
            _ => None,
        }
    }

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle => 2,
            CellType::Tetrahedron => 3,
        }
    }

    /// Legacy VTK `CELL_TYPES` code.
    pub fn vtk_code(self) -> i32 {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 3,
            CellType::Triangle => 5,
            CellType::Tetrahedron => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_round_trips_through_from_width() {
        for ct in [
            CellType::Vertex,
            CellType::Segment,
            CellType::Triangle,
            CellType::Tetrahedron,
        ] {
            assert_eq!(CellType::from_width(ct.width()), Some(ct));
        }
        assert_eq!(CellType::from_width(0), None);
        assert_eq!(CellType::from_width(5), None);
    }

    #[test]
    fn vtk_codes_match_legacy_table() {
        assert_eq!(CellType::Segment.vtk_code(), 3);
        assert_eq!(CellType::Triangle.vtk_code(), 5);
        assert_eq!(CellType::Tetrahedron.vtk_code(), 10);
    }
}
