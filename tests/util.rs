#![allow(dead_code)]
use mesh_convert::data::mesh::Mesh;
use mesh_convert::io::{MeshReader, MeshWriter};
use mesh_convert::topology::cell_type::CellType;
use std::path::PathBuf;

/// Parse `text` with `reader`.
pub fn read_str<R: MeshReader>(reader: &R, text: &str) -> Mesh {
    reader.read(text.as_bytes()).unwrap()
}

/// Serialize `mesh` with `writer` into a `String`.
pub fn write_string<W: MeshWriter>(writer: &W, mesh: &Mesh) -> String {
    let mut buf = Vec::new();
    writer.write(&mut buf, mesh).unwrap();
    String::from_utf8(buf).unwrap()
}

/// Unit square split into two triangles, marks `[3, 7]`.
pub fn unit_square() -> Mesh {
    let mut mesh = Mesh::from_tuples(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        CellType::Triangle,
        &[0, 1, 2, 0, 2, 3],
    )
    .unwrap();
    mesh.set_marks(vec![3, 7]);
    mesh
}

/// Unit tetrahedron with one cell.
pub fn unit_tet() -> Mesh {
    Mesh::from_tuples(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        CellType::Tetrahedron,
        &[0, 1, 2, 3],
    )
    .unwrap()
}

/// Fresh path under the system temp dir, unique per process and test.
pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mesh_convert_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

/// Coordinates of every vertex as `[x, y, z]`.
pub fn points(mesh: &Mesh) -> Vec<[f64; 3]> {
    (0..mesh.num_vertices()).map(|i| mesh.point3(i)).collect()
}

/// Cells as owned vectors.
pub fn cells(mesh: &Mesh) -> Vec<Vec<usize>> {
    mesh.cells().map(<[usize]>::to_vec).collect()
}
