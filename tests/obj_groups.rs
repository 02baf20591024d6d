mod util;

use mesh_convert::data::mesh::Mesh;
use mesh_convert::io::MeshReader;
use mesh_convert::io::obj::{ObjReader, ObjWriter};
use mesh_convert::mesh_error::MeshConvertError;
use mesh_convert::topology::cell_type::CellType;
use util::{cells, points, read_str, unit_square, unit_tet, write_string};

fn fan() -> Mesh {
    let mut mesh = Mesh::from_tuples(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
        CellType::Triangle,
        &[0, 1, 2, 0, 2, 3, 0, 3, 4],
    )
    .unwrap();
    mesh.set_marks(vec![2, 0, 1]);
    mesh
}

#[test]
fn faces_are_written_in_contiguous_mark_blocks() {
    let text = write_string(&ObjWriter, &fan());
    let body: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with('g') || l.starts_with('f'))
        .collect();
    assert_eq!(
        body,
        vec![
            "g 0", "f 1 3 4", //
            "g 1", "f 1 4 5", //
            "g 2", "f 1 2 3",
        ]
    );
}

#[test]
fn grouping_survives_roundtrip_but_values_shift() {
    let mesh = fan();
    let back = read_str(&ObjReader, &write_string(&ObjWriter, &mesh));
    assert_eq!(points(&back), points(&mesh));
    assert_eq!(cells(&back), vec![vec![0, 2, 3], vec![0, 3, 4], vec![0, 1, 2]]);
    assert_eq!(back.marks(), &[1, 2, 3]);
}

#[test]
fn equal_marks_keep_original_order() {
    let mut mesh = unit_square();
    mesh.set_marks(vec![4, 4]);
    let text = write_string(&ObjWriter, &mesh);
    assert_eq!(text.matches("g 4").count(), 1);
    let back = read_str(&ObjReader, &text);
    assert_eq!(cells(&back), cells(&mesh));
}

#[test]
fn faces_before_any_group_get_mark_zero() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\ng wall\nf 2/5/1 4//2 3\n";
    let mesh = read_str(&ObjReader, text);
    assert_eq!(mesh.marks(), &[0, 1]);
    assert_eq!(cells(&mesh)[1], vec![1, 3, 2]);
}

#[test]
fn short_faces_are_skipped() {
    let mesh = read_str(&ObjReader, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2\nf 1 2 3\n");
    assert_eq!(mesh.num_cells(), 1);
    assert_eq!(mesh.marks(), &[0]);
}

#[test]
fn quads_are_unsupported() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
    assert_eq!(
        ObjReader.read(text.as_bytes()).unwrap_err(),
        MeshConvertError::UnsupportedTopology {
            format: "OBJ",
            width: 4
        }
    );
}

#[test]
fn zero_index_is_malformed() {
    let err = ObjReader
        .read("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, MeshConvertError::MalformedHeader { line: 4, .. }));
}

#[test]
fn tetrahedra_cannot_be_written() {
    let mut buf = Vec::new();
    let err = mesh_convert::io::MeshWriter::write(&ObjWriter, &mut buf, &unit_tet()).unwrap_err();
    assert!(matches!(err, MeshConvertError::UnsupportedTopology { width: 4, .. }));
}
