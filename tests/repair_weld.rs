mod util;

use mesh_convert::algs::repair::{
    MarkPolicy, RepairOptions, find_degenerate_cells, repair, repair_with, weld_map,
};
use mesh_convert::data::mesh::Mesh;
use mesh_convert::geometry::metrics::distance;
use mesh_convert::mesh_error::MeshConvertError;
use mesh_convert::topology::cell_type::CellType;
use proptest::prelude::*;
use util::{cells, points, unit_square};

/// Two triangles sharing an edge, stored with the shared vertices duplicated.
fn split_square() -> Mesh {
    let mut mesh = Mesh::from_tuples(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        CellType::Triangle,
        &[0, 1, 2, 3, 4, 5],
    )
    .unwrap();
    mesh.set_marks(vec![1, 2]);
    mesh
}

#[test]
fn duplicates_are_welded_in_sorted_order() {
    let mut mesh = split_square();
    let report = repair(&mut mesh).unwrap();
    assert_eq!(report.vertices_before, 6);
    assert_eq!(report.vertices_after, 4);
    assert!(report.degenerate_cells.is_empty());
    assert_eq!(
        points(&mesh),
        vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]
    );
    assert_eq!(cells(&mesh), vec![vec![0, 2, 3], vec![0, 3, 1]]);
    assert_eq!(mesh.marks(), &[1, 2]);
}

#[test]
fn near_duplicates_within_tolerance_merge() {
    let mut mesh = split_square();
    mesh.set_vertex(3, &[0.0, 0.0, 5e-9]).unwrap();
    repair(&mut mesh).unwrap();
    assert_eq!(mesh.num_vertices(), 4);
    // The first vertex of a run is kept.
    assert_eq!(mesh.vertex(0), &[0.0, 0.0, 0.0]);
}

#[test]
fn collinear_triangle_is_removed_with_its_mark() {
    let mut mesh = unit_square();
    mesh.push_vertex(&[2.0, 0.0, 0.0]).unwrap();
    mesh.push_cell(&[0, 1, 4]).unwrap();
    mesh.push_mark(99);
    let report = repair(&mut mesh).unwrap();
    assert_eq!(report.degenerate_cells, vec![2]);
    assert_eq!(report.cells_after, 2);
    assert_eq!(mesh.marks(), &[3, 7]);
    // The unused vertex is still kept.
    assert_eq!(mesh.num_vertices(), 5);
}

#[test]
fn degeneracy_is_judged_before_welding() {
    // Vertices 1 and 3 weld together, collapsing cell 1 onto an edge, but
    // its pre-weld area is non-zero so it survives.
    let mut mesh = Mesh::from_tuples(
        &[
            [0.0, 0.0, 0.0],
            [1000.0, 0.0, 0.0],
            [0.0, 1000.0, 0.0],
            [1000.0, 5e-9, 0.0],
        ],
        CellType::Triangle,
        &[0, 1, 2, 0, 1, 3],
    )
    .unwrap();
    assert_eq!(find_degenerate_cells(&mesh, 1e-8), Vec::<usize>::new());
    let report = repair(&mut mesh).unwrap();
    assert!(report.degenerate_cells.is_empty());
    assert_eq!(mesh.num_cells(), 2);
    let second = mesh.cell(1);
    assert_eq!(second[1], second[2]);
}

#[test]
fn preserve_policy_leaves_marks_untouched() {
    let mut mesh = unit_square();
    mesh.push_cell(&[0, 0, 1]).unwrap();
    mesh.push_mark(5);
    let opts = RepairOptions::default().with_mark_policy(MarkPolicy::Preserve);
    repair_with(&mut mesh, &opts).unwrap();
    assert_eq!(mesh.num_cells(), 2);
    assert_eq!(mesh.marks(), &[3, 7, 5]);
    assert!(mesh.validate_marks().is_err());
}

#[test]
fn custom_tolerance_welds_coarser_points() {
    let mut mesh = split_square();
    mesh.set_vertex(3, &[0.0, 0.0, 1e-4]).unwrap();
    let mut strict = mesh.clone();
    assert_eq!(repair(&mut strict).unwrap().vertices_after, 5);
    let opts = RepairOptions::default().with_weld_tolerance(1e-3);
    let report = repair_with(&mut mesh, &opts).unwrap();
    assert_eq!(report.vertices_after, 4);
}

#[test]
fn out_of_range_index_is_reported_without_mutation() {
    let mut mesh = unit_square();
    mesh.push_cell(&[0, 1, 9]).unwrap();
    mesh.push_mark(0);
    let before = mesh.clone();
    assert_eq!(
        repair(&mut mesh).unwrap_err(),
        MeshConvertError::IndexOutOfRange { index: 9, len: 4 }
    );
    assert_eq!(mesh, before);
}

#[test]
fn options_serde_roundtrip() {
    let opts = RepairOptions::default()
        .with_area_tolerance(1e-12)
        .with_mark_policy(MarkPolicy::Preserve);
    let json = serde_json::to_string(&opts).unwrap();
    let back: RepairOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, opts);
    let partial: RepairOptions = serde_json::from_str(r#"{"weld_tolerance":0.5}"#).unwrap();
    assert_eq!(partial.area_tolerance, 1e-8);
    assert_eq!(partial.mark_policy, MarkPolicy::Compact);
}

#[test]
fn signed_zero_duplicates_are_welded() {
    let mut mesh = Mesh::from_tuples(
        &[[-0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        CellType::Vertex,
        &[0, 1, 2],
    )
    .unwrap();
    let report = repair(&mut mesh).unwrap();
    assert_eq!(report.vertices_after, 2);
    assert_eq!(points(&mesh), vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    assert_eq!(cells(&mesh), vec![vec![1], vec![0], vec![1]]);
}

/// Integer lattice points as a triangle soup. Each point is repeated up to
/// three times; copies may flip the sign of zero coordinates and drift in z
/// by well under the weld tolerance.
fn soup() -> impl Strategy<Value = Mesh> {
    let site = (
        (0i32..6, 0i32..6, 0i32..6),
        1usize..4,
        any::<[bool; 3]>(),
        0.0f64..1e-10,
    );
    prop::collection::vec(site, 2..20)
        .prop_map(|sites| {
            let mut pts = Vec::new();
            for ((x, y, z), copies, negate, drift) in sites {
                for k in 0..copies {
                    let mut p = [f64::from(x), f64::from(y), f64::from(z)];
                    for (c, &flip) in p.iter_mut().zip(&negate) {
                        if flip && k % 2 == 1 && *c == 0.0 {
                            *c = -0.0;
                        }
                    }
                    p[2] += drift * k as f64;
                    pts.push(p);
                }
            }
            pts
        })
        .prop_flat_map(|pts| {
            let n = pts.len();
            let tris = prop::collection::vec((0..n, 0..n, 0..n), 0..30);
            (Just(pts), tris)
        })
        .prop_map(|(pts, tris)| {
            let flat: Vec<usize> = tris.iter().flat_map(|&(a, b, c)| [a, b, c]).collect();
            let mut mesh = Mesh::from_tuples(&pts, CellType::Triangle, &flat).unwrap();
            mesh.set_marks((0..tris.len() as i32).collect());
            mesh
        })
}

proptest! {
    #[test]
    fn repair_is_idempotent(mesh in soup()) {
        let mut once = mesh.clone();
        repair(&mut once).unwrap();
        let mut twice = once.clone();
        let report = repair(&mut twice).unwrap();
        prop_assert!(report.is_noop());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn weld_map_is_consistent(mesh in soup()) {
        let weld = weld_map(&mesh, 1e-8);
        prop_assert_eq!(weld.old_to_new.len(), mesh.num_vertices());
        for (new, &old) in weld.representatives.iter().enumerate() {
            prop_assert_eq!(weld.old_to_new[old], new);
        }
        for (old, &new) in weld.old_to_new.iter().enumerate() {
            let gap = distance(mesh.point3(old), mesh.point3(weld.representatives[new]));
            prop_assert!(gap < 1e-8, "vertex {} is {} from its representative", old, gap);
        }
    }

    #[test]
    fn repaired_mesh_stays_valid(mesh in soup()) {
        let mut repaired = mesh.clone();
        let report = repair(&mut repaired).unwrap();
        prop_assert!(repaired.validate().is_ok());
        for i in 0..repaired.num_vertices() {
            for j in i + 1..repaired.num_vertices() {
                prop_assert!(distance(repaired.point3(i), repaired.point3(j)) >= 1e-8);
            }
        }
        prop_assert_eq!(
            report.cells_after,
            report.cells_before - report.degenerate_cells.len()
        );
        prop_assert!(find_degenerate_cells(&repaired, 1e-8).is_empty());
    }
}
