mod util;

use mesh_convert::algs::convert::{ConvertJob, ConvertOptions, convert, convert_batch};
use mesh_convert::algs::repair::RepairOptions;
use mesh_convert::io::{DEFAULT_MARK_PATTERN, Format, read_mesh, write_mesh};
use mesh_convert::mesh_error::{MeshConvertError, Stage};
use std::path::PathBuf;
use util::{cells, points, temp_path, unit_square};

#[test]
fn vtk_to_obj_with_repair() {
    let input = temp_path("pipeline_in.vtk");
    let output = temp_path("pipeline_out.obj");
    let mut mesh = unit_square();
    mesh.push_vertex(&[0.0, 0.0, 0.0]).unwrap();
    mesh.push_cell(&[4, 1, 2]).unwrap();
    mesh.push_mark(3);
    write_mesh(&input, Format::Vtk, &mesh, DEFAULT_MARK_PATTERN).unwrap();

    let opts = ConvertOptions::default().with_repair(RepairOptions::default());
    let report = convert(&input, &output, &opts).unwrap();
    assert_eq!(report.input_format, Format::Vtk);
    assert_eq!(report.output_format, Format::Obj);
    assert_eq!(report.num_vertices, 4);
    let repair = report.repair.unwrap();
    assert_eq!(repair.vertices_before, 5);
    assert_eq!(repair.vertices_after, 4);

    let back = read_mesh(&output, Format::Obj, DEFAULT_MARK_PATTERN).unwrap();
    assert_eq!(back.num_cells(), 3);
}

#[test]
fn explicit_formats_override_extensions() {
    let input = temp_path("explicit_in.dat");
    let output = temp_path("explicit_out.txt");
    write_mesh(&input, Format::Medit, &unit_square(), DEFAULT_MARK_PATTERN).unwrap();
    let opts = ConvertOptions {
        input_format: Some(Format::Medit),
        output_format: Some(Format::Pls),
        ..Default::default()
    };
    convert(&input, &output, &opts).unwrap();
    let back = read_mesh(&output, Format::Pls, DEFAULT_MARK_PATTERN).unwrap();
    assert_eq!(points(&back), points(&unit_square()));
    assert_eq!(back.marks(), &[3, 7]);
}

#[test]
fn transforms_run_in_order() {
    let input = temp_path("transform_in.mesh");
    let output = temp_path("transform_out.mesh");
    write_mesh(&input, Format::Medit, &unit_square(), DEFAULT_MARK_PATTERN).unwrap();
    let mut opts = ConvertOptions::default().with_bounding_box(vec![4.0, 4.0, 4.0]);
    opts.reverse_orientation = true;
    let report = convert(&input, &output, &opts).unwrap();
    assert_eq!(report.num_cells, 14);

    let back = read_mesh(&output, Format::Medit, DEFAULT_MARK_PATTERN).unwrap();
    // Box triangles are reversed along with the input cells.
    assert_eq!(cells(&back)[0], vec![2, 1, 0]);
    assert_eq!(back.cell(2), &[5, 7, 4]);
}

#[test]
fn missing_input_reports_file_and_stage() {
    let input = temp_path("does_not_exist.vtk");
    let err = convert(&input, temp_path("never.obj"), &ConvertOptions::default()).unwrap_err();
    match err {
        MeshConvertError::Conversion {
            path,
            stage,
            source,
        } => {
            assert_eq!(path, input);
            assert_eq!(stage, Stage::Read);
            assert!(matches!(*source, MeshConvertError::NotFound { .. }));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn transform_failure_reports_transform_stage() {
    let input = temp_path("bad_rotation.obj");
    write_mesh(&input, Format::Obj, &unit_square(), DEFAULT_MARK_PATTERN).unwrap();
    let opts = ConvertOptions::default().with_rotation(vec![1.0, 2.0]);
    let err = convert(&input, temp_path("bad_rotation_out.obj"), &opts).unwrap_err();
    assert!(matches!(
        err,
        MeshConvertError::Conversion {
            stage: Stage::Transform,
            ..
        }
    ));
}

#[test]
fn unknown_output_extension_fails_before_reading() {
    let err = convert(
        temp_path("whatever.vtk"),
        temp_path("out.stl"),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    match err {
        MeshConvertError::Conversion { stage, source, .. } => {
            assert_eq!(stage, Stage::Write);
            assert_eq!(*source, MeshConvertError::UnknownFormat("stl".into()));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn epsilon_sidecar_replaces_mesh_output() {
    let input = temp_path("eps_in.obj");
    let sidecar = temp_path("eps_in.eps");
    let output = temp_path("eps_out.vtk");
    write_mesh(&input, Format::Obj, &unit_square(), DEFAULT_MARK_PATTERN).unwrap();
    std::fs::write(&sidecar, "eps 0.5\nid 0 2\n").unwrap();

    let opts = ConvertOptions::default().with_epsilon_sidecar(&sidecar);
    let report = convert(&input, &output, &opts).unwrap();
    assert_eq!(report.output_format, Format::Vtk);
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("SCALARS local_epsilon double 1"));
    assert!(text.ends_with("0.5\n-1\n0.5\n-1\n"));
}

#[test]
fn batch_results_follow_job_order() {
    let good = temp_path("batch_good.ply");
    write_mesh(&good, Format::Ply, &unit_square(), DEFAULT_MARK_PATTERN).unwrap();
    let jobs = vec![
        ConvertJob::new(&good, temp_path("batch_good.facet")),
        ConvertJob::new(temp_path("batch_missing.ply"), temp_path("batch_missing.vtk")),
        ConvertJob::new(&good, temp_path("batch_good.vtk")),
    ];
    let results = convert_batch(&jobs);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().output_format, Format::Facet);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().num_cells, 2);
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: ConvertOptions = serde_json::from_str(
        r#"{"output_format":"Medit","repair":{"weld_tolerance":1e-6},"rotation":[0,0,1,0.5]}"#,
    )
    .unwrap();
    assert_eq!(opts.output_format, Some(Format::Medit));
    assert_eq!(opts.mark_pattern, DEFAULT_MARK_PATTERN);
    assert_eq!(opts.repair.unwrap().area_tolerance, 1e-8);
    assert_eq!(opts.rotation, Some(vec![0.0, 0.0, 1.0, 0.5]));

    let job = ConvertJob::new("a.vtk", "b.obj");
    let json = serde_json::to_string(&job).unwrap();
    let back: ConvertJob = serde_json::from_str(&json).unwrap();
    assert_eq!(back, job);
    assert_eq!(back.input, PathBuf::from("a.vtk"));
}
