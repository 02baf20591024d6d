//! Wavefront OBJ reader/writer (triangles only).
//!
//! # Marks
//! Each `g` line bumps a group counter that starts at 0; faces take the
//! counter value current when they are read. The writer sorts faces by mark
//! (stable) and emits `g <mark>` whenever the mark changes, so each mark's
//! faces form one contiguous block.
//!
//! A file written with `g 0`, `g 1` therefore reads back as marks 1 and 2:
//! the grouping survives a round trip, the raw values do not.
//!
//! # Limitations
//! - Faces must have exactly 3 vertices; `v/vt/vn` suffixes are ignored.
//! - Negative (relative) indices are not supported.

use crate::data::mesh::Mesh;
use crate::io::tokenize::{Line, LineCursor, strip_slash_suffix};
use crate::io::{Format, MeshReader, MeshWriter, parse_one_based, read_text, write_xyz};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use itertools::Itertools;
use std::io::{Read, Write};

#[derive(Debug, Default, Clone)]
pub struct ObjReader;

#[derive(Debug, Default, Clone)]
pub struct ObjWriter;

/// State threaded through the line loop.
#[derive(Debug, Default)]
struct ObjState {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[usize; 3]>,
    marks: Vec<i32>,
    group: i32,
}

impl ObjReader {
    fn process_line(state: &mut ObjState, line: &Line<'_>) -> Result<(), MeshConvertError> {
        let fields = line.fields();
        match fields.first().copied() {
            Some("v") => {
                if fields.len() < 4 {
                    return Err(line.malformed("vertex needs 3 coordinates"));
                }
                let mut xyz = [0.0; 3];
                for (slot, token) in xyz.iter_mut().zip(&fields[1..4]) {
                    *slot = line.parse(strip_slash_suffix(token), "coordinate")?;
                }
                state.vertices.push(xyz);
            }
            Some("f") => {
                let refs = &fields[1..];
                if refs.len() < 3 {
                    log::warn!("OBJ line {}: face with {} vertices skipped", line.number, refs.len());
                    return Ok(());
                }
                if refs.len() > 3 {
                    return Err(MeshConvertError::UnsupportedTopology {
                        format: "OBJ",
                        width: refs.len(),
                    });
                }
                let mut face = [0usize; 3];
                for (slot, token) in face.iter_mut().zip(refs) {
                    *slot = parse_one_based(line, strip_slash_suffix(token), "vertex index")?;
                }
                state.faces.push(face);
                state.marks.push(state.group);
            }
            Some("g") => state.group += 1,
            _ => {}
        }
        Ok(())
    }
}

impl MeshReader for ObjReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut state = ObjState::default();
        for line in LineCursor::new(&input) {
            Self::process_line(&mut state, &line)?;
        }

        let mut mesh = Mesh::with_capacity(
            3,
            CellType::Triangle,
            state.vertices.len(),
            state.faces.len(),
        )?;
        for v in &state.vertices {
            mesh.push_vertex(v)?;
        }
        for f in &state.faces {
            mesh.push_cell(f)?;
        }
        mesh.set_marks(state.marks);
        mesh.validate()?;
        Ok(mesh)
    }
}

impl MeshWriter for ObjWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        if mesh.cell_type() != CellType::Triangle {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "OBJ",
                width: mesh.cell_width(),
            });
        }
        crate::io::warn_mark_mismatch(Format::Obj, mesh);
        let grouped = mesh.marks_match_cells();
        let mark_of = |i: usize| if grouped { mesh.marks()[i] } else { 0 };

        writeln!(writer, "# mesh-convert OBJ export")?;
        writeln!(writer, "# ")?;
        writeln!(writer, "# object default")?;
        writeln!(writer, "# ")?;
        writeln!(writer)?;

        for i in 0..mesh.num_vertices() {
            write!(writer, "v ")?;
            write_xyz(&mut writer, mesh, i)?;
            writeln!(writer)?;
        }
        writeln!(writer, "# {} vertices", mesh.num_vertices())?;
        writeln!(writer)?;

        let order = (0..mesh.num_cells()).sorted_by_key(|&i| mark_of(i));
        let mut current: Option<i32> = None;
        for i in order {
            let mark = mark_of(i);
            if current != Some(mark) {
                writeln!(writer, "g {mark}")?;
                current = Some(mark);
            }
            let cell = mesh.cell(i);
            writeln!(writer, "f {} {} {}", cell[0] + 1, cell[1] + 1, cell[2] + 1)?;
        }
        writeln!(writer, "# {} faces", mesh.num_cells())?;
        Ok(())
    }
}
