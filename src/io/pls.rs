//! PLS planar-straight-line reader/writer (triangles only).
//!
//! ```text
//! <nFacets> <nPoints> 0 0 0 0
//! <id> x y z                 (nPoints rows, 1-based id)
//! <id> v0 v1 v2 [mark]       (nFacets rows, 1-based vertices and mark)
//! ```
//!
//! Vertex rows may appear in any order: each is stored at `id - 1`. Missing
//! ids leave a zero vertex. The mark column is optional on read (mark 0)
//! and written only when the mesh has one mark per cell.

use crate::data::mesh::Mesh;
use crate::io::tokenize::LineCursor;
use crate::io::{Format, MeshReader, MeshWriter, parse_one_based, read_text, write_xyz};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::io::{Read, Write};

#[derive(Debug, Default, Clone)]
pub struct PlsReader;

#[derive(Debug, Default, Clone)]
pub struct PlsWriter;

impl MeshReader for PlsReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);

        let header = cursor.expect_data("PLS header")?;
        let hf = header.fields();
        let num_facets: usize = header.parse_field(&hf, 0, "facet count")?;
        let num_points: usize = header.parse_field(&hf, 1, "point count")?;
        // Rows carry at least four fields each.
        cursor.bounded(&header, num_facets, 4, "facet count")?;
        cursor.bounded(&header, num_points, 4, "point count")?;

        let mut mesh = Mesh::with_capacity(3, CellType::Triangle, num_points, num_facets)?;
        mesh.resize_vertices(num_points);
        for _ in 0..num_points {
            let row = cursor.expect_data("vertex row")?;
            let fields = row.fields();
            if fields.len() < 4 {
                return Err(row.malformed("vertex row needs an id and 3 coordinates"));
            }
            let slot = parse_one_based(&row, fields[0], "vertex id")?;
            if slot >= num_points {
                return Err(MeshConvertError::IndexOutOfRange {
                    index: slot as i64 + 1,
                    len: num_points,
                });
            }
            let mut xyz = [0.0; 3];
            for (c, token) in xyz.iter_mut().zip(&fields[1..4]) {
                *c = row.parse(token, "coordinate")?;
            }
            mesh.set_vertex(slot, &xyz)?;
        }

        let mut marks = Vec::with_capacity(num_facets);
        for _ in 0..num_facets {
            let row = cursor.expect_data("facet row")?;
            let fields = row.fields();
            if fields.len() < 4 {
                return Err(row.malformed("facet row needs an id and 3 vertex ids"));
            }
            let mut face = [0usize; 3];
            for (slot, token) in face.iter_mut().zip(&fields[1..4]) {
                *slot = parse_one_based(&row, token, "vertex id")?;
            }
            mesh.push_cell(&face)?;
            let mark = match fields.get(4) {
                Some(token) => row.parse::<i32>(token, "facet mark")?.saturating_sub(1),
                None => 0,
            };
            marks.push(mark);
        }
        mesh.set_marks(marks);
        mesh.validate()?;
        Ok(mesh)
    }
}

impl MeshWriter for PlsWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        if mesh.cell_type() != CellType::Triangle {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "PLS",
                width: mesh.cell_width(),
            });
        }
        crate::io::warn_mark_mismatch(Format::Pls, mesh);
        let with_marks = !mesh.marks().is_empty() && mesh.marks_match_cells();

        writeln!(writer, "{} {} 0 0 0 0", mesh.num_cells(), mesh.num_vertices())?;
        for i in 0..mesh.num_vertices() {
            write!(writer, "{} ", i + 1)?;
            write_xyz(&mut writer, mesh, i)?;
            writeln!(writer)?;
        }
        for (i, cell) in mesh.cells().enumerate() {
            write!(
                writer,
                "{} {} {} {}",
                i + 1,
                cell[0] + 1,
                cell[1] + 1,
                cell[2] + 1
            )?;
            if with_marks {
                write!(writer, " {}", i64::from(mesh.marks()[i]) + 1)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
