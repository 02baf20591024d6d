//! FACET block format reader/writer (triangles only).
//!
//! ```text
//! FACET FILE V3.0  exported from mesh-convert
//! 1                          part count
//! Grid                       part name
//! 0, 0.00 0.00 0.00 0.00     part transform (ignored)
//! <nVertices>
//! x y z ...
//! 1                          block count
//! Triangles
//! <nFacets> 3
//!  v0 v1 v2 0 <mark> <facetIndex>
//! ```
//!
//! Vertex indices are 1-based within their part. Marks are stored as-is;
//! the writer uses mark 0 for every facet unless the mesh has at least one
//! mark per cell.

use crate::data::mesh::Mesh;
use crate::io::tokenize::LineCursor;
use crate::io::{MeshReader, MeshWriter, parse_one_based, read_text, write_xyz};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::io::{Read, Write};

const FACET_MAGIC: &str = "FACET FILE";

#[derive(Debug, Default, Clone)]
pub struct FacetReader;

#[derive(Debug, Default, Clone)]
pub struct FacetWriter;

impl MeshReader for FacetReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);

        let magic = cursor.expect_data("FACET preamble")?;
        if !magic.text.trim_start().starts_with(FACET_MAGIC) {
            return Err(magic.malformed("not a FACET file"));
        }
        let parts_line = cursor.expect_data("part count")?;
        let parts: usize = parts_line.parse_field(&parts_line.fields(), 0, "part count")?;

        let mut mesh = Mesh::new(3, CellType::Triangle)?;
        let mut marks = Vec::new();
        for _ in 0..parts {
            let offset = mesh.num_vertices();
            let name = cursor.expect_data("part name")?;
            log::debug!("FACET: reading part {}", name.text.trim());
            cursor.expect_data("part transform")?;

            let count_line = cursor.expect_data("vertex count")?;
            let n: usize = count_line.parse_field(&count_line.fields(), 0, "vertex count")?;
            for _ in 0..n {
                let row = cursor.expect_data("vertex row")?;
                let fields = row.fields();
                let mut xyz = [0.0; 3];
                for (i, c) in xyz.iter_mut().enumerate() {
                    *c = row.parse_field(&fields, i, "coordinate")?;
                }
                mesh.push_vertex(&xyz)?;
            }

            let blocks_line = cursor.expect_data("block count")?;
            let blocks: usize = blocks_line.parse_field(&blocks_line.fields(), 0, "block count")?;
            for _ in 0..blocks {
                let kind = cursor.expect_data("block name")?;
                let header = cursor.expect_data("block header")?;
                let hf = header.fields();
                let count: usize = header.parse_field(&hf, 0, "facet count")?;
                let width: usize = header.parse_field(&hf, 1, "facet width")?;
                if width != 3 {
                    return Err(MeshConvertError::UnsupportedTopology {
                        format: "FACET",
                        width,
                    });
                }
                log::debug!("FACET: {count} facets in {}", kind.text.trim());
                for _ in 0..count {
                    let row = cursor.expect_data("facet row")?;
                    let fields = row.fields();
                    if fields.len() < 3 {
                        return Err(row.malformed("facet row needs 3 vertex indices"));
                    }
                    let mut face = [0usize; 3];
                    for (slot, token) in face.iter_mut().zip(&fields[..3]) {
                        *slot = offset + parse_one_based(&row, token, "vertex index")?;
                    }
                    mesh.push_cell(&face)?;
                    let mark = match fields.get(4) {
                        Some(token) => row.parse(token, "facet mark")?,
                        None => 0,
                    };
                    marks.push(mark);
                }
            }
        }
        mesh.set_marks(marks);
        mesh.validate()?;
        Ok(mesh)
    }
}

impl MeshWriter for FacetWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        if mesh.cell_type() != CellType::Triangle {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "FACET",
                width: mesh.cell_width(),
            });
        }
        let use_marks = mesh.marks().len() >= mesh.num_cells();

        writeln!(writer, "{FACET_MAGIC} V3.0  exported from mesh-convert")?;
        writeln!(writer, "1")?;
        writeln!(writer, "Grid")?;
        writeln!(writer, "0, 0.00 0.00 0.00 0.00")?;
        writeln!(writer, "{}", mesh.num_vertices())?;
        for i in 0..mesh.num_vertices() {
            write_xyz(&mut writer, mesh, i)?;
            writeln!(writer)?;
        }
        writeln!(writer, "1")?;
        writeln!(writer, "Triangles")?;
        writeln!(writer, "{} 3", mesh.num_cells())?;
        for (i, cell) in mesh.cells().enumerate() {
            let mark = if use_marks { mesh.marks()[i] } else { 0 };
            writeln!(
                writer,
                " {} {} {} 0 {mark} {}",
                cell[0] + 1,
                cell[1] + 1,
                cell[2] + 1,
                i + 1
            )?;
        }
        Ok(())
    }
}
