//! Stanford PLY reader/writer (ASCII, triangles only).
//!
//! The reader walks the header's element/property declarations so it can
//! skip elements and properties it does not use; only `x`, `y`, `z` and the
//! `vertex_indices` list are kept. PLY carries no marks.

use crate::data::mesh::Mesh;
use crate::io::tokenize::{Line, LineCursor};
use crate::io::{Format, MeshReader, MeshWriter, read_text, write_xyz};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::io::{Read, Write};

#[derive(Debug, Default, Clone)]
pub struct PlyReader;

#[derive(Debug, Default, Clone)]
pub struct PlyWriter;

#[derive(Debug)]
enum Property {
    Scalar(String),
    List(String),
}

#[derive(Debug)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

impl PlyReader {
    fn read_header(cursor: &mut LineCursor<'_>) -> Result<Vec<Element>, MeshConvertError> {
        let magic = cursor.expect_data("ply magic")?;
        if magic.text.trim() != "ply" {
            return Err(magic.malformed("not a PLY file"));
        }
        let mut elements: Vec<Element> = Vec::new();
        loop {
            let line = cursor.expect_data("end_header")?;
            let fields = line.fields();
            match fields.first().copied() {
                Some("format") => {
                    if fields.get(1).copied() != Some("ascii") {
                        return Err(line.malformed("only ASCII PLY is supported"));
                    }
                }
                Some("element") => {
                    let name: String = line.parse_field(&fields, 1, "element name")?;
                    let count: usize = line.parse_field(&fields, 2, "element count")?;
                    cursor.bounded(&line, count, 1, "element count")?;
                    elements.push(Element {
                        name,
                        count,
                        properties: Vec::new(),
                    });
                }
                Some("property") => {
                    let element = elements
                        .last_mut()
                        .ok_or_else(|| line.malformed("property before any element"))?;
                    let property = if fields.get(1).copied() == Some("list") {
                        Property::List(line.parse_field(&fields, 4, "list property name")?)
                    } else {
                        Property::Scalar(line.parse_field(&fields, 2, "property name")?)
                    };
                    element.properties.push(property);
                }
                Some("end_header") => break,
                _ => {}
            }
        }
        Ok(elements)
    }

    /// Split a body row into per-property token slices.
    fn split_row<'a>(
        line: &Line<'a>,
        element: &Element,
    ) -> Result<Vec<Vec<&'a str>>, MeshConvertError> {
        let fields = line.fields();
        let mut pos = 0;
        let mut out = Vec::with_capacity(element.properties.len());
        for property in &element.properties {
            let len = match property {
                Property::Scalar(_) => 1,
                Property::List(_) => {
                    let n: usize = line.parse_field(&fields, pos, "list length")?;
                    pos += 1;
                    n
                }
            };
            let slice = pos
                .checked_add(len)
                .and_then(|end| fields.get(pos..end))
                .ok_or_else(|| line.malformed(format!("{} row is too short", element.name)))?;
            out.push(slice.to_vec());
            pos += len;
        }
        Ok(out)
    }
}

impl MeshReader for PlyReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);
        let elements = Self::read_header(&mut cursor)?;

        let count_of = |name: &str| elements.iter().find(|e| e.name == name).map_or(0, |e| e.count);
        let mut mesh = Mesh::with_capacity(
            3,
            CellType::Triangle,
            count_of("vertex"),
            count_of("face"),
        )?;

        for element in &elements {
            let position = |wanted: &str| {
                element.properties.iter().position(
                    |p| matches!(p, Property::Scalar(n) | Property::List(n) if n == wanted),
                )
            };
            match element.name.as_str() {
                "vertex" => {
                    let axes = [position("x"), position("y"), position("z")];
                    for _ in 0..element.count {
                        let row = cursor.expect_data("vertex row")?;
                        let values = Self::split_row(&row, element)?;
                        let mut xyz = [0.0; 3];
                        for (slot, axis) in xyz.iter_mut().zip(axes) {
                            if let Some(idx) = axis {
                                let token = values[idx]
                                    .first()
                                    .ok_or_else(|| row.malformed("empty coordinate list"))?;
                                *slot = row.parse(token, "coordinate")?;
                            }
                        }
                        mesh.push_vertex(&xyz)?;
                    }
                }
                "face" => {
                    let list = position("vertex_indices")
                        .or_else(|| position("vertex_index"))
                        .ok_or_else(|| {
                            MeshConvertError::malformed(
                                cursor.line_number(),
                                "",
                                "face element has no vertex_indices",
                            )
                        })?;
                    for _ in 0..element.count {
                        let row = cursor.expect_data("face row")?;
                        let values = Self::split_row(&row, element)?;
                        let refs = &values[list];
                        if refs.len() != 3 {
                            return Err(MeshConvertError::UnsupportedTopology {
                                format: "PLY",
                                width: refs.len(),
                            });
                        }
                        let mut face = [0usize; 3];
                        for (slot, token) in face.iter_mut().zip(refs) {
                            *slot = row.parse(token, "vertex index")?;
                        }
                        mesh.push_cell(&face)?;
                    }
                }
                other => {
                    log::debug!("PLY: skipping element {other}");
                    for _ in 0..element.count {
                        cursor.expect_data("element row")?;
                    }
                }
            }
        }
        mesh.validate()?;
        Ok(mesh)
    }
}

impl MeshWriter for PlyWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        if mesh.cell_type() != CellType::Triangle {
            return Err(MeshConvertError::UnsupportedTopology {
                format: "PLY",
                width: mesh.cell_width(),
            });
        }
        if !mesh.marks().is_empty() {
            log::debug!("{}: marks are not written", Format::Ply);
        }
        writeln!(writer, "ply")?;
        writeln!(writer, "format ascii 1.0")?;
        writeln!(writer, "comment mesh-convert generated PLY File")?;
        writeln!(writer, "element vertex {}", mesh.num_vertices())?;
        writeln!(writer, "property double x")?;
        writeln!(writer, "property double y")?;
        writeln!(writer, "property double z")?;
        writeln!(writer, "element face {}", mesh.num_cells())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
        writeln!(writer, "end_header")?;
        for i in 0..mesh.num_vertices() {
            write_xyz(&mut writer, mesh, i)?;
            writeln!(writer)?;
        }
        for cell in mesh.cells() {
            writeln!(writer, "3 {} {} {}", cell[0], cell[1], cell[2])?;
        }
        Ok(())
    }
}
