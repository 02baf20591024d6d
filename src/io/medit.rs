//! MEDIT `.mesh` reader/writer.
//!
//! # Supported format
//! - ASCII keyword blocks: `Dimension`, `Vertices`, `Triangles`,
//!   `Tetrahedra`, terminated by `End` or end of input.
//! - A block's count (and the `Dimension` value) may be on the keyword line
//!   or on the next non-blank line.
//! - Vertex rows are `x y [z] ref`; the reference is ignored on read and
//!   written as the 1-based row number.
//! - Element rows are `i0 .. i(w-1) ref` with 1-based indices; the reference
//!   is the 1-based mark.
//!
//! The writer keeps marks in the element reference column (`mark + 1`) so a
//! `.mesh` round trip restores them. Older converters always wrote the row
//! number `i + 1` there; this writer only does so for unmarked meshes.
//!
//! When a file has both `Triangles` and `Tetrahedra` the tetrahedra are kept.
//! Any other block is skipped.

use crate::data::mesh::Mesh;
use crate::io::tokenize::{Line, LineCursor};
use crate::io::{Format, MeshReader, MeshWriter, parse_one_based, read_text};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::io::{Read, Write};

#[derive(Debug, Default, Clone)]
pub struct MeditReader;

#[derive(Debug, Default, Clone)]
pub struct MeditWriter;

#[derive(Debug, Default)]
struct ElementBlock {
    cells: Vec<usize>,
    marks: Vec<i32>,
}

impl MeditReader {
    /// Value after a keyword, on the same line or the next data line.
    ///
    /// The value counts rows of `stride` fields and must fit in the input.
    fn keyword_value(
        cursor: &mut LineCursor<'_>,
        line: &Line<'_>,
        fields: &[&str],
        what: &str,
        stride: usize,
    ) -> Result<usize, MeshConvertError> {
        let (line, value) = if fields.len() > 1 {
            (*line, line.parse_field(fields, 1, what)?)
        } else {
            let next = cursor.expect_data(what)?;
            (next, next.parse_field(&next.fields(), 0, what)?)
        };
        cursor.bounded(&line, value, stride, what)?;
        Ok(value)
    }

    fn read_vertices(
        cursor: &mut LineCursor<'_>,
        count: usize,
        dimension: usize,
    ) -> Result<Vec<f64>, MeshConvertError> {
        let mut coords = Vec::with_capacity(count * dimension);
        for _ in 0..count {
            let row = cursor.expect_data("vertex row")?;
            let fields = row.fields();
            if fields.len() != dimension + 1 {
                return Err(row.malformed(format!(
                    "vertex row needs {} fields, found {}",
                    dimension + 1,
                    fields.len()
                )));
            }
            for token in &fields[..dimension] {
                coords.push(row.parse::<f64>(token, "coordinate")?);
            }
        }
        Ok(coords)
    }

    fn read_elements(
        cursor: &mut LineCursor<'_>,
        count: usize,
        width: usize,
    ) -> Result<ElementBlock, MeshConvertError> {
        let mut block = ElementBlock {
            cells: Vec::with_capacity(count * width),
            marks: Vec::with_capacity(count),
        };
        for _ in 0..count {
            let row = cursor.expect_data("element row")?;
            let fields = row.fields();
            if fields.len() != width + 1 {
                return Err(row.malformed(format!(
                    "element row needs {} fields, found {}",
                    width + 1,
                    fields.len()
                )));
            }
            for token in &fields[..width] {
                block.cells.push(parse_one_based(&row, token, "vertex index")?);
            }
            let reference: i32 = row.parse(fields[width], "element reference")?;
            block.marks.push(reference.saturating_sub(1));
        }
        Ok(block)
    }
}

impl MeshReader for MeditReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);

        let mut dimension = 3usize;
        let mut vertices: Option<Vec<f64>> = None;
        let mut triangles: Option<ElementBlock> = None;
        let mut tetrahedra: Option<ElementBlock> = None;

        while let Some(line) = cursor.next_data() {
            let fields = line.fields();
            match fields.first().copied() {
                Some("Dimension") => {
                    dimension = Self::keyword_value(&mut cursor, &line, &fields, "dimension", 1)?;
                    if dimension != 2 && dimension != 3 {
                        return Err(MeshConvertError::InvalidDimension(dimension));
                    }
                    log::info!("MEDIT: mesh dimension {dimension}");
                }
                Some("Vertices") => {
                    let stride = dimension + 1;
                    let n =
                        Self::keyword_value(&mut cursor, &line, &fields, "vertex count", stride)?;
                    log::info!("MEDIT: {n} vertices");
                    vertices = Some(Self::read_vertices(&mut cursor, n, dimension)?);
                }
                Some("Triangles") => {
                    let n = Self::keyword_value(&mut cursor, &line, &fields, "triangle count", 4)?;
                    log::info!("MEDIT: {n} triangles");
                    triangles = Some(Self::read_elements(&mut cursor, n, 3)?);
                }
                Some("Tetrahedra") => {
                    let n =
                        Self::keyword_value(&mut cursor, &line, &fields, "tetrahedron count", 5)?;
                    log::info!("MEDIT: {n} tetrahedra");
                    tetrahedra = Some(Self::read_elements(&mut cursor, n, 4)?);
                }
                Some("End") => break,
                _ => {}
            }
        }

        let coords = vertices.ok_or_else(|| {
            MeshConvertError::malformed(cursor.line_number(), "", "missing Vertices block")
        })?;
        let (cell_type, block) = match (tetrahedra, triangles) {
            (Some(tets), Some(tris)) => {
                log::info!(
                    "MEDIT: keeping tetrahedra, ignoring {} boundary triangles",
                    tris.marks.len()
                );
                (CellType::Tetrahedron, tets)
            }
            (Some(tets), None) => (CellType::Tetrahedron, tets),
            (None, Some(tris)) => (CellType::Triangle, tris),
            (None, None) => (CellType::Triangle, ElementBlock::default()),
        };

        let mut mesh = Mesh::with_capacity(
            dimension,
            cell_type,
            coords.len() / dimension,
            block.marks.len(),
        )?;
        for v in coords.chunks_exact(dimension) {
            mesh.push_vertex(v)?;
        }
        for c in block.cells.chunks_exact(cell_type.width()) {
            mesh.push_cell(c)?;
        }
        mesh.set_marks(block.marks);
        mesh.validate()?;
        Ok(mesh)
    }
}

impl MeshWriter for MeditWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        let block = match mesh.cell_type() {
            CellType::Triangle => "Triangles",
            CellType::Tetrahedron => "Tetrahedra",
            other => {
                return Err(MeshConvertError::UnsupportedTopology {
                    format: "MEDIT",
                    width: other.width(),
                });
            }
        };
        crate::io::warn_mark_mismatch(Format::Medit, mesh);
        let with_marks = !mesh.marks().is_empty() && mesh.marks_match_cells();

        writeln!(writer, "MeshVersionFormatted 1")?;
        writeln!(writer, "Dimension {}", mesh.dimension())?;
        writeln!(writer, "Vertices")?;
        writeln!(writer, "{}", mesh.num_vertices())?;
        for (i, v) in mesh.vertices().enumerate() {
            for c in v {
                write!(writer, "{c} ")?;
            }
            writeln!(writer, "{}", i + 1)?;
        }

        writeln!(writer, "{block}")?;
        writeln!(writer, "{}", mesh.num_cells())?;
        for (i, cell) in mesh.cells().enumerate() {
            for idx in cell {
                write!(writer, "{} ", idx + 1)?;
            }
            let reference = if with_marks {
                i64::from(mesh.marks()[i]) + 1
            } else {
                i as i64 + 1
            };
            writeln!(writer, "{reference}")?;
        }
        writeln!(writer, "End")?;
        Ok(())
    }
}
