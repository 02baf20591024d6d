//! Legacy VTK (`.vtk`) reader/writer.
//!
//! # Supported format
//! - ASCII legacy files with `DATASET POLYDATA` (cells under `POLYGONS`) or
//!   `DATASET UNSTRUCTURED_GRID` (cells under `CELLS`).
//! - Marks are read from the `CELL_DATA` scalar field whose name equals the
//!   reader's mark pattern; every other field is skipped.
//!
//! # Limitations
//! - The cell width is inferred from the block header as `total / n - 1`, so
//!   every row must have the same vertex count; a row that disagrees is
//!   rejected rather than reinterpreted.
//! - A `CELL_DATA` block whose count differs from the cell count is skipped
//!   with a warning.
//! - Binary files are not supported.

use crate::data::mesh::Mesh;
use crate::io::tokenize::{Line, LineCursor};
use crate::io::{DEFAULT_MARK_PATTERN, Format, MeshReader, MeshWriter, read_text, write_xyz};
use crate::mesh_error::MeshConvertError;
use crate::topology::cell_type::CellType;
use std::io::{Read, Write};

pub(crate) const VTK_VERSION_LINE: &str = "# vtk DataFile Version 2.0";
const VTK_TITLE: &str = "mesh-convert";

/// Legacy VTK reader.
#[derive(Debug, Clone)]
pub struct VtkReader {
    /// Name of the `CELL_DATA` scalar field read into the mark array.
    pub mark_pattern: String,
}

impl Default for VtkReader {
    fn default() -> Self {
        Self::new(DEFAULT_MARK_PATTERN)
    }
}

/// Legacy VTK writer (`UNSTRUCTURED_GRID`).
#[derive(Debug, Clone)]
pub struct VtkWriter {
    /// Name given to the `SCALARS` field holding marks.
    pub mark_pattern: String,
}

impl Default for VtkWriter {
    fn default() -> Self {
        Self::new(DEFAULT_MARK_PATTERN)
    }
}

impl VtkWriter {
    pub fn new(mark_pattern: impl Into<String>) -> Self {
        Self {
            mark_pattern: mark_pattern.into(),
        }
    }
}

/// Header, title, `ASCII`, `DATASET` and the `POINTS` block.
pub(crate) fn write_points_block<W: Write>(
    writer: &mut W,
    mesh: &Mesh,
) -> Result<(), MeshConvertError> {
    writeln!(writer, "{VTK_VERSION_LINE}")?;
    writeln!(writer, "{VTK_TITLE}")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;
    writeln!(writer, "POINTS {} double", mesh.num_vertices())?;
    for i in 0..mesh.num_vertices() {
        write_xyz(writer, mesh, i)?;
        writeln!(writer)?;
    }
    Ok(())
}

impl MeshWriter for VtkWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        write_points_block(&mut writer, mesh)?;

        let width = mesh.cell_width();
        let n = mesh.num_cells();
        writeln!(writer, "CELLS {n} {}", n * (width + 1))?;
        for cell in mesh.cells() {
            write!(writer, "{width}")?;
            for idx in cell {
                write!(writer, " {idx}")?;
            }
            writeln!(writer)?;
        }

        let code = mesh.cell_type().vtk_code();
        writeln!(writer, "CELL_TYPES {n}")?;
        for _ in 0..n {
            writeln!(writer, "{code}")?;
        }

        if !mesh.marks().is_empty() && mesh.marks_match_cells() {
            writeln!(writer, "CELL_DATA {n}")?;
            writeln!(writer, "SCALARS {} int 1", self.mark_pattern)?;
            writeln!(writer, "LOOKUP_TABLE default")?;
            for mark in mesh.marks() {
                writeln!(writer, "{mark}")?;
            }
        } else {
            crate::io::warn_mark_mismatch(Format::Vtk, mesh);
        }
        Ok(())
    }
}

/// Attribute section the cursor is currently inside.
#[derive(Clone, Copy, Debug)]
enum DataSection {
    None,
    /// `CELL_DATA` whose count matches the cells.
    Cell(usize),
    /// `POINT_DATA`, or a `CELL_DATA` block being skipped.
    Ignored(usize),
}

impl DataSection {
    fn tuples(self) -> usize {
        match self {
            DataSection::None => 0,
            DataSection::Cell(n) | DataSection::Ignored(n) => n,
        }
    }
}

impl VtkReader {
    pub fn new(mark_pattern: impl Into<String>) -> Self {
        Self {
            mark_pattern: mark_pattern.into(),
        }
    }

    fn cell_keyword(line: &Line<'_>, fields: &[&str]) -> Result<&'static str, MeshConvertError> {
        let dataset: String = line.parse_field(fields, 1, "DATASET type")?;
        match dataset.as_str() {
            "POLYDATA" => Ok("POLYGONS"),
            "UNSTRUCTURED_GRID" => Ok("CELLS"),
            other => Err(line.malformed(format!("unsupported DATASET {other}"))),
        }
    }

    fn read_points(
        cursor: &mut LineCursor<'_>,
        line: &Line<'_>,
        fields: &[&str],
    ) -> Result<Vec<[f64; 3]>, MeshConvertError> {
        let n: usize = line.parse_field(fields, 1, "point count")?;
        let total = cursor.bounded(line, n, 3, "point count")?;
        let tokens = cursor.take_tokens(total, "point coordinates")?;
        let mut points = Vec::with_capacity(n);
        for chunk in tokens.chunks_exact(3) {
            let mut xyz = [0.0; 3];
            for (slot, (tline, token)) in xyz.iter_mut().zip(chunk) {
                *slot = tline.parse(token, "coordinate")?;
            }
            points.push(xyz);
        }
        Ok(points)
    }

    fn read_cells(
        cursor: &mut LineCursor<'_>,
        line: &Line<'_>,
        fields: &[&str],
    ) -> Result<(CellType, Vec<usize>), MeshConvertError> {
        let n: usize = line.parse_field(fields, 1, "cell count")?;
        let total: usize = line.parse_field(fields, 2, "cell payload size")?;
        cursor.bounded(line, total, 1, "cell payload size")?;
        cursor.bounded(line, n, 2, "cell count")?;
        if n == 0 {
            return Ok((CellType::default(), Vec::new()));
        }
        let per_row = total / n;
        let cell_type = per_row
            .checked_sub(1)
            .and_then(CellType::from_width)
            .ok_or(MeshConvertError::UnsupportedTopology {
                format: "VTK",
                width: per_row.saturating_sub(1),
            })?;
        let width = cell_type.width();
        log::debug!("VTK: {n} cells of width {width}");

        let mut cells = Vec::with_capacity(n * width);
        for _ in 0..n {
            let row = cursor.expect_data("cell row")?;
            let row_fields = row.fields();
            let count: usize = row.parse_field(&row_fields, 0, "cell vertex count")?;
            if count != width || row_fields.len() != count + 1 {
                return Err(row.malformed(format!(
                    "cell row has {count} vertices, header implies {width}"
                )));
            }
            for token in &row_fields[1..] {
                cells.push(row.parse::<usize>(token, "vertex index")?);
            }
        }
        Ok((cell_type, cells))
    }

    /// Skip `FIELD <name> <narrays>` and its arrays.
    fn skip_field_block(
        cursor: &mut LineCursor<'_>,
        line: &Line<'_>,
        fields: &[&str],
    ) -> Result<(), MeshConvertError> {
        let arrays: usize = line.parse_field(fields, 2, "field array count")?;
        for _ in 0..arrays {
            let header = cursor.expect_data("field array header")?;
            let hf = header.fields();
            let components: usize = header.parse_field(&hf, 1, "field components")?;
            let tuples: usize = header.parse_field(&hf, 2, "field tuples")?;
            let total = cursor.bounded(&header, components, tuples, "field size")?;
            cursor.take_tokens(total, "field values")?;
        }
        Ok(())
    }
}

impl MeshReader for VtkReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);

        // Version line and the free-form title that follows it.
        if let Some(first) = cursor.next_line() {
            if first.text.trim_start().starts_with("# vtk") {
                cursor.next_line();
            }
        }

        let mut cell_keyword = "POLYGONS";
        let mut points: Option<Vec<[f64; 3]>> = None;
        let mut cells: Option<(CellType, Vec<usize>)> = None;
        let mut marks: Vec<i32> = Vec::new();
        let mut section = DataSection::None;

        while let Some(line) = cursor.next_data() {
            let fields = line.fields();
            let Some(&keyword) = fields.first() else {
                continue;
            };
            match keyword {
                "BINARY" => return Err(line.malformed("binary VTK files are not supported")),
                "DATASET" => {
                    cell_keyword = Self::cell_keyword(&line, &fields)?;
                    log::debug!("VTK: reading cells from {cell_keyword}");
                }
                "POINTS" => points = Some(Self::read_points(&mut cursor, &line, &fields)?),
                kw if kw == cell_keyword => {
                    cells = Some(Self::read_cells(&mut cursor, &line, &fields)?);
                }
                "VERTICES" | "LINES" | "TRIANGLE_STRIPS" | "POLYGONS" | "CELLS" => {
                    let size: usize = line.parse_field(&fields, 2, "block size")?;
                    let size = cursor.bounded(&line, size, 1, "block size")?;
                    cursor.take_tokens(size, "cell payload")?;
                }
                "CELL_TYPES" => {
                    let n: usize = line.parse_field(&fields, 1, "cell type count")?;
                    let n = cursor.bounded(&line, n, 1, "cell type count")?;
                    cursor.take_tokens(n, "cell types")?;
                }
                "CELL_DATA" => {
                    let n: usize = line.parse_field(&fields, 1, "cell data count")?;
                    let num_cells = cells.as_ref().map_or(0, |(ct, c)| c.len() / ct.width());
                    section = if n == num_cells {
                        DataSection::Cell(n)
                    } else {
                        log::warn!(
                            "VTK: CELL_DATA count {n} differs from cell count {num_cells}; ignoring CELL_DATA"
                        );
                        DataSection::Ignored(n)
                    };
                }
                "POINT_DATA" => {
                    let n: usize = line.parse_field(&fields, 1, "point data count")?;
                    section = DataSection::Ignored(n);
                }
                "SCALARS" => {
                    let name: String = line.parse_field(&fields, 1, "scalar name")?;
                    let components: usize = match fields.get(3) {
                        Some(tok) => line.parse(tok, "scalar components")?,
                        None => 1,
                    };
                    let table = cursor.expect_data("LOOKUP_TABLE")?;
                    if table.keyword() != Some("LOOKUP_TABLE") {
                        return Err(table.malformed("expected LOOKUP_TABLE after SCALARS"));
                    }
                    let total =
                        cursor.bounded(&line, section.tuples(), components, "scalar count")?;
                    let values = cursor.take_tokens(total, "scalar values")?;
                    match section {
                        DataSection::Cell(_) if name == self.mark_pattern && components == 1 => {
                            marks = values
                                .iter()
                                .map(|(vline, token)| vline.parse::<i32>(token, "mark"))
                                .collect::<Result<_, _>>()?;
                        }
                        _ => log::debug!("VTK: skipping scalar field {name}"),
                    }
                }
                "FIELD" => Self::skip_field_block(&mut cursor, &line, &fields)?,
                "VECTORS" | "NORMALS" => {
                    let total = cursor.bounded(&line, section.tuples(), 3, "vector count")?;
                    cursor.take_tokens(total, "vector values")?;
                }
                "TENSORS" => {
                    let total = cursor.bounded(&line, section.tuples(), 9, "tensor count")?;
                    cursor.take_tokens(total, "tensor values")?;
                }
                "COLOR_SCALARS" => {
                    let n: usize = line.parse_field(&fields, 2, "color components")?;
                    let total = cursor.bounded(&line, section.tuples(), n, "color count")?;
                    cursor.take_tokens(total, "color values")?;
                }
                "TEXTURE_COORDINATES" => {
                    let n: usize = line.parse_field(&fields, 2, "texture dimension")?;
                    let total = cursor.bounded(&line, section.tuples(), n, "texture count")?;
                    cursor.take_tokens(total, "texture coordinates")?;
                }
                "LOOKUP_TABLE" => {
                    // Stand-alone color table: `LOOKUP_TABLE <name> <size>` + RGBA rows.
                    if let Some(tok) = fields.get(2) {
                        let size: usize = line.parse(tok, "lookup table size")?;
                        let total = cursor.bounded(&line, size, 4, "lookup table size")?;
                        cursor.take_tokens(total, "lookup table")?;
                    }
                }
                _ => {}
            }
        }

        let points =
            points.ok_or_else(|| MeshConvertError::malformed(cursor.line_number(), "", "missing POINTS block"))?;
        let (cell_type, connectivity) = cells.unwrap_or_else(|| {
            log::warn!("VTK: no {cell_keyword} block, mesh has no cells");
            (CellType::default(), Vec::new())
        });

        let width = cell_type.width();
        let mut mesh = Mesh::with_capacity(3, cell_type, points.len(), connectivity.len() / width)?;
        for p in &points {
            mesh.push_vertex(p)?;
        }
        for cell in connectivity.chunks_exact(width) {
            mesh.push_cell(cell)?;
        }
        mesh.set_marks(marks);
        mesh.validate()?;
        Ok(mesh)
    }
}
