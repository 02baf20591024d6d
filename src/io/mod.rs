//! Mesh I/O for plain-text interchange formats.
//!
//! Each format has a reader implementing [`MeshReader`] and a writer
//! implementing [`MeshWriter`]. Both work on any `Read`/`Write`, so tests and
//! callers can use in-memory buffers; [`read_mesh`] and [`write_mesh`] add
//! file handling and dispatch on [`Format`].
//!
//! # Index base
//! Meshes are 0-based in memory. OBJ, MEDIT, PLS and FACET store 1-based
//! indices on disk; VTK and PLY are 0-based.

pub mod eps;
pub mod facet;
pub mod medit;
pub mod obj;
pub mod pls;
pub mod ply;
pub mod tokenize;
pub mod vtk;

use crate::data::mesh::Mesh;
use crate::mesh_error::MeshConvertError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tokenize::Line;

/// Scalar field name used for marks when the caller does not pick one.
pub const DEFAULT_MARK_PATTERN: &str = "surface_id";

/// Trait for readers that parse a mesh from a byte stream.
pub trait MeshReader {
    /// Parse a mesh from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshConvertError>;
}

/// Trait for writers that serialize a mesh to a byte stream.
pub trait MeshWriter {
    /// Write a mesh to a writer.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), MeshConvertError>;
}

/// Supported on-disk formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Format {
    Vtk,
    Obj,
    Medit,
    Ply,
    Pls,
    Facet,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Vtk,
        Format::Obj,
        Format::Medit,
        Format::Ply,
        Format::Pls,
        Format::Facet,
    ];

    /// Format for a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Result<Self, MeshConvertError> {
        match ext.to_ascii_lowercase().as_str() {
            "vtk" => Ok(Format::Vtk),
            "obj" => Ok(Format::Obj),
            "mesh" => Ok(Format::Medit),
            "ply" => Ok(Format::Ply),
            "pls" => Ok(Format::Pls),
            "facet" => Ok(Format::Facet),
            _ => Err(MeshConvertError::UnknownFormat(ext.to_string())),
        }
    }

    /// Format for a path, from its extension.
    pub fn from_path(path: &Path) -> Result<Self, MeshConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| MeshConvertError::UnknownFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Vtk => "vtk",
            Format::Obj => "obj",
            Format::Medit => "mesh",
            Format::Ply => "ply",
            Format::Pls => "pls",
            Format::Facet => "facet",
        }
    }

    /// Whether per-cell marks survive a write/read round trip.
    pub fn supports_marks(self) -> bool {
        !matches!(self, Format::Ply)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Vtk => "VTK",
            Format::Obj => "OBJ",
            Format::Medit => "MEDIT",
            Format::Ply => "PLY",
            Format::Pls => "PLS",
            Format::Facet => "FACET",
        };
        f.write_str(name)
    }
}

/// Open `path` and parse it as `format`.
///
/// `mark_pattern` selects the VTK scalar field holding marks; other formats
/// ignore it.
pub fn read_mesh(
    path: impl AsRef<Path>,
    format: Format,
    mark_pattern: &str,
) -> Result<Mesh, MeshConvertError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| MeshConvertError::NotFound {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let reader = BufReader::new(file);
    let mesh = match format {
        Format::Vtk => vtk::VtkReader::new(mark_pattern).read(reader)?,
        Format::Obj => obj::ObjReader.read(reader)?,
        Format::Medit => medit::MeditReader.read(reader)?,
        Format::Ply => ply::PlyReader.read(reader)?,
        Format::Pls => pls::PlsReader.read(reader)?,
        Format::Facet => facet::FacetReader.read(reader)?,
    };
    log::info!(
        "read {} vertices, {} cells ({:?}) from {}",
        mesh.num_vertices(),
        mesh.num_cells(),
        mesh.cell_type(),
        path.display()
    );
    Ok(mesh)
}

/// Serialize `mesh` as `format` into a new file at `path`.
///
/// On failure the file may exist with partial content.
pub fn write_mesh(
    path: impl AsRef<Path>,
    format: Format,
    mesh: &Mesh,
    mark_pattern: &str,
) -> Result<(), MeshConvertError> {
    let path = path.as_ref();
    log::info!("writing mesh to {}", path.display());
    let mut writer = BufWriter::new(create_file(path)?);
    match format {
        Format::Vtk => vtk::VtkWriter::new(mark_pattern).write(&mut writer, mesh)?,
        Format::Obj => obj::ObjWriter.write(&mut writer, mesh)?,
        Format::Medit => medit::MeditWriter.write(&mut writer, mesh)?,
        Format::Ply => ply::PlyWriter.write(&mut writer, mesh)?,
        Format::Pls => pls::PlsWriter.write(&mut writer, mesh)?,
        Format::Facet => facet::FacetWriter.write(&mut writer, mesh)?,
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn create_file(path: &Path) -> Result<File, MeshConvertError> {
    File::create(path)
        .map_err(|err| MeshConvertError::Io(format!("cannot create {}: {err}", path.display())))
}

pub(crate) fn read_text<R: Read>(mut reader: R) -> Result<String, MeshConvertError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(input)
}

/// Parse a 1-based on-disk index into a 0-based one.
pub(crate) fn parse_one_based(
    line: &Line<'_>,
    token: &str,
    what: &str,
) -> Result<usize, MeshConvertError> {
    let raw: i64 = line.parse(token, what)?;
    if raw < 1 {
        return Err(line.malformed(format!("{what} must be >= 1, got {raw}")));
    }
    Ok((raw - 1) as usize)
}

/// `(x, y, z)` of vertex `i`, padding 2D meshes with `z = 0`.
pub(crate) fn write_xyz<W: Write>(writer: &mut W, mesh: &Mesh, i: usize) -> std::io::Result<()> {
    let [x, y, z] = mesh.point3(i);
    write!(writer, "{x} {y} {z}")
}

/// Log when a writer drops marks because they do not line up with cells.
pub(crate) fn warn_mark_mismatch(format: Format, mesh: &Mesh) {
    if !mesh.marks().is_empty() && !mesh.marks_match_cells() {
        log::warn!(
            "{format}: {}; writing without marks",
            MeshConvertError::AttributeCountMismatch {
                marks: mesh.marks().len(),
                cells: mesh.num_cells(),
            }
        );
    }
}
