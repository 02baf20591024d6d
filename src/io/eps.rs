//! Epsilon sidecar files and their VTK export.
//!
//! ```text
//! # comment
//! eps 0.005
//! id 1 5 7 9 100
//! eps 0.008
//! id 56 78 79
//! ```
//!
//! Keywords are accepted in lower or upper case. Vertex ids are 0-based.

use crate::data::epsilon::EpsilonMap;
use crate::data::mesh::Mesh;
use crate::io::tokenize::LineCursor;
use crate::io::vtk::write_points_block;
use crate::io::{MeshWriter, create_file, read_text};
use crate::mesh_error::MeshConvertError;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Name of the scalar field written by [`EpsilonVtkWriter`].
pub const EPSILON_FIELD: &str = "local_epsilon";

/// Parser for epsilon sidecar files.
#[derive(Debug, Default, Clone)]
pub struct EpsilonReader;

impl EpsilonReader {
    pub fn read<R: Read>(&self, reader: R) -> Result<EpsilonMap, MeshConvertError> {
        let input = read_text(reader)?;
        let mut cursor = LineCursor::new(&input);
        let mut map = EpsilonMap::new();

        while let Some(line) = cursor.next_data() {
            let fields = line.fields();
            match fields.first().copied() {
                Some("eps" | "EPS") => {
                    let eps: f64 = line.parse_field(&fields, 1, "epsilon value")?;
                    map.begin_group(eps);
                }
                Some("id" | "ID") => {
                    let ids = fields[1..]
                        .iter()
                        .map(|tok| line.parse::<usize>(tok, "vertex id"))
                        .collect::<Result<Vec<_>, _>>()?;
                    map.extend_current(ids);
                }
                _ => {}
            }
        }

        if !map.orphans().is_empty() {
            log::warn!(
                "epsilon file lists {} vertex ids before any eps line; they are ignored",
                map.orphans().len()
            );
        }
        Ok(map)
    }

    /// Open and parse an epsilon file.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<EpsilonMap, MeshConvertError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| MeshConvertError::NotFound {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        self.read(std::io::BufReader::new(file))
    }
}

/// Writes the mesh points as VTK vertex cells carrying per-vertex epsilon.
///
/// The mesh connectivity is not written.
#[derive(Debug, Clone, Copy)]
pub struct EpsilonVtkWriter<'a> {
    pub epsilons: &'a EpsilonMap,
}

impl<'a> EpsilonVtkWriter<'a> {
    pub fn new(epsilons: &'a EpsilonMap) -> Self {
        Self { epsilons }
    }
}

impl MeshWriter for EpsilonVtkWriter<'_> {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshConvertError> {
        let n = mesh.num_vertices();
        let (values, out_of_range) = self.epsilons.project(n);
        if let Some(&index) = out_of_range.first() {
            return Err(MeshConvertError::IndexOutOfRange {
                index: index as i64,
                len: n,
            });
        }

        write_points_block(&mut writer, mesh)?;
        writeln!(writer, "CELLS {n} {}", n * 2)?;
        for i in 0..n {
            writeln!(writer, "1 {i}")?;
        }
        writeln!(writer, "CELL_TYPES {n}")?;
        for _ in 0..n {
            writeln!(writer, "1")?;
        }
        writeln!(writer, "CELL_DATA {n}")?;
        writeln!(writer, "SCALARS {EPSILON_FIELD} double 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for (i, value) in values.iter().enumerate() {
            writeln!(writer, "{value}")?;
            if *value != crate::data::epsilon::UNSET_EPSILON {
                log::debug!("vertex {i} epsilon {value}");
            }
        }
        Ok(())
    }
}

/// Write the epsilon VTK export of `mesh` to a new file at `path`.
pub fn write_epsilon_vtk(
    path: impl AsRef<Path>,
    mesh: &Mesh,
    epsilons: &EpsilonMap,
) -> Result<(), MeshConvertError> {
    let path = path.as_ref();
    log::info!(
        "writing {} epsilon groups to {}",
        epsilons.group_count(),
        path.display()
    );
    let mut writer = BufWriter::new(create_file(path)?);
    EpsilonVtkWriter::new(epsilons).write(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}
