#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-convert
//!
//! mesh-convert reads and writes surface and volume meshes in several plain-text
//! interchange formats and applies a small set of cleanup operations between
//! read and write.
//!
//! ## Features
//! - Readers and writers for legacy VTK, Wavefront OBJ, MEDIT `.mesh`, ASCII
//!   PLY, PLS and FACET, all working on any `Read`/`Write`
//! - Vertex welding and degenerate-triangle removal ([`algs::repair`])
//! - Rotation, bounding-box augmentation and orientation reversal
//!   ([`algs::transform`])
//! - A file-to-file pipeline ([`algs::convert`]) with optional parallel batch
//!   conversion behind the `rayon` feature
//! - Per-vertex epsilon export from an `eps`/`id` sidecar file
//!
//! ## Index base
//!
//! Cell connectivity is 0-based in memory. Codecs for 1-based formats
//! (OBJ, MEDIT, PLS, FACET) convert on the way in and out.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and installs no logger.
//!
//! ## Usage
//!
//! ```no_run
//! use mesh_convert::prelude::*;
//!
//! let opts = ConvertOptions::default().with_repair(RepairOptions::default());
//! let report = convert("part.vtk", "part.obj", &opts)?;
//! println!("{} cells written", report.num_cells);
//! # Ok::<(), MeshConvertError>(())
//! ```

pub mod algs;
pub mod data;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::convert::{
        ConvertJob, ConvertOptions, ConvertReport, convert, convert_batch,
    };
    pub use crate::algs::repair::{MarkPolicy, RepairOptions, RepairReport, repair, repair_with};
    pub use crate::algs::transform::{add_bounding_box, reverse_orientation, rotate};
    pub use crate::data::epsilon::EpsilonMap;
    pub use crate::data::mesh::Mesh;
    pub use crate::io::{Format, MeshReader, MeshWriter, read_mesh, write_mesh};
    pub use crate::mesh_error::{MeshConvertError, Stage};
    pub use crate::topology::cell_type::CellType;
}
