//! End-to-end conversion: read, optional cleanup and transforms, write.
//!
//! Stages run in a fixed order:
//! read → repair → rotate → bounding box → reverse → write.
//!
//! Every failure is wrapped in [`MeshConvertError::Conversion`] carrying the
//! file and the [`Stage`] that failed. A failed write may leave a partial
//! output file behind.

use crate::algs::repair::{RepairOptions, RepairReport, repair_with};
use crate::algs::transform::{add_bounding_box, reverse_orientation, rotate};
use crate::io::eps::{EpsilonReader, write_epsilon_vtk};
use crate::io::{DEFAULT_MARK_PATTERN, Format, read_mesh, write_mesh};
use crate::mesh_error::{MeshConvertError, Stage};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Options for [`convert`].
///
/// Formats left as `None` are inferred from the file extension.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub input_format: Option<Format>,
    pub output_format: Option<Format>,
    /// VTK scalar field holding marks, on read and on write.
    pub mark_pattern: String,
    /// Run the repair pass with these options.
    pub repair: Option<RepairOptions>,
    /// `[ax, ay, az, angle]` or `[px, py, pz, ax, ay, az, angle]`.
    pub rotation: Option<Vec<f64>>,
    /// `[length, width, height]`.
    pub bounding_box: Option<Vec<f64>>,
    pub reverse_orientation: bool,
    /// When set, the output is the epsilon VTK export of the mesh points
    /// instead of the mesh itself.
    pub epsilon_sidecar: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_format: None,
            output_format: None,
            mark_pattern: DEFAULT_MARK_PATTERN.to_string(),
            repair: None,
            rotation: None,
            bounding_box: None,
            reverse_orientation: false,
            epsilon_sidecar: None,
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn with_repair(mut self, options: RepairOptions) -> Self {
        self.repair = Some(options);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, params: Vec<f64>) -> Self {
        self.rotation = Some(params);
        self
    }

    #[must_use]
    pub fn with_bounding_box(mut self, params: Vec<f64>) -> Self {
        self.bounding_box = Some(params);
        self
    }

    #[must_use]
    pub fn with_epsilon_sidecar(mut self, path: impl Into<PathBuf>) -> Self {
        self.epsilon_sidecar = Some(path.into());
        self
    }
}

/// Summary of one successful conversion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_format: Format,
    /// Format actually written; the epsilon export is always VTK.
    pub output_format: Format,
    pub num_vertices: usize,
    pub num_cells: usize,
    pub repair: Option<RepairReport>,
}

/// One entry of a [`convert_batch`] run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub options: ConvertOptions,
}

impl ConvertJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options: ConvertOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> Result<ConvertReport, MeshConvertError> {
        convert(&self.input, &self.output, &self.options)
    }
}

fn resolve_format(
    explicit: Option<Format>,
    path: &Path,
    stage: Stage,
) -> Result<Format, MeshConvertError> {
    match explicit {
        Some(format) => Ok(format),
        None => Format::from_path(path).map_err(|e| e.in_stage(path, stage)),
    }
}

/// Convert `input` into `output` according to `options`.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConvertReport, MeshConvertError> {
    let input = input.as_ref();
    let output = output.as_ref();
    let input_format = resolve_format(options.input_format, input, Stage::Read)?;
    let output_format = if options.epsilon_sidecar.is_some() {
        Format::Vtk
    } else {
        resolve_format(options.output_format, output, Stage::Write)?
    };
    log::info!(
        "converting {} ({input_format}) -> {} ({output_format})",
        input.display(),
        output.display()
    );

    let mut mesh = read_mesh(input, input_format, &options.mark_pattern)
        .map_err(|e| e.in_stage(input, Stage::Read))?;

    let repair = match &options.repair {
        Some(repair_options) => Some(
            repair_with(&mut mesh, repair_options).map_err(|e| e.in_stage(input, Stage::Repair))?,
        ),
        None => None,
    };

    if let Some(params) = &options.rotation {
        rotate(&mut mesh, params).map_err(|e| e.in_stage(input, Stage::Transform))?;
    }
    if let Some(params) = &options.bounding_box {
        add_bounding_box(&mut mesh, params).map_err(|e| e.in_stage(input, Stage::Transform))?;
    }
    if options.reverse_orientation {
        reverse_orientation(&mut mesh);
    }

    match &options.epsilon_sidecar {
        Some(sidecar) => {
            let epsilons = EpsilonReader
                .read_path(sidecar)
                .map_err(|e| e.in_stage(sidecar, Stage::Read))?;
            write_epsilon_vtk(output, &mesh, &epsilons)
                .map_err(|e| e.in_stage(output, Stage::Write))?;
        }
        None => write_mesh(output, output_format, &mesh, &options.mark_pattern)
            .map_err(|e| e.in_stage(output, Stage::Write))?,
    }

    Ok(ConvertReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        input_format,
        output_format,
        num_vertices: mesh.num_vertices(),
        num_cells: mesh.num_cells(),
        repair,
    })
}

/// Run every job independently; results are in job order.
///
/// With the `rayon` feature the jobs run on the global thread pool.
pub fn convert_batch(jobs: &[ConvertJob]) -> Vec<Result<ConvertReport, MeshConvertError>> {
    log::info!("batch converting {} files", jobs.len());
    #[cfg(feature = "rayon")]
    {
        jobs.par_iter().map(ConvertJob::run).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        jobs.iter().map(ConvertJob::run).collect()
    }
}
