//! Algorithms that operate on a loaded [`Mesh`](crate::data::mesh::Mesh).

pub mod convert;
pub mod repair;
pub mod transform;

pub use convert::{ConvertJob, ConvertOptions, ConvertReport, convert, convert_batch};
pub use repair::{MarkPolicy, RepairOptions, RepairReport, repair, repair_with};
pub use transform::{add_bounding_box, reverse_orientation, rotate};
