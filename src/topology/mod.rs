//! Cell topology descriptors.

pub mod cell_type;
