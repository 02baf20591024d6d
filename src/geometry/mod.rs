//! Geometry utilities for mesh-convert.
//!
//! Plain `[f64; 3]` arithmetic shared by the repair engine and the transforms.

pub mod metrics;
