//! Data containers: the mesh model and the epsilon sidecar map.

pub mod epsilon;
pub mod mesh;
