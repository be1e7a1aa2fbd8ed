//! Active rendering systems
//!
//! Systems that turn scene-level requests into batch geometry.

pub mod voxel;
