//! MUD model exporter core
//!
//! This crate turns a host scene into a `.mudm` document:
//! - Scene: read-only meshes and armatures supplied by the host
//! - Export: mesh and skeleton extraction into a document tree
//! - Document: generic ordered node tree and its text writer
//! - Axis: up-axis conversion applied to exported geometry

pub mod axis;
pub mod constants;
pub mod document;
pub mod export;
pub mod scene;

pub use axis::*;
pub use constants::*;
pub use document::*;
pub use export::*;
pub use scene::*;
