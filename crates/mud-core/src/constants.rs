//! Global constants for mud-core

/// File extension of exported model documents (without the dot)
pub const MUDM_EXTENSION: &str = "mudm";

/// Indentation emitted once per tree depth level
pub const INDENT: &str = "\t";

/// Model name used when none can be derived from the output path
pub const DEFAULT_MODEL_NAME: &str = "model";

/// Number of corners in an object bounding box
pub const BOUND_BOX_CORNERS: usize = 8;

/// Normal used for degenerate faces
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Two UVs closer than this on every axis are treated as the same coordinate
pub const UV_CONNECT_LIMIT: f32 = 1.0e-5;
