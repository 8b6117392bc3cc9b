//! Shared constants for strata-mesh-cpu.

/// Floats per vertex in the flat position buffer (x, y, z).
pub const VERTEX_STRIDE: usize = 3;
/// Indices per quad: two triangles.
pub const INDICES_PER_QUAD: usize = 6;
/// Indices per triangle.
pub const INDICES_PER_TRIANGLE: usize = 3;
