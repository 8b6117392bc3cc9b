//! CPU terrain meshing: heightfield triangulation and the top-level generation entry points.
#![forbid(unsafe_code)]

pub mod constants;
mod terrain_mesh;
mod triangulate;

use std::time::Instant;

use strata_world::{
    ChunkPlan, GridSpec, HeightfieldBuilder, NoiseConfig, NoiseSampler, OctaveStrategy,
};

pub use terrain_mesh::{MeshStats, TerrainMesh};
pub use triangulate::{quad_indices, triangulate};

/// Generates one heightfield sheet and triangulates it.
///
/// Pure: the same inputs always give an equal mesh, and nothing is retained
/// between calls.
pub fn generate_terrain(
    sampler: &dyn NoiseSampler,
    strategy: &dyn OctaveStrategy,
    grid: &GridSpec,
    cfg: &NoiseConfig,
    seed: f32,
    apply_falloff: bool,
) -> TerrainMesh {
    let t0 = Instant::now();
    let field = HeightfieldBuilder::new(sampler, strategy).build(grid, cfg, seed, apply_falloff);
    let t_field = t0.elapsed();
    let mesh = triangulate(&field);
    log::debug!(
        target: "terrain",
        "generated {}x{} sheet: {} verts, {} tris (field {:?}, mesh {:?})",
        grid.width,
        grid.height,
        mesh.vertex_count(),
        mesh.triangle_count(),
        t_field,
        t0.elapsed() - t_field
    );
    mesh
}

/// Generates a single planned chunk. Neighbors are not consulted.
pub fn generate_chunk(
    sampler: &dyn NoiseSampler,
    strategy: &dyn OctaveStrategy,
    plan: &ChunkPlan,
    cfg: &NoiseConfig,
    seed: f32,
    apply_falloff: bool,
) -> TerrainMesh {
    generate_terrain(sampler, strategy, &plan.grid, cfg, seed, apply_falloff)
}
