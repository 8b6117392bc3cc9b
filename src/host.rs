use std::error::Error;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use strata_mesh_cpu::{TerrainMesh, generate_terrain};
use strata_runtime::generate_tiled;
use strata_world::{ChunkLayout, PerlinSampler, TerrainParams, load_params_from_path};

/// Command-line values layered over whatever the config file says.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides {
    pub chunks: Option<usize>,
    pub seed: Option<f32>,
    pub falloff: bool,
}

impl Overrides {
    pub fn apply(&self, mut params: TerrainParams) -> TerrainParams {
        match self.chunks {
            Some(0) => params.tiling = None,
            Some(n) => params.tiling = Some(ChunkLayout::square(n)),
            None => {}
        }
        if let Some(seed) = self.seed {
            params.noise.seed = seed;
        }
        if self.falloff {
            params.falloff = true;
        }
        params.sanitized()
    }
}

/// Seed drawn from the wall clock, kept small so it stays exact in `f32` math.
pub fn clock_seed() -> f32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() % 10_000) as f32 + now.subsec_millis() as f32 / 1000.0
}

pub fn resolve_params(
    config: Option<&Path>,
    overrides: &Overrides,
) -> Result<TerrainParams, Box<dyn Error>> {
    let base = match config {
        Some(path) => {
            let p = load_params_from_path(path)?;
            log::info!("loaded terrain config {:?}", path);
            p
        }
        None => TerrainParams::default(),
    };
    Ok(overrides.apply(base))
}

pub fn log_params(params: &TerrainParams) {
    let n = &params.noise;
    log::info!(
        target: "events",
        "params: {}x{} octaves={} persistence={} freq={} lacunarity={} height_scale={} scale={} seed={} lattice={} falloff={} mode={} tiling={:?}",
        params.grid.width,
        params.grid.height,
        n.octave_count,
        n.persistence,
        n.base_frequency,
        n.lacunarity,
        n.height_scale,
        n.scale,
        n.seed,
        params.lattice_seed,
        params.falloff,
        params.accumulation.name(),
        params.tiling.map(|l| (l.cols, l.rows))
    );
}

pub fn log_mesh(label: &str, mesh: &TerrainMesh) {
    let stats = mesh.stats();
    if mesh.is_empty() {
        log::info!(target: "events", "{}: empty mesh", label);
        return;
    }
    log::info!(
        target: "events",
        "{}: {} verts, {} tris, height [{:.3}, {:.3}], bounds {:?}..{:?}",
        label,
        stats.vertex_count,
        stats.triangle_count,
        stats.min_height,
        stats.max_height,
        stats.bounds.min.to_array(),
        stats.bounds.max.to_array()
    );
}

/// Generates everything `params` describes on the calling thread (tiles via rayon).
pub fn generate_once(params: &TerrainParams) {
    let sampler = PerlinSampler::new(params.lattice_seed);
    let t0 = Instant::now();
    match params.tiling {
        Some(layout) => {
            let chunks = generate_tiled(
                &sampler,
                &params.accumulation,
                &layout,
                &params.grid,
                &params.noise,
                params.noise.seed,
                params.falloff,
            );
            let (mut verts, mut tris) = (0usize, 0usize);
            for (plan, mesh) in &chunks {
                log_mesh(
                    &format!("chunk {} ({}, {})", plan.index, plan.coord.cx, plan.coord.cz),
                    mesh,
                );
                verts += mesh.vertex_count();
                tris += mesh.triangle_count();
            }
            log::info!(
                target: "events",
                "generated {} chunks: {} verts, {} tris in {:?}",
                chunks.len(),
                verts,
                tris,
                t0.elapsed()
            );
        }
        None => {
            let mesh = generate_terrain(
                &sampler,
                &params.accumulation,
                &params.grid,
                &params.noise,
                params.noise.seed,
                params.falloff,
            );
            log_mesh("sheet", &mesh);
            log::info!(target: "events", "generated sheet in {:?}", t0.elapsed());
        }
    }
}
