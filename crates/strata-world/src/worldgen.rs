use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::chunk_plan::ChunkLayout;
use crate::noise::PerlinSampler;
use crate::octaves::{Accumulation, TransitionParams};
use crate::params::{GridSpec, NoiseConfig};

// Slider ranges of the interactive parameter panel.
pub const MAX_OCTAVES: u32 = 10;
pub const MAX_GRID_DIM: usize = 1000;
pub const MAX_FREQUENCY: f32 = 8.0;
pub const MAX_CHUNK_GRID: usize = 32;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TerrainConfig {
    #[serde(default)]
    pub grid: Grid,
    #[serde(default)]
    pub noise: Noise,
    #[serde(default)]
    pub falloff: Falloff,
    #[serde(default)]
    pub accumulation: AccumulationCfg,
    #[serde(default)]
    pub tiling: Tiling,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Grid {
    #[serde(default = "default_grid_dim")]
    pub width: usize,
    #[serde(default = "default_grid_dim")]
    pub height: usize,
    #[serde(default)]
    pub x_offset: f32,
    #[serde(default)]
    pub z_offset: f32,
}
fn default_grid_dim() -> usize {
    256
}
impl Default for Grid {
    fn default() -> Self {
        Self {
            width: default_grid_dim(),
            height: default_grid_dim(),
            x_offset: 0.0,
            z_offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Noise {
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_seed")]
    pub seed: f32,
    #[serde(default = "default_lattice_seed")]
    pub lattice_seed: i32,
}
fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f32 {
    0.5
}
fn default_frequency() -> f32 {
    2.0
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_height_scale() -> f32 {
    10.0
}
fn default_scale() -> f32 {
    50.0
}
fn default_seed() -> f32 {
    10.0
}
fn default_lattice_seed() -> i32 {
    PerlinSampler::DEFAULT_LATTICE_SEED
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            octaves: default_octaves(),
            persistence: default_persistence(),
            frequency: default_frequency(),
            lacunarity: default_lacunarity(),
            height_scale: default_height_scale(),
            scale: default_scale(),
            seed: default_seed(),
            lattice_seed: default_lattice_seed(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Falloff {
    #[serde(default)]
    pub enable: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Fbm,
    Transition,
}

fn default_mode() -> Mode {
    Mode::Fbm
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccumulationCfg {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_target_offset")]
    pub target_offset: f32,
    #[serde(default = "default_speed_offset")]
    pub speed_offset: f32,
    #[serde(default = "default_speed_frequency")]
    pub speed_frequency: f32,
    #[serde(default = "default_progress_rate")]
    pub progress_rate: f32,
}
fn default_target_offset() -> f32 {
    TransitionParams::default().target_offset
}
fn default_speed_offset() -> f32 {
    TransitionParams::default().speed_offset
}
fn default_speed_frequency() -> f32 {
    TransitionParams::default().speed_frequency
}
fn default_progress_rate() -> f32 {
    TransitionParams::default().progress_rate
}
impl Default for AccumulationCfg {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            target_offset: default_target_offset(),
            speed_offset: default_speed_offset(),
            speed_frequency: default_speed_frequency(),
            progress_rate: default_progress_rate(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Tiling {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "default_tiles")]
    pub cols: usize,
    #[serde(default = "default_tiles")]
    pub rows: usize,
}
fn default_tiles() -> usize {
    3
}
impl Default for Tiling {
    fn default() -> Self {
        Self {
            enable: false,
            cols: default_tiles(),
            rows: default_tiles(),
        }
    }
}

/// Flattened snapshot of a terrain config, compared as a whole to decide
/// whether the mesh needs regenerating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub grid: GridSpec,
    pub noise: NoiseConfig,
    pub lattice_seed: i32,
    pub falloff: bool,
    pub accumulation: Accumulation,
    pub tiling: Option<ChunkLayout>,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::from_config(&TerrainConfig::default())
    }
}

impl TerrainParams {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        let accumulation = match cfg.accumulation.mode {
            Mode::Fbm => Accumulation::Fbm,
            Mode::Transition => Accumulation::Transition(TransitionParams {
                target_offset: cfg.accumulation.target_offset,
                speed_offset: cfg.accumulation.speed_offset,
                speed_frequency: cfg.accumulation.speed_frequency,
                progress_rate: cfg.accumulation.progress_rate,
            }),
        };
        Self {
            grid: GridSpec {
                width: cfg.grid.width,
                height: cfg.grid.height,
                x_offset: cfg.grid.x_offset,
                z_offset: cfg.grid.z_offset,
            },
            noise: NoiseConfig {
                octave_count: cfg.noise.octaves,
                persistence: cfg.noise.persistence,
                base_frequency: cfg.noise.frequency,
                lacunarity: cfg.noise.lacunarity,
                height_scale: cfg.noise.height_scale,
                scale: cfg.noise.scale,
                seed: cfg.noise.seed,
            },
            lattice_seed: cfg.noise.lattice_seed,
            falloff: cfg.falloff.enable,
            accumulation,
            tiling: if cfg.tiling.enable {
                Some(ChunkLayout::new(cfg.tiling.cols, cfg.tiling.rows))
            } else {
                None
            },
        }
    }

    /// Clamps every field into the range the parameter panel allows, warning
    /// once per adjusted field. Never fails.
    pub fn sanitized(mut self) -> Self {
        fn clamp_f32(name: &str, v: &mut f32, lo: f32, hi: f32) {
            let c = if v.is_nan() { lo } else { v.clamp(lo, hi) };
            if c != *v {
                log::warn!("{} {} out of range [{}, {}]; using {}", name, v, lo, hi, c);
                *v = c;
            }
        }
        fn clamp_usize(name: &str, v: &mut usize, hi: usize) {
            if *v > hi {
                log::warn!("{} {} above {}; clamping", name, v, hi);
                *v = hi;
            }
        }

        clamp_usize("grid.width", &mut self.grid.width, MAX_GRID_DIM);
        clamp_usize("grid.height", &mut self.grid.height, MAX_GRID_DIM);
        if self.noise.octave_count > MAX_OCTAVES {
            log::warn!(
                "noise.octaves {} above {}; clamping",
                self.noise.octave_count,
                MAX_OCTAVES
            );
            self.noise.octave_count = MAX_OCTAVES;
        }
        clamp_f32("noise.persistence", &mut self.noise.persistence, 0.0, 1.0);
        clamp_f32("noise.frequency", &mut self.noise.base_frequency, 0.0, MAX_FREQUENCY);
        clamp_f32("noise.lacunarity", &mut self.noise.lacunarity, 0.0, f32::MAX);
        if !(self.noise.scale > 0.0 && self.noise.scale.is_finite()) {
            log::warn!(
                "noise.scale {} must be positive; using {}",
                self.noise.scale,
                default_scale()
            );
            self.noise.scale = default_scale();
        }
        if let Some(layout) = self.tiling.as_mut() {
            clamp_usize("tiling.cols", &mut layout.cols, MAX_CHUNK_GRID);
            clamp_usize("tiling.rows", &mut layout.rows, MAX_CHUNK_GRID);
        }
        self
    }

    /// Names of the fields that differ from `prev`; empty means no regeneration is needed.
    pub fn changed_fields(&self, prev: &TerrainParams) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.grid.width != prev.grid.width || self.grid.height != prev.grid.height {
            out.push("grid.size");
        }
        if self.grid.x_offset != prev.grid.x_offset || self.grid.z_offset != prev.grid.z_offset {
            out.push("grid.offset");
        }
        let (n, p) = (&self.noise, &prev.noise);
        if n.octave_count != p.octave_count {
            out.push("noise.octaves");
        }
        if n.persistence != p.persistence {
            out.push("noise.persistence");
        }
        if n.base_frequency != p.base_frequency {
            out.push("noise.frequency");
        }
        if n.lacunarity != p.lacunarity {
            out.push("noise.lacunarity");
        }
        if n.height_scale != p.height_scale {
            out.push("noise.height_scale");
        }
        if n.scale != p.scale {
            out.push("noise.scale");
        }
        if n.seed != p.seed {
            out.push("noise.seed");
        }
        if self.lattice_seed != prev.lattice_seed {
            out.push("noise.lattice_seed");
        }
        if self.falloff != prev.falloff {
            out.push("falloff");
        }
        if self.accumulation != prev.accumulation {
            out.push("accumulation");
        }
        if self.tiling != prev.tiling {
            out.push("tiling");
        }
        out
    }
}

pub fn parse_params(s: &str) -> Result<TerrainParams, Box<dyn Error>> {
    let cfg: TerrainConfig = toml::from_str(s)?;
    Ok(TerrainParams::from_config(&cfg))
}

pub fn load_params_from_path(path: &Path) -> Result<TerrainParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    parse_params(&s)
}
