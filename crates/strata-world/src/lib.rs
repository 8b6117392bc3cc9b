//! Terrain sampling: noise, octave accumulation, falloff, heightfields and chunk layout.
#![forbid(unsafe_code)]

pub mod chunk_plan;
pub mod falloff;
pub mod heightfield;
pub mod noise;
pub mod octaves;
pub mod params;
pub mod worldgen;

pub use chunk_plan::{ChunkCoord, ChunkLayout, ChunkPlan};
pub use falloff::{falloff_factor, sigmoid};
pub use heightfield::{Heightfield, HeightfieldBuilder};
pub use noise::{NoiseSampler, PerlinSampler};
pub use octaves::{Accumulation, Fbm, OctaveStrategy, TransitionBlend, TransitionParams};
pub use params::{GridSpec, NoiseConfig};
pub use worldgen::{TerrainConfig, TerrainParams, load_params_from_path, parse_params};
