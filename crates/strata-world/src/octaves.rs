//! Octave accumulation strategies.
//!
//! Every strategy sums per-octave noise weighted by a geometric amplitude
//! series, normalizes by the amplitude total, and scales by
//! `NoiseConfig::height_scale`. They differ only in what a single octave samples.

use crate::falloff::sigmoid;
use crate::noise::NoiseSampler;
use crate::params::NoiseConfig;

/// Turns a world-space column position into a height in world units.
pub trait OctaveStrategy: Send + Sync {
    fn accumulate(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32;
}

/// Sample-space position of one octave. The seed rides on the Y axis.
#[inline]
fn octave_point(
    cfg: &NoiseConfig,
    world_x: f32,
    world_z: f32,
    seed: f32,
    freq: f32,
) -> (f32, f32, f32) {
    let sx = (world_x / cfg.scale) * freq;
    let sz = (world_z / cfg.scale) * freq;
    let sy = seed * 0.5 * freq;
    (sx, sy, sz)
}

/// Runs the amplitude series over `octave`, which returns the raw value of octave `o`.
#[inline]
fn sum_octaves(cfg: &NoiseConfig, mut octave: impl FnMut(u32, f32) -> f32) -> f32 {
    let mut height_value = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut max_value = 0.0f32;
    for o in 0..cfg.octave_count {
        let freq = cfg.octave_frequency(o);
        height_value += octave(o, freq) * amplitude;
        max_value += amplitude;
        amplitude *= cfg.persistence;
    }
    let normalized = if max_value > 0.0 {
        height_value / max_value
    } else {
        0.0
    };
    normalized * cfg.height_scale
}

/// Fractal Brownian motion over a single noise field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fbm;

impl OctaveStrategy for Fbm {
    fn accumulate(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32 {
        sum_octaves(cfg, |_, freq| {
            let (sx, sy, sz) = octave_point(cfg, world_x, world_z, seed, freq);
            sampler.sample3(sx, sy, sz)
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionParams {
    /// Sample-space shift of the target field on X and Z.
    pub target_offset: f32,
    /// Sample-space shift of the speed field on X and Z.
    pub speed_offset: f32,
    /// Frequency of the speed field relative to `world / scale`.
    pub speed_frequency: f32,
    /// Slope of the progress ramp along `x + z`.
    pub progress_rate: f32,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            target_offset: 1000.0,
            speed_offset: 2000.0,
            speed_frequency: 0.5,
            progress_rate: 1.0,
        }
    }
}

/// Blends two decorrelated noise fields ("base" and "target") with a sigmoid
/// mix whose steepness is driven by a third, slowly varying "speed" field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionBlend {
    pub params: TransitionParams,
}

impl TransitionBlend {
    pub fn new(params: TransitionParams) -> Self {
        Self { params }
    }

    /// Local transition speed in `[0, 1]`.
    fn speed(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32 {
        let p = &self.params;
        let (sx, sy, sz) = octave_point(cfg, world_x, world_z, seed, p.speed_frequency);
        let raw = sampler.sample3(sx + p.speed_offset, sy, sz + p.speed_offset);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Mix factor toward the target field at a world position.
    pub fn mix_factor(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32 {
        let progress = (world_x + world_z) / cfg.scale * self.params.progress_rate;
        let speed = self.speed(sampler, cfg, world_x, world_z, seed);
        sigmoid(progress * speed)
    }
}

impl OctaveStrategy for TransitionBlend {
    fn accumulate(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32 {
        if cfg.octave_count == 0 {
            return 0.0;
        }
        let mix = self.mix_factor(sampler, cfg, world_x, world_z, seed);
        let off = self.params.target_offset;
        sum_octaves(cfg, |_, freq| {
            let (sx, sy, sz) = octave_point(cfg, world_x, world_z, seed, freq);
            let base = sampler.sample3(sx, sy, sz);
            let target = sampler.sample3(sx + off, sy, sz + off);
            base * (1.0 - mix) + target * mix
        })
    }
}

/// Accumulation policy selected per generation request.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Accumulation {
    #[default]
    Fbm,
    Transition(TransitionParams),
}

impl Accumulation {
    pub fn name(&self) -> &'static str {
        match self {
            Accumulation::Fbm => "fbm",
            Accumulation::Transition(_) => "transition",
        }
    }
}

impl OctaveStrategy for Accumulation {
    #[inline]
    fn accumulate(
        &self,
        sampler: &dyn NoiseSampler,
        cfg: &NoiseConfig,
        world_x: f32,
        world_z: f32,
        seed: f32,
    ) -> f32 {
        match self {
            Accumulation::Fbm => Fbm.accumulate(sampler, cfg, world_x, world_z, seed),
            Accumulation::Transition(params) => {
                TransitionBlend::new(*params).accumulate(sampler, cfg, world_x, world_z, seed)
            }
        }
    }
}
