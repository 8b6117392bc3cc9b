use std::fmt;

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// A coherent 3D noise primitive.
///
/// Implementations must be pure: equal inputs always give equal outputs, and
/// results stay within `[-1, 1]`. Callers use `y` as a seed/time axis rather
/// than vertical space.
pub trait NoiseSampler: Send + Sync {
    fn sample3(&self, x: f32, y: f32, z: f32) -> f32;
}

impl<F> NoiseSampler for F
where
    F: Fn(f32, f32, f32) -> f32 + Send + Sync,
{
    #[inline]
    fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        self(x, y, z)
    }
}

/// Gradient (Perlin) noise evaluated at raw sample coordinates.
pub struct PerlinSampler {
    noise: FastNoiseLite,
    lattice_seed: i32,
}

impl PerlinSampler {
    pub const DEFAULT_LATTICE_SEED: i32 = 1337;

    pub fn new(lattice_seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(lattice_seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        // Octave frequencies are applied by the accumulator, not the primitive.
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            lattice_seed,
        }
    }

    #[inline]
    pub fn lattice_seed(&self) -> i32 {
        self.lattice_seed
    }
}

impl Default for PerlinSampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATTICE_SEED)
    }
}

impl fmt::Debug for PerlinSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerlinSampler")
            .field("lattice_seed", &self.lattice_seed)
            .finish()
    }
}

impl NoiseSampler for PerlinSampler {
    #[inline]
    fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.get_noise_3d(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_is_deterministic() {
        let a = PerlinSampler::new(7);
        let b = PerlinSampler::new(7);
        for i in 0..64 {
            let t = i as f32 * 0.173;
            assert_eq!(a.sample3(t, -t * 0.5, t * 2.0), b.sample3(t, -t * 0.5, t * 2.0));
        }
    }

    #[test]
    fn perlin_stays_in_unit_range() {
        let s = PerlinSampler::default();
        for i in -50..50 {
            for j in -5..5 {
                let v = s.sample3(i as f32 * 0.37, j as f32 * 1.1, i as f32 * -0.21 + 3.0);
                assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
            }
        }
    }

    #[test]
    fn perlin_varies_across_space() {
        let s = PerlinSampler::default();
        let first = s.sample3(0.31, 0.5, 0.77);
        let varied = (1..32).any(|i| s.sample3(0.31 + i as f32 * 0.41, 0.5, 0.77) != first);
        assert!(varied);
    }

    #[test]
    fn closures_are_samplers() {
        let flat = |_: f32, _: f32, _: f32| 0.25;
        assert_eq!(flat.sample3(1.0, 2.0, 3.0), 0.25);
    }
}
