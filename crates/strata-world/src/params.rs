/// Octave noise parameters, copied by value into every generation call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseConfig {
    pub octave_count: u32,
    /// Per-octave amplitude decay, expected in `[0, 1]`.
    pub persistence: f32,
    pub base_frequency: f32,
    /// Per-octave frequency growth.
    pub lacunarity: f32,
    pub height_scale: f32,
    /// World units per noise unit; must be positive.
    pub scale: f32,
    /// Position on the noise field's seed axis.
    pub seed: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octave_count: 4,
            persistence: 0.5,
            base_frequency: 2.0,
            lacunarity: 2.0,
            height_scale: 10.0,
            scale: 50.0,
            seed: 10.0,
        }
    }
}

impl NoiseConfig {
    /// Frequency of octave `o`: `base_frequency * lacunarity^o`.
    #[inline]
    pub fn octave_frequency(&self, o: u32) -> f32 {
        self.base_frequency * self.lacunarity.powi(o as i32)
    }
}

/// Rectangular sample domain in grid cells and its placement in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub x_offset: f32,
    pub z_offset: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

impl GridSpec {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            x_offset: 0.0,
            z_offset: 0.0,
        }
    }

    #[inline]
    pub fn with_offset(self, x_offset: f32, z_offset: f32) -> Self {
        Self {
            x_offset,
            z_offset,
            ..self
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of quads (two triangles each) the grid triangulates into.
    #[inline]
    pub fn quad_count(&self) -> usize {
        self.width.saturating_sub(1) * self.height.saturating_sub(1)
    }

    /// Row-major flat index of cell `(x, z)`.
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    /// World X of column `x`; the grid is centered on the origin before offsetting.
    #[inline]
    pub fn world_x(&self, x: usize) -> f32 {
        (x as f32 + self.x_offset) - self.width as f32 / 2.0
    }

    /// World Z of row `z`.
    #[inline]
    pub fn world_z(&self, z: usize) -> f32 {
        (z as f32 + self.z_offset) - self.height as f32 / 2.0
    }
}
