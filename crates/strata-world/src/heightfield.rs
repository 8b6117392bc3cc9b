use crate::falloff::falloff_factor;
use crate::noise::NoiseSampler;
use crate::octaves::OctaveStrategy;
use crate::params::{GridSpec, NoiseConfig};

/// Row-major grid of heights plus the world X/Z each column and row was sampled at.
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    grid: GridSpec,
    world_x: Vec<f32>,
    world_z: Vec<f32>,
    heights: Vec<f32>,
}

impl Heightfield {
    /// Wraps precomputed row-major heights. `heights` must hold exactly
    /// `width * height` samples.
    pub fn from_heights(grid: GridSpec, heights: Vec<f32>) -> Self {
        debug_assert_eq!(
            heights.len(),
            grid.cell_count(),
            "height buffer does not match a {}x{} grid",
            grid.width,
            grid.height
        );
        Self {
            grid,
            world_x: Self::columns(&grid),
            world_z: Self::rows(&grid),
            heights,
        }
    }

    /// A field of zero heights.
    pub fn flat(grid: GridSpec) -> Self {
        Self::from_heights(grid, vec![0.0; grid.cell_count()])
    }

    // Axis positions are kept even when the other dimension is 0.
    fn columns(grid: &GridSpec) -> Vec<f32> {
        (0..grid.width).map(|x| grid.world_x(x)).collect()
    }

    fn rows(grid: &GridSpec) -> Vec<f32> {
        (0..grid.height).map(|z| grid.world_z(z)).collect()
    }

    #[inline]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    pub fn into_heights(self) -> Vec<f32> {
        self.heights
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Option<f32> {
        if x >= self.grid.width || z >= self.grid.height {
            return None;
        }
        self.heights.get(self.grid.index(x, z)).copied()
    }

    /// World X used when sampling column `x`.
    #[inline]
    pub fn world_x(&self, x: usize) -> f32 {
        self.world_x[x]
    }

    /// World Z used when sampling row `z`.
    #[inline]
    pub fn world_z(&self, z: usize) -> f32 {
        self.world_z[z]
    }

    /// Lowest and highest sample, or `None` for an empty field.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        let mut it = self.heights.iter().copied();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), h| (lo.min(h), hi.max(h))))
    }
}

/// Samples heightfields from a noise primitive and an accumulation strategy.
///
/// The builder only borrows its collaborators and keeps no state between
/// calls, so it can be rebuilt or reused freely.
pub struct HeightfieldBuilder<'a> {
    sampler: &'a dyn NoiseSampler,
    strategy: &'a dyn OctaveStrategy,
}

impl<'a> HeightfieldBuilder<'a> {
    pub fn new(sampler: &'a dyn NoiseSampler, strategy: &'a dyn OctaveStrategy) -> Self {
        Self { sampler, strategy }
    }

    /// Height of one cell, before any caller-side adjustments.
    #[inline]
    pub fn height_at(
        &self,
        grid: &GridSpec,
        cfg: &NoiseConfig,
        seed: f32,
        apply_falloff: bool,
        x: usize,
        z: usize,
    ) -> f32 {
        let h = self
            .strategy
            .accumulate(self.sampler, cfg, grid.world_x(x), grid.world_z(z), seed);
        if apply_falloff {
            h * falloff_factor(x, z, grid.width, grid.height)
        } else {
            h
        }
    }

    pub fn build(
        &self,
        grid: &GridSpec,
        cfg: &NoiseConfig,
        seed: f32,
        apply_falloff: bool,
    ) -> Heightfield {
        let mut heights = Vec::with_capacity(grid.cell_count());
        for z in 0..grid.height {
            for x in 0..grid.width {
                heights.push(self.height_at(grid, cfg, seed, apply_falloff, x, z));
            }
        }
        Heightfield::from_heights(*grid, heights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::PerlinSampler;
    use crate::octaves::Fbm;

    #[test]
    fn build_matches_height_at() {
        let s = PerlinSampler::default();
        let b = HeightfieldBuilder::new(&s, &Fbm);
        let grid = GridSpec::new(7, 5).with_offset(3.0, -2.0);
        let cfg = NoiseConfig::default();
        for falloff in [false, true] {
            let hf = b.build(&grid, &cfg, 1.5, falloff);
            assert_eq!(hf.heights().len(), 35);
            for z in 0..5 {
                for x in 0..7 {
                    assert_eq!(hf.get(x, z), Some(b.height_at(&grid, &cfg, 1.5, falloff, x, z)));
                }
            }
        }
    }

    #[test]
    fn empty_grids_give_empty_fields() {
        let s = PerlinSampler::default();
        let b = HeightfieldBuilder::new(&s, &Fbm);
        let cfg = NoiseConfig::default();
        for grid in [GridSpec::new(0, 0), GridSpec::new(0, 12), GridSpec::new(12, 0)] {
            let hf = b.build(&grid, &cfg, 0.0, true);
            assert!(hf.is_empty());
            assert_eq!(hf.height_range(), None);
        }
    }

    #[test]
    fn from_heights_keeps_samples() {
        let heights = vec![1.0, 2.0, 0.0, 0.0, -1.0, 0.0];
        let hf = Heightfield::from_heights(GridSpec::new(3, 2), heights);
        assert_eq!(hf.get(1, 0), Some(2.0));
        assert_eq!(hf.get(1, 1), Some(-1.0));
        assert_eq!(hf.world_x(2), 0.5);
        assert_eq!(hf.world_z(0), -1.0);
        assert_eq!(hf.get(3, 0), None);
        assert_eq!(hf.height_range(), Some((-1.0, 2.0)));
    }

    #[test]
    #[should_panic(expected = "height buffer does not match")]
    #[cfg(debug_assertions)]
    fn from_heights_rejects_short_buffers() {
        let _ = Heightfield::from_heights(GridSpec::new(3, 2), vec![1.0, 2.0]);
    }

    #[test]
    fn degenerate_grids_keep_axis_positions() {
        let s = PerlinSampler::default();
        let b = HeightfieldBuilder::new(&s, &Fbm);
        let cfg = NoiseConfig::default();

        let column = b.build(&GridSpec::new(0, 3), &cfg, 0.0, false);
        assert!(column.is_empty());
        assert_eq!(column.world_z(0), -1.5);
        assert_eq!(column.world_z(2), 0.5);

        let row = b.build(&GridSpec::new(4, 0).with_offset(1.0, 0.0), &cfg, 0.0, true);
        assert!(row.is_empty());
        assert_eq!(row.world_x(0), -1.0);
        assert_eq!(row.world_x(3), 2.0);
    }

    #[test]
    fn flat_field_is_all_zero() {
        let hf = Heightfield::flat(GridSpec::new(4, 2));
        assert_eq!(hf.heights(), &[0.0; 8]);
        assert_eq!(hf.height_range(), Some((0.0, 0.0)));
    }
}
