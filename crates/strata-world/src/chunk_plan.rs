use serde::{Deserialize, Serialize};

use crate::params::GridSpec;

/// Position of a chunk in the tiling layout, in chunk units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

/// `cols x rows` arrangement of equally sized chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    pub cols: usize,
    pub rows: usize,
}

/// Everything needed to generate one chunk independently of its neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkPlan {
    pub index: usize,
    pub coord: ChunkCoord,
    pub grid: GridSpec,
}

impl ChunkLayout {
    #[inline]
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    #[inline]
    pub const fn square(grid_size: usize) -> Self {
        Self::new(grid_size, grid_size)
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Grid coordinates of chunk `index`, filling rows first.
    #[inline]
    pub fn coord_of(&self, index: usize) -> Option<ChunkCoord> {
        if index >= self.chunk_count() {
            return None;
        }
        Some(ChunkCoord::new(
            (index % self.cols) as i32,
            (index / self.cols) as i32,
        ))
    }

    #[inline]
    pub fn index_of(&self, coord: ChunkCoord) -> Option<usize> {
        if coord.cx < 0 || coord.cz < 0 {
            return None;
        }
        let (cx, cz) = (coord.cx as usize, coord.cz as usize);
        if cx >= self.cols || cz >= self.rows {
            return None;
        }
        Some(cz * self.cols + cx)
    }

    /// Places chunk `index` of the layout.
    ///
    /// Each chunk advances `width - 1` columns and `height - 1` rows, so
    /// neighbors repeat each other's edge samples rather than leaving a gap.
    /// Offsets are added to the template's own offsets.
    pub fn plan_chunk(&self, index: usize, chunk: &GridSpec) -> Option<ChunkPlan> {
        let coord = self.coord_of(index)?;
        Some(ChunkPlan {
            index,
            coord,
            grid: Self::chunk_grid(coord, chunk),
        })
    }

    /// Grid of the chunk at `coord`, whether or not it lies inside the layout.
    pub fn chunk_grid(coord: ChunkCoord, chunk: &GridSpec) -> GridSpec {
        let step_x = chunk.width.saturating_sub(1) as f32;
        let step_z = chunk.height.saturating_sub(1) as f32;
        chunk.with_offset(
            chunk.x_offset + coord.cx as f32 * step_x,
            chunk.z_offset + coord.cz as f32 * step_z,
        )
    }

    pub fn plan(&self, chunk: &GridSpec) -> Vec<ChunkPlan> {
        (0..self.chunk_count())
            .filter_map(|i| self.plan_chunk(i, chunk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_fill_rows_first() {
        let l = ChunkLayout::new(3, 2);
        assert_eq!(l.coord_of(0), Some(ChunkCoord::new(0, 0)));
        assert_eq!(l.coord_of(2), Some(ChunkCoord::new(2, 0)));
        assert_eq!(l.coord_of(4), Some(ChunkCoord::new(1, 1)));
        assert_eq!(l.coord_of(6), None);
        for i in 0..l.chunk_count() {
            assert_eq!(l.index_of(l.coord_of(i).unwrap()), Some(i));
        }
        assert_eq!(l.index_of(ChunkCoord::new(-1, 0)), None);
    }

    #[test]
    fn offsets_step_by_width_minus_one() {
        let plans = ChunkLayout::square(2).plan(&GridSpec::new(5, 9));
        let offsets: Vec<(f32, f32)> = plans
            .iter()
            .map(|p| (p.grid.x_offset, p.grid.z_offset))
            .collect();
        assert_eq!(offsets, vec![(0.0, 0.0), (4.0, 0.0), (0.0, 8.0), (4.0, 8.0)]);
        assert!(plans.iter().all(|p| p.grid.width == 5 && p.grid.height == 9));
    }

    #[test]
    fn empty_layout_plans_nothing() {
        assert!(ChunkLayout::new(0, 4).plan(&GridSpec::new(8, 8)).is_empty());
        assert!(ChunkLayout::square(0).plan_chunk(0, &GridSpec::new(8, 8)).is_none());
    }

    #[test]
    fn template_offsets_are_kept() {
        let base = GridSpec::new(3, 3).with_offset(10.0, -5.0);
        let plan = ChunkLayout::square(2).plan_chunk(3, &base).unwrap();
        assert_eq!(plan.grid.x_offset, 12.0);
        assert_eq!(plan.grid.z_offset, -3.0);
    }
}
