use std::sync::Arc;

use hashbrown::HashMap;
use strata_mesh_cpu::TerrainMesh;
use strata_world::{ChunkCoord, ChunkLayout};

use crate::JobOut;

#[derive(Clone, Debug)]
pub struct ChunkMeshEntry {
    pub rev: u64,
    pub mesh: Arc<TerrainMesh>,
}

/// Host-side table of the newest mesh per chunk.
///
/// Meshes hold no GPU handles; a renderer keys its own resources by the same
/// `ChunkCoord` and re-uploads when the stored revision changes.
#[derive(Default)]
pub struct ChunkMeshes {
    entries: HashMap<ChunkCoord, ChunkMeshEntry>,
    stale_dropped: u64,
}

impl ChunkMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a worker result if it is newer than what the chunk already has.
    /// Returns whether the result was kept.
    pub fn accept(&mut self, out: JobOut) -> bool {
        match self.entries.get(&out.coord) {
            Some(cur) if cur.rev >= out.rev => {
                self.stale_dropped += 1;
                log::debug!(
                    target: "runtime",
                    "drop stale mesh for {:?}: rev {} <= {}",
                    out.coord,
                    out.rev,
                    cur.rev
                );
                false
            }
            _ => {
                self.entries.insert(
                    out.coord,
                    ChunkMeshEntry {
                        rev: out.rev,
                        mesh: Arc::new(out.mesh),
                    },
                );
                true
            }
        }
    }

    /// Accepts every result, returning how many were kept.
    pub fn accept_all(&mut self, outs: impl IntoIterator<Item = JobOut>) -> usize {
        outs.into_iter()
            .fold(0, |n, o| n + usize::from(self.accept(o)))
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkMeshEntry> {
        self.entries.get(&coord)
    }

    #[inline]
    pub fn mesh(&self, coord: ChunkCoord) -> Option<Arc<TerrainMesh>> {
        self.entries.get(&coord).map(|e| Arc::clone(&e.mesh))
    }

    #[inline]
    pub fn rev_of(&self, coord: ChunkCoord) -> Option<u64> {
        self.entries.get(&coord).map(|e| e.rev)
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<ChunkMeshEntry> {
        self.entries.remove(&coord)
    }

    /// Drops chunks that fall outside `layout`, e.g. after the tiling shrank.
    pub fn retain_layout(&mut self, layout: &ChunkLayout) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|coord, _| layout.index_of(*coord).is_some());
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &ChunkMeshEntry)> {
        self.entries.iter()
    }

    /// Results rejected by `accept` since creation.
    #[inline]
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Vertex and triangle totals across all stored chunks.
    pub fn totals(&self) -> (usize, usize) {
        self.entries.values().fold((0, 0), |(v, t), e| {
            (v + e.mesh.vertex_count(), t + e.mesh.triangle_count())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(cx: i32, cz: i32, rev: u64) -> JobOut {
        JobOut {
            coord: ChunkCoord::new(cx, cz),
            rev,
            mesh: TerrainMesh::default(),
            t_gen_ms: 0,
            t_mesh_ms: 0,
            t_total_ms: 0,
        }
    }

    #[test]
    fn newer_revisions_replace_older() {
        let mut table = ChunkMeshes::new();
        assert!(table.accept(out(0, 0, 1)));
        assert!(table.accept(out(0, 0, 3)));
        assert_eq!(table.rev_of(ChunkCoord::new(0, 0)), Some(3));
        assert!(!table.accept(out(0, 0, 2)));
        assert!(!table.accept(out(0, 0, 3)));
        assert_eq!(table.rev_of(ChunkCoord::new(0, 0)), Some(3));
        assert_eq!(table.stale_dropped(), 2);
    }

    #[test]
    fn chunks_are_independent() {
        let mut table = ChunkMeshes::new();
        assert_eq!(table.accept_all([out(0, 0, 5), out(1, 0, 1), out(0, 0, 4)]), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rev_of(ChunkCoord::new(1, 0)), Some(1));
        assert!(table.mesh(ChunkCoord::new(2, 2)).is_none());
    }

    #[test]
    fn retain_layout_drops_outside_chunks() {
        let mut table = ChunkMeshes::new();
        for cz in 0..3 {
            for cx in 0..3 {
                table.accept(out(cx, cz, 1));
            }
        }
        assert_eq!(table.retain_layout(&ChunkLayout::square(2)), 5);
        assert_eq!(table.len(), 4);
        assert!(table.get(ChunkCoord::new(1, 1)).is_some());
        assert!(table.get(ChunkCoord::new(2, 0)).is_none());
    }
}
