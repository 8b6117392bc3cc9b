use strata_geom::{Aabb, Vec3};

use crate::constants::{INDICES_PER_TRIANGLE, VERTEX_STRIDE};

/// Finished heightfield mesh handed to the renderer.
///
/// Plain data with no GPU handles: a flat position buffer (three floats per
/// vertex, row-major over the source grid) and a triangle list index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) vertices: Vec<f32>,
    pub(crate) indices: Vec<u32>,
}

/// Summary numbers for logging and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub bounds: Aabb,
}

impl TerrainMesh {
    /// Grid dimensions the mesh was built from.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / INDICES_PER_TRIANGLE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Option<Vec3> {
        Vec3::from_flat(&self.vertices, i)
    }

    /// Vertex at grid cell `(x, z)`.
    #[inline]
    pub fn vertex_at(&self, x: usize, z: usize) -> Option<Vec3> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.vertex(z * self.width + x)
    }

    #[inline]
    pub fn triangle(&self, t: usize) -> Option<[u32; 3]> {
        let base = t.checked_mul(INDICES_PER_TRIANGLE)?;
        let tri = self.indices.get(base..base + INDICES_PER_TRIANGLE)?;
        Some([tri[0], tri[1], tri[2]])
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_flat(&self.vertices)
    }

    /// Area-weighted smooth normals, three floats per vertex.
    ///
    /// Face normals follow the index winding, so terrain faces point up (+Y).
    /// Vertices touched by no triangle get `Vec3::UP`.
    pub fn vertex_normals(&self) -> Vec<f32> {
        let mut acc = vec![Vec3::ZERO; self.vertex_count()];
        for tri in self.indices.chunks_exact(INDICES_PER_TRIANGLE) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(pa), Some(pb), Some(pc)) = (self.vertex(a), self.vertex(b), self.vertex(c))
            else {
                continue;
            };
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        let mut out = Vec::with_capacity(acc.len() * VERTEX_STRIDE);
        for n in acc {
            let n = if n.length() > 0.0 { n.normalized() } else { Vec3::UP };
            out.extend_from_slice(&n.to_array());
        }
        out
    }

    pub fn stats(&self) -> MeshStats {
        let bounds = self.bounds();
        let (min_height, max_height) = if bounds.is_empty() {
            (0.0, 0.0)
        } else {
            (bounds.min.y, bounds.max.y)
        };
        MeshStats {
            vertex_count: self.vertex_count(),
            triangle_count: self.triangle_count(),
            min_height,
            max_height,
            bounds,
        }
    }

    /// Moves the buffers out, e.g. for upload.
    pub fn into_buffers(self) -> (Vec<f32>, Vec<u32>) {
        (self.vertices, self.indices)
    }
}
