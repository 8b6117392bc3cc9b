use strata_world::Heightfield;

use crate::constants::{INDICES_PER_QUAD, VERTEX_STRIDE};
use crate::terrain_mesh::TerrainMesh;

/// Index pattern of the quad whose top-left corner is cell `(x, z)`.
///
/// Triangles are `(top_left, bottom_left, top_right)` and
/// `(top_right, bottom_left, bottom_right)`; with +Z running "down" the grid
/// this winds counter-clockwise seen from +Y.
#[inline]
pub fn quad_indices(width: usize, x: usize, z: usize) -> [u32; INDICES_PER_QUAD] {
    let top_left = (z * width + x) as u32;
    let top_right = top_left + 1;
    let bottom_left = ((z + 1) * width + x) as u32;
    let bottom_right = bottom_left + 1;
    [
        top_left,
        bottom_left,
        top_right,
        top_right,
        bottom_left,
        bottom_right,
    ]
}

/// Converts a heightfield into a triangle mesh.
///
/// Vertex positions reuse the world X/Z the heights were sampled at.
pub fn triangulate(field: &Heightfield) -> TerrainMesh {
    let (w, h) = (field.width(), field.height());
    if field.is_empty() {
        return TerrainMesh {
            width: w,
            height: h,
            ..TerrainMesh::default()
        };
    }
    debug_assert!(
        w.checked_mul(h).is_some_and(|n| n <= u32::MAX as usize + 1),
        "grid too large for u32 indices"
    );

    let heights = field.heights();
    let mut vertices = Vec::with_capacity(w * h * VERTEX_STRIDE);
    for z in 0..h {
        let wz = field.world_z(z);
        for x in 0..w {
            vertices.extend_from_slice(&[field.world_x(x), heights[z * w + x], wz]);
        }
    }

    let quads = field.grid().quad_count();
    let mut indices = Vec::with_capacity(quads * INDICES_PER_QUAD);
    for z in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
            indices.extend_from_slice(&quad_indices(w, x, z));
        }
    }

    TerrainMesh {
        width: w,
        height: h,
        vertices,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::GridSpec;

    #[test]
    fn single_quad_layout() {
        let field = Heightfield::from_heights(GridSpec::new(2, 2), vec![0.0, 1.0, 2.0, 3.0]);
        let mesh = triangulate(&field);
        assert_eq!(mesh.indices(), &[0, 2, 1, 1, 2, 3]);
        assert_eq!(
            mesh.vertices(),
            &[-1.0, 0.0, -1.0, 0.0, 1.0, -1.0, -1.0, 2.0, 0.0, 0.0, 3.0, 0.0]
        );
    }

    #[test]
    fn thin_grids_have_vertices_but_no_triangles() {
        let row = triangulate(&Heightfield::flat(GridSpec::new(5, 1)));
        assert_eq!(row.vertex_count(), 5);
        assert_eq!(row.triangle_count(), 0);
        let col = triangulate(&Heightfield::flat(GridSpec::new(1, 4)));
        assert_eq!(col.vertex_count(), 4);
        assert!(col.indices().is_empty());
    }

    #[test]
    fn empty_grid_is_empty_mesh() {
        let mesh = triangulate(&Heightfield::flat(GridSpec::new(0, 9)));
        assert!(mesh.is_empty());
        assert!(mesh.indices().is_empty());
        assert_eq!(mesh.dims(), (0, 9));
    }

    #[test]
    fn flat_field_normals_point_up() {
        let mesh = triangulate(&Heightfield::flat(GridSpec::new(4, 3)));
        let normals = mesh.vertex_normals();
        assert_eq!(normals.len(), 12 * 3);
        for n in normals.chunks_exact(3) {
            assert_eq!(n, &[0.0, 1.0, 0.0]);
        }
    }
}
