/// Logistic curve, `1 / (1 + e^-t)`.
#[inline]
pub fn sigmoid(t: f32) -> f32 {
    1.0 / (1.0 + (-t).exp())
}

/// Edge attenuation for cell `(x, z)` of a `width x height` grid.
///
/// The normalized distance to the nearest edge is fed through [`sigmoid`], so
/// boundary cells get exactly 0.5 and the factor rises toward the interior.
/// Cells outside the grid are treated as boundary cells.
#[inline]
pub fn falloff_factor(x: usize, z: usize, width: usize, height: usize) -> f32 {
    let edge_x = x.min(width.saturating_sub(1).saturating_sub(x)) as f32 / (width as f32 / 2.0);
    let edge_z = z.min(height.saturating_sub(1).saturating_sub(z)) as f32 / (height as f32 / 2.0);
    let edge = edge_x.min(edge_z);
    sigmoid(edge)
}
