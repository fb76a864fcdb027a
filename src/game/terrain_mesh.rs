//! Terrain Mesh Builder
//!
//! Turns the heightfield into a textured triangle mesh, one quad per grid
//! step. Each quad picks a tile from a 16x16 texture atlas by its highest
//! corner, so peaks read as snow and valleys as grass.
//!
//! The quad split follows the `(0,0)-(1,1)` diagonal, matching
//! [`Heightfield::normal_at`], so lighting and collision see the same
//! surface.

use glam::{Vec2, Vec3};

use crate::render::{Mesh, Vertex};
use crate::world::{FlattenRect, Heightfield};

/// Tiles per atlas row and column.
pub const ATLAS_TILES: u32 = 16;

/// Grid rectangle flattened under the maze.
pub const PAD: FlattenRect = FlattenRect::new(25, 25, 50, 50);

/// Sample value stamped into the pad.
pub const PAD_HEIGHT: u8 = 100;

/// Surface material, chosen from the normalized height of a quad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerrainBand {
    Grass,
    Soil,
    Rock,
    Ice,
    Snow,
}

impl TerrainBand {
    /// Band for a height in `0.0..=1.0`. Thresholds are exclusive.
    pub fn from_height(height: f32) -> Self {
        if height > 0.9 {
            TerrainBand::Snow
        } else if height > 0.8 {
            TerrainBand::Ice
        } else if height > 0.5 {
            TerrainBand::Rock
        } else if height > 0.3 {
            TerrainBand::Soil
        } else {
            TerrainBand::Grass
        }
    }

    /// (column, row) of the band's tile in the atlas.
    pub fn atlas_tile(self) -> (u32, u32) {
        match self {
            TerrainBand::Snow => (2, 4),
            TerrainBand::Ice => (3, 4),
            TerrainBand::Rock => (6, 0),
            TerrainBand::Soil => (3, 1),
            TerrainBand::Grass => (0, 0),
        }
    }

    /// Texture coordinate of the tile's top-left corner.
    pub fn uv_origin(self) -> Vec2 {
        let (col, row) = self.atlas_tile();
        Vec2::new(col as f32, row as f32) / ATLAS_TILES as f32
    }
}

// ============================================================================
// Mesh Generation
// ============================================================================

/// Stamp the pad into `heightfield`, then mesh the result.
///
/// The flatten is permanent: collision queries made afterwards see the pad.
pub fn build_terrain_mesh(heightfield: &mut Heightfield, step: usize, pad: FlattenRect, pad_height: u8) -> Mesh {
    heightfield.flatten(pad, pad_height);
    heightfield_mesh(heightfield, step)
}

/// Mesh the heightfield as is, four vertices and six indices per quad.
///
/// Quads start every `step` samples and stop before the last row and column
/// so every corner is on the grid.
pub fn heightfield_mesh(heightfield: &Heightfield, step: usize) -> Mesh {
    let step = step.max(1);
    let x_end = heightfield.width().saturating_sub(step);
    let z_end = heightfield.depth().saturating_sub(step);

    let quads = x_end.div_ceil(step) * z_end.div_ceil(step);
    let mut mesh = Mesh::new(Vec::with_capacity(quads * 4), Vec::with_capacity(quads * 6));

    let tile = 1.0 / ATLAS_TILES as f32;
    let corner = |x: usize, z: usize| {
        Vec3::new(x as f32, f32::from(heightfield.sample(x, z)), z as f32)
    };

    for x in (0..x_end).step_by(step) {
        for z in (0..z_end).step_by(step) {
            let p0 = corner(x, z);
            let p1 = corner(x + step, z);
            let p2 = corner(x + step, z + step);
            let p3 = corner(x, z + step);

            let max_h = p0.y.max(p1.y).max(p2.y).max(p3.y) / 255.0;
            let tc0 = TerrainBand::from_height(max_h).uv_origin();
            let tc1 = tc0 + Vec2::new(tile, 0.0);
            let tc2 = tc0 + Vec2::new(tile, tile);
            let tc3 = tc0 + Vec2::new(0.0, tile);

            // Both cross products point up for any height values
            let n1 = (p2 - p0).cross(p1 - p0).normalize();
            let n2 = (p3 - p0).cross(p2 - p0).normalize();
            let shared = (n1 + n2).normalize();

            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend([
                Vertex::new(p0.to_array(), shared.to_array(), tc0.to_array()),
                Vertex::new(p1.to_array(), n1.to_array(), tc1.to_array()),
                Vertex::new(p2.to_array(), shared.to_array(), tc2.to_array()),
                Vertex::new(p3.to_array(), n2.to_array(), tc3.to_array()),
            ]);
            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    mesh
}
