//! Heightfield Module
//!
//! An 8-bit elevation grid with bilinear height and faceted normal sampling.
//!
//! ## Coordinates
//! - Sample `(x, z)` sits at world position `(x, value, z)`, unit spacing
//! - Heights are the raw sample values (0..=255 world units)
//! - Each grid quad is split along its `(0,0)-(1,1)` diagonal, the same split
//!   the terrain mesh uses, so collision and lighting agree with what is drawn

use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;

/// Anything the player can stand on.
pub trait GroundSampler {
    /// Interpolated ground height at world `(x, z)`.
    fn height_at(&self, x: f32, z: f32) -> f32;
    /// Upward-facing unit surface normal at world `(x, z)`.
    fn normal_at(&self, x: f32, z: f32) -> Vec3;
}

/// Axis-aligned rectangle of grid cells, `x..x+width` by `z..z+depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlattenRect {
    pub x: u32,
    pub z: u32,
    pub width: u32,
    pub depth: u32,
}

impl FlattenRect {
    pub const fn new(x: u32, z: u32, width: u32, depth: u32) -> Self {
        Self { x, z, width, depth }
    }

    /// Center of the rectangle on the XZ plane.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.z as f32 + self.depth as f32 / 2.0,
        )
    }
}

/// Grid of 8-bit elevation samples stored row-major (`z * width + x`).
#[derive(Clone, Debug, PartialEq)]
pub struct Heightfield {
    width: usize,
    depth: usize,
    samples: Vec<u8>,
}

impl Heightfield {
    /// Create a heightfield from raw samples.
    ///
    /// # Panics
    /// Panics if `samples.len() != width * depth`.
    pub fn new(width: usize, depth: usize, samples: Vec<u8>) -> Self {
        assert_eq!(
            samples.len(),
            width * depth,
            "heightfield expects {}x{} samples",
            width,
            depth
        );
        Self {
            width,
            depth,
            samples,
        }
    }

    /// Create a heightfield where every sample has the same value.
    pub fn filled(width: usize, depth: usize, value: u8) -> Self {
        Self::new(width, depth, vec![value; width * depth])
    }

    /// Decode a heightmap image as 8-bit grayscale.
    pub fn from_image(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| AssetError::image(path, e))?
            .to_luma8();
        let (width, depth) = image.dimensions();
        Ok(Self::new(width as usize, depth as usize, image.into_raw()))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Read the sample at integer coordinates, clamped to the grid.
    ///
    /// An empty field reads as `0` everywhere.
    pub fn sample(&self, x: usize, z: usize) -> u8 {
        let x = x.min(self.width.saturating_sub(1));
        let z = z.min(self.depth.saturating_sub(1));
        self.samples.get(z * self.width + x).copied().unwrap_or(0)
    }

    /// Smallest and largest sample values.
    pub fn min_max(&self) -> (u8, u8) {
        self.samples
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)))
    }

    /// Stretch the samples linearly so the lowest becomes 0 and the highest 255.
    ///
    /// A constant field has no range to stretch and collapses to all zeros.
    pub fn normalize(&mut self) {
        let (lo, hi) = self.min_max();
        if self.samples.is_empty() {
            return;
        }
        let range = f32::from(hi) - f32::from(lo);
        let scale = if range > 0.0 { 255.0 / range } else { 0.0 };
        for s in &mut self.samples {
            *s = ((f32::from(*s) - f32::from(lo)) * scale).round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Stamp `value` into every sample inside `rect` (clipped to the grid).
    pub fn flatten(&mut self, rect: FlattenRect, value: u8) {
        let x_end = (rect.x as usize + rect.width as usize).min(self.width);
        let z_end = (rect.z as usize + rect.depth as usize).min(self.depth);
        let x_start = (rect.x as usize).min(x_end);
        for z in (rect.z as usize).min(z_end)..z_end {
            let row = z * self.width;
            self.samples[row + x_start..row + x_end].fill(value);
        }
    }

    /// Whether `(x, z)` lies in a quad that has all four corners on the grid.
    fn in_domain(&self, x: f32, z: f32) -> bool {
        // Written so NaN falls outside the domain
        x >= 0.0 && x < (self.width as f32 - 1.0) && z >= 0.0 && z < (self.depth as f32 - 1.0)
    }

    /// Corner samples of the quad containing `(x, z)` plus fractional offsets.
    fn quad(&self, x: f32, z: f32) -> Quad {
        let gx = x.floor() as usize;
        let gz = z.floor() as usize;
        let at = |x: usize, z: usize| f32::from(self.samples[z * self.width + x]);
        Quad {
            gx: gx as f32,
            gz: gz as f32,
            fx: x - gx as f32,
            fz: z - gz as f32,
            h00: at(gx, gz),
            h10: at(gx + 1, gz),
            h01: at(gx, gz + 1),
            h11: at(gx + 1, gz + 1),
        }
    }

    /// Bilinearly interpolated height, or `0.0` outside the sampled domain.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if !self.in_domain(x, z) {
            return 0.0;
        }
        let q = self.quad(x, z);
        let top = lerp(q.h00, q.h10, q.fx);
        let bottom = lerp(q.h01, q.h11, q.fx);
        lerp(top, bottom, q.fz)
    }

    /// Flat normal of the triangle containing `(x, z)`, or `Vec3::Y` outside
    /// the sampled domain.
    ///
    /// `fx > fz` selects the `{00, 10, 11}` triangle, everything else
    /// (including the diagonal itself) the `{00, 11, 01}` triangle.
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        if !self.in_domain(x, z) {
            return Vec3::Y;
        }
        let q = self.quad(x, z);
        let p00 = Vec3::new(q.gx, q.h00, q.gz);
        let p10 = Vec3::new(q.gx + 1.0, q.h10, q.gz);
        let p01 = Vec3::new(q.gx, q.h01, q.gz + 1.0);
        let p11 = Vec3::new(q.gx + 1.0, q.h11, q.gz + 1.0);

        match Triangle::select(q.fx, q.fz) {
            Triangle::LowerRight => (p11 - p00).cross(p10 - p00).normalize(),
            Triangle::UpperLeft => (p01 - p00).cross(p11 - p00).normalize(),
        }
    }
}

impl GroundSampler for Heightfield {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        Heightfield::height_at(self, x, z)
    }

    fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        Heightfield::normal_at(self, x, z)
    }
}

/// Which half of a grid quad a point falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Triangle {
    /// Corners `{00, 10, 11}`, where `fx > fz`.
    LowerRight,
    /// Corners `{00, 11, 01}`, where `fx <= fz`.
    UpperLeft,
}

impl Triangle {
    pub fn select(fx: f32, fz: f32) -> Self {
        if fx > fz {
            Triangle::LowerRight
        } else {
            Triangle::UpperLeft
        }
    }
}

struct Quad {
    gx: f32,
    gz: f32,
    fx: f32,
    fz: f32,
    h00: f32,
    h10: f32,
    h01: f32,
    h11: f32,
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_quad(h00: u8, h10: u8, h01: u8, h11: u8) -> Heightfield {
        // 3x3 so the quad at (0,0) is fully inside the sampled domain
        Heightfield::new(3, 3, vec![h00, h10, 0, h01, h11, 0, 0, 0, 0])
    }

    #[test]
    fn test_corner_samples_are_exact() {
        let samples: Vec<u8> = (0..25).map(|i| (i * 10) as u8).collect();
        let field = Heightfield::new(5, 5, samples);
        for z in 0..4 {
            for x in 0..4 {
                let expected = f32::from(field.sample(x, z));
                assert_eq!(field.height_at(x as f32, z as f32), expected);
            }
        }
    }

    #[test]
    fn test_empty_field_reads_as_zero() {
        let mut field = Heightfield::new(0, 0, vec![]);
        assert_eq!(field.sample(0, 0), 0);
        assert_eq!(field.sample(7, 3), 0);
        assert_eq!(field.height_at(0.0, 0.0), 0.0);
        assert_eq!(field.normal_at(0.5, 0.5), Vec3::Y);
        field.normalize();
        field.flatten(FlattenRect::new(0, 0, 4, 4), 100);
        assert!(field.samples().is_empty());
    }

    #[test]
    fn test_uniform_quads_at_midpoint() {
        assert_eq!(single_quad(0, 0, 0, 0).height_at(0.5, 0.5), 0.0);
        assert_eq!(single_quad(255, 255, 255, 255).height_at(0.5, 0.5), 255.0);
    }

    #[test]
    fn test_checker_quad_midpoint() {
        let h = single_quad(0, 255, 255, 0).height_at(0.5, 0.5);
        assert!((h - 127.5).abs() < 1e-3);
        let h = single_quad(255, 0, 0, 255).height_at(0.5, 0.5);
        assert!((h - 127.5).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_range_sentinels() {
        let field = Heightfield::filled(4, 4, 200);
        for (x, z) in [(-0.1, 1.0), (1.0, -0.1), (3.0, 1.0), (1.0, 3.0), (f32::NAN, 1.0)] {
            assert_eq!(field.height_at(x, z), 0.0);
            assert_eq!(field.normal_at(x, z), Vec3::Y);
        }
        // Last valid coordinate is just below width - 1
        assert!((field.height_at(2.999, 2.999) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_flat_normal_is_up() {
        let field = Heightfield::filled(4, 4, 50);
        let n = field.normal_at(1.3, 1.7);
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_normal_leans_away_from_rising_ground() {
        // Rising towards +x
        let field = single_quad(0, 10, 0, 10);
        let n = field.normal_at(0.7, 0.2);
        assert!(n.y > 0.0);
        assert!(n.x < 0.0);
        assert!((n.length() - 1.0).abs() < 1e-5);

        // Rising towards +z
        let field = single_quad(0, 0, 10, 10);
        let n = field.normal_at(0.2, 0.7);
        assert!(n.y > 0.0);
        assert!(n.z < 0.0);
    }

    #[test]
    fn test_triangle_selection_is_total() {
        assert_eq!(Triangle::select(0.6, 0.4), Triangle::LowerRight);
        assert_eq!(Triangle::select(0.4, 0.6), Triangle::UpperLeft);
        // Diagonal belongs to exactly one triangle
        assert_eq!(Triangle::select(0.5, 0.5), Triangle::UpperLeft);
        assert_eq!(Triangle::select(0.0, 0.0), Triangle::UpperLeft);
    }

    #[test]
    fn test_normal_differs_per_triangle() {
        // Only h10 raised: the lower-right triangle tilts, the upper-left does not
        let field = single_quad(0, 100, 0, 0);
        let lower_right = field.normal_at(0.8, 0.1);
        let upper_left = field.normal_at(0.1, 0.8);
        assert!(lower_right.y < 0.5);
        assert!((upper_left - Vec3::Y).length() < 1e-6);
        // On the diagonal the upper-left triangle wins
        assert!((field.normal_at(0.5, 0.5) - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_normalize_stretches_range() {
        let mut field = Heightfield::new(2, 2, vec![50, 100, 150, 75]);
        field.normalize();
        assert_eq!(field.min_max(), (0, 255));
        assert_eq!(field.sample(1, 0), 128);
    }

    #[test]
    fn test_normalize_constant_field_collapses() {
        let mut field = Heightfield::filled(3, 3, 42);
        field.normalize();
        assert!(field.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_flatten_clips_to_grid() {
        let mut field = Heightfield::filled(6, 4, 0);
        field.flatten(FlattenRect::new(4, 2, 10, 10), 9);
        assert_eq!(field.sample(4, 2), 9);
        assert_eq!(field.sample(5, 3), 9);
        assert_eq!(field.sample(3, 2), 0);
        assert_eq!(field.sample(4, 1), 0);
    }

    #[test]
    fn test_flatten_rect_is_half_open() {
        let mut field = Heightfield::filled(10, 10, 0);
        field.flatten(FlattenRect::new(2, 2, 3, 3), 7);
        assert_eq!(field.sample(2, 2), 7);
        assert_eq!(field.sample(4, 4), 7);
        assert_eq!(field.sample(5, 4), 0);
        assert_eq!(field.sample(4, 5), 0);
    }
}
