//! World Module
//!
//! Terrain data the player walks on.
//!
//! The heightfield is loaded once from a grayscale image, normalized, has the
//! maze pad stamped into it while the terrain mesh is built, and is read-only
//! afterwards.

pub mod heightfield;

pub use heightfield::{FlattenRect, GroundSampler, Heightfield, Triangle};
