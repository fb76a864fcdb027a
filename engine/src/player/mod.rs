//! Player Module
//!
//! First-person movement over the terrain: camera-relative WASD, slope
//! limiting, jumping and gravity with a ground clamp.

pub mod controller;

pub use controller::{slope_limited, PlayerConfig, PlayerController, PlayerStep, MAX_FRAME_DT};
