//! Camera Module
//!
//! First-person camera state and matrices. Window-system agnostic: it only
//! consumes accumulated mouse deltas.

pub mod fps_camera;

pub use fps_camera::{FpsCamera, Z_FAR, Z_NEAR, ZOOM_MAX, ZOOM_MIN};
