//! FPS Camera Module
//!
//! First-person camera where mouse movement directly rotates the view without
//! requiring any button to be held down. The cursor is locked to the window
//! while the demo runs.
//!
//! Key features:
//! - Direct mouse input → camera rotation (0.1 degree per pixel)
//! - Pitch clamped to ±89 degrees to prevent gimbal lock
//! - Scroll wheel narrows the field of view, clamped to [1°, 45°]
//! - View and projection matrices for the scene uniforms

use glam::{Mat4, Vec3};

/// Pitch limit constant: +89 degrees in radians
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Narrowest field of view in degrees.
pub const ZOOM_MIN: f32 = 1.0;
/// Widest (and initial) field of view in degrees.
pub const ZOOM_MAX: f32 = 45.0;

/// Near clip plane distance.
pub const Z_NEAR: f32 = 0.1;
/// Far clip plane distance; the sun orbit sits well inside it.
pub const Z_FAR: f32 = 1000.0;

/// First-person camera.
///
/// ## Usage
/// ```rust,ignore
/// let mut camera = FpsCamera::with_position(Vec3::new(43.0, 103.0, 60.0));
///
/// // Once per frame, pass the accumulated raw mouse delta (in pixels)
/// camera.apply_mouse_delta(mouse_dx, mouse_dy);
/// camera.apply_scroll(wheel_steps);
///
/// let view_proj = camera.projection_matrix(aspect) * camera.view_matrix();
/// ```
#[derive(Clone, Debug)]
pub struct FpsCamera {
    /// Camera (eye) position in world space
    pub position: Vec3,
    /// Horizontal angle (radians), unrestricted
    pub yaw: f32,
    /// Vertical angle (radians), clamped to ±89°
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Mouse sensitivity in radians per pixel
    pub sensitivity: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            zoom: ZOOM_MAX,
            sensitivity: 0.1_f32.to_radians(),
        }
    }
}

impl FpsCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera at `position` looking toward -Z.
    pub fn with_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotate the camera by a raw mouse delta in pixels.
    ///
    /// Positive `dx` turns right, positive `dy` (mouse moved down) looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zoom in (positive steps) or out by one degree per wheel step.
    pub fn apply_scroll(&mut self, steps: f32) {
        self.zoom = (self.zoom - steps).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// The direction the camera is looking, normalized.
    ///
    /// When yaw=0 and pitch=0, camera looks toward -Z.
    #[inline]
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Right vector, perpendicular to front in the horizontal plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    /// Perspective projection with the current zoom as vertical field of view.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect.max(f32::EPSILON), Z_NEAR, Z_FAR)
    }
}
