//! Player Controller
//!
//! First-person walker over a heightfield. Movement direction is relative to
//! the camera's facing direction, flattened onto the XZ plane.
//!
//! # Physics Model
//!
//! - Walk speed: 5.0 m/s, no acceleration (horizontal velocity is reset each frame)
//! - Slopes whose normal has a vertical component below 0.7 cannot be climbed:
//!   the move loses its component along the surface normal
//! - Jump velocity: 10.0 m/s
//! - Gravity: 20.0 m/s^2 while airborne
//! - Eye height: 2.0 m above the terrain
//!
//! # Usage
//!
//! ```rust,ignore
//! use labyrinth_engine::player::PlayerController;
//!
//! let mut player = PlayerController::new(camera.position);
//!
//! // Each frame:
//! let step = player.update(dt, &input.movement, camera.front(), &heightfield);
//! camera.position = player.position;
//! if step.jumped {
//!     jump_sound.play();
//! }
//! ```

use glam::Vec3;

use crate::input::MovementKeys;
use crate::world::GroundSampler;

/// Longest frame step the controller integrates; longer hitches are clamped.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Tunable movement constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    /// Horizontal speed in meters per second
    pub move_speed: f32,
    /// Minimum normal.y of walkable ground
    pub walkable_normal_y: f32,
    /// Initial vertical velocity of a jump
    pub jump_velocity: f32,
    /// Downward acceleration while airborne (positive number)
    pub gravity: f32,
    /// Eye height above the terrain surface
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            walkable_normal_y: 0.7,
            jump_velocity: 10.0,
            gravity: 20.0,
            height: 2.0,
        }
    }
}

/// What happened during one [`PlayerController::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// A jump started this frame
    pub jumped: bool,
    /// The player ended the frame standing on the terrain
    pub grounded: bool,
}

/// Remove the component of `intent` along `normal` when the surface is too steep.
///
/// Walkable surfaces (`normal.y >= threshold`) leave the intent untouched.
pub fn slope_limited(intent: Vec3, normal: Vec3, threshold: f32) -> Vec3 {
    if normal.y < threshold {
        intent - intent.dot(normal) * normal
    } else {
        intent
    }
}

/// Player body: eye position, velocity and ground contact.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub config: PlayerConfig,
    /// Eye position in world space
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
}

impl PlayerController {
    /// Create a player at `position`, airborne until the first ground contact.
    pub fn new(position: Vec3) -> Self {
        Self::with_config(position, PlayerConfig::default())
    }

    pub fn with_config(position: Vec3, config: PlayerConfig) -> Self {
        Self {
            config,
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
        }
    }

    /// Horizontal movement intent for this frame, scaled to move speed.
    ///
    /// Zero when no key is held or the keys cancel out.
    pub fn movement_intent(&self, keys: &MovementKeys, front: Vec3) -> Vec3 {
        let forward = Vec3::new(front.x, 0.0, front.z).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let intent = forward * keys.forward_axis() as f32 + right * keys.right_axis() as f32;
        if intent.length_squared() > 0.0 {
            intent.normalize() * self.config.move_speed
        } else {
            Vec3::ZERO
        }
    }

    /// Advance the player by `dt` seconds.
    ///
    /// `front` is the camera's look direction; only its horizontal part
    /// steers movement.
    pub fn update(
        &mut self,
        dt: f32,
        keys: &MovementKeys,
        front: Vec3,
        ground: &impl GroundSampler,
    ) -> PlayerStep {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let mut step = PlayerStep::default();

        let mut intent = self.movement_intent(keys, front);
        if intent != Vec3::ZERO && self.on_ground {
            let probe = self.position + intent * dt;
            let normal = ground.normal_at(probe.x, probe.z);
            intent = slope_limited(intent, normal, self.config.walkable_normal_y);
        }
        self.velocity.x = intent.x;
        self.velocity.z = intent.z;

        if keys.jump && self.on_ground {
            self.velocity.y = self.config.jump_velocity;
            self.on_ground = false;
            step.jumped = true;
        }

        if !self.on_ground {
            self.velocity.y -= self.config.gravity * dt;
        }

        self.position += self.velocity * dt;

        let floor = ground.height_at(self.position.x, self.position.z) + self.config.height;
        // Touching the floor counts as contact.
        if self.position.y <= floor {
            self.position.y = floor;
            self.velocity.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        step.grounded = self.on_ground;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat ground at a fixed height with a fixed normal.
    struct Plane {
        height: f32,
        normal: Vec3,
    }

    impl Plane {
        fn flat(height: f32) -> Self {
            Self {
                height,
                normal: Vec3::Y,
            }
        }
    }

    impl GroundSampler for Plane {
        fn height_at(&self, _x: f32, _z: f32) -> f32 {
            self.height
        }

        fn normal_at(&self, _x: f32, _z: f32) -> Vec3 {
            self.normal
        }
    }

    fn grounded_player(ground: f32) -> PlayerController {
        let mut player = PlayerController::new(Vec3::new(0.0, ground + 2.0, 0.0));
        player.on_ground = true;
        player
    }

    #[test]
    fn test_slope_projection_removes_normal_component() {
        let normal = Vec3::new(0.8, 0.6, 0.0);
        let intent = Vec3::new(-5.0, 0.0, 1.0);
        let limited = slope_limited(intent, normal, 0.7);
        assert!(limited.dot(normal).abs() < 1e-5);
        // Motion along the contour line survives
        assert!((limited.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_walkable_slope_is_untouched() {
        let normal = Vec3::new(0.6, 0.8, 0.0);
        let intent = Vec3::new(-5.0, 0.0, 0.0);
        assert_eq!(slope_limited(intent, normal, 0.7), intent);
    }

    #[test]
    fn test_ground_clamp() {
        let ground = Plane::flat(50.0);
        let mut player = PlayerController::new(Vec3::new(10.0, 51.0, 10.0));
        player.velocity.y = -3.0;

        let step = player.update(0.016, &MovementKeys::new(), Vec3::NEG_Z, &ground);

        assert_eq!(player.position.y, 52.0);
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.on_ground);
        assert!(step.grounded);
    }

    #[test]
    fn test_falls_under_gravity() {
        let ground = Plane::flat(0.0);
        let mut player = PlayerController::new(Vec3::new(0.0, 100.0, 0.0));

        player.update(0.1, &MovementKeys::new(), Vec3::NEG_Z, &ground);

        assert!((player.velocity.y + 2.0).abs() < 1e-5);
        assert!(player.position.y < 100.0);
        assert!(!player.on_ground);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let ground = Plane::flat(50.0);
        let mut player = grounded_player(50.0);
        let keys = MovementKeys {
            jump: true,
            ..Default::default()
        };

        let step = player.update(0.016, &keys, Vec3::NEG_Z, &ground);

        assert!(step.jumped);
        assert!(!step.grounded);
        assert!(player.position.y > 52.0);
        assert!((player.velocity.y - (10.0 - 20.0 * 0.016)).abs() < 1e-5);

        // No double jump while airborne
        let step = player.update(0.016, &keys, Vec3::NEG_Z, &ground);
        assert!(!step.jumped);
    }

    #[test]
    fn test_walks_along_flattened_front() {
        let ground = Plane::flat(0.0);
        let mut player = grounded_player(0.0);
        let keys = MovementKeys {
            forward: true,
            ..Default::default()
        };
        // Looking steeply down must not slow horizontal movement
        let front = Vec3::new(0.0, -0.9, -0.1).normalize();

        player.update(0.1, &keys, front, &ground);

        assert!((player.position.z + 0.5).abs() < 1e-5);
        assert!(player.position.x.abs() < 1e-6);
        assert!(player.on_ground);
    }

    #[test]
    fn test_horizontal_velocity_resets_without_input() {
        let ground = Plane::flat(0.0);
        let mut player = grounded_player(0.0);
        let keys = MovementKeys {
            right: true,
            ..Default::default()
        };
        player.update(0.016, &keys, Vec3::NEG_Z, &ground);
        assert!(player.velocity.x > 0.0);

        player.update(0.016, &MovementKeys::new(), Vec3::NEG_Z, &ground);
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.velocity.z, 0.0);
    }

    #[test]
    fn test_standing_still_stays_grounded() {
        let ground = Plane::flat(10.0);
        let mut player = grounded_player(10.0);
        for _ in 0..5 {
            let step = player.update(0.016, &MovementKeys::new(), Vec3::NEG_Z, &ground);
            assert!(step.grounded);
            assert_eq!(player.position.y, 12.0);
        }
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let player = grounded_player(0.0);
        let keys = MovementKeys {
            forward: true,
            right: true,
            ..Default::default()
        };
        let intent = player.movement_intent(&keys, Vec3::NEG_Z);
        assert!((intent.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_steep_ground_blocks_climb() {
        let ground = Plane {
            height: 0.0,
            normal: Vec3::new(0.8, 0.6, 0.0),
        };
        let mut player = grounded_player(0.0);
        let keys = MovementKeys {
            left: true,
            ..Default::default()
        };

        player.update(0.016, &keys, Vec3::NEG_Z, &ground);

        // Pushing straight into the slope keeps only a sliver of x motion
        assert!(player.velocity.x.abs() < 5.0 * 0.4);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let ground = Plane::flat(0.0);
        let mut player = PlayerController::new(Vec3::new(0.0, 100.0, 0.0));
        player.update(5.0, &MovementKeys::new(), Vec3::NEG_Z, &ground);
        assert!((player.velocity.y + 20.0 * MAX_FRAME_DT).abs() < 1e-5);
    }
}
