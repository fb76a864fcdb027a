//! Labyrinth Engine Library
//!
//! Rendering and simulation core for the labyrinth walk demo: a first-person
//! camera wandering over heightmap terrain with a maze stamped on a flattened pad.
//!
//! # Modules
//!
//! - [`world`] - Heightfield storage and bilinear height/normal sampling
//! - [`player`] - First-person movement, slope handling, gravity and ground collision
//! - [`camera`] - FPS camera (yaw/pitch/zoom) and view/projection matrices
//! - [`input`] - Platform-agnostic keyboard and mouse state
//! - [`render`] - wgpu context, shaders, meshes, textures, Phong pipelines
//! - [`audio`] - Jump sound effect (non-fatal when unavailable)
//! - [`game`] - Maze, terrain mesh, lights, scene and settings
//!
//! # Example
//!
//! ```ignore
//! use labyrinth_engine::world::{Heightfield, GroundSampler};
//! use labyrinth_engine::player::PlayerController;
//! use labyrinth_engine::input::MovementKeys;
//!
//! let terrain = Heightfield::from_image("resources/textures/heights.png")?;
//! let mut player = PlayerController::new(glam::Vec3::new(43.0, 103.0, 60.0));
//!
//! let keys = MovementKeys { forward: true, ..Default::default() };
//! let step = player.update(dt, &keys, camera.front(), &terrain);
//! camera.position = player.position;
//! if step.jumped {
//!     jump_sound.play();
//! }
//! ```

pub mod audio;
pub mod camera;
pub mod error;
pub mod input;
pub mod player;
pub mod render;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use error::{AssetError, GpuError};
// Re-export world types for convenience
pub use world::{FlattenRect, GroundSampler, Heightfield};
// Re-export commonly used input types
pub use input::{InputAction, InputState, KeyCode, MovementKeys};
// Re-export player types
pub use player::{PlayerConfig, PlayerController, PlayerStep};
pub use camera::FpsCamera;
