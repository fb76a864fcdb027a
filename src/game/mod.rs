//! Game Module
//!
//! The labyrinth demo built on top of the engine: maze generation, terrain
//! meshing, lights, the scene that turns all of it into draw batches, and
//! the persisted window settings.

pub mod assets;
pub mod config;
pub mod lights;
pub mod maze;
pub mod scene;
pub mod terrain_mesh;

pub use config::{AntialiasingSettings, AppSettings, SettingsStore, WindowSettings};
pub use lights::LightRig;
pub use maze::{Cell, MazeError, MazeGrid, MAZE_COLS, MAZE_ROWS};
pub use scene::{
    sort_back_to_front, wall_positions, ObjectKind, Scene, SceneMeshes, SceneObject,
    SceneTextures, WallCube, WallTexturing,
};
pub use terrain_mesh::{build_terrain_mesh, heightfield_mesh, TerrainBand, PAD, PAD_HEIGHT};
