//! Labyrinth Tests - Terrain, Maze and Player Working Together
//!
//! Builds the world the way the game does (minus the GPU) and walks the
//! player around on it.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use labyrinth_engine::game::{
    build_terrain_mesh, wall_positions, MazeGrid, MAZE_COLS, MAZE_ROWS, PAD, PAD_HEIGHT,
};
use labyrinth_engine::{FlattenRect, Heightfield, MovementKeys, PlayerController};

const DT: f32 = 1.0 / 60.0;

/// 100x100 field sloping up along x, flattened and meshed like the game.
fn world() -> Heightfield {
    let mut samples = Vec::with_capacity(100 * 100);
    for _z in 0..100 {
        for x in 0..100 {
            samples.push((x * 2) as u8);
        }
    }
    let mut field = Heightfield::new(100, 100, samples);
    field.normalize();
    build_terrain_mesh(&mut field, 1, PAD, PAD_HEIGHT);
    field
}

// ============================================================================
// Pad
// ============================================================================

#[test]
fn test_pad_is_flat_after_meshing() {
    let field = world();
    for (x, z) in [(25.0, 25.0), (50.5, 40.25), (73.9, 73.9)] {
        assert_eq!(field.height_at(x, z), f32::from(PAD_HEIGHT));
        assert_eq!(field.normal_at(x, z), Vec3::Y);
    }
}

#[test]
fn test_every_wall_stands_on_the_pad() {
    let field = world();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let maze = MazeGrid::generate(MAZE_ROWS, MAZE_COLS, &mut rng).unwrap();

    for wall in wall_positions(&maze, PAD, PAD_HEIGHT) {
        let ground = field.height_at(wall.x, wall.z);
        assert_eq!(ground, f32::from(PAD_HEIGHT));
        assert_eq!(wall.y - 0.5, ground);
    }
}

// ============================================================================
// Player
// ============================================================================

#[test]
fn test_player_lands_on_pad() {
    let field = world();
    let mut player = PlayerController::new(Vec3::new(43.0, 103.0, 60.0));
    let keys = MovementKeys::new();

    for _ in 0..120 {
        player.update(DT, &keys, Vec3::NEG_Z, &field);
    }
    assert!(player.on_ground);
    assert!((player.position.y - 102.0).abs() < 1e-4);
}

#[test]
fn test_player_walks_across_pad() {
    let field = world();
    let mut player = PlayerController::new(Vec3::new(43.0, 102.0, 60.0));
    player.on_ground = true;
    let keys = MovementKeys {
        forward: true,
        ..Default::default()
    };

    // One second north at 5 units/s
    for _ in 0..60 {
        player.update(DT, &keys, Vec3::NEG_Z, &field);
    }
    assert!((player.position.z - 55.0).abs() < 1e-3);
    assert!((player.position.x - 43.0).abs() < 1e-4);
    assert!((player.position.y - 102.0).abs() < 1e-4);
}

#[test]
fn test_player_follows_slope_outside_pad() {
    let field = world();
    let start = Vec3::new(85.0, 0.0, 10.0);
    let ground = field.height_at(start.x, start.z);
    let mut player = PlayerController::new(start + Vec3::Y * 2.0 + Vec3::Y * ground);
    player.on_ground = true;
    let keys = MovementKeys {
        forward: true,
        ..Default::default()
    };

    // Uphill along +x
    for _ in 0..30 {
        player.update(DT, &keys, Vec3::X, &field);
    }
    let feet = player.position.y - player.config.height;
    let below = field.height_at(player.position.x, player.position.z);
    assert!(player.position.x > start.x);
    assert!(feet >= below - 1e-3);
}

#[test]
fn test_jump_comes_back_down() {
    let field = world();
    let mut player = PlayerController::new(Vec3::new(50.0, 102.0, 50.0));
    player.on_ground = true;

    let jump = MovementKeys {
        jump: true,
        ..Default::default()
    };
    let step = player.update(DT, &jump, Vec3::NEG_Z, &field);
    assert!(step.jumped);

    let idle = MovementKeys::new();
    let mut peak = player.position.y;
    for _ in 0..120 {
        player.update(DT, &idle, Vec3::NEG_Z, &field);
        peak = peak.max(player.position.y);
    }
    // v^2 / 2g = 100 / 40
    assert!(peak > 104.0 && peak < 104.6);
    assert!(player.on_ground);
    assert!((player.position.y - 102.0).abs() < 1e-4);
}

#[test]
fn test_outside_the_map_is_sea_level() {
    let field = world();
    assert_eq!(field.height_at(-5.0, 10.0), 0.0);
    assert_eq!(field.normal_at(500.0, 10.0), Vec3::Y);

    let mut player = PlayerController::new(Vec3::new(-10.0, 10.0, -10.0));
    for _ in 0..120 {
        player.update(DT, &MovementKeys::new(), Vec3::NEG_Z, &field);
    }
    assert!((player.position.y - 2.0).abs() < 1e-4);
}

#[test]
fn test_custom_pad() {
    let mut field = Heightfield::filled(20, 20, 10);
    build_terrain_mesh(&mut field, 2, FlattenRect::new(5, 5, 5, 5), 40);
    assert_eq!(field.sample(7, 7), 40);
    assert_eq!(field.sample(10, 10), 10);
}
