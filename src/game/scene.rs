//! Scene Objects and Frame Planning
//!
//! The scene is a flat list of drawables. Each frame it animates the ones
//! that move, splits them into opaque and transparent sets, sorts the
//! transparent ones back to front and emits a [`FramePlan`] for the renderer.
//!
//! ## Draw order
//! 1. Opaque objects and maze walls (depth write on)
//! 2. Transparent objects, farthest first (depth test on, depth write off)
//! 3. Lamp gizmos for the point lights and both suns

use glam::{Mat4, Vec3, Vec4};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::lights::{LightRig, SECOND_SUN_COLOR, SUN_COLOR};
use super::maze::MazeGrid;
use crate::render::{FramePlan, InstanceRaw, MeshId, TextureId};
use crate::world::FlattenRect;

/// Scale of the point light gizmo cubes.
pub const POINT_LAMP_SCALE: f32 = 0.2;
/// Scale of the sun gizmo cubes.
pub const SUN_LAMP_SCALE: f32 = 25.0;

/// How maze walls pick their texture from the wall pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallTexturing {
    /// Each wall keeps the texture it was given when the maze was built.
    #[default]
    Stable,
    /// Every wall draws a fresh random texture every frame.
    Flicker,
}

/// One unit cube of the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallCube {
    pub position: Vec3,
    pub texture: Option<TextureId>,
}

/// What a drawable does each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// Fixed transform.
    StaticMesh,
    /// One instance per wall cell; the object's transform is unused.
    MazeWalls(Vec<WallCube>),
    /// Turns about the y axis at one radian per second.
    Spinning { anchor: Vec3, scale: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub mesh: MeshId,
    pub texture: Option<TextureId>,
    /// RGBA multiplier; alpha matters only for transparent objects
    pub tint: Vec4,
    pub kind: ObjectKind,
    transform: Mat4,
    transparent: bool,
}

impl SceneObject {
    pub fn new(mesh: MeshId, texture: Option<TextureId>, transform: Mat4) -> Self {
        Self {
            mesh,
            texture,
            tint: Vec4::ONE,
            kind: ObjectKind::StaticMesh,
            transform,
            transparent: false,
        }
    }

    /// Alpha-blended object tinted with `tint`.
    pub fn transparent(mesh: MeshId, texture: Option<TextureId>, transform: Mat4, tint: Vec4) -> Self {
        Self {
            tint,
            transparent: true,
            ..Self::new(mesh, texture, transform)
        }
    }

    /// Make the object spin in place around `anchor`.
    pub fn spinning(mut self, anchor: Vec3, scale: f32) -> Self {
        self.kind = ObjectKind::Spinning { anchor, scale };
        self.update(0.0);
        self
    }

    pub fn maze_walls(mesh: MeshId, walls: Vec<WallCube>) -> Self {
        Self {
            kind: ObjectKind::MazeWalls(walls),
            ..Self::new(mesh, None, Mat4::IDENTITY)
        }
    }

    /// Advance animation to `time` seconds.
    pub fn update(&mut self, time: f32) {
        if let ObjectKind::Spinning { anchor, scale } = self.kind {
            self.transform = Mat4::from_translation(anchor)
                * Mat4::from_rotation_y(time)
                * Mat4::from_scale(Vec3::splat(scale));
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// World position of the object's origin.
    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Center of every wall cell, stood on the pad.
///
/// Maze column `x` maps to world x `pad.x + x`, row `y` to world z `pad.z + y`.
/// Unit cubes are centered on their origin, so they sit half a unit above the
/// pad surface.
pub fn wall_positions(maze: &MazeGrid, pad: FlattenRect, pad_height: u8) -> Vec<Vec3> {
    let y = f32::from(pad_height) + 0.5;
    maze.wall_cells()
        .map(|(x, z)| Vec3::new(pad.x as f32 + x as f32, y, pad.z as f32 + z as f32))
        .collect()
}

/// Sort `items` so the one farthest from `eye` comes first.
pub fn sort_back_to_front<T>(items: &mut [T], eye: Vec3, position: impl Fn(&T) -> Vec3) {
    items.sort_by(|a, b| {
        let da = eye.distance(position(a));
        let db = eye.distance(position(b));
        db.total_cmp(&da)
    });
}

/// Mesh handles used to lay out the labyrinth scene.
#[derive(Clone, Copy, Debug)]
pub struct SceneMeshes {
    pub cube: MeshId,
    pub terrain: MeshId,
    pub ornament: MeshId,
}

/// Texture handles used to lay out the labyrinth scene.
#[derive(Clone, Copy, Debug)]
pub struct SceneTextures {
    pub atlas: TextureId,
    pub crate_box: TextureId,
}

pub struct Scene {
    objects: Vec<SceneObject>,
    wall_textures: Vec<TextureId>,
    texturing: WallTexturing,
    lamp_mesh: Option<MeshId>,
    rng: ChaCha8Rng,
}

impl Scene {
    pub fn new(wall_textures: Vec<TextureId>, texturing: WallTexturing, rng: ChaCha8Rng) -> Self {
        Self {
            objects: Vec::new(),
            wall_textures,
            texturing,
            lamp_mesh: None,
            rng,
        }
    }

    /// Add an object and return its index.
    pub fn add(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mesh drawn for every light gizmo. Without one, no gizmos are drawn.
    pub fn set_lamp_mesh(&mut self, mesh: MeshId) {
        self.lamp_mesh = Some(mesh);
    }

    /// Add one cube per maze wall, each given a texture from the wall pool.
    pub fn add_maze_walls(&mut self, mesh: MeshId, maze: &MazeGrid, pad: FlattenRect, pad_height: u8) -> usize {
        let walls = wall_positions(maze, pad, pad_height)
            .into_iter()
            .map(|position| WallCube {
                position,
                texture: self.wall_textures.choose(&mut self.rng).copied(),
            })
            .collect();
        self.add(SceneObject::maze_walls(mesh, walls))
    }

    /// Lay out the labyrinth demo: terrain, three tinted glass cubes (the
    /// first one spinning), an ornament and the maze walls.
    pub fn populate_labyrinth(
        &mut self,
        meshes: SceneMeshes,
        textures: SceneTextures,
        maze: &MazeGrid,
        pad: FlattenRect,
        pad_height: u8,
    ) {
        self.add(SceneObject::new(meshes.terrain, Some(textures.atlas), Mat4::IDENTITY));

        let glass = [
            (Vec3::new(40.0, 101.0, 40.0), Vec4::new(1.0, 0.0, 0.0, 0.2)),
            (Vec3::new(43.0, 101.0, 40.0), Vec4::new(0.0, 1.0, 0.0, 0.4)),
            (Vec3::new(46.0, 101.0, 40.0), Vec4::new(0.0, 0.0, 1.0, 0.6)),
        ];
        for (i, (position, tint)) in glass.into_iter().enumerate() {
            let transform = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(2.0));
            let object = SceneObject::transparent(meshes.cube, Some(textures.crate_box), transform, tint);
            self.add(if i == 0 { object.spinning(position, 2.0) } else { object });
        }

        let ornament = Mat4::from_translation(Vec3::new(50.0, 101.0, 40.0)) * Mat4::from_scale(Vec3::splat(0.5));
        self.add(SceneObject::new(meshes.ornament, Some(textures.crate_box), ornament));

        self.add_maze_walls(meshes.cube, maze, pad, pad_height);
        self.set_lamp_mesh(meshes.cube);
    }

    /// Advance every animated object to `time` seconds.
    pub fn update(&mut self, time: f32) {
        for object in &mut self.objects {
            object.update(time);
        }
    }

    /// Fill `plan` with this frame's draws as seen from `eye`.
    pub fn build_plan(&mut self, eye: Vec3, lights: &LightRig, plan: &mut FramePlan) {
        plan.clear();

        let mut transparent = Vec::new();
        for object in &self.objects {
            if object.is_transparent() {
                transparent.push(object);
                continue;
            }
            match &object.kind {
                ObjectKind::MazeWalls(walls) => {
                    for wall in walls {
                        let texture = match self.texturing {
                            WallTexturing::Stable => wall.texture,
                            WallTexturing::Flicker => self.wall_textures.choose(&mut self.rng).copied(),
                        };
                        let instance = InstanceRaw::new(Mat4::from_translation(wall.position), object.tint);
                        plan.push_opaque(object.mesh, texture, instance);
                    }
                }
                ObjectKind::StaticMesh | ObjectKind::Spinning { .. } => {
                    let instance = InstanceRaw::new(object.transform(), object.tint);
                    plan.push_opaque(object.mesh, object.texture, instance);
                }
            }
        }

        sort_back_to_front(&mut transparent, eye, |o| o.translation());
        for object in transparent {
            plan.push_transparent(
                object.mesh,
                object.texture,
                InstanceRaw::new(object.transform(), object.tint),
            );
        }

        let Some(lamp) = self.lamp_mesh else {
            return;
        };
        for light in &lights.points {
            let transform = Mat4::from_translation(light.position) * Mat4::from_scale(Vec3::splat(POINT_LAMP_SCALE));
            plan.push_lamp(lamp, InstanceRaw::new(transform, light.diffuse.extend(1.0)));
        }
        for (position, color) in [
            (lights.sun_position(), SUN_COLOR),
            (lights.second_sun_position(), SECOND_SUN_COLOR),
        ] {
            let transform = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(SUN_LAMP_SCALE));
            plan.push_lamp(lamp, InstanceRaw::new(transform, color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NR_POINT_LIGHTS;
    use rand::SeedableRng;

    const CUBE: MeshId = MeshId(0);
    const TERRAIN: MeshId = MeshId(1);
    const ORNAMENT: MeshId = MeshId(2);
    const PAD: FlattenRect = FlattenRect::new(25, 25, 50, 50);

    fn maze() -> MazeGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        MazeGrid::generate(10, 25, &mut rng).unwrap()
    }

    fn wall_pool() -> Vec<TextureId> {
        (10..15).map(TextureId).collect()
    }

    fn labyrinth(texturing: WallTexturing) -> (Scene, MazeGrid) {
        let maze = maze();
        let mut scene = Scene::new(wall_pool(), texturing, ChaCha8Rng::seed_from_u64(1));
        scene.populate_labyrinth(
            SceneMeshes {
                cube: CUBE,
                terrain: TERRAIN,
                ornament: ORNAMENT,
            },
            SceneTextures {
                atlas: TextureId(0),
                crate_box: TextureId(1),
            },
            &maze,
            PAD,
            100,
        );
        (scene, maze)
    }

    fn instance_position(instance: &InstanceRaw) -> Vec3 {
        Vec3::from_slice(&instance.model[3][..3])
    }

    #[test]
    fn test_back_to_front_order() {
        let eye = Vec3::ZERO;
        let mut distances = vec![5.0f32, 10.0, 2.0];
        sort_back_to_front(&mut distances, eye, |d| Vec3::new(*d, 0.0, 0.0));
        assert_eq!(distances, vec![10.0, 5.0, 2.0]);
    }

    #[test]
    fn test_wall_placement() {
        let maze = maze();
        let positions = wall_positions(&maze, PAD, 100);
        assert_eq!(positions.len(), maze.wall_cells().count());
        // Top-left border cell
        assert_eq!(positions[0], Vec3::new(25.0, 100.5, 25.0));
        for ((x, z), p) in maze.wall_cells().zip(&positions) {
            assert_eq!(p.x, 25.0 + x as f32);
            assert_eq!(p.z, 25.0 + z as f32);
            assert_eq!(p.y, 100.5);
        }
    }

    #[test]
    fn test_spinning_transform() {
        let anchor = Vec3::new(40.0, 101.0, 40.0);
        let mut object = SceneObject::new(CUBE, None, Mat4::IDENTITY).spinning(anchor, 2.0);
        object.update(std::f32::consts::FRAC_PI_2);

        assert!((object.translation() - anchor).length() < 1e-5);
        // +X rotated a quarter turn about Y lands on -Z, then scaled by 2
        let x_axis = object.transform().transform_vector3(Vec3::X);
        assert!((x_axis - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_plan_partitions_objects() {
        let (mut scene, maze) = labyrinth(WallTexturing::Stable);
        let lights = LightRig::new(Vec3::new(50.0, 0.0, 50.0));
        let mut plan = FramePlan::new();
        scene.build_plan(Vec3::new(43.0, 103.0, 60.0), &lights, &mut plan);

        let opaque: usize = plan.opaque.iter().map(|b| b.instances.len()).sum();
        // terrain + ornament + walls
        assert_eq!(opaque, 2 + maze.wall_cells().count());

        let transparent: usize = plan.transparent.iter().map(|b| b.instances.len()).sum();
        assert_eq!(transparent, 3);

        let lamps: usize = plan.lamps.iter().map(|b| b.instances.len()).sum();
        assert_eq!(lamps, NR_POINT_LIGHTS + 2);
    }

    #[test]
    fn test_transparent_drawn_far_to_near() {
        let (mut scene, _) = labyrinth(WallTexturing::Stable);
        let lights = LightRig::new(Vec3::new(50.0, 0.0, 50.0));
        let mut plan = FramePlan::new();

        // Looking along the row of cubes from beyond x = 46
        let eye = Vec3::new(60.0, 101.0, 40.0);
        scene.build_plan(eye, &lights, &mut plan);
        let xs: Vec<f32> = plan
            .transparent
            .iter()
            .flat_map(|b| b.instances.iter())
            .map(|i| instance_position(i).x)
            .collect();
        assert_eq!(xs, vec![40.0, 43.0, 46.0]);

        let eye = Vec3::new(0.0, 101.0, 40.0);
        scene.build_plan(eye, &lights, &mut plan);
        let alphas: Vec<f32> = plan
            .transparent
            .iter()
            .flat_map(|b| b.instances.iter())
            .map(|i| i.tint[3])
            .collect();
        assert_eq!(alphas, vec![0.6, 0.4, 0.2]);
    }

    #[test]
    fn test_stable_wall_textures_repeat() {
        let (mut scene, _) = labyrinth(WallTexturing::Stable);
        let lights = LightRig::new(Vec3::ZERO);
        let mut first = FramePlan::new();
        let mut second = FramePlan::new();
        scene.build_plan(Vec3::ZERO, &lights, &mut first);
        scene.build_plan(Vec3::ZERO, &lights, &mut second);
        assert_eq!(first, second);

        let pool = wall_pool();
        let wall_batches = first.opaque.iter().filter(|b| b.mesh == CUBE);
        for batch in wall_batches {
            assert!(pool.contains(&batch.texture.unwrap()));
        }
    }

    #[test]
    fn test_flicker_draws_from_pool() {
        let (mut scene, maze) = labyrinth(WallTexturing::Flicker);
        let lights = LightRig::new(Vec3::ZERO);
        let mut plan = FramePlan::new();
        scene.build_plan(Vec3::ZERO, &lights, &mut plan);

        let pool = wall_pool();
        let walls: Vec<_> = plan.opaque.iter().filter(|b| b.mesh == CUBE).collect();
        let count: usize = walls.iter().map(|b| b.instances.len()).sum();
        assert_eq!(count, maze.wall_cells().count());
        assert!(walls.iter().all(|b| pool.contains(&b.texture.unwrap())));
        // Over a couple hundred walls a five-texture pool is fully used
        assert_eq!(walls.len(), pool.len());
    }

    #[test]
    fn test_lamp_gizmos() {
        let (mut scene, _) = labyrinth(WallTexturing::Stable);
        let lights = LightRig::new(Vec3::new(50.0, 0.0, 50.0));
        let mut plan = FramePlan::new();
        scene.build_plan(Vec3::ZERO, &lights, &mut plan);

        let lamps: Vec<&InstanceRaw> = plan.lamps.iter().flat_map(|b| b.instances.iter()).collect();
        assert_eq!(lamps[0].tint, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(lamps[0].model[0][0], POINT_LAMP_SCALE);
        let sun = lamps[NR_POINT_LIGHTS];
        assert_eq!(sun.tint, SUN_COLOR.to_array());
        assert_eq!(sun.model[0][0], SUN_LAMP_SCALE);
        assert_eq!(instance_position(sun), lights.sun_position());
    }

    #[test]
    fn test_no_lamp_mesh_no_gizmos() {
        let mut scene = Scene::new(Vec::new(), WallTexturing::Stable, ChaCha8Rng::seed_from_u64(0));
        scene.add(SceneObject::new(TERRAIN, None, Mat4::IDENTITY));
        let mut plan = FramePlan::new();
        scene.build_plan(Vec3::ZERO, &LightRig::new(Vec3::ZERO), &mut plan);
        assert!(plan.lamps.is_empty());
        assert_eq!(plan.opaque.len(), 1);
    }
}
