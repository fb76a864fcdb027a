//! Labyrinth Walk
//!
//! Run with: `cargo run --bin labyrinth`
//!
//! Controls:
//! - WASD: Walk
//! - Mouse: Look around
//! - Scroll: Zoom
//! - Space: Jump
//! - F10: Toggle fullscreen
//! - F11: Cycle antialiasing (saved, applied on restart)
//! - F12: Toggle vsync
//! - ESC: Exit
//!
//! Settings are read from `app_settings.json` in the working directory and
//! the window geometry is written back on exit.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

use labyrinth_engine::audio::JumpSound;
use labyrinth_engine::game::assets;
use labyrinth_engine::game::{
    build_terrain_mesh, AppSettings, LightRig, MazeGrid, Scene, SceneMeshes, SceneTextures,
    SettingsStore, WallTexturing, MAZE_COLS, MAZE_ROWS, PAD, PAD_HEIGHT,
};
use labyrinth_engine::render::{
    load_obj, load_shader_module, FramePlan, GpuContext, GpuContextConfig, Mesh, Renderer,
    SceneUniforms, Texture, TextureId,
};
use labyrinth_engine::{FpsCamera, Heightfield, InputAction, InputState, KeyCode, PlayerController};

/// Where the player starts, just south of the maze pad.
const START_POSITION: Vec3 = Vec3::new(43.0, 103.0, 60.0);

/// Everything that needs the GPU, created once the window exists.
struct World {
    gpu: GpuContext,
    renderer: Renderer,
    scene: Scene,
    lights: LightRig,
    heightfield: Heightfield,
    plan: FramePlan,
    uniforms: SceneUniforms,
}

struct LabyrinthApp {
    store: SettingsStore,
    settings: AppSettings,
    window: Option<Arc<Window>>,
    world: Option<World>,
    input: InputState,
    camera: FpsCamera,
    player: PlayerController,
    jump_sound: JumpSound,
    started: Instant,
    last_frame: Instant,
    last_title_update: Instant,
    frames_since_title: u32,
    startup_error: Option<anyhow::Error>,
}

impl LabyrinthApp {
    fn new(store: SettingsStore) -> Self {
        let settings = store.load();
        log::info!(
            "Antialiasing {}",
            if settings.antialiasing.enabled {
                format!("enabled at {}", settings.antialiasing)
            } else {
                "disabled".to_string()
            }
        );
        let now = Instant::now();
        Self {
            store,
            settings,
            window: None,
            world: None,
            input: InputState::new(),
            camera: FpsCamera::with_position(START_POSITION),
            player: PlayerController::new(START_POSITION),
            jump_sound: JumpSound::load(assets::JUMP_SOUND),
            started: now,
            last_frame: now,
            last_title_update: now,
            frames_since_title: 0,
            startup_error: None,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let gpu = GpuContext::new(
            Arc::clone(&window),
            GpuContextConfig {
                vsync: self.settings.window.vsync,
                sample_count: self.settings.antialiasing.sample_count(),
                high_performance: true,
            },
        )
        .context("GPU initialization failed")?;
        let device = &gpu.device;

        let phong = load_shader_module(device, assets::PHONG_SHADER)?;
        let lamp = load_shader_module(device, assets::LAMP_SHADER)?;
        let mut renderer = Renderer::new(&gpu, &phong, &lamp);

        let load_texture = |renderer: &mut Renderer, path: &Path| -> anyhow::Result<TextureId> {
            let texture = Texture::load(device, &gpu.queue, path)?;
            Ok(renderer.add_texture(device, texture))
        };
        let crate_box = load_texture(&mut renderer, Path::new(assets::BOX_TEXTURE))?;
        let atlas = load_texture(&mut renderer, Path::new(assets::TERRAIN_ATLAS))?;
        let mut wall_textures = Vec::new();
        for path in assets::wall_texture_paths(assets::TEXTURE_DIR)? {
            wall_textures.push(load_texture(&mut renderer, &path)?);
        }
        log::info!("{} wall textures loaded", wall_textures.len());

        let mut heightfield = Heightfield::from_image(assets::HEIGHTMAP)?;
        let (min, max) = heightfield.min_max();
        log::info!("Heightmap min: {min}, max: {max}");
        heightfield.normalize();
        let terrain: Mesh = build_terrain_mesh(&mut heightfield, 1, PAD, PAD_HEIGHT);

        let meshes = SceneMeshes {
            cube: renderer.add_mesh(device, &load_obj(assets::CUBE_MESH)?, "cube"),
            terrain: renderer.add_mesh(device, &terrain, "terrain"),
            ornament: renderer.add_mesh(device, &load_obj(assets::ORNAMENT_MESH)?, "ornament"),
        };

        let mut rng = ChaCha8Rng::from_entropy();
        let maze = MazeGrid::generate(MAZE_ROWS, MAZE_COLS, &mut rng)?;
        log::info!("Maze:\n{maze}");

        let mut scene = Scene::new(wall_textures, WallTexturing::default(), rng);
        scene.populate_labyrinth(meshes, SceneTextures { atlas, crate_box }, &maze, PAD, PAD_HEIGHT);

        let (cx, cz) = PAD.center();
        let lights = LightRig::new(Vec3::new(cx, 0.0, cz));

        self.world = Some(World {
            gpu,
            renderer,
            scene,
            lights,
            heightfield,
            plan: FramePlan::new(),
            uniforms: SceneUniforms::default(),
        });
        self.capture_cursor(&window);
        self.window = Some(window);
        Ok(())
    }

    fn capture_cursor(&mut self, window: &Window) {
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
        }
        window.set_cursor_visible(false);
        self.input.mouse.set_captured(true);
    }

    fn release_cursor(&mut self) {
        if let Some(window) = &self.window {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
        self.input.mouse.set_captured(false);
    }

    fn handle_actions(&mut self, event_loop: &ActiveEventLoop) {
        for action in self.input.drain_actions() {
            match action {
                InputAction::Quit => event_loop.exit(),
                InputAction::ToggleFullscreen => self.toggle_fullscreen(),
                InputAction::ToggleVsync => {
                    self.settings.window.vsync = !self.settings.window.vsync;
                    if let Some(world) = &mut self.world {
                        world.gpu.set_vsync(self.settings.window.vsync);
                    }
                }
                InputAction::CycleAntialiasing => match self.store.cycle_antialiasing() {
                    Ok(next) => log::info!("Antialiasing set to {next}, restart to apply"),
                    Err(e) => log::warn!("Cannot change antialiasing: {e}"),
                },
                _ => {}
            }
        }
    }

    /// Switch to borderless fullscreen and back, restoring the windowed
    /// position and size afterwards.
    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let settings = &mut self.settings.window;
        settings.fullscreen = !settings.fullscreen;

        if settings.fullscreen {
            if let Ok(position) = window.outer_position() {
                settings.pos_x = position.x;
                settings.pos_y = position.y;
            }
            let size = window.inner_size();
            settings.width = size.width;
            settings.height = size.height;
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window.set_fullscreen(None);
            let _ = window.request_inner_size(PhysicalSize::new(settings.width, settings.height));
            window.set_outer_position(PhysicalPosition::new(settings.pos_x, settings.pos_y));
        }
    }

    fn update(&mut self, dt: f32) {
        let (dx, dy) = self.input.mouse.consume_delta();
        self.camera.apply_mouse_delta(dx, dy);
        self.camera.apply_scroll(self.input.mouse.consume_scroll());

        let Some(world) = &mut self.world else {
            return;
        };
        let step = self
            .player
            .update(dt, &self.input.movement, self.camera.front(), &world.heightfield);
        self.camera.position = self.player.position;
        if step.jumped {
            self.jump_sound.play();
        }

        let time = self.started.elapsed().as_secs_f32();
        world.lights.update(time, self.camera.position, self.camera.front());
        world.scene.update(time);
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(world) = &mut self.world else {
            return;
        };
        let view_proj = self.camera.projection_matrix(world.gpu.aspect_ratio()) * self.camera.view_matrix();
        world.uniforms.set_camera(view_proj, self.camera.position);
        world.lights.write_uniforms(&mut world.uniforms);
        world.scene.build_plan(self.camera.position, &world.lights, &mut world.plan);

        match world.renderer.render(&world.gpu, &world.uniforms, &world.plan) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => world.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipped frame: {e}"),
        }
    }

    fn update_title(&mut self, now: Instant) {
        self.frames_since_title += 1;
        let elapsed = now.duration_since(self.last_title_update).as_secs_f32();
        if elapsed < 1.0 {
            return;
        }
        let fps = (self.frames_since_title as f32 / elapsed).round();
        self.frames_since_title = 0;
        self.last_title_update = now;

        let Some(window) = &self.window else {
            return;
        };
        let on_off = |on: bool| if on { "On" } else { "Off" };
        let aa = &self.settings.antialiasing;
        let aa = if aa.enabled { format!("On ({aa})") } else { "Off".to_string() };
        let p = self.camera.position;
        window.set_title(&format!(
            "{} | FPS: {fps} | VSync (F12): {} | Fullscreen (F10): {} | AA (F11): {aa} | Position: ({:.2}, {:.2}, {:.2})",
            self.settings.window.title,
            on_off(self.settings.window.vsync),
            on_off(self.settings.window.fullscreen),
            p.x,
            p.y,
            p.z
        ));
    }

    fn save_settings(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let settings = &mut self.settings.window;
        // Fullscreen geometry is not worth keeping; the windowed one was saved on the switch
        if !settings.fullscreen {
            if let Ok(position) = window.outer_position() {
                settings.pos_x = position.x;
                settings.pos_y = position.y;
            }
            let size = window.inner_size();
            settings.width = size.width;
            settings.height = size.height;
        }
        match self.store.save_window(settings) {
            Ok(()) => log::info!("Saved window settings to {}", self.store.path().display()),
            Err(e) => log::warn!("Cannot save settings: {e}"),
        }
    }
}

impl ApplicationHandler for LabyrinthApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }
        let settings = &self.settings.window;
        let mut attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height))
            .with_position(PhysicalPosition::new(settings.pos_x, settings.pos_y));
        if settings.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let result = event_loop
            .create_window(attrs)
            .context("cannot create the window")
            .and_then(|window| self.initialize(Arc::new(window)));
        if let Err(e) = result {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input
                        .handle_key(map_key(key), event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => {
                if !self.input.mouse.is_captured() {
                    if let Some(window) = self.window.clone() {
                        self.capture_cursor(&window);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.input.mouse.accumulate_scroll(steps);
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
                self.release_cursor();
            }
            WindowEvent::Resized(size) => {
                if let Some(world) = &mut self.world {
                    world.gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;
                self.update_title(now);

                self.handle_actions(event_loop);
                self.update(dt);
                self.render(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input
                .mouse
                .accumulate_delta(delta.0 as f32, delta.1 as f32);
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        self.save_settings();
    }
}

fn map_key(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::Space => KeyCode::Space,
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::F10 => KeyCode::F10,
        WinitKey::F11 => KeyCode::F11,
        WinitKey::F12 => KeyCode::F12,
        WinitKey::Escape => KeyCode::Escape,
        _ => KeyCode::Unknown,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("===========================================");
    log::info!("   Labyrinth Walk");
    log::info!("===========================================");
    log::info!("Controls: WASD Move, Mouse Look, Space Jump, Scroll Zoom");
    log::info!("F10: Fullscreen, F11: Antialiasing (restart), F12: VSync, ESC: Exit");

    let event_loop = EventLoop::new().context("cannot create the event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LabyrinthApp::new(SettingsStore::default());
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
