//! Scene Lights
//!
//! One directional sun orbiting the maze pad, a row of seven coloured point
//! lights bobbing above it, and a head lamp that follows the camera.
//! [`LightRig::update`] animates everything from elapsed time;
//! [`LightRig::write_uniforms`] copies the result into the GPU block.

use std::f32::consts::PI;

use glam::{Vec3, Vec4};

use crate::render::{GpuDirLight, GpuPointLight, GpuSpotLight, SceneUniforms, NR_POINT_LIGHTS};

/// Horizontal distance of the suns from the pad center.
pub const SUN_RADIUS: f32 = 150.0;
/// Sun orbit speed (radians per second).
pub const SUN_SPEED: f32 = 0.5;
pub const SUN_HEIGHT: f32 = 301.0;

pub const POINT_LIGHT_BASE_Y: f32 = 102.0;
pub const POINT_LIGHT_AMPLITUDE: f32 = 2.0;
pub const POINT_LIGHT_SPEED: f32 = 2.0;

/// Lamp gizmo colours for the two suns.
pub const SUN_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
pub const SECOND_SUN_COLOR: Vec4 = Vec4::new(1.0, 0.5, 0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Attenuation coefficients `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Roughly a 50 unit falloff.
    pub const MEDIUM: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// Light whose ambient is a tenth of its colour and specular the full colour.
    pub fn coloured(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            ambient: color * 0.1,
            diffuse: color,
            specular: color,
            attenuation: Attenuation::MEDIUM,
        }
    }

    fn to_gpu(self) -> GpuPointLight {
        GpuPointLight {
            position: self.position.to_array(),
            constant_term: self.attenuation.constant,
            ambient: self.ambient.to_array(),
            linear_term: self.attenuation.linear,
            diffuse: self.diffuse.to_array(),
            quadratic_term: self.attenuation.quadratic,
            specular: self.specular.to_array(),
            _pad0: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
    /// Cosine of the inner cone half angle
    pub cut_off: f32,
    /// Cosine of the outer cone half angle
    pub outer_cut_off: f32,
}

/// All lights of the scene plus the two sun positions for gizmos.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    /// Point the suns orbit and shine at
    pub center: Vec3,
    pub sun: DirLight,
    pub points: [PointLight; NR_POINT_LIGHTS],
    pub head_lamp: SpotLight,
    sun_position: Vec3,
    second_sun_position: Vec3,
}

impl LightRig {
    /// Lights arranged around `center`, animated to time zero.
    pub fn new(center: Vec3) -> Self {
        // Rainbow row along x
        let colors = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.29, 0.0, 0.51),
            Vec3::new(0.5, 0.0, 1.0),
        ];
        let points = std::array::from_fn(|i| {
            PointLight::coloured(Vec3::new(30.0 + 5.0 * i as f32, POINT_LIGHT_BASE_Y, 45.0), colors[i])
        });

        let mut rig = Self {
            center,
            sun: DirLight {
                direction: Vec3::new(-0.2, -1.0, -0.3).normalize(),
                ambient: Vec3::splat(0.05),
                diffuse: Vec3::splat(0.4),
                specular: Vec3::splat(0.5),
            },
            points,
            head_lamp: SpotLight {
                position: Vec3::ZERO,
                direction: Vec3::NEG_Z,
                ambient: Vec3::ZERO,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                attenuation: Attenuation::MEDIUM,
                cut_off: 12.5f32.to_radians().cos(),
                outer_cut_off: 15.0f32.to_radians().cos(),
            },
            sun_position: Vec3::ZERO,
            second_sun_position: Vec3::ZERO,
        };
        rig.update(0.0, Vec3::ZERO, Vec3::NEG_Z);
        rig
    }

    /// Animate to `time` seconds and attach the head lamp to the camera.
    pub fn update(&mut self, time: f32, eye: Vec3, front: Vec3) {
        let angle = time * SUN_SPEED;
        self.sun_position = self.orbit(angle);
        self.second_sun_position = self.orbit(angle + PI);
        self.sun.direction = (self.center - self.sun_position).normalize();

        for (i, light) in self.points.iter_mut().enumerate() {
            light.position.y =
                POINT_LIGHT_BASE_Y + (time * POINT_LIGHT_SPEED + i as f32).sin() * POINT_LIGHT_AMPLITUDE;
        }

        self.head_lamp.position = eye;
        self.head_lamp.direction = front;
    }

    fn orbit(&self, angle: f32) -> Vec3 {
        Vec3::new(
            self.center.x + angle.sin() * SUN_RADIUS,
            SUN_HEIGHT,
            self.center.z + angle.cos() * SUN_RADIUS,
        )
    }

    /// Position of the sun that drives the directional light.
    pub fn sun_position(&self) -> Vec3 {
        self.sun_position
    }

    /// Position of the decorative sun on the opposite side of the orbit.
    pub fn second_sun_position(&self) -> Vec3 {
        self.second_sun_position
    }

    /// Copy every light into the uniform block.
    pub fn write_uniforms(&self, uniforms: &mut SceneUniforms) {
        uniforms.dir_light = GpuDirLight {
            direction: self.sun.direction.to_array(),
            ambient: self.sun.ambient.to_array(),
            diffuse: self.sun.diffuse.to_array(),
            specular: self.sun.specular.to_array(),
            ..Default::default()
        };
        for (slot, light) in uniforms.point_lights.iter_mut().zip(&self.points) {
            *slot = light.to_gpu();
        }

        let spot = &self.head_lamp;
        uniforms.spot_light = GpuSpotLight {
            position: spot.position.to_array(),
            cut_off: spot.cut_off,
            direction: spot.direction.to_array(),
            outer_cut_off: spot.outer_cut_off,
            ambient: spot.ambient.to_array(),
            constant_term: spot.attenuation.constant,
            diffuse: spot.diffuse.to_array(),
            linear_term: spot.attenuation.linear,
            specular: spot.specular.to_array(),
            quadratic_term: spot.attenuation.quadratic,
        };
    }
}
