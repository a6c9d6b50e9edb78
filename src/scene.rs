//! The 3D scene: a single tracked box, viewed through a perspective camera.
//!
//! # Coordinates
//!
//! The scene uses a right-handed coordinate system: X points to the right, Y points up, and the
//! camera looks down the negative Z axis. Rotations are Euler angles in radians, applied in XYZ
//! order.

mod camera;
mod renderer;

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::config::ObjectConfig;
use crate::image::Color;

pub use camera::PerspectiveCamera;
pub use renderer::{SceneRenderer, WireframeRenderer};

/// Euler angles in radians, applied in XYZ order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.z)
    }
}

/// The object whose transform follows the tracked hand.
///
/// It starts out at the origin, at scale 1 and without rotation, and lives as long as the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    position: Vector3<f32>,
    scale: Vector3<f32>,
    rotation: Euler,
}

impl Default for TrackedObject {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
            rotation: Euler::ZERO,
        }
    }
}

impl TrackedObject {
    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    #[inline]
    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    #[inline]
    pub fn rotation(&self) -> Euler {
        self.rotation
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
    }

    /// Sets the same scale factor on all three axes.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::repeat(scale);
    }

    pub fn set_rotation(&mut self, rotation: Euler) {
        self.rotation = rotation;
    }

    pub fn rotation_mut(&mut self) -> &mut Euler {
        &mut self.rotation
    }

    /// Object-to-world matrix: scale, then rotate, then translate.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation.to_rotation().to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// An axis-aligned box centered on its object's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    size: f32,
}

impl BoxGeometry {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns the 8 corners in object space.
    ///
    /// Bit 0 of the index selects +X, bit 1 selects +Y and bit 2 selects +Z.
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let h = self.size / 2.0;
        std::array::from_fn(|i| {
            let pick = |bit: usize| if i & bit != 0 { h } else { -h };
            Point3::new(pick(1), pick(2), pick(4))
        })
    }

    /// Returns the 12 edges as pairs of indices into [`BoxGeometry::corners`].
    pub fn edges() -> impl Iterator<Item = (usize, usize)> {
        itertools::iproduct!(0..8usize, [1usize, 2, 4])
            .filter(|&(corner, bit)| corner & bit == 0)
            .map(|(corner, bit)| (corner, corner | bit))
    }
}

/// Unlit wireframe material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireframeMaterial {
    pub color: Color,
}

/// Everything the renderer draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub object: TrackedObject,
    pub geometry: BoxGeometry,
    pub material: WireframeMaterial,
}

impl Scene {
    pub fn new(config: &ObjectConfig) -> Self {
        Self {
            object: TrackedObject::default(),
            geometry: BoxGeometry::new(config.size),
            material: WireframeMaterial {
                color: config.color,
            },
        }
    }
}
