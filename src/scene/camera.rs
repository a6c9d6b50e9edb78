use nalgebra::{Matrix4, Perspective3, Point2, Point3};

use crate::config::CameraConfig;
use crate::image::Resolution;

/// A perspective camera looking down the negative Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    fov_y_radians: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Point3<f32>,
    projection: Perspective3<f32>,
}

impl PerspectiveCamera {
    /// Creates a camera with the configured lens, placed `config.distance` units in front of the
    /// origin, with the aspect ratio of `viewport`.
    ///
    /// A degenerate `viewport` falls back to an aspect ratio of 1.
    pub fn new(config: &CameraConfig, viewport: Resolution) -> Self {
        let fov_y_radians = config.fov_degrees.to_radians();
        let aspect = viewport.aspect_ratio().unwrap_or(1.0);
        Self {
            fov_y_radians,
            aspect,
            near: config.near,
            far: config.far,
            position: Point3::new(0.0, 0.0, config.distance),
            projection: Perspective3::new(aspect, fov_y_radians, config.near, config.far),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_radians
    }

    #[inline]
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Updates the aspect ratio and recomputes the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.projection = Perspective3::new(aspect, self.fov_y_radians, self.near, self.far);
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&-self.position.coords)
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        self.projection.as_matrix()
    }

    /// Projects a point in world space to normalized device coordinates (both axes in `-1..=1`
    /// when the point is in view, Y pointing up).
    ///
    /// Returns [`None`] for points at or behind the near plane.
    pub fn project(&self, world: &Point3<f32>) -> Option<Point2<f32>> {
        let view = self.view_matrix().transform_point(world);
        if -view.z < self.near {
            return None;
        }
        let ndc = self.projection.project_point(&view);
        Some(Point2::new(ndc.x, ndc.y))
    }

    /// Converts normalized device coordinates to pixel coordinates on a surface of size `res`.
    pub fn ndc_to_pixel(ndc: Point2<f32>, res: Resolution) -> Point2<f32> {
        let (w, h) = (res.width() as f32, res.height() as f32);
        Point2::new((ndc.x + 1.0) * w / 2.0, (1.0 - ndc.y) * h / 2.0)
    }
}
