use nalgebra::Point2;

use crate::image::{draw, Color, Image, Resolution};
use crate::scene::{BoxGeometry, PerspectiveCamera, Scene};

/// Rasterizes a [`Scene`] to a display surface.
pub trait SceneRenderer {
    /// Resizes the output surface.
    fn set_size(&mut self, res: Resolution);

    /// Draws one frame of `scene` as seen by `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()>;
}

impl<R: SceneRenderer + ?Sized> SceneRenderer for Box<R> {
    fn set_size(&mut self, res: Resolution) {
        (**self).set_size(res)
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()> {
        (**self).render(scene, camera)
    }
}

/// Software renderer drawing the scene's box as a wireframe onto a transparent [`Image`].
///
/// The surface is cleared to fully transparent black before every frame, so it can be composited
/// over the camera image.
pub struct WireframeRenderer {
    surface: Image,
    clear_color: Color,
}

impl WireframeRenderer {
    pub fn new(res: Resolution) -> Self {
        Self {
            surface: Image::with_resolution(res),
            clear_color: Color::NULL,
        }
    }

    /// Returns the most recently rendered frame.
    pub fn surface(&self) -> &Image {
        &self.surface
    }
}

impl SceneRenderer for WireframeRenderer {
    fn set_size(&mut self, res: Resolution) {
        if self.surface.resolution() != res {
            log::debug!("resizing render surface to {res}");
            self.surface = Image::with_resolution(res);
        }
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> anyhow::Result<()> {
        self.surface.clear(self.clear_color);

        let res = self.surface.resolution();
        let model = scene.object.model_matrix();
        let corners: [Option<Point2<f32>>; 8] = scene.geometry.corners().map(|corner| {
            camera
                .project(&model.transform_point(&corner))
                .map(|ndc| PerspectiveCamera::ndc_to_pixel(ndc, res))
        });

        for (a, b) in BoxGeometry::edges() {
            let (Some(a), Some(b)) = (corners[a], corners[b]) else {
                continue;
            };
            draw::line(
                &mut self.surface,
                a.x.round() as i32,
                a.y.round() as i32,
                b.x.round() as i32,
                b.y.round() as i32,
            )
            .color(scene.material.color);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn setup(res: Resolution) -> (Scene, PerspectiveCamera, WireframeRenderer) {
        let config = Config::default();
        (
            Scene::new(&config.object),
            PerspectiveCamera::new(&config.camera, res),
            WireframeRenderer::new(res),
        )
    }

    fn drawn_pixels(image: &Image) -> Vec<(u32, u32, Color)> {
        let mut out = Vec::new();
        for y in 0..image.height() {
            for x in 0..image.width() {
                let c = image.get(x, y);
                if c != Color::NULL {
                    out.push((x, y, c));
                }
            }
        }
        out
    }

    #[test]
    fn draws_wireframe_in_material_color() {
        let res = Resolution::new(100, 100);
        let (scene, camera, mut renderer) = setup(res);
        renderer.render(&scene, &camera).unwrap();

        let pixels = drawn_pixels(renderer.surface());
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|&(_, _, c)| c == scene.material.color));
        // Only edges are drawn, the middle of the box stays transparent.
        assert_eq!(renderer.surface().get(50, 50), Color::NULL);
        assert_eq!(renderer.surface().get(0, 0), Color::NULL);
    }

    #[test]
    fn follows_object_position() {
        let res = Resolution::new(100, 100);
        let (mut scene, camera, mut renderer) = setup(res);
        scene.object.set_position(1.0, 0.0, 0.0);
        renderer.render(&scene, &camera).unwrap();

        let pixels = drawn_pixels(renderer.surface());
        assert!(!pixels.is_empty());
        let mean_x = pixels.iter().map(|&(x, _, _)| x as f32).sum::<f32>() / pixels.len() as f32;
        assert!(mean_x > 60.0, "mean x = {mean_x}");
    }

    #[test]
    fn clears_between_frames() {
        let res = Resolution::new(64, 64);
        let (mut scene, camera, mut renderer) = setup(res);
        renderer.render(&scene, &camera).unwrap();
        scene.object.set_uniform_scale(0.0);
        renderer.render(&scene, &camera).unwrap();

        // A zero-scaled box collapses into (at most) the center pixel.
        let pixels = drawn_pixels(renderer.surface());
        assert!(pixels.len() <= 1, "{} pixels drawn", pixels.len());
    }

    #[test]
    fn set_size_reallocates() {
        let (_, _, mut renderer) = setup(Resolution::new(10, 10));
        renderer.set_size(Resolution::new(20, 5));
        assert_eq!(renderer.surface().resolution(), Resolution::new(20, 5));
    }
}
