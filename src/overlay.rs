//! 2D landmark overlay drawn on top of the camera image.

use crate::config::{OverlayConfig, StyleConfig};
use crate::hand::LandmarkIdx;
use crate::image::{draw, Color, Image, Resolution};
use crate::landmark::Landmarks;

/// How connectors or landmark markers are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingStyle {
    pub color: Color,
    pub line_width: u32,
}

impl DrawingStyle {
    /// Line width clamped to what the overlay is willing to draw.
    fn clamped_width(&self) -> u32 {
        self.line_width.clamp(1, StyleConfig::MAX_LINE_WIDTH)
    }
}

impl From<&StyleConfig> for DrawingStyle {
    fn from(config: &StyleConfig) -> Self {
        Self {
            color: config.color,
            line_width: config.line_width,
        }
    }
}

/// The connector and landmark styles used for every detected hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub connectors: DrawingStyle,
    pub landmarks: DrawingStyle,
}

impl From<&OverlayConfig> for OverlayStyle {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            connectors: (&config.connectors).into(),
            landmarks: (&config.landmarks).into(),
        }
    }
}

/// A 2D surface that visualizes detected landmarks.
///
/// Landmark coordinates are normalized, so implementations scale them by their own resolution.
pub trait OverlayDrawer {
    /// Resizes the drawing surface, discarding its contents.
    fn resize(&mut self, res: Resolution);

    fn resolution(&self) -> Resolution;

    /// Erases everything drawn so far.
    fn clear(&mut self);

    /// Draws a line between every pair of `connections`.
    fn draw_connectors(
        &mut self,
        landmarks: &Landmarks,
        connections: &[(LandmarkIdx, LandmarkIdx)],
        style: &DrawingStyle,
    );

    /// Draws a marker on every landmark.
    fn draw_landmarks(&mut self, landmarks: &Landmarks, style: &DrawingStyle);
}

impl<O: OverlayDrawer + ?Sized> OverlayDrawer for Box<O> {
    fn resize(&mut self, res: Resolution) {
        (**self).resize(res)
    }

    fn resolution(&self) -> Resolution {
        (**self).resolution()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn draw_connectors(
        &mut self,
        landmarks: &Landmarks,
        connections: &[(LandmarkIdx, LandmarkIdx)],
        style: &DrawingStyle,
    ) {
        (**self).draw_connectors(landmarks, connections, style)
    }

    fn draw_landmarks(&mut self, landmarks: &Landmarks, style: &DrawingStyle) {
        (**self).draw_landmarks(landmarks, style)
    }
}

/// [`OverlayDrawer`] painting onto a transparent [`Image`].
pub struct ImageOverlay {
    image: Image,
}

impl ImageOverlay {
    /// Creates an empty overlay.
    ///
    /// The overlay starts out with a size of 0x0; it has to be resized to the video resolution
    /// before anything becomes visible.
    pub fn new() -> Self {
        Self {
            image: Image::new(0, 0),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }
}

impl Default for ImageOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayDrawer for ImageOverlay {
    fn resize(&mut self, res: Resolution) {
        self.image = Image::with_resolution(res);
    }

    fn resolution(&self) -> Resolution {
        self.image.resolution()
    }

    fn clear(&mut self) {
        self.image.clear(Color::NULL);
    }

    fn draw_connectors(
        &mut self,
        landmarks: &Landmarks,
        connections: &[(LandmarkIdx, LandmarkIdx)],
        style: &DrawingStyle,
    ) {
        let res = self.image.resolution();
        for &(a, b) in connections {
            let (ax, ay) = landmarks.get(a as usize).to_pixel(res);
            let (bx, by) = landmarks.get(b as usize).to_pixel(res);
            draw::line(&mut self.image, ax, ay, bx, by)
                .color(style.color)
                .stroke_width(style.clamped_width());
        }
    }

    fn draw_landmarks(&mut self, landmarks: &Landmarks, style: &DrawingStyle) {
        let res = self.image.resolution();
        // Markers are sized like a stroke around a small dot, and must have an uneven diameter.
        let size = 2 * style.clamped_width() + 1;
        for lm in landmarks.iter() {
            let (x, y) = lm.to_pixel(res);
            draw::marker(&mut self.image, x, y)
                .color(style.color)
                .size(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hand::HAND_CONNECTIONS;
    use crate::test::hand_with;

    fn style() -> OverlayStyle {
        (&Config::default().overlay).into()
    }

    #[test]
    fn default_styles() {
        let style = style();
        assert_eq!(style.connectors.color, Color::GREEN);
        assert_eq!(style.connectors.line_width, 5);
        assert_eq!(style.landmarks.color, Color::RED);
        assert_eq!(style.landmarks.line_width, 2);
    }

    #[test]
    fn draws_landmark_at_pixel_position() {
        let mut overlay = ImageOverlay::new();
        overlay.resize(Resolution::new(100, 50));
        let hand = hand_with([0.2, 0.4], [0.5, 0.5], [0.5, 0.5]);
        overlay.draw_landmarks(hand.landmarks(), &style().landmarks);

        assert_eq!(overlay.image().get(20, 20), Color::RED);
        assert_eq!(overlay.image().get(50, 25), Color::RED);
        assert_eq!(overlay.image().get(0, 0), Color::NULL);
    }

    #[test]
    fn connectors_then_clear() {
        let mut overlay = ImageOverlay::new();
        overlay.resize(Resolution::new(100, 100));
        let hand = hand_with([0.1, 0.1], [0.9, 0.9], [0.1, 0.9]);
        overlay.draw_connectors(hand.landmarks(), HAND_CONNECTIONS, &style().connectors);
        assert!(overlay.image().pixels().any(|c| c == Color::GREEN));

        overlay.clear();
        assert!(overlay.image().pixels().all(|c| c == Color::NULL));
        assert_eq!(overlay.resolution(), Resolution::new(100, 100));
    }

    #[test]
    fn oversized_width_is_clamped() {
        let mut overlay = ImageOverlay::new();
        overlay.resize(Resolution::new(200, 200));
        let hand = hand_with([0.5, 0.5], [0.5, 0.5], [0.5, 0.5]);
        let style = DrawingStyle {
            color: Color::RED,
            line_width: u32::MAX,
        };
        overlay.draw_landmarks(hand.landmarks(), &style);
        overlay.draw_connectors(hand.landmarks(), HAND_CONNECTIONS, &style);

        // Markers are capped at a radius of 64 pixels.
        assert_eq!(overlay.image().get(100 - 60, 100), Color::RED);
        assert_eq!(overlay.image().get(100 - 70, 100), Color::NULL);
    }

    #[test]
    fn starts_empty() {
        let overlay = ImageOverlay::default();
        assert_eq!(overlay.resolution(), Resolution::new(0, 0));
    }
}
