//! Normalized landmark points produced by a landmark detector.
//!
//! Landmark coordinates are *normalized*: `x` and `y` are in range 0.0 to 1.0 relative to the
//! width and height of the video frame they were detected in, with `y` pointing down like image
//! coordinates. `z` is a unitless relative depth.

use crate::image::Resolution;

type Position = [f32; 3];

/// An ordered, fixed-length collection of landmark positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|&pos| Landmark::new(pos))
    }

    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }
}

impl From<Vec<Position>> for Landmarks {
    fn from(positions: Vec<Position>) -> Self {
        Self {
            positions: positions.into_boxed_slice(),
        }
    }
}

/// A landmark in normalized frame coordinates.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: [f32; 3],
}

impl Landmark {
    pub fn new(position: [f32; 3]) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    /// Euclidean distance to `other` in the image plane, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x() - other.x()).hypot(self.y() - other.y())
    }

    /// Maps the normalized position onto a surface of the given resolution, in pixels.
    pub fn to_pixel(&self, res: Resolution) -> (i32, i32) {
        (
            (self.x() * res.width() as f32).round() as i32,
            (self.y() * res.height() as f32).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new([0.0, 0.0, 5.0]);
        let b = Landmark::new([0.3, 0.4, -2.0]);
        assert_relative_eq!(a.planar_distance(&b), 0.5);
        assert_relative_eq!(b.planar_distance(&a), 0.5);
    }

    #[test]
    fn to_pixel() {
        let lm = Landmark::new([0.5, 0.25, 0.0]);
        assert_eq!(lm.to_pixel(Resolution::new(640, 480)), (320, 120));
    }
}
