//! Drawing primitives for visualizing landmarks and wireframes.
//!
//! Every function returns a guard that draws when dropped, so that optional parameters can be
//! customized with method calls first.

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    prelude::*,
    primitives::{self, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
};

use crate::image::{Color, Image};

/// Guard returned by [`marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl<'a> DrawMarker<'a> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the diameter of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result in
    /// a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let radius = ((self.size - 1) / 2) as i32;
        let style = PrimitiveStyleBuilder::new().fill_color(self.color).build();
        match primitives::Circle::new(
            Point::new(self.x - radius, self.y - radius),
            self.size,
        )
        .into_styled(style)
        .draw(&mut Target(self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`line`][line()]; draws the line when dropped and allows customization.
pub struct DrawLine<'a> {
    image: &'a mut Image,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    color: Color,
    stroke_width: u32,
}

impl<'a> DrawLine<'a> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl<'a> Drop for DrawLine<'a> {
    fn drop(&mut self) {
        match Line::new(
            Point::new(self.start_x, self.start_y),
            Point::new(self.end_x, self.end_y),
        )
        .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
        .draw(&mut Target(self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws a filled circular marker centered on `(x, y)`.
///
/// This is used to visualize landmarks.
pub fn marker(image: &mut Image, x: i32, y: i32) -> DrawMarker<'_> {
    DrawMarker {
        image,
        x,
        y,
        color: Color::RED,
        size: 5,
    }
}

/// Draws a line onto an image.
pub fn line(image: &mut Image, start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> DrawLine<'_> {
    DrawLine {
        image,
        start_x,
        start_y,
        end_x,
        end_y,
        color: Color::BLUE,
        stroke_width: 1,
    }
}

struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        let (width, height) = (self.0.width(), self.0.height());

        Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size { width, height },
        }
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && (point.x as u32) < self.0.width()
                && point.y >= 0
                && (point.y as u32) < self.0.height()
            {
                self.0.set(point.x as _, point.y as _, color);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_drawn_in_color() {
        let mut image = Image::new(10, 10);
        line(&mut image, 0, 5, 9, 5).color(Color::GREEN);
        for x in 0..10 {
            assert_eq!(image.get(x, 5), Color::GREEN);
        }
        assert_eq!(image.get(5, 0), Color::NULL);
    }

    #[test]
    fn out_of_bounds_is_clipped() {
        let mut image = Image::new(4, 4);
        line(&mut image, -10, -10, 20, 20).color(Color::RED);
        marker(&mut image, 100, 100);
        assert_eq!(image.get(0, 0), Color::RED);
        assert_eq!(image.get(3, 3), Color::RED);
    }

    #[test]
    fn marker_is_centered() {
        let mut image = Image::new(11, 11);
        marker(&mut image, 5, 5).size(3).color(Color::WHITE);
        assert_eq!(image.get(5, 5), Color::WHITE);
        assert_eq!(image.get(0, 0), Color::NULL);
        assert_eq!(image.get(10, 10), Color::NULL);
    }
}
