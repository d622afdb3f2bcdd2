use shared::Color;

/// Something the world can be painted on.
///
/// Coordinates are in pixels. Rectangles may hang over the edges; the surface
/// clips them.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Color);
}

/// In-memory surface, one optional color per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Option<Color>>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; (width as usize) * (height as usize)],
        }
    }

    /// Change dimensions, dropping whatever was painted
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        *self = PixelBuffer::new(width, height);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            self.pixels[self.index(x, y)]
        } else {
            None
        }
    }

    /// Number of painted pixels
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(self.width as i64);
        let y1 = (y + height as i64).min(self.height as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                let index = self.index(px as u32, py as u32);
                self.pixels[index] = Some(color);
            }
        }
    }
}
