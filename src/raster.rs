//! Anti-aliased line rasterization into a coverage buffer.

/// Largest `f32` below one. Coverage never reaches full saturation.
pub const MAX_COVERAGE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Per-pixel coverage of a row of square tiles, `resolution` pixels high and
/// `resolution * tile_count` pixels wide, stored row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageBuffer {
    pixels: Vec<f32>,
    resolution: u32,
    width: u32,
}

impl CoverageBuffer {
    pub fn new(resolution: u32, tile_count: usize) -> Self {
        let resolution = resolution.max(1);
        let width = resolution * tile_count.max(1) as u32;
        Self {
            pixels: vec![0.0; resolution as usize * width as usize],
            resolution,
            width,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.resolution
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<f32> {
        self.pixels
    }

    /// Coverage at image column `x` and row `row` (row 0 at the top).
    pub fn get(&self, x: u32, row: u32) -> Option<f32> {
        if x >= self.width || row >= self.resolution {
            return None;
        }
        self.pixels.get((row * self.width + x) as usize).copied()
    }

    /// Blends `weight` into the pixel at buffer coordinates `(x, y)`, with
    /// `y` growing upwards. Out-of-range coordinates are clamped to the
    /// nearest edge pixel.
    pub fn plot(&mut self, x: i32, y: i32, weight: f32) {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let row = (self.resolution as i32 - y).clamp(0, self.resolution as i32 - 1) as usize;
        let pixel = &mut self.pixels[row * self.width as usize + x];
        *pixel = blend(*pixel, weight);
    }

    /// Draws an anti-aliased line from `(x0, y0)` to `(x1, y1)`.
    ///
    /// The dominant axis is stepped one pixel at a time; at each step the
    /// coverage is split between the two pixels straddling the exact line,
    /// according to the sub-pixel error.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 > x1 { -1 } else { 1 };
        let sy = if y0 > y1 { -1 } else { 1 };
        let (mut x, mut y) = (x0, y0);

        if dx > dy {
            let grad = dy as f32 / dx as f32;
            let mut exact = y0 as f32;
            let mut err = dx as f32 / 2.0;
            while x != x1 {
                let offset = exact - y as f32;
                let coverage = offset.abs();
                self.plot(x, y + sign(offset), coverage);
                self.plot(x, y, 1.0 - coverage);
                exact += grad * sy as f32;
                err -= dy as f32;
                if err < 0.0 {
                    y += sy;
                    err += dx as f32;
                }
                x += sx;
            }
        } else {
            let grad = if dy == 0 { 1.0 } else { dx as f32 / dy as f32 };
            let mut exact = x0 as f32;
            let mut err = dy as f32 / 2.0;
            while y != y1 {
                let offset = exact - x as f32;
                let coverage = offset.abs();
                self.plot(x + sign(offset), y, coverage);
                self.plot(x, y, 1.0 - coverage);
                exact += grad * sx as f32;
                err -= dx as f32;
                if err < 0.0 {
                    x += sx;
                    err += dy as f32;
                }
                y += sy;
            }
        }
        self.plot(x, y, 1.0);
    }
}

/// Saturating blend: each stroke closes half of the remaining gap, scaled by
/// `weight`, so overlapping strokes approach but never reach full coverage.
pub fn blend(pixel: f32, weight: f32) -> f32 {
    let weight = weight.clamp(0.0, 1.0);
    (pixel + (1.0 - pixel) * 0.5 * weight).min(MAX_COVERAGE)
}

fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
