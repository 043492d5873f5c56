use thiserror::Error;

/// Channel floor above which a pixel still counts as paper-white.
/// Leaves a small tolerance for anti-aliasing artefacts.
pub const WHITE_THRESHOLD: u8 = 250;

/// Errors raised while constructing a raster from raw bytes.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Immutable row-major RGBA8 raster produced by a document renderer.
/// 由文件渲染器產生的不可變 RGBA8 點陣圖。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wraps a raw RGBA buffer, validating its length against the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow one row of pixels (4 bytes per pixel).
    ///
    /// # Panics
    /// Panics when `y` is outside the image.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of range (height {})", self.height);
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// True when every pixel on the row is white or nearly white.
    /// Alpha is ignored; rows outside the image are never blank.
    pub fn is_row_blank(&self, y: u32) -> bool {
        if y >= self.height {
            return false;
        }
        self.row(y).chunks_exact(4).all(|px| {
            px[0] >= WHITE_THRESHOLD && px[1] >= WHITE_THRESHOLD && px[2] >= WHITE_THRESHOLD
        })
    }
}

/// Mutable paint surface used while rasterizing a document.
/// Finished canvases are frozen into [`RasterImage`]s.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterCanvas {
    /// Creates a canvas filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills a rectangle, clamping it to the canvas bounds.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, rgba: [u8; 4]) {
        if width <= 0 || height <= 0 {
            return;
        }
        let x0 = x.clamp(0, self.width as i64);
        let y0 = y.clamp(0, self.height as i64);
        let x1 = (x + width).clamp(0, self.width as i64);
        let y1 = (y + height).clamp(0, self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize * 4;
        for yy in y0..y1 {
            let row_start = yy as usize * stride;
            for xx in x0..x1 {
                let idx = row_start + xx as usize * 4;
                self.data[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Freezes the canvas into an immutable raster.
    pub fn into_image(self) -> RasterImage {
        RasterImage {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        match RasterImage::from_rgba(4, 4, vec![0; 10]) {
            Err(RasterError::BufferSize {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn blank_row_tolerates_antialiasing() {
        let mut canvas = RasterCanvas::filled(3, 2, [255, 255, 255, 255]);
        canvas.fill_rect(0, 0, 3, 1, [250, 252, 251, 255]);
        canvas.fill_rect(1, 1, 1, 1, [249, 255, 255, 255]);
        let image = canvas.into_image();

        assert!(image.is_row_blank(0));
        assert!(!image.is_row_blank(1));
        assert!(!image.is_row_blank(2));
    }

    #[test]
    fn alpha_does_not_affect_blankness() {
        let image = RasterImage::from_rgba(1, 1, vec![255, 255, 255, 0]).unwrap();
        assert!(image.is_row_blank(0));
    }

    #[test]
    fn fill_rect_clamps_to_bounds() {
        let mut canvas = RasterCanvas::filled(4, 4, [255, 255, 255, 255]);
        canvas.fill_rect(-2, -2, 4, 4, [0, 0, 0, 255]);
        let image = canvas.into_image();
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(image.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(image.pixel(2, 2), Some([255, 255, 255, 255]));
    }
}
