//! A 2D debug image represented as a flat array of RGBA pixels.

/// An RGBA debug image, row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Create a fully transparent image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Set a pixel. Writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&rgba);
        }
    }

    /// Read a pixel, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(rgba)
    }

    /// Paint every pixel with one color.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Nearest-neighbour upscale by an integer factor.
    pub fn upscaled(&self, factor: u32) -> Self {
        let factor = factor.max(1);
        let mut out = Self::new(self.width * factor, self.height * factor);
        for y in 0..out.height {
            for x in 0..out.width {
                if let Some(rgba) = self.get_pixel(x / factor, y / factor) {
                    out.set_pixel(x, y, rgba);
                }
            }
        }
        out
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count the unique colors (ignoring alpha) among opaque pixels.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = hashbrown::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            if chunk[3] > 0 {
                colors.insert((chunk[0], chunk[1], chunk[2]));
            }
        }
        colors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_image_correct_dimensions() {
        let image = DebugImage::new(64, 32);
        assert_eq!(image.dimensions(), (64, 32));
        assert_eq!(image.pixels.len(), 64 * 32 * 4);
        assert_eq!(image.get_pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_out_of_range_access_is_ignored() {
        let mut image = DebugImage::new(4, 4);
        image.set_pixel(4, 0, [255; 4]);
        assert!(image.pixels.iter().all(|&b| b == 0));
        assert_eq!(image.get_pixel(0, 4), None);
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut image = DebugImage::new(8, 8);
        image.set_pixel(2, 3, [10, 20, 30, 40]);
        assert_eq!(image.get_pixel(2, 3), Some([10, 20, 30, 40]));
        let idx = (3 * 8 + 2) * 4;
        assert_eq!(&image.pixels[idx..idx + 4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_upscale_repeats_pixels() {
        let mut image = DebugImage::new(2, 1);
        image.set_pixel(1, 0, [9, 9, 9, 255]);
        let big = image.upscaled(3);
        assert_eq!(big.dimensions(), (6, 3));
        assert_eq!(big.get_pixel(5, 2), Some([9, 9, 9, 255]));
        assert_eq!(big.get_pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_unique_color_count_skips_transparent() {
        let mut image = DebugImage::new(4, 1);
        image.set_pixel(0, 0, [255, 0, 0, 255]);
        image.set_pixel(1, 0, [0, 255, 0, 255]);
        image.set_pixel(2, 0, [255, 0, 0, 255]);
        assert_eq!(image.unique_color_count(), 2);

        image.fill([1, 2, 3, 255]);
        assert_eq!(image.unique_color_count(), 1);
    }
}
