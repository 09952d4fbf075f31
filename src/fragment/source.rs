use std::sync::Arc;

use crate::foundation::{
    core::{Canvas, Rgba8Premul},
    error::{ShatterError, ShatterResult},
};

/// Decoded source pixels, premultiplied RGBA8, row-major, tightly packed.
///
/// Pixel data is shared behind an `Arc` so a background build can borrow it cheaply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    canvas: Canvas,
    rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> ShatterResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let expected = canvas
            .byte_len()
            .ok_or_else(|| ShatterError::invalid_input("source image size overflow"))?;
        if data.len() != expected {
            return Err(ShatterError::invalid_input(format!(
                "source image expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            canvas,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Premultiply a straight-alpha `image` buffer.
    pub fn from_rgba_image(img: &image::RgbaImage) -> ShatterResult<Self> {
        let (width, height) = img.dimensions();
        let mut data = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> ShatterResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let len = canvas
            .byte_len()
            .ok_or_else(|| ShatterError::invalid_input("source image size overflow"))?;
        let px = color.to_array();
        let data = (0..len).map(|i| px[i % 4]).collect();
        Self::from_premul_rgba8(width, height, data)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`; transparent outside the image.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul;
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fragment/source.rs"]
mod tests;
