use crate::foundation::error::{ShatterError, ShatterResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ShatterResult<Self> {
        if den == 0 {
            return Err(ShatterError::invalid_input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ShatterError::invalid_input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }
}

/// Pixel dimensions of an image or output surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ShatterResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShatterError::invalid_input(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// The `[0, width) x [0, height)` rectangle in pixel space.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn diagonal(self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }

    pub fn byte_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Translate / rotate / scale about an anchor point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: Vec2,  // default (1,1)
    pub anchor: Vec2, // pivot in source space
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);
        let t_scale = Affine::scale_non_uniform(self.scale.x, self.scale.y);

        // Canonical order:
        // T(translate) * T(anchor) * R(rot) * S(scale) * T(-anchor)
        t_translate * t_anchor * t_rotate * t_scale * t_unanchor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
