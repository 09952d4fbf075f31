use crate::{
    foundation::{
        core::{Affine, Canvas, Point, Rgba8Premul},
        error::{ShatterError, ShatterResult},
        math::{mul_div255_u16, unit_to_u8},
    },
    fragment::{extract::Fragment, source::SourceImage},
    motion::state::MotionState,
    render::composite::{fill, over_weighted, toward_white},
};

/// CPU output surface: premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> ShatterResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let len = canvas
            .byte_len()
            .ok_or_else(|| ShatterError::invalid_input("frame size overflow"))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
            premultiplied: true,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Un-premultiply into a straight-alpha `image` buffer, e.g. for saving to disk.
    pub fn to_rgba_image(&self) -> ShatterResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        if self.premultiplied {
            for px in straight.chunks_exact_mut(4) {
                let a = u32::from(px[3]);
                if a == 0 {
                    px[..3].fill(0);
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| ShatterError::render("frame buffer does not match its dimensions"))
    }

    fn check(&self) -> ShatterResult<()> {
        let expected = self.canvas().byte_len();
        if expected != Some(self.data.len()) {
            return Err(ShatterError::render(format!(
                "target {}x{} expects {:?} bytes, has {}",
                self.width,
                self.height,
                expected,
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// Layer drawn under the fragments: the scene being revealed.
#[derive(Clone, Copy, Debug)]
pub enum Background<'a> {
    Transparent,
    Solid(Rgba8Premul),
    /// Drawn at the surface origin, clipped to the surface.
    Image(&'a SourceImage),
}

/// One fragment placed for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FragmentDraw {
    /// Position in the session's fragment list.
    pub fragment: usize,
    /// Source-image space to screen space.
    pub transform: Affine,
    pub opacity: f64,
}

/// Everything the compositor needs to draw one frame, in draw order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameDrawCommands {
    /// Seconds since session start.
    pub elapsed: f64,
    /// Blend toward white applied to every fragment, in `[0, 1]`.
    pub glare: f64,
    pub draws: Vec<FragmentDraw>,
}

/// Draws fragments over a background. Rendering never mutates fragment data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compositor {
    crack_inset: f64,
}

impl Default for Compositor {
    fn default() -> Self {
        Self { crack_inset: 1.0 }
    }
}

impl Compositor {
    /// `crack_inset` scales each fragment about its centroid at draw time.
    pub fn new(crack_inset: f64) -> Self {
        Self { crack_inset }
    }

    /// Turn per-fragment states into draw commands (insertion order).
    pub fn commands(
        &self,
        fragments: &[Fragment],
        states: &[MotionState],
        elapsed: f64,
        glare: f64,
    ) -> ShatterResult<FrameDrawCommands> {
        if fragments.len() != states.len() {
            return Err(ShatterError::render(format!(
                "{} fragments but {} motion states",
                fragments.len(),
                states.len()
            )));
        }
        Ok(self.place(fragments, states, elapsed, glare))
    }

    /// Pair fragments with states; callers guarantee equal lengths.
    pub(crate) fn place(
        &self,
        fragments: &[Fragment],
        states: &[MotionState],
        elapsed: f64,
        glare: f64,
    ) -> FrameDrawCommands {
        let draws = fragments
            .iter()
            .zip(states)
            .enumerate()
            .map(|(i, (frag, state))| {
                let c = frag.centroid.to_vec2();
                let inset = Affine::translate(c)
                    * Affine::scale(self.crack_inset)
                    * Affine::translate(-c);
                FragmentDraw {
                    fragment: i,
                    transform: state.to_transform(frag.centroid).to_affine() * inset,
                    opacity: state.opacity.clamp(0.0, 1.0),
                }
            })
            .collect();
        FrameDrawCommands {
            elapsed,
            glare: glare.clamp(0.0, 1.0),
            draws,
        }
    }

    /// Draw `states` for `fragments` over `background` into `target`.
    pub fn render(
        &self,
        fragments: &[Fragment],
        states: &[MotionState],
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> ShatterResult<()> {
        let cmds = self.commands(fragments, states, 0.0, 0.0)?;
        self.render_commands(fragments, &cmds, background, target)
    }

    /// Background first, then every draw command in order.
    pub fn render_commands(
        &self,
        fragments: &[Fragment],
        cmds: &FrameDrawCommands,
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> ShatterResult<()> {
        target.check()?;
        draw_background(background, target);

        let glare = unit_to_u8(cmds.glare);
        for draw in &cmds.draws {
            let frag = fragments.get(draw.fragment).ok_or_else(|| {
                ShatterError::render(format!(
                    "draw command references fragment {} of {}",
                    draw.fragment,
                    fragments.len()
                ))
            })?;
            draw_fragment(frag, draw, glare, target);
        }
        Ok(())
    }
}

fn draw_background(background: &Background<'_>, target: &mut FrameRGBA) {
    match background {
        Background::Transparent => fill(&mut target.data, [0, 0, 0, 0]),
        Background::Solid(c) => fill(&mut target.data, c.to_array()),
        Background::Image(img) => {
            fill(&mut target.data, [0, 0, 0, 0]);
            let w = target.width.min(img.width()) as usize;
            let h = target.height.min(img.height()) as usize;
            let src_stride = img.width() as usize * 4;
            let dst_stride = target.width as usize * 4;
            for y in 0..h {
                let s = &img.data()[y * src_stride..y * src_stride + w * 4];
                target.data[y * dst_stride..y * dst_stride + w * 4].copy_from_slice(s);
            }
        }
    }
}

fn draw_fragment(frag: &Fragment, draw: &FragmentDraw, glare: u16, target: &mut FrameRGBA) {
    let a = draw.transform;
    let weight = unit_to_u8(draw.opacity);
    if weight == 0
        || !a.as_coeffs().iter().all(|c| c.is_finite())
        || a.determinant().abs() < 1e-12
    {
        return;
    }
    let inv = a.inverse();
    let patch = &frag.patch;
    let r = patch.rect();

    let corners = [
        a * Point::new(r.x0, r.y0),
        a * Point::new(r.x1, r.y0),
        a * Point::new(r.x1, r.y1),
        a * Point::new(r.x0, r.y1),
    ];
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let x0 = min_x.floor().max(0.0);
    let y0 = min_y.floor().max(0.0);
    let x1 = max_x.ceil().min(f64::from(target.width));
    let y1 = max_y.ceil().min(f64::from(target.height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let (pw, ph) = (f64::from(patch.width), f64::from(patch.height));
    let stride = target.width as usize;
    for ty in (y0 as u32)..(y1 as u32) {
        for tx in (x0 as u32)..(x1 as u32) {
            // Nearest-neighbour sample at the inverse-mapped pixel center.
            let q = inv * Point::new(f64::from(tx) + 0.5, f64::from(ty) + 0.5);
            let lx = (q.x - r.x0).floor();
            let ly = (q.y - r.y0).floor();
            if lx < 0.0 || ly < 0.0 || lx >= pw || ly >= ph {
                continue;
            }
            let (lx, ly) = (lx as u32, ly as u32);
            let m = patch.mask_at(lx, ly);
            if m == 0 {
                continue;
            }
            let src = toward_white(patch.pixel(lx, ly), glare);
            let cov = mul_div255_u16(u16::from(m), weight);

            let idx = ((ty as usize) * stride + tx as usize) * 4;
            let d = &mut target.data[idx..idx + 4];
            let out = over_weighted([d[0], d[1], d[2], d[3]], src, cov);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
