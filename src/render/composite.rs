use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over with an 8-bit coverage weight (255 = full).
pub fn over_weighted(dst: PremulRgba8, src: PremulRgba8, weight: u16) -> PremulRgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), weight);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), weight);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Blend a premultiplied pixel toward white of the same alpha; `amount` is 0..=255.
pub fn toward_white(px: PremulRgba8, amount: u16) -> PremulRgba8 {
    if amount == 0 {
        return px;
    }
    let a = px[3];
    let mut out = px;
    for c in out.iter_mut().take(3) {
        let lift = mul_div255_u8(u16::from(a.saturating_sub(*c)), amount);
        *c = add_sat_u8(*c, lift).min(a);
    }
    out
}

pub fn fill(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
