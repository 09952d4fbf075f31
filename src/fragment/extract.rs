use crate::{
    foundation::{
        core::{Point, Rect},
        error::{ShatterError, ShatterResult},
    },
    fragment::source::SourceImage,
    geometry::{partition::PartitionCell, polygon::Polygon},
};

/// Pixels under a fragment's bounding box plus the polygon's coverage mask.
///
/// `origin` is the patch's top-left pixel in source-image coordinates. Color data is
/// premultiplied RGBA8; the mask has one byte per pixel (255 inside the polygon, 0 outside).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TexturePatch {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
    rgba8_premul: Vec<u8>,
    mask: Vec<u8>,
}

impl TexturePatch {
    /// Footprint in source-image coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.origin_x),
            f64::from(self.origin_y),
            f64::from(self.origin_x + self.width),
            f64::from(self.origin_y + self.height),
        )
    }

    /// Premultiplied pixel at patch-local `(x, y)`. Caller keeps indices in range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y) * 4;
        let d = &self.rgba8_premul;
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    pub fn mask_at(&self, x: u32, y: u32) -> u8 {
        self.mask[self.index(x, y)]
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Number of pixels whose center lies inside the polygon.
    pub fn covered_pixels(&self) -> usize {
        self.mask.iter().filter(|&&m| m != 0).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

/// One animated shard: its cell polygon, its cut-out texture and its centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Seed index the fragment was generated from; stable across drops of other cells.
    pub index: usize,
    pub polygon: Polygon,
    pub centroid: Point,
    pub patch: TexturePatch,
}

/// Cut the texture under `polygon` out of `source`.
///
/// Pixels are assigned to the polygon by their centers with a half-open fill rule
/// ([`Polygon::covers`]), so a center on an edge shared with a neighbour lands in one
/// fragment only.
pub fn extract(index: usize, polygon: Polygon, source: &SourceImage) -> ShatterResult<Fragment> {
    cut(index, polygon, source, Polygon::covers)
}

/// Extract every cell, dropping (and logging) the ones that fail.
///
/// A pixel belongs to the cell whose seed is nearest to its center, ties going to the lower
/// seed index. Every source pixel is therefore owned by exactly one surviving fragment.
#[tracing::instrument(level = "debug", skip_all, fields(cells = cells.len()))]
pub fn extract_all(cells: Vec<PartitionCell>, source: &SourceImage) -> Vec<Fragment> {
    let sites: Vec<(usize, Point, Rect)> = cells
        .iter()
        .map(|c| (c.seed_index, c.seed, c.polygon.bounds().inflate(1.0, 1.0)))
        .collect();

    let mut out = Vec::with_capacity(cells.len());
    for cell in cells {
        let (index, seed) = (cell.seed_index, cell.seed);
        let reach = cell.polygon.bounds().inflate(1.0, 1.0);
        // Any seed that can own a pixel in this footprint has a cell overlapping it.
        let rivals: Vec<(usize, Point)> = sites
            .iter()
            .filter(|(j, _, b)| *j != index && overlaps(*b, reach))
            .map(|&(j, q, _)| (j, q))
            .collect();
        let owns = |_: &Polygon, p: Point| {
            let d = seed.distance_squared(p);
            rivals.iter().all(|&(j, q)| {
                let dq = q.distance_squared(p);
                d < dq || (d == dq && index < j)
            })
        };
        match cut(index, cell.polygon, source, owns) {
            Ok(fragment) => out.push(fragment),
            Err(err) => tracing::warn!(%err, "dropping fragment"),
        }
    }
    out
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

fn cut(
    index: usize,
    polygon: Polygon,
    source: &SourceImage,
    owns: impl Fn(&Polygon, Point) -> bool,
) -> ShatterResult<Fragment> {
    let b = polygon.bounds();
    let finite = [b.x0, b.y0, b.x1, b.y1].iter().all(|v| v.is_finite());
    if polygon.is_empty() || !finite {
        return Err(ShatterError::out_of_bounds(format!(
            "fragment {index} has no usable footprint"
        )));
    }

    let w = f64::from(source.width());
    let h = f64::from(source.height());
    let x0 = b.x0.floor().clamp(0.0, w);
    let y0 = b.y0.floor().clamp(0.0, h);
    let x1 = b.x1.ceil().clamp(0.0, w);
    let y1 = b.y1.ceil().clamp(0.0, h);
    if x0 >= x1 || y0 >= y1 {
        return Err(ShatterError::out_of_bounds(format!(
            "fragment {index} bounds {b:?} do not overlap the {}x{} source",
            source.width(),
            source.height()
        )));
    }

    let (origin_x, origin_y) = (x0 as u32, y0 as u32);
    let (width, height) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let px_count = (width as usize) * (height as usize);

    let mut rgba8_premul = Vec::with_capacity(px_count * 4);
    let mut mask = Vec::with_capacity(px_count);
    for y in 0..height {
        let sy = origin_y + y;
        for x in 0..width {
            let sx = origin_x + x;
            rgba8_premul.extend_from_slice(&source.pixel(i64::from(sx), i64::from(sy)));
            let center = Point::new(f64::from(sx) + 0.5, f64::from(sy) + 0.5);
            mask.push(if owns(&polygon, center) { 255 } else { 0 });
        }
    }

    let centroid = polygon.centroid();
    Ok(Fragment {
        index,
        polygon,
        centroid,
        patch: TexturePatch {
            origin_x,
            origin_y,
            width,
            height,
            rgba8_premul,
            mask,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/fragment/extract.rs"]
mod tests;
