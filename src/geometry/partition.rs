use rayon::prelude::*;

use crate::{
    foundation::{
        core::{Point, Rect},
        error::{ShatterError, ShatterResult},
    },
    geometry::polygon::Polygon,
};

/// One Voronoi cell clipped to the partition rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionCell {
    /// Index of the generating seed in the input slice.
    pub seed_index: usize,
    pub seed: Point,
    pub polygon: Polygon,
}

/// Build the Voronoi tessellation of `rect` for `seeds`.
///
/// Each cell starts as the rectangle and is cut by the perpendicular bisector against every
/// other seed. Cells are independent, so they are built in parallel and collected in seed
/// order. Cells that collapse to (near) zero area are dropped with a warning; the remaining
/// cells still tile the rectangle.
#[tracing::instrument(skip(seeds), fields(seeds = seeds.len()))]
pub fn build(seeds: &[Point], rect: Rect) -> ShatterResult<Vec<PartitionCell>> {
    let finite = [rect.x0, rect.y0, rect.x1, rect.y1]
        .iter()
        .all(|v| v.is_finite());
    if !finite || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Err(ShatterError::invalid_input(
            "partition rectangle must be finite with positive area",
        ));
    }

    let cells: Vec<ShatterResult<PartitionCell>> = (0..seeds.len())
        .into_par_iter()
        .map(|i| build_cell(seeds, i, rect))
        .collect();

    let mut out = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell {
            Ok(cell) => out.push(cell),
            Err(err) => tracing::warn!(%err, "dropping partition cell"),
        }
    }
    Ok(out)
}

fn build_cell(seeds: &[Point], i: usize, rect: Rect) -> ShatterResult<PartitionCell> {
    let site = seeds[i];
    let mut polygon = Polygon::from_rect(rect);

    for (j, &other) in seeds.iter().enumerate() {
        if j == i {
            continue;
        }
        if site.distance_squared(other) < 1e-18 {
            // Coincident seeds: the first occurrence owns the whole region.
            if j < i {
                return Err(ShatterError::degenerate(format!(
                    "seed {i} coincides with seed {j}"
                )));
            }
            continue;
        }
        polygon = polygon.clip_bisector(site, other);
        if polygon.is_empty() {
            break;
        }
    }

    if polygon.is_degenerate() {
        return Err(ShatterError::degenerate(format!(
            "cell {i} has near-zero area ({:.3e}) after clipping",
            polygon.area()
        )));
    }

    Ok(PartitionCell {
        seed_index: i,
        seed: site,
        polygon,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/partition.rs"]
mod tests;
