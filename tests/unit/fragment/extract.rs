use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::geometry::{
    partition::build,
    sampler::{SampleParams, generate},
};

fn gradient(width: u32, height: u32) -> SourceImage {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90, 255])
    });
    SourceImage::from_rgba_image(&img).unwrap()
}

#[test]
fn rect_cell_copies_pixels_with_full_mask() {
    let src = gradient(16, 12);
    let poly = Polygon::from_rect(Rect::new(2.0, 3.0, 6.0, 8.0));
    let frag = extract(4, poly, &src).unwrap();
    assert_eq!(frag.index, 4);
    assert_eq!(frag.centroid, Point::new(4.0, 5.5));
    let p = &frag.patch;
    assert_eq!((p.origin_x, p.origin_y, p.width, p.height), (2, 3, 4, 5));
    assert_eq!(p.covered_pixels(), 20);
    assert_eq!(p.pixel(1, 2), src.pixel(3, 5));
    assert_eq!(p.rect(), Rect::new(2.0, 3.0, 6.0, 8.0));
}

#[test]
fn triangle_mask_is_partial() {
    let src = SourceImage::solid(10, 10, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    let tri = Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
    ]);
    let frag = extract(0, tri, &src).unwrap();
    let p = &frag.patch;
    assert_eq!((p.width, p.height), (10, 10));
    // Pixel centers with x + y < 10; centers on the diagonal belong to the neighbour.
    assert_eq!(p.covered_pixels(), 45);
    assert_eq!(p.mask_at(0, 0), 255);
    assert_eq!(p.mask_at(9, 9), 0);
}

#[test]
fn polygon_outside_source_is_out_of_bounds() {
    let src = gradient(8, 8);
    let poly = Polygon::from_rect(Rect::new(20.0, 20.0, 30.0, 30.0));
    let err = extract(0, poly, &src).unwrap_err();
    assert!(matches!(err, ShatterError::ExtractionOutOfBounds(_)));
    assert!(err.is_fragment_local());
}

#[test]
fn partially_outside_polygon_is_clamped() {
    let src = gradient(8, 8);
    let poly = Polygon::from_rect(Rect::new(-4.0, 5.5, 3.0, 20.0));
    let frag = extract(0, poly, &src).unwrap();
    let p = &frag.patch;
    assert_eq!((p.origin_x, p.origin_y, p.width, p.height), (0, 5, 3, 3));
    // Row 5 has its center at 5.5, which sits on the edge and is included.
    assert_eq!(p.covered_pixels(), 9);
}

#[test]
fn fragments_cover_every_source_pixel_once() {
    let src = gradient(64, 48);
    let seeds = generate(SampleParams {
        width: 64.0,
        height: 48.0,
        count: 23,
        min_separation: 3.0,
        max_attempts: 20,
        rng_seed: 8,
    })
    .unwrap();
    let cells = build(&seeds, src.canvas().rect()).unwrap();
    let fragments = extract_all(cells, &src);
    assert_eq!(fragments.len(), 23);
    assert!(hit_counts(&fragments, 64, 48).iter().all(|&h| h == 1));
}

fn hit_counts(fragments: &[Fragment], width: u32, height: u32) -> Vec<u32> {
    let mut hits = vec![0u32; (width * height) as usize];
    for f in fragments {
        let p = &f.patch;
        for y in 0..p.height {
            for x in 0..p.width {
                if p.mask_at(x, y) != 0 {
                    hits[((p.origin_y + y) * width + p.origin_x + x) as usize] += 1;
                }
            }
        }
    }
    hits
}

#[test]
fn bisector_through_pixel_centers_is_not_double_counted() {
    // The bisector x = 4.5 runs through the centers of column 4.
    let src = gradient(10, 10);
    let seeds = [Point::new(3.0, 5.0), Point::new(6.0, 5.0)];
    let cells = build(&seeds, src.canvas().rect()).unwrap();
    let fragments = extract_all(cells, &src);
    assert_eq!(fragments.len(), 2);

    let total: usize = fragments.iter().map(|f| f.patch.covered_pixels()).sum();
    assert_eq!(total, 100);
    assert!(hit_counts(&fragments, 10, 10).iter().all(|&h| h == 1));
    // Ties go to the lower seed index.
    assert_eq!(fragments[0].patch.covered_pixels(), 50);
}

#[test]
fn four_way_tie_is_owned_once() {
    let src = gradient(10, 10);
    let seeds = [
        Point::new(2.0, 2.0),
        Point::new(7.0, 2.0),
        Point::new(2.0, 7.0),
        Point::new(7.0, 7.0),
    ];
    let cells = build(&seeds, src.canvas().rect()).unwrap();
    let fragments = extract_all(cells, &src);
    assert_eq!(fragments.len(), 4);
    assert!(hit_counts(&fragments, 10, 10).iter().all(|&h| h == 1));

    // Pixel (4, 4) has its center on both bisectors.
    let owner = fragments
        .iter()
        .find(|f| {
            let p = &f.patch;
            p.rect().contains(Point::new(4.5, 4.5))
                && p.mask_at(4 - p.origin_x, 4 - p.origin_y) != 0
        })
        .unwrap();
    assert_eq!(owner.index, 0);
}

#[test]
fn extract_all_drops_failed_cells() {
    let src = gradient(8, 8);
    let cells = vec![
        PartitionCell {
            seed_index: 0,
            seed: Point::new(1.0, 1.0),
            polygon: Polygon::from_rect(Rect::new(0.0, 0.0, 8.0, 8.0)),
        },
        PartitionCell {
            seed_index: 1,
            seed: Point::new(50.0, 50.0),
            polygon: Polygon::from_rect(Rect::new(40.0, 40.0, 60.0, 60.0)),
        },
    ];
    let frags = extract_all(cells, &src);
    assert_eq!(frags.len(), 1);
    assert_eq!(frags[0].index, 0);
}
