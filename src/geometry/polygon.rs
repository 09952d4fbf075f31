use crate::foundation::core::{Affine, Point, Rect, Vec2};

/// Area below which a polygon is treated as collapsed.
pub const MIN_POLYGON_AREA: f64 = 1e-9;

const EDGE_EPS: f64 = 1e-9;

/// Ordered vertex list describing a simple polygon.
///
/// Polygons produced by the partition builder are convex with positive orientation in pixel
/// space (x right, y down), which is what [`Polygon::contains`] assumes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(vec![
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ])
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area; positive for the orientation produced by [`Polygon::from_rect`].
    pub fn signed_area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        0.5 * self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3 || self.area() < MIN_POLYGON_AREA
    }

    /// Area-weighted centroid. Collapsed polygons fall back to the vertex mean.
    pub fn centroid(&self) -> Point {
        let a = self.signed_area();
        if a.abs() < MIN_POLYGON_AREA {
            return self.vertex_mean();
        }
        let (mut cx, mut cy) = (0.0, 0.0);
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        Point::new(cx / (6.0 * a), cy / (6.0 * a))
    }

    fn vertex_mean(&self) -> Point {
        if self.vertices.is_empty() {
            return Point::ZERO;
        }
        let n = self.vertices.len() as f64;
        let sum = self
            .vertices
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / n).to_point()
    }

    /// Axis-aligned bounds; `Rect::ZERO` for an empty polygon.
    pub fn bounds(&self) -> Rect {
        let mut it = self.vertices.iter();
        let Some(first) = it.next() else {
            return Rect::ZERO;
        };
        it.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Keep the part of the polygon where `normal . p <= offset` (Sutherland–Hodgman step).
    pub fn clip_half_plane(&self, normal: Vec2, offset: f64) -> Polygon {
        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 1);
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let fa = normal.dot(a.to_vec2()) - offset;
            let fb = normal.dot(b.to_vec2()) - offset;

            if fa <= 0.0 {
                out.push(a);
            }
            if (fa < 0.0 && fb > 0.0) || (fa > 0.0 && fb < 0.0) {
                let t = fa / (fa - fb);
                out.push(a.lerp(b, t));
            }
        }
        dedup_ring(&mut out);
        Polygon::new(out)
    }

    /// Keep the part of the polygon closer to `site` than to `other`.
    pub fn clip_bisector(&self, site: Point, other: Point) -> Polygon {
        let normal = other - site;
        let mid = site.midpoint(other);
        self.clip_half_plane(normal, normal.dot(mid.to_vec2()))
    }

    /// Point-in-convex-polygon test, inclusive of edges up to a small tolerance.
    pub fn contains(&self, p: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let orient = self.signed_area().signum();
        self.edges().all(|(a, b)| {
            let edge = b - a;
            let cross = edge.cross(p - a) * orient;
            cross >= -EDGE_EPS * edge.hypot().max(1.0)
        })
    }

    /// Half-open point test: the interior plus the top and left edges.
    ///
    /// Two polygons sharing an edge traverse it in opposite directions, so a point exactly on
    /// that edge is claimed by one of them, never both.
    pub fn covers(&self, p: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let orient = self.signed_area().signum();
        self.edges().all(|(a, b)| {
            let edge = (b - a) * orient;
            let cross = edge.cross(p - a);
            cross > 0.0 || (cross == 0.0 && (edge.y < 0.0 || (edge.y == 0.0 && edge.x > 0.0)))
        })
    }

    pub fn transformed(&self, affine: Affine) -> Polygon {
        Polygon::new(self.vertices.iter().map(|p| affine * *p).collect())
    }
}

fn dedup_ring(points: &mut Vec<Point>) {
    points.dedup_by(|b, a| a.distance_squared(*b) < EDGE_EPS * EDGE_EPS);
    while points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance_squared(last) < EDGE_EPS * EDGE_EPS {
            points.pop();
        } else {
            break;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
