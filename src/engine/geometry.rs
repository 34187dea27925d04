// Hull geometry kernel
//
// Pure functions that turn a set of positioned nodes into a closed boundary:
// a circle for one node, a pill for two, and a smoothed inflated convex hull
// for three or more. Nothing here holds state; identical inputs always
// produce identical paths.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use std::ops::{Add, Mul, Sub};

/// Points inserted between consecutive inflated hull vertices before the
/// spline is fitted
pub const INTERPOLATED_POINTS_PER_EDGE: usize = 3;

/// Cardinal spline tension for hull outlines (0 = loose Catmull-Rom, 1 = polygon)
pub const HULL_SPLINE_TENSION: f64 = 0.1;

/// Number of straight segments used when sampling a full circle
const CIRCLE_OUTLINE_SEGMENTS: usize = 48;

/// Samples taken along each cubic segment of a spline outline
const SPLINE_SAMPLES_PER_SEGMENT: usize = 6;

/// Slack allowed by `contains` for points sitting on the boundary
const CONTAINMENT_EPSILON: f64 = 1e-6;

/// A 2D point in screen space (x to the right, y downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Linear interpolation towards `other` (t = 0 yields self, t = 1 yields other)
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Closed boundary describing how a hull is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum HullPath {
    /// Nothing to draw (no resolvable member points)
    Empty,
    /// Disc around a single point
    Circle { center: Point, radius: f64 },
    /// Stadium enclosing two discs of `radius` centered at `start` and `end`
    Pill { start: Point, end: Point, radius: f64 },
    /// Closed cardinal spline passing through every knot
    Spline { knots: Vec<Point>, tension: f64 },
}

impl HullPath {
    pub fn is_empty(&self) -> bool {
        matches!(self, HullPath::Empty)
    }

    /// Serialize as SVG path data
    ///
    /// Numbers are written with two decimals so that repeated calls on the
    /// same geometry produce byte-identical strings.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        match self {
            HullPath::Empty => {}
            HullPath::Circle { center, radius } => {
                let left = Point::new(center.x - radius, center.y);
                let right = Point::new(center.x + radius, center.y);
                let _ = write!(
                    d,
                    "M{}A{r:.2},{r:.2},0,1,1,{}A{r:.2},{r:.2},0,1,1,{}Z",
                    svg_point(left),
                    svg_point(right),
                    svg_point(left),
                    r = radius
                );
            }
            HullPath::Pill { start, end, radius } => {
                let normal = pill_normal(*start, *end) * *radius;
                let _ = write!(
                    d,
                    "M{}L{}A{r:.2},{r:.2},0,0,0,{}L{}A{r:.2},{r:.2},0,0,0,{}Z",
                    svg_point(*start + normal),
                    svg_point(*end + normal),
                    svg_point(*end - normal),
                    svg_point(*start - normal),
                    svg_point(*start + normal),
                    r = radius
                );
            }
            HullPath::Spline { knots, tension } => {
                let Some(first) = knots.first() else {
                    return d;
                };
                let _ = write!(d, "M{}", svg_point(*first));
                for [_, c1, c2, end] in spline_segments(knots, *tension) {
                    let _ = write!(d, "C{},{},{}", svg_point(c1), svg_point(c2), svg_point(end));
                }
                d.push('Z');
            }
        }
        d
    }

    /// Sample the boundary as a closed polygon (last point connects to first)
    pub fn outline(&self) -> Vec<Point> {
        match self {
            HullPath::Empty => Vec::new(),
            HullPath::Circle { center, radius } => (0..CIRCLE_OUTLINE_SEGMENTS)
                .map(|i| {
                    let angle = TAU * i as f64 / CIRCLE_OUTLINE_SEGMENTS as f64;
                    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                })
                .collect(),
            HullPath::Pill { start, end, radius } => {
                let delta = *end - *start;
                let axis = delta.y.atan2(delta.x);
                let half = CIRCLE_OUTLINE_SEGMENTS / 2;
                let mut outline = Vec::with_capacity(2 * (half + 1));
                // Cap around `end`, then cap around `start`; the straight
                // sides are the implicit edges between the two arcs.
                for (cap, offset) in [(*end, -PI / 2.0), (*start, PI / 2.0)] {
                    for i in 0..=half {
                        let angle = axis + offset + PI * i as f64 / half as f64;
                        outline.push(Point::new(
                            cap.x + radius * angle.cos(),
                            cap.y + radius * angle.sin(),
                        ));
                    }
                }
                outline
            }
            HullPath::Spline { knots, tension } => {
                let mut outline =
                    Vec::with_capacity(knots.len() * SPLINE_SAMPLES_PER_SEGMENT);
                for [p0, c1, c2, p1] in spline_segments(knots, *tension) {
                    for step in 0..SPLINE_SAMPLES_PER_SEGMENT {
                        let t = step as f64 / SPLINE_SAMPLES_PER_SEGMENT as f64;
                        outline.push(cubic_bezier(p0, c1, c2, p1, t));
                    }
                }
                outline
            }
        }
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains(&self, point: Point) -> bool {
        match self {
            HullPath::Empty => false,
            HullPath::Circle { center, radius } => {
                center.distance(point) <= radius + CONTAINMENT_EPSILON
            }
            HullPath::Pill { start, end, radius } => {
                distance_to_segment(point, *start, *end) <= radius + CONTAINMENT_EPSILON
            }
            HullPath::Spline { .. } => {
                let outline = self.outline();
                point_in_polygon(point, &outline) || distance_to_polygon(point, &outline) <= CONTAINMENT_EPSILON
            }
        }
    }
}

/// Compute the enclosing path for a set of positioned points
///
/// * 0 points: `HullPath::Empty`
/// * 1 point: circle of radius `padding`
/// * 2 points: pill of radius `padding`
/// * 3+ points: convex hull inflated radially from the centroid by
///   `padding`, densified and smoothed with a closed cardinal spline.
///   When the hull degenerates, two distinct points still make a pill and
///   every other set (collinear or coincident) gets a circle around its
///   bounding box, of radius half the larger side plus `padding`.
pub fn compute_hull_path(points: &[Point], padding: f64) -> HullPath {
    let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };

    match points {
        [] => HullPath::Empty,
        [center] => HullPath::Circle {
            center: *center,
            radius: padding,
        },
        [start, end] => HullPath::Pill {
            start: *start,
            end: *end,
            radius: padding,
        },
        _ => {
            let hull = convex_hull(points);
            match hull.as_slice() {
                [_, _, _, ..] => {
                    let center = centroid(points);
                    let inflated: Vec<Point> = hull
                        .iter()
                        .map(|vertex| inflate(*vertex, center, padding))
                        .collect();
                    // Radial displacement can leave a shallow vertex slightly
                    // reflex; re-hulling keeps the outline convex so the spline
                    // only ever bulges outwards.
                    let inflated = convex_hull(&inflated);
                    if inflated.len() < 3 {
                        return bounding_circle(points, padding);
                    }
                    HullPath::Spline {
                        knots: densify(&inflated, INTERPOLATED_POINTS_PER_EDGE),
                        tension: HULL_SPLINE_TENSION,
                    }
                }
                // Degenerate: only two distinct points left is still a pill,
                // anything else (collinear or coincident) gets the box circle
                _ => match distinct_points(points).as_slice() {
                    [start, end] => HullPath::Pill {
                        start: *start,
                        end: *end,
                        radius: padding,
                    },
                    _ => bounding_circle(points, padding),
                },
            }
        }
    }
}

/// Finite input points sorted by (x, y) with duplicates merged
fn distinct_points(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    sorted
}

/// Convex hull by monotone chain
///
/// Duplicate points are merged and collinear points dropped, so collinear
/// input yields its two extreme points and coincident input a single point.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let sorted = distinct_points(points);

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Arithmetic mean of the point set
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let sum = points.iter().fold(Point::default(), |acc, p| acc + *p);
    sum * (1.0 / points.len() as f64)
}

/// Z component of (b - a) x (c - a); positive for a counter-clockwise turn
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Push `vertex` away from `center` by `padding` along the ray joining them
fn inflate(vertex: Point, center: Point, padding: f64) -> Point {
    let delta = vertex - center;
    let distance = delta.length().max(f64::EPSILON);
    vertex + delta * (padding / distance)
}

/// Insert `between` evenly spaced points on every edge of a closed polygon
fn densify(polygon: &[Point], between: usize) -> Vec<Point> {
    let steps = (between + 1) as f64;
    let mut knots = Vec::with_capacity(polygon.len() * (between + 1));
    for (i, vertex) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        knots.push(*vertex);
        for k in 1..=between {
            knots.push(vertex.lerp(next, k as f64 / steps));
        }
    }
    knots
}

/// Axis-aligned fallback: circle around the bounding-box center
fn bounding_circle(points: &[Point], padding: f64) -> HullPath {
    let finite = points.iter().filter(|p| p.x.is_finite() && p.y.is_finite());
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in finite {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if min_x > max_x || min_y > max_y {
        return HullPath::Empty;
    }

    let width = max_x - min_x;
    let height = max_y - min_y;
    HullPath::Circle {
        center: Point::new(min_x + width / 2.0, min_y + height / 2.0),
        radius: width.max(height) / 2.0 + padding,
    }
}

/// Unit normal of the pill axis (coincident ends use the horizontal axis)
fn pill_normal(start: Point, end: Point) -> Point {
    let delta = end - start;
    let axis = delta.y.atan2(delta.x);
    Point::new(-axis.sin(), axis.cos())
}

/// Cubic Bezier control points `[start, c1, c2, end]` of a closed cardinal spline
fn spline_segments(knots: &[Point], tension: f64) -> Vec<[Point; 4]> {
    let n = knots.len();
    if n == 0 {
        return Vec::new();
    }
    let k = (1.0 - tension) / 6.0;
    (0..n)
        .map(|i| {
            let p0 = knots[(i + n - 1) % n];
            let p1 = knots[i];
            let p2 = knots[(i + 1) % n];
            let p3 = knots[(i + 2) % n];
            [p1, p1 + (p2 - p0) * k, p2 - (p3 - p1) * k, p2]
        })
        .collect()
}

fn cubic_bezier(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p1 * (t * t * t)
}

fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let delta = end - start;
    let length_sq = delta.x * delta.x + delta.y * delta.y;
    if length_sq <= f64::EPSILON {
        return point.distance(start);
    }
    let t = (((point.x - start.x) * delta.x + (point.y - start.y) * delta.y) / length_sq)
        .clamp(0.0, 1.0);
    point.distance(start.lerp(end, t))
}

fn distance_to_polygon(point: Point, polygon: &[Point]) -> f64 {
    (0..polygon.len())
        .map(|i| distance_to_segment(point, polygon[i], polygon[(i + 1) % polygon.len()]))
        .fold(f64::INFINITY, f64::min)
}

/// Even-odd ray casting test
fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn svg_point(p: Point) -> String {
    format!("{:.2},{:.2}", p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_empty_input_draws_nothing() {
        let path = compute_hull_path(&[], 5.0);
        assert_eq!(path, HullPath::Empty);
        assert_eq!(path.to_svg(), "");
        assert!(path.outline().is_empty());
    }

    #[test]
    fn test_single_point_is_circle_of_padding() {
        let path = compute_hull_path(&[Point::new(10.0, 20.0)], 4.0);
        assert_eq!(
            path,
            HullPath::Circle {
                center: Point::new(10.0, 20.0),
                radius: 4.0
            }
        );
        assert!(path.contains(Point::new(13.9, 20.0)));
        assert!(!path.contains(Point::new(14.1, 20.0)));
    }

    #[test]
    fn test_two_points_make_pill() {
        let path = compute_hull_path(&pts(&[(0.0, 0.0), (10.0, 0.0)]), 2.0);
        assert!(matches!(path, HullPath::Pill { .. }));
        // Inside the rectangle and inside both caps
        assert!(path.contains(Point::new(5.0, 1.9)));
        assert!(path.contains(Point::new(-1.9, 0.0)));
        assert!(path.contains(Point::new(11.9, 0.0)));
        // Outside the caps' corners
        assert!(!path.contains(Point::new(-1.8, 1.8)));
        assert_eq!(path.to_svg(), "M0.00,2.00L10.00,2.00A2.00,2.00,0,0,0,10.00,-2.00L0.00,-2.00A2.00,2.00,0,0,0,0.00,2.00Z");
    }

    #[test]
    fn test_coincident_pill_degrades_to_disc() {
        let p = Point::new(3.0, 3.0);
        let path = compute_hull_path(&[p, p], 2.0);
        assert!(path.contains(Point::new(3.0, 4.9)));
        assert!(path.contains(Point::new(1.1, 3.0)));
        let svg = path.to_svg();
        assert!(!svg.is_empty());
        assert!(!svg.contains("NaN"));
        assert!(path.outline().iter().all(|q| (q.distance(p) - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_collinear_points_fall_back_to_bounding_circle() {
        let points = pts(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        let path = compute_hull_path(&points, 1.0);
        assert_eq!(
            path,
            HullPath::Circle {
                center: Point::new(5.0, 5.0),
                radius: 6.0
            }
        );

        let horizontal = pts(&[(0.0, 4.0), (3.0, 4.0), (12.0, 4.0), (7.0, 4.0)]);
        assert_eq!(
            compute_hull_path(&horizontal, 2.0),
            HullPath::Circle {
                center: Point::new(6.0, 4.0),
                radius: 8.0
            }
        );
    }

    #[test]
    fn test_two_distinct_points_among_duplicates_make_pill() {
        let points = pts(&[(1.0, 1.0), (9.0, 1.0), (1.0, 1.0)]);
        assert_eq!(
            compute_hull_path(&points, 2.0),
            HullPath::Pill {
                start: Point::new(1.0, 1.0),
                end: Point::new(9.0, 1.0),
                radius: 2.0
            }
        );
    }

    #[test]
    fn test_coincident_triple_falls_back_to_circle() {
        let p = Point::new(7.0, -2.0);
        let path = compute_hull_path(&[p, p, p], 3.0);
        assert_eq!(path, HullPath::Circle { center: p, radius: 3.0 });
    }

    #[test]
    fn test_triangle_produces_spline_with_interpolated_knots() {
        let path = compute_hull_path(&pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]), 2.0);
        match &path {
            HullPath::Spline { knots, tension } => {
                assert_eq!(knots.len(), 3 * (INTERPOLATED_POINTS_PER_EDGE + 1));
                assert_eq!(*tension, HULL_SPLINE_TENSION);
            }
            other => panic!("expected spline, got {other:?}"),
        }
        let svg = path.to_svg();
        assert!(svg.starts_with('M'));
        assert!(svg.ends_with('Z'));
        assert_eq!(svg.matches('C').count(), 12);
    }

    #[test]
    fn test_hull_vertices_are_pushed_radially_by_padding() {
        let points = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let HullPath::Spline { knots, .. } = compute_hull_path(&points, 3.0) else {
            panic!("expected spline");
        };
        let center = Point::new(5.0, 5.0);
        let corner_distance = center.distance(Point::new(0.0, 0.0)) + 3.0;
        let corners = knots
            .iter()
            .filter(|k| (k.distance(center) - corner_distance).abs() < 1e-9)
            .count();
        assert_eq!(corners, 4);
    }

    #[test]
    fn test_convex_hull_drops_interior_and_collinear_points() {
        let hull = convex_hull(&pts(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (5.0, 5.0),
        ]));
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(5.0, 5.0)));
        assert!(!hull.contains(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_zero_padding_still_draws() {
        let path = compute_hull_path(&pts(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)]), 0.0);
        assert!(!path.is_empty());
        assert!(!path.to_svg().is_empty());
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (0.0f64..100.0, 0.0f64..100.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every input point lies inside or on the returned boundary
        #[test]
        fn prop_hull_contains_all_points(
            points in prop::collection::vec(point_strategy(), 1..12),
            padding in 1.0f64..20.0,
        ) {
            let path = compute_hull_path(&points, padding);
            for p in &points {
                prop_assert!(path.contains(*p), "{:?} not enclosed by {:?}", p, path);
            }
        }

        /// Collinear triples never produce an empty path, and the output is stable
        #[test]
        fn prop_collinear_fallback_is_deterministic(
            origin in point_strategy(),
            (dx, dy) in (-10.0f64..10.0, -10.0f64..10.0),
            steps in (0.5f64..3.0, 3.5f64..6.0),
            padding in 0.0f64..10.0,
        ) {
            let points = [
                origin,
                origin + Point::new(dx, dy) * steps.0,
                origin + Point::new(dx, dy) * steps.1,
            ];
            let first = compute_hull_path(&points, padding).to_svg();
            let second = compute_hull_path(&points, padding).to_svg();
            prop_assert!(!first.is_empty());
            prop_assert_eq!(first, second);
        }
    }
}
