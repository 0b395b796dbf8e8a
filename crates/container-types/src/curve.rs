use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geom::Point2;

/// Rotational sense of an arc or of a whole loop, viewed from the sketch normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    pub fn reversed(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }

    /// +1 for counter-clockwise, -1 for clockwise.
    pub fn sign(self) -> f64 {
        match self {
            Winding::Clockwise => -1.0,
            Winding::CounterClockwise => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

/// Circular arc given by center, start point and an unsigned sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub center: Point2,
    pub start: Point2,
    /// Sweep in radians, always positive. `direction` gives the sense.
    pub sweep_angle: f64,
    pub direction: Winding,
}

impl ArcSegment {
    pub fn radius(&self) -> f64 {
        self.center.distance_to(&self.start)
    }

    pub fn start_angle(&self) -> f64 {
        (self.start.y - self.center.y).atan2(self.start.x - self.center.x)
    }

    pub fn signed_sweep(&self) -> f64 {
        self.sweep_angle * self.direction.sign()
    }

    pub fn point_at(&self, angle: f64) -> Point2 {
        let r = self.radius();
        Point2::new(
            self.center.x + r * angle.cos(),
            self.center.y + r * angle.sin(),
        )
    }

    pub fn end(&self) -> Point2 {
        self.point_at(self.start_angle() + self.signed_sweep())
    }

    fn covers_angle(&self, angle: f64) -> bool {
        let delta = match self.direction {
            Winding::CounterClockwise => angle - self.start_angle(),
            Winding::Clockwise => self.start_angle() - angle,
        };
        delta.rem_euclid(TAU) <= self.sweep_angle + 1e-12
    }
}

/// One piece of a planar curve loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Segment {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl Segment {
    pub fn line(start: Point2, end: Point2) -> Self {
        Segment::Line(LineSegment { start, end })
    }

    pub fn arc(center: Point2, start: Point2, sweep_angle: f64, direction: Winding) -> Self {
        Segment::Arc(ArcSegment {
            center,
            start,
            sweep_angle,
            direction,
        })
    }

    pub fn start(&self) -> Point2 {
        match self {
            Segment::Line(l) => l.start,
            Segment::Arc(a) => a.start,
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            Segment::Line(l) => l.end,
            Segment::Arc(a) => a.end(),
        }
    }

    /// The same curve traversed the other way.
    pub fn reversed(&self) -> Self {
        match self {
            Segment::Line(l) => Segment::line(l.end, l.start),
            Segment::Arc(a) => Segment::arc(a.center, a.end(), a.sweep_angle, a.direction.reversed()),
        }
    }

    /// Unit tangent at the start (`at_end = false`) or end of the segment.
    pub fn tangent(&self, at_end: bool) -> (f64, f64) {
        match self {
            Segment::Line(l) => {
                let dx = l.end.x - l.start.x;
                let dy = l.end.y - l.start.y;
                let len = (dx * dx + dy * dy).sqrt().max(f64::MIN_POSITIVE);
                (dx / len, dy / len)
            }
            Segment::Arc(a) => {
                let p = if at_end { a.end() } else { a.start };
                let r = a.radius().max(f64::MIN_POSITIVE);
                let (rx, ry) = ((p.x - a.center.x) / r, (p.y - a.center.y) / r);
                match a.direction {
                    Winding::CounterClockwise => (-ry, rx),
                    Winding::Clockwise => (ry, -rx),
                }
            }
        }
    }

    /// Points along the segment, endpoints included.
    pub fn sample(&self, steps: usize) -> Vec<Point2> {
        match self {
            Segment::Line(l) => vec![l.start, l.end],
            Segment::Arc(a) => {
                let steps = steps.max(1);
                let a0 = a.start_angle();
                let s = a.signed_sweep();
                (0..=steps)
                    .map(|i| a.point_at(a0 + s * i as f64 / steps as f64))
                    .collect()
            }
        }
    }

    /// Axis-aligned bounds in sketch coordinates as (min, max).
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut pts = vec![self.start(), self.end()];
        if let Segment::Arc(a) = self {
            for k in 0..4 {
                let angle = k as f64 * FRAC_PI_2;
                if a.covers_angle(angle) {
                    pts.push(a.point_at(angle));
                }
            }
        }
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in pts {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Offset the segment by `distance` toward the interior of a loop wound `loop_winding`.
    pub fn offset(&self, distance: f64, loop_winding: Winding) -> Self {
        match self {
            Segment::Line(l) => {
                let (tx, ty) = self.tangent(false);
                // Left normal for CCW loops, right normal for CW loops.
                let s = loop_winding.sign();
                let (nx, ny) = (-ty * s, tx * s);
                Segment::line(
                    l.start.translate(nx * distance, ny * distance),
                    l.end.translate(nx * distance, ny * distance),
                )
            }
            Segment::Arc(a) => {
                let r = a.radius();
                let new_r = if a.direction == loop_winding {
                    r - distance
                } else {
                    r + distance
                };
                let k = if r > 0.0 { new_r / r } else { 0.0 };
                let start = Point2::new(
                    a.center.x + (a.start.x - a.center.x) * k,
                    a.center.y + (a.start.y - a.center.y) * k,
                );
                Segment::arc(a.center, start, a.sweep_angle, a.direction)
            }
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        match self {
            Segment::Line(l) => Segment::line(l.start.translate(dx, dy), l.end.translate(dx, dy)),
            Segment::Arc(a) => Segment::arc(
                a.center.translate(dx, dy),
                a.start.translate(dx, dy),
                a.sweep_angle,
                a.direction,
            ),
        }
    }
}

/// A closed planar loop of segments in traversal order.
///
/// Construction checks that each segment ends where the next one starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveLoop {
    segments: Vec<Segment>,
}

impl CurveLoop {
    pub const MIN_SEGMENTS: usize = 3;

    pub fn new(segments: Vec<Segment>, eps: f64) -> Result<Self, GeometryError> {
        if segments.len() < Self::MIN_SEGMENTS {
            return Err(GeometryError::TooFewSegments {
                required: Self::MIN_SEGMENTS,
                provided: segments.len(),
            });
        }
        let n = segments.len();
        for i in 0..n {
            let gap = segments[i].end().distance_to(&segments[(i + 1) % n].start());
            if gap > eps {
                return Err(GeometryError::OpenLoop { index: i, gap });
            }
        }
        Ok(Self { segments })
    }

    /// Closed polygon through `vertices`, one line per consecutive pair.
    pub fn polygon(vertices: &[Point2], eps: f64) -> Result<Self, GeometryError> {
        let n = vertices.len();
        let segments = (0..n)
            .map(|i| Segment::line(vertices[i], vertices[(i + 1) % n]))
            .collect();
        Self::new(segments, eps)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Shoelace area of the sampled loop; positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let pts: Vec<Point2> = self
            .segments
            .iter()
            .flat_map(|s| {
                let mut p = s.sample(8);
                p.pop();
                p
            })
            .collect();
        let n = pts.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += pts[i].x * pts[j].y - pts[j].x * pts[i].y;
        }
        area / 2.0
    }

    pub fn winding(&self) -> Winding {
        if self.signed_area() >= 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    /// True when every corner and every arc turns the same way as the loop.
    pub fn has_consistent_turning(&self) -> bool {
        let winding = self.winding();
        let n = self.segments.len();
        for i in 0..n {
            if let Segment::Arc(a) = &self.segments[i] {
                if a.direction != winding {
                    return false;
                }
            }
            let (ax, ay) = self.segments[i].tangent(true);
            let (bx, by) = self.segments[(i + 1) % n].tangent(false);
            let cross = ax * by - ay * bx;
            if cross.abs() > 1e-9 && cross.signum() != winding.sign() {
                return false;
            }
        }
        true
    }

    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for s in &self.segments {
            let (lo, hi) = s.bounds();
            min.x = min.x.min(lo.x);
            min.y = min.y.min(lo.y);
            max.x = max.x.max(hi.x);
            max.y = max.y.max(hi.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> CurveLoop {
        CurveLoop::polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            1e-9,
        )
        .unwrap()
    }

    #[test]
    fn test_quarter_arc_end_point() {
        let arc = ArcSegment {
            center: Point2::new(4.0, 4.0),
            start: Point2::new(0.0, 4.0),
            sweep_angle: FRAC_PI_2,
            direction: Winding::CounterClockwise,
        };
        let end = arc.end();
        assert_relative_eq!(end.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_arc_swaps_endpoints() {
        let arc = Segment::arc(
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
            FRAC_PI_2,
            Winding::CounterClockwise,
        );
        let rev = arc.reversed();
        assert!(rev.start().distance_to(&arc.end()) < 1e-12);
        assert!(rev.end().distance_to(&arc.start()) < 1e-12);
    }

    #[test]
    fn test_arc_bounds_include_extreme() {
        // Half circle over the top: bounds must reach y = 1.
        let arc = Segment::arc(
            Point2::ORIGIN,
            Point2::new(1.0, 0.0),
            std::f64::consts::PI,
            Winding::CounterClockwise,
        );
        let (min, max) = arc.bounds();
        assert_relative_eq!(max.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(min.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_open_loop_rejected() {
        let segs = vec![
            Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            Segment::line(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)),
            Segment::line(Point2::new(1.0, 1.0), Point2::new(0.0, 0.9)),
        ];
        let err = CurveLoop::new(segs, 1e-9).unwrap_err();
        assert!(matches!(err, GeometryError::OpenLoop { index: 2, .. }));
    }

    #[test]
    fn test_square_winding_and_area() {
        let sq = unit_square();
        assert_eq!(sq.winding(), Winding::CounterClockwise);
        assert_relative_eq!(sq.signed_area(), 1.0, epsilon = 1e-12);
        assert!(sq.has_consistent_turning());
    }

    #[test]
    fn test_offset_moves_edges_inward() {
        let sq = unit_square();
        let winding = sq.winding();
        // Bottom edge moves up, right edge moves left.
        let bottom = sq.segments()[0].offset(0.25, winding);
        let right = sq.segments()[1].offset(0.25, winding);
        assert_relative_eq!(bottom.start().y, 0.25, epsilon = 1e-12);
        assert_relative_eq!(bottom.end().y, 0.25, epsilon = 1e-12);
        assert_relative_eq!(right.start().x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(right.end().x, 0.75, epsilon = 1e-12);
    }
}
