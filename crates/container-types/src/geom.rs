use serde::{Deserialize, Serialize};

/// A point in sketch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A point in model space. Z is the height axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn translate(&self, offset: [f64; 3]) -> Self {
        Self::new(self.x + offset[0], self.y + offset[1], self.z + offset[2])
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Model axis. `Z` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(&self) -> [f64; 3] {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point3]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut bb = *self;
        bb.expand_to_include(&other.min);
        bb.expand_to_include(&other.max);
        bb
    }

    pub fn translate(&self, offset: [f64; 3]) -> Self {
        Self::new(self.min.translate(offset), self.max.translate(offset))
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.max.coord(axis) - self.min.coord(axis)
    }

    /// The axis along which the box has no thickness, if any.
    pub fn flat_axis(&self, eps: f64) -> Option<Axis> {
        Axis::ALL.into_iter().find(|&a| self.extent(a).abs() < eps)
    }

    /// True if the boxes overlap or touch, allowing `eps` of slack on every axis.
    pub fn intersects(&self, other: &Self, eps: f64) -> bool {
        Axis::ALL.into_iter().all(|a| {
            self.min.coord(a) <= other.max.coord(a) + eps
                && other.min.coord(a) <= self.max.coord(a) + eps
        })
    }

    /// True if every bound matches within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        Axis::ALL.into_iter().all(|a| {
            (self.min.coord(a) - other.min.coord(a)).abs() < eps
                && (self.max.coord(a) - other.max.coord(a)).abs() < eps
        })
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}, {:.4}] -> [{:.4}, {:.4}, {:.4}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_points() {
        let bb = BoundingBox::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-1.0, 0.5, 1.0),
        ]);
        assert!((bb.min.x - (-1.0)).abs() < 1e-12);
        assert!((bb.max.y - 2.0).abs() < 1e-12);
        assert!((bb.extent(Axis::Z) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_axis() {
        let face = BoundingBox::new(Point3::new(0.0, 0.0, 5.0), Point3::new(4.0, 4.0, 5.0));
        assert_eq!(face.flat_axis(1e-9), Some(Axis::Z));
        let solid = BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(solid.flat_axis(1e-9), None);
    }

    #[test]
    fn test_intersects_touching_boxes() {
        let a = BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let c = BoundingBox::new(Point3::new(3.0, 3.0, 3.0), Point3::new(4.0, 4.0, 4.0));
        assert!(a.intersects(&b, 1e-9));
        assert!(!a.intersects(&c, 1e-9));
    }

    #[test]
    fn test_empty_box_union() {
        let empty = BoundingBox::empty();
        assert!(empty.is_empty());
        let unit = BoundingBox::new(Point3::ORIGIN, Point3::new(1.0, 1.0, 1.0));
        assert!(empty.union(&unit).approx_eq(&unit, 1e-12));
    }
}
