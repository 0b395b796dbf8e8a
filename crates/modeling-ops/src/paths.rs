//! Closed 2D loops for rails and cross-sections.
//!
//! Every loop carries the sketch plane it belongs on. Cross-section profiles
//! are drawn on a vertical plane with sketch `a` = inset from the outer wall
//! and sketch `b` = absolute height.

use std::f64::consts::FRAC_PI_2;

use container_types::{CurveLoop, GeometryError, Point2, Segment, UnitScale, Winding};
use geom_kernel::SketchPlane;

use crate::dimensions::{BoxDimensions, HolsterDimensions};

/// A curve loop placed on a sketch plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarLoop {
    pub plane: SketchPlane,
    pub curve: CurveLoop,
}

/// Axis-aligned rectangle on a sketch plane, by opposite corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarRect {
    pub plane: SketchPlane,
    pub min: Point2,
    pub max: Point2,
}

impl PlanarRect {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Rounded rectangle: four lines and four quarter arcs.
///
/// Curves are constructed bottom, right, top, left, then the corner arcs
/// counter-clockwise. A sweep rail needs them in walk order instead, so
/// `rail` starts at the last line built (the left side) and walks back
/// through construction order, each curve reversed to its travel direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRect {
    pub plane: SketchPlane,
    creation: Vec<Segment>,
    rail: CurveLoop,
}

impl RoundedRect {
    /// Curves in construction order. Not a valid rail.
    pub fn creation_order(&self) -> &[Segment] {
        &self.creation
    }

    /// The loop in walk order: left, top-left arc, top, and so on clockwise.
    pub fn rail(&self) -> &CurveLoop {
        &self.rail
    }

    pub fn to_loop(&self) -> PlanarLoop {
        PlanarLoop {
            plane: self.plane,
            curve: self.rail.clone(),
        }
    }
}

/// Builds every loop the pipelines sketch.
#[derive(Debug, Clone, Copy)]
pub struct CurvePathBuilder {
    eps: f64,
}

impl CurvePathBuilder {
    pub fn new(units: &UnitScale) -> Self {
        Self {
            eps: units.epsilon(),
        }
    }

    pub fn rounded_rect(
        &self,
        width: f64,
        depth: f64,
        corner_radius: f64,
        plane_offset: f64,
    ) -> Result<RoundedRect, GeometryError> {
        if !(width > 0.0 && depth > 0.0) {
            return Err(GeometryError::invalid(
                "width",
                format!("{width} x {depth} must be positive"),
            ));
        }
        if corner_radius <= 0.0 {
            return Err(GeometryError::invalid(
                "corner_radius",
                format!("{corner_radius} must be positive"),
            ));
        }
        let limit = width.min(depth) / 2.0;
        if corner_radius >= limit {
            return Err(GeometryError::CornerRadiusTooLarge {
                radius: corner_radius,
                limit,
            });
        }

        let (w, d, r) = (width, depth, corner_radius);
        let p = [
            Point2::new(r, 0.0),
            Point2::new(w - r, 0.0),
            Point2::new(w, r),
            Point2::new(w, d - r),
            Point2::new(w - r, d),
            Point2::new(r, d),
            Point2::new(0.0, d - r),
            Point2::new(0.0, r),
        ];
        let ccw = Winding::CounterClockwise;
        let lines = [
            Segment::line(p[0], p[1]),
            Segment::line(p[2], p[3]),
            Segment::line(p[4], p[5]),
            Segment::line(p[6], p[7]),
        ];
        let arcs = [
            Segment::arc(Point2::new(r, r), p[7], FRAC_PI_2, ccw),
            Segment::arc(Point2::new(w - r, r), p[1], FRAC_PI_2, ccw),
            Segment::arc(Point2::new(w - r, d - r), p[3], FRAC_PI_2, ccw),
            Segment::arc(Point2::new(r, d - r), p[5], FRAC_PI_2, ccw),
        ];

        let walk = (0..4)
            .rev()
            .flat_map(|i| [lines[i].reversed(), arcs[i].reversed()])
            .collect();
        let rail = CurveLoop::new(walk, self.eps)?;

        Ok(RoundedRect {
            plane: SketchPlane::Xy { z: plane_offset },
            creation: lines.into_iter().chain(arcs).collect(),
            rail,
        })
    }

    pub fn axis_aligned_rect(
        &self,
        plane: SketchPlane,
        corner_a: Point2,
        corner_b: Point2,
    ) -> Result<PlanarRect, GeometryError> {
        let min = Point2::new(corner_a.x.min(corner_b.x), corner_a.y.min(corner_b.y));
        let max = Point2::new(corner_a.x.max(corner_b.x), corner_a.y.max(corner_b.y));
        if max.x - min.x < self.eps || max.y - min.y < self.eps {
            return Err(GeometryError::invalid(
                "rectangle",
                format!("({}, {}) -> ({}, {}) is degenerate", min.x, min.y, max.x, max.y),
            ));
        }
        Ok(PlanarRect { plane, min, max })
    }

    fn polygon(&self, plane: SketchPlane, pts: &[(f64, f64)]) -> Result<PlanarLoop, GeometryError> {
        let vertices: Vec<Point2> = pts.iter().map(|&(a, b)| Point2::new(a, b)).collect();
        Ok(PlanarLoop {
            plane,
            curve: CurveLoop::polygon(&vertices, self.eps)?,
        })
    }

    fn section_plane(dims: &BoxDimensions) -> SketchPlane {
        SketchPlane::Xz { y: dims.section_y }
    }

    /// Stacking rim swept around the top of the shell.
    pub fn rim_profile(&self, dims: &BoxDimensions) -> Result<PlanarLoop, GeometryError> {
        let h = dims.height;
        let nd = dims.nesting_depth;
        let rim = dims.rim_width;
        let vc = dims.vertical_clearance;
        let cvo = dims.corner_vertical_offset;
        self.polygon(
            Self::section_plane(dims),
            &[
                (0.0, h),
                (0.0, h + nd - vc),
                (rim - vc, h + nd - rim - cvo),
                (rim - vc, h + dims.lip - cvo),
                (dims.rim_inset, h),
            ],
        )
    }

    /// Step cut inside the rim, down to the cavity floor.
    pub fn indent_profile(&self, dims: &BoxDimensions) -> Result<PlanarLoop, GeometryError> {
        let x = dims.rim_inset;
        let h = dims.height;
        let wall = dims.wall;
        self.polygon(
            Self::section_plane(dims),
            &[
                (x, h - wall),
                (x - wall, h - 2.0 * wall),
                (x - wall, dims.floor_height),
                (x, dims.floor_height),
            ],
        )
    }

    /// Notch cut around the foot of a base cell. Overhangs the outer wall.
    pub fn edge_relief_profile(&self, dims: &BoxDimensions) -> Result<PlanarLoop, GeometryError> {
        let nd = dims.nesting_depth;
        let rim = dims.rim_width;
        let ov = dims.relief_overhang;
        self.polygon(
            Self::section_plane(dims),
            &[
                (-ov, 0.0),
                (-ov, nd),
                (0.0, nd),
                (rim, nd - rim),
                (rim, dims.lip),
                (rim + dims.lip, 0.0),
            ],
        )
    }

    /// Sloped ledge triangle, extruded along +X across the interior.
    pub fn ledge_profile(&self, dims: &BoxDimensions) -> Result<PlanarLoop, GeometryError> {
        let wall = dims.wall;
        let top = dims.ledge_top;
        self.polygon(
            SketchPlane::Yz { x: wall },
            &[
                (wall, top),
                (wall + dims.ledge_projection, top),
                (wall, top - dims.ledge_drop),
            ],
        )
    }

    /// Cross-section of divider `position`, extruded one wall along +X.
    pub fn divider_profile(
        &self,
        dims: &BoxDimensions,
        position: f64,
    ) -> Result<PlanarRect, GeometryError> {
        self.axis_aligned_rect(
            SketchPlane::Yz { x: position },
            Point2::new(0.0, dims.nesting_depth),
            Point2::new(dims.depth, dims.ledge_top),
        )
    }

    pub fn holster_base_rect(&self, dims: &HolsterDimensions) -> Result<PlanarRect, GeometryError> {
        self.axis_aligned_rect(
            SketchPlane::Xy { z: 0.0 },
            Point2::ORIGIN,
            Point2::new(dims.body_width, dims.body_depth),
        )
    }

    pub fn pocket_rect(&self, dims: &HolsterDimensions) -> Result<PlanarRect, GeometryError> {
        self.axis_aligned_rect(
            SketchPlane::Xy { z: dims.body_height },
            Point2::new(dims.pocket_min.0, dims.pocket_min.1),
            Point2::new(dims.pocket_max.0, dims.pocket_max.1),
        )
    }

    pub fn front_cut_rect(&self, dims: &HolsterDimensions) -> Result<PlanarRect, GeometryError> {
        self.axis_aligned_rect(
            SketchPlane::Xy { z: dims.body_height },
            Point2::ORIGIN,
            Point2::new(dims.body_width, dims.front_depth),
        )
    }

    /// Slot through the front wall, centred on the body width.
    pub fn slot_rect(&self, dims: &HolsterDimensions) -> Result<PlanarRect, GeometryError> {
        self.axis_aligned_rect(
            SketchPlane::Xz { y: 0.0 },
            Point2::new(dims.slot_x, 0.0),
            Point2::new(dims.slot_x + dims.slot_width, dims.slot_height),
        )
    }
}
