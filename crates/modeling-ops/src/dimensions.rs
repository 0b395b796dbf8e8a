//! Every length the pipelines use, derived once from the user parameters.
//!
//! Constants are in millimetres; derived values are in kernel units
//! (`UnitScale::mm`). Nothing downstream computes its own offsets.

use container_types::{BoxParams, GeometryError, HolsterParams, UnitScale};
use serde::{Deserialize, Serialize};

/// Grid cell edge length.
pub const CELL: f64 = 42.0;
pub const BASE_CORNER_RADIUS: f64 = 4.0;
pub const BASE_LIP: f64 = 0.8;
pub const NESTING_DEPTH: f64 = 5.0;
pub const NESTING_RIM_WIDTH: f64 = 2.4;
pub const NESTING_CLEARANCE: f64 = 0.25;
/// Empirical scale from the base clearance to the vertical rim clearance.
pub const VERTICAL_CLEARANCE_FACTOR: f64 = 1.416;
pub const CORNER_OFFSET_FACTOR: f64 = 0.416;
pub const WALL_THICKNESS: f64 = 1.2;
/// Distance of each magnet centre from the two nearest cell sides.
pub const HOLE_OFFSET: f64 = 8.0;
pub const MAGNET_DIAMETER: f64 = 6.5;
pub const MAGNET_THICKNESS: f64 = 2.5;
pub const MAGNET_FIT: f64 = 0.75;
pub const TOP_FILLET: f64 = 0.6;
/// Gap left between the rim and the top of ledges and dividers.
pub const LEDGE_OFFSET: f64 = 0.2;
/// Extra floor material above nesting depth plus one wall.
pub const FLOOR_OFFSET: f64 = 1.0;
pub const LEDGE_ANGLE_DEG: f64 = 54.0;
pub const LEDGE_PROJECTION: f64 = 16.0;
/// Lowest height, in slot units, that still gets a ledge.
pub const LEDGE_MIN_SLOTS_HIGH: f64 = 0.43;
pub const RELIEF_OVERHANG: f64 = 10.0;
pub const BASE_ONLY_HEIGHT: f64 = 1.0;

/// Derived geometry of a divider box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub units: UnitScale,
    pub cell: f64,
    pub corner_radius: f64,
    pub lip: f64,
    pub nesting_depth: f64,
    pub rim_width: f64,
    pub vertical_clearance: f64,
    pub corner_vertical_offset: f64,
    pub wall: f64,
    pub hole_offset: f64,
    pub magnet_radius: f64,
    pub magnet_depth: f64,
    pub top_fillet: f64,
    pub relief_overhang: f64,
    pub base_only_height: f64,
    /// Outer footprint and height.
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    /// Extrusion of the shell above the base.
    pub shell_height: f64,
    /// Height of the cavity floor.
    pub floor_height: f64,
    pub hollow_depth: f64,
    /// Inset of the inner rim edge from the outer wall.
    pub rim_inset: f64,
    /// Inset of the stepped indent wall, one wall thickness inside the rim.
    pub indent_inset: f64,
    /// Y of the floor edge the scoop rounds over.
    pub scoop_y: f64,
    pub scoop_radius: f64,
    pub ledge_top: f64,
    pub ledge_projection: f64,
    pub ledge_drop: f64,
    /// Interior span shared by dividers.
    pub usable_span: f64,
    /// Y of the vertical plane cross-section profiles are drawn on.
    pub section_y: f64,
    pub ledge_allowed: bool,
}

impl BoxDimensions {
    pub fn derive(params: &BoxParams, units: UnitScale) -> Result<Self, GeometryError> {
        params.validate()?;
        let mm = |v: f64| units.mm(v);

        let cell = mm(CELL);
        let corner_radius = mm(BASE_CORNER_RADIUS);
        let lip = mm(BASE_LIP);
        let nesting_depth = mm(NESTING_DEPTH);
        let rim_width = mm(NESTING_RIM_WIDTH);
        let vertical_clearance = mm(NESTING_CLEARANCE * VERTICAL_CLEARANCE_FACTOR);
        let corner_vertical_offset = mm(NESTING_CLEARANCE * CORNER_OFFSET_FACTOR);
        let wall = mm(WALL_THICKNESS);

        let width = cell * f64::from(params.slots_wide);
        let depth = cell * f64::from(params.slots_deep);
        let height = cell * params.slots_high;
        let floor_height = nesting_depth + wall + mm(FLOOR_OFFSET);
        let rim_inset = rim_width + lip - vertical_clearance;
        let indent_inset = rim_inset - wall;
        let ledge_projection = mm(LEDGE_PROJECTION);

        Ok(Self {
            units,
            cell,
            corner_radius,
            lip,
            nesting_depth,
            rim_width,
            vertical_clearance,
            corner_vertical_offset,
            wall,
            hole_offset: mm(HOLE_OFFSET),
            magnet_radius: mm(MAGNET_DIAMETER * MAGNET_FIT) / 2.0,
            magnet_depth: mm(MAGNET_THICKNESS * MAGNET_FIT),
            top_fillet: mm(TOP_FILLET),
            relief_overhang: mm(RELIEF_OVERHANG),
            base_only_height: mm(BASE_ONLY_HEIGHT),
            width,
            depth,
            height,
            shell_height: height - nesting_depth,
            floor_height,
            hollow_depth: height - floor_height,
            rim_inset,
            indent_inset,
            scoop_y: depth - indent_inset,
            scoop_radius: height / 2.0,
            ledge_top: height - mm(LEDGE_OFFSET),
            ledge_projection,
            ledge_drop: LEDGE_ANGLE_DEG.to_radians().sin() * ledge_projection,
            usable_span: width - 2.0 * wall,
            section_y: cell / 2.0,
            ledge_allowed: params.slots_high >= LEDGE_MIN_SLOTS_HIGH,
        })
    }

    /// Centres of the four magnet holes of one cell.
    pub fn magnet_centres(&self) -> [(f64, f64); 4] {
        let near = self.hole_offset;
        let far = self.cell - self.hole_offset;
        [(near, near), (far, near), (far, far), (near, far)]
    }

    pub fn divider_plan(&self, count: u32) -> DividerPlan {
        DividerPlan::new(count, self.usable_span, self.wall)
    }
}

/// Ordered divider positions across the interior.
///
/// Divider `k` (1-based) starts at `k·L/(D+1) + wall/2`. The remaining gaps
/// are not exactly equal when the wall has thickness; existing prints depend
/// on this layout, so it is kept as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerPlan {
    pub span: f64,
    pub wall: f64,
    pub positions: Vec<f64>,
}

impl DividerPlan {
    pub fn new(count: u32, span: f64, wall: f64) -> Self {
        let slots = f64::from(count) + 1.0;
        let positions = (1..=count)
            .map(|k| f64::from(k) * span / slots + wall / 2.0)
            .collect();
        Self {
            span,
            wall,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Free space between consecutive dividers, walls at both ends included.
    pub fn gaps(&self) -> Vec<f64> {
        let mut edges = vec![0.0];
        for &p in &self.positions {
            edges.push(p);
            edges.push(p + self.wall);
        }
        edges.push(self.span);
        edges.chunks(2).map(|c| c[1] - c[0]).collect()
    }
}

/// Derived geometry of a device holster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolsterDimensions {
    pub body_width: f64,
    pub body_depth: f64,
    pub body_height: f64,
    /// Pocket corners on the top plane, tolerance included.
    pub pocket_min: (f64, f64),
    pub pocket_max: (f64, f64),
    pub pocket_depth: f64,
    /// The front opening spans the front wall and the pocket.
    pub front_depth: f64,
    pub front_cut_depth: f64,
    pub slot_x: f64,
    pub slot_width: f64,
    pub slot_height: f64,
    pub slot_depth: f64,
    pub fillet: f64,
}

impl HolsterDimensions {
    pub fn derive(params: &HolsterParams, units: UnitScale) -> Result<Self, GeometryError> {
        params.validate()?;
        let mm = |v: f64| units.mm(v);
        let side = mm(params.side_thickness);
        let width = mm(params.remote_width);
        let thickness = mm(params.remote_thickness);
        let length = mm(params.remote_length);
        let half_tol = mm(params.tolerance) / 2.0;
        let body_width = width + 2.0 * side;
        let slot_width = mm(params.front_slot_width);

        Ok(Self {
            body_width,
            body_depth: thickness + side + mm(params.back_thickness),
            body_height: length + mm(params.bottom_thickness),
            pocket_min: (side - half_tol, side - half_tol),
            pocket_max: (side + width + half_tol, side + thickness + half_tol),
            pocket_depth: length,
            front_depth: side + thickness,
            front_cut_depth: length - mm(params.front_height),
            slot_x: (body_width - slot_width) / 2.0,
            slot_width,
            slot_height: mm(params.front_height) + mm(params.bottom_thickness),
            slot_depth: thickness + side,
            fillet: mm(params.fillet),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_box_dimensions() {
        let d = BoxDimensions::derive(&BoxParams::default(), UnitScale::default()).unwrap();
        assert_relative_eq!(d.width, 84.0);
        assert_relative_eq!(d.height, 60.9, epsilon = 1e-9);
        assert_relative_eq!(d.floor_height, 7.2, epsilon = 1e-9);
        assert_relative_eq!(d.rim_inset, 2.846, epsilon = 1e-9);
        assert_relative_eq!(d.indent_inset, 1.646, epsilon = 1e-9);
        assert_relative_eq!(d.scoop_y, 84.0 - 1.646, epsilon = 1e-9);
        assert!(d.ledge_allowed);
    }

    #[test]
    fn test_centimetre_scale() {
        let d = BoxDimensions::derive(&BoxParams::default(), UnitScale::CENTIMETRES).unwrap();
        assert_relative_eq!(d.cell, 4.2, epsilon = 1e-12);
        assert_relative_eq!(d.indent_inset, 0.1646, epsilon = 1e-12);
    }

    #[test]
    fn test_ledge_threshold() {
        let low = BoxParams {
            slots_high: 0.3,
            ..Default::default()
        };
        let d = BoxDimensions::derive(&low, UnitScale::default()).unwrap();
        assert!(!d.ledge_allowed);
    }

    #[test]
    fn test_divider_plan_positions() {
        let plan = DividerPlan::new(3, 81.6, 1.2);
        assert_eq!(plan.len(), 3);
        assert_relative_eq!(plan.positions[0], 21.0, epsilon = 1e-9);
        assert_relative_eq!(plan.positions[2], 61.8, epsilon = 1e-9);
    }

    #[test]
    fn test_divider_gaps_are_not_exactly_equal() {
        let plan = DividerPlan::new(2, 39.6, 1.2);
        let gaps = plan.gaps();
        assert_eq!(gaps.len(), 3);
        assert_relative_eq!(gaps.iter().sum::<f64>() + 2.0 * 1.2, 39.6, epsilon = 1e-9);
        assert!((gaps[0] - gaps[2]).abs() > 1e-3);
    }

    #[test]
    fn test_zero_dividers() {
        assert!(DividerPlan::new(0, 39.6, 1.2).is_empty());
    }

    #[test]
    fn test_holster_dimensions() {
        let d = HolsterDimensions::derive(&HolsterParams::default(), UnitScale::default()).unwrap();
        assert_relative_eq!(d.body_width, 86.0);
        assert_relative_eq!(d.body_depth, 21.0);
        assert_relative_eq!(d.body_height, 47.0);
        assert_relative_eq!(d.slot_x, 38.0);
        assert_relative_eq!(d.pocket_min.0, 2.75);
        assert_relative_eq!(d.front_cut_depth, 22.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let p = BoxParams {
            slots_deep: 0,
            ..Default::default()
        };
        assert!(BoxDimensions::derive(&p, UnitScale::default()).is_err());
    }
}
