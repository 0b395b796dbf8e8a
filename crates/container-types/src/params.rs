use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// User parameters for a grid-aligned divider box. Lengths are implied by the
/// grid system; only counts, the fractional height and feature toggles vary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxParams {
    pub name: String,
    pub slots_wide: u32,
    pub slots_deep: u32,
    /// Height as a multiple of the grid cell edge.
    pub slots_high: f64,
    pub divider_count: u32,
    pub include_scoop: bool,
    pub include_ledge: bool,
    pub include_magnets: bool,
    pub base_only: bool,
}

impl BoxParams {
    pub const SLOT_RANGE: (u32, u32) = (1, 20);
    pub const HEIGHT_RANGE: (f64, f64) = (0.25, 10.0);
    pub const MAX_DIVIDERS: u32 = 10;

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.name.trim().is_empty() {
            return Err(GeometryError::invalid("name", "must not be empty"));
        }
        let (lo, hi) = Self::SLOT_RANGE;
        for (name, value) in [("slots_wide", self.slots_wide), ("slots_deep", self.slots_deep)] {
            if !(lo..=hi).contains(&value) {
                return Err(GeometryError::invalid(
                    name,
                    format!("{value} is outside {lo}..={hi}"),
                ));
            }
        }
        let (lo, hi) = Self::HEIGHT_RANGE;
        if !self.slots_high.is_finite() || self.slots_high < lo || self.slots_high > hi {
            return Err(GeometryError::invalid(
                "slots_high",
                format!("{} is outside {lo}..={hi}", self.slots_high),
            ));
        }
        if self.divider_count > Self::MAX_DIVIDERS {
            return Err(GeometryError::invalid(
                "divider_count",
                format!("{} exceeds {}", self.divider_count, Self::MAX_DIVIDERS),
            ));
        }
        Ok(())
    }
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            name: "Box".to_string(),
            slots_wide: 2,
            slots_deep: 2,
            slots_high: 1.45,
            divider_count: 0,
            include_scoop: true,
            include_ledge: true,
            include_magnets: false,
            base_only: false,
        }
    }
}

/// User parameters for a holster around a handheld device. Millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolsterParams {
    pub name: String,
    pub remote_width: f64,
    pub remote_length: f64,
    pub remote_thickness: f64,
    pub front_slot_width: f64,
    pub front_height: f64,
    pub fillet: f64,
    pub side_thickness: f64,
    pub back_thickness: f64,
    pub bottom_thickness: f64,
    /// Fit clearance added to the pocket, split evenly between opposite walls.
    pub tolerance: f64,
}

impl HolsterParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.name.trim().is_empty() {
            return Err(GeometryError::invalid("name", "must not be empty"));
        }
        let lengths = [
            ("remote_width", self.remote_width),
            ("remote_length", self.remote_length),
            ("remote_thickness", self.remote_thickness),
            ("front_slot_width", self.front_slot_width),
            ("front_height", self.front_height),
            ("fillet", self.fillet),
            ("side_thickness", self.side_thickness),
            ("back_thickness", self.back_thickness),
            ("bottom_thickness", self.bottom_thickness),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::invalid(name, format!("{value} must be > 0")));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(GeometryError::invalid(
                "tolerance",
                format!("{} must be >= 0", self.tolerance),
            ));
        }
        if self.tolerance / 2.0 >= self.side_thickness {
            return Err(GeometryError::invalid(
                "tolerance",
                "half the tolerance must be thinner than the side walls",
            ));
        }
        if self.front_height >= self.remote_length {
            return Err(GeometryError::invalid(
                "front_height",
                format!(
                    "{} must be below remote_length {}",
                    self.front_height, self.remote_length
                ),
            ));
        }
        if self.front_slot_width >= self.remote_width {
            return Err(GeometryError::invalid(
                "front_slot_width",
                format!(
                    "{} must be narrower than remote_width {}",
                    self.front_slot_width, self.remote_width
                ),
            ));
        }
        let thinnest = self
            .side_thickness
            .min(self.back_thickness)
            .min(self.bottom_thickness);
        if self.fillet >= thinnest / 2.0 {
            return Err(GeometryError::invalid(
                "fillet",
                format!("{} must be below half the thinnest wall ({thinnest})", self.fillet),
            ));
        }
        Ok(())
    }
}

impl Default for HolsterParams {
    fn default() -> Self {
        Self {
            name: "Holster".to_string(),
            remote_width: 80.0,
            remote_length: 44.0,
            remote_thickness: 15.0,
            front_slot_width: 10.0,
            front_height: 22.0,
            fillet: 0.5,
            side_thickness: 3.0,
            back_thickness: 3.0,
            bottom_thickness: 3.0,
            tolerance: 0.5,
        }
    }
}

/// Parameter set for one build, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeParams {
    Box(BoxParams),
    Holster(HolsterParams),
}

impl ShapeParams {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn name(&self) -> &str {
        match self {
            ShapeParams::Box(p) => &p.name,
            ShapeParams::Holster(p) => &p.name,
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            ShapeParams::Box(p) => p.validate(),
            ShapeParams::Holster(p) => p.validate(),
        }
    }
}
