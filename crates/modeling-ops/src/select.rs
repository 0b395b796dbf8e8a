//! Re-selection of edges and faces by bounding-box predicates.
//!
//! Kernel ids do not survive feature operations, so later stages find their
//! targets again by matching bounding boxes against expected coordinates.
//! A predicate must match exactly one element; anything else is an error.

use std::fmt;

use container_types::{Axis, BoundingBox, UnitScale};
use geom_kernel::{BodyHandle, KernelError, KernelId, KernelIntrospect, TopoKind};
use tracing::debug;

/// Expected bounds along one axis. `None` leaves that side unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Expected bounding box, axis by axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxPattern {
    ranges: [AxisRange; 3],
}

fn slot(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

impl BoxPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, axis: Axis, value: f64) -> Self {
        self.ranges[slot(axis)].min = Some(value);
        self
    }

    pub fn max(mut self, axis: Axis, value: f64) -> Self {
        self.ranges[slot(axis)].max = Some(value);
        self
    }

    /// Zero thickness at `value` along `axis`.
    pub fn at(self, axis: Axis, value: f64) -> Self {
        self.min(axis, value).max(axis, value)
    }

    pub fn span(self, axis: Axis, lo: f64, hi: f64) -> Self {
        self.min(axis, lo).max(axis, hi)
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        self.ranges[slot(axis)]
    }

    pub fn matches(&self, bb: &BoundingBox, eps: f64) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            let r = self.range(axis);
            let ok_min = r.min.map_or(true, |v| (bb.min.coord(axis) - v).abs() < eps);
            let ok_max = r.max.map_or(true, |v| (bb.max.coord(axis) - v).abs() < eps);
            ok_min && ok_max
        })
    }
}

impl fmt::Display for BoxPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for axis in Axis::ALL {
            match self.range(axis) {
                AxisRange {
                    min: Some(lo),
                    max: Some(hi),
                } if lo == hi => parts.push(format!("{axis}={lo:.4}")),
                AxisRange { min, max } => {
                    if let Some(lo) = min {
                        parts.push(format!("{axis}.min={lo:.4}"));
                    }
                    if let Some(hi) = max {
                        parts.push(format!("{axis}.max={hi:.4}"));
                    }
                }
            }
        }
        if parts.is_empty() {
            f.write_str("any")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// A geometric test on one topology element.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Bounds(BoxPattern),
    AnyOf(Vec<Predicate>),
    AllOf(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, bb: &BoundingBox, eps: f64) -> bool {
        match self {
            Predicate::Bounds(p) => p.matches(bb, eps),
            Predicate::AnyOf(ps) => ps.iter().any(|p| p.matches(bb, eps)),
            Predicate::AllOf(ps) => ps.iter().all(|p| p.matches(bb, eps)),
        }
    }
}

impl From<BoxPattern> for Predicate {
    fn from(p: BoxPattern) -> Self {
        Predicate::Bounds(p)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |ps: &[Predicate], sep: &str| {
            ps.iter()
                .map(|p| format!("({p})"))
                .collect::<Vec<_>>()
                .join(sep)
        };
        match self {
            Predicate::Bounds(p) => write!(f, "{p}"),
            Predicate::AnyOf(ps) => f.write_str(&join(ps, " or ")),
            Predicate::AllOf(ps) => f.write_str(&join(ps, " and ")),
        }
    }
}

/// Errors from geometric selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("expected exactly one {kind} matching {predicate}, found {matches}")]
    Ambiguous {
        kind: TopoKind,
        predicate: String,
        matches: usize,
    },

    #[error("topology query failed: {0}")]
    Kernel(#[from] KernelError),
}

/// Predicate matching with one absolute tolerance for the whole model.
#[derive(Debug, Clone, Copy)]
pub struct GeometricSelector {
    eps: f64,
}

impl GeometricSelector {
    pub fn new(units: &UnitScale) -> Self {
        Self {
            eps: units.epsilon(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.eps
    }

    fn elements(
        introspect: &dyn KernelIntrospect,
        body: &BodyHandle,
        kind: TopoKind,
    ) -> Result<Vec<KernelId>, KernelError> {
        match kind {
            TopoKind::Edge => introspect.edges(body),
            TopoKind::Face => introspect.faces(body),
        }
    }

    /// Every element of `kind` on `body` that satisfies `predicate`.
    pub fn select_all(
        &self,
        introspect: &dyn KernelIntrospect,
        body: &BodyHandle,
        kind: TopoKind,
        predicate: &Predicate,
    ) -> Result<Vec<KernelId>, SelectionError> {
        let mut out = Vec::new();
        for id in Self::elements(introspect, body, kind)? {
            if predicate.matches(&introspect.bounding_box(id)?, self.eps) {
                out.push(id);
            }
        }
        debug!(%kind, %predicate, matches = out.len(), "select");
        Ok(out)
    }

    /// The single element satisfying `predicate`.
    pub fn select_unique(
        &self,
        introspect: &dyn KernelIntrospect,
        body: &BodyHandle,
        kind: TopoKind,
        predicate: &Predicate,
    ) -> Result<KernelId, SelectionError> {
        let found = self.select_all(introspect, body, kind, predicate)?;
        exactly_one(found, kind, predicate.to_string())
    }

    /// The single highest edge: among edges whose lowest point is the
    /// highest of the body, the one that also satisfies `filter`.
    pub fn select_topmost_edge(
        &self,
        introspect: &dyn KernelIntrospect,
        body: &BodyHandle,
        filter: &Predicate,
    ) -> Result<KernelId, SelectionError> {
        let mut boxes = Vec::new();
        for id in introspect.edges(body)? {
            boxes.push((id, introspect.bounding_box(id)?));
        }
        let top = boxes
            .iter()
            .map(|(_, bb)| bb.min.z)
            .fold(f64::NEG_INFINITY, f64::max);
        let found: Vec<KernelId> = boxes
            .into_iter()
            .filter(|(_, bb)| (bb.min.z - top).abs() < self.eps && filter.matches(bb, self.eps))
            .map(|(id, _)| id)
            .collect();
        let description = format!("topmost (z.min={top:.4}) and {filter}");
        debug!(predicate = %description, matches = found.len(), "select topmost");
        exactly_one(found, TopoKind::Edge, description)
    }

    /// All edges of the single face matching `face`.
    pub fn edges_of_face(
        &self,
        introspect: &dyn KernelIntrospect,
        body: &BodyHandle,
        face: &Predicate,
    ) -> Result<Vec<KernelId>, SelectionError> {
        let id = self.select_unique(introspect, body, TopoKind::Face, face)?;
        Ok(introspect.face_edges(id)?)
    }
}

fn exactly_one(
    found: Vec<KernelId>,
    kind: TopoKind,
    predicate: String,
) -> Result<KernelId, SelectionError> {
    match found.as_slice() {
        [one] => Ok(*one),
        _ => Err(SelectionError::Ambiguous {
            kind,
            predicate,
            matches: found.len(),
        }),
    }
}
