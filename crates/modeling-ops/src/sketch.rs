//! Emission of planned curves into kernel sketches.

use container_types::{Point2, Segment};
use geom_kernel::{CurveHandle, KernelError, ProfileHandle, SketchHandle, SketchPlane};

use crate::kernel_ext::KernelBundle;
use crate::paths::{PlanarLoop, PlanarRect, RoundedRect};

/// Add `segments` to `sketch` in the given order.
pub fn add_segments(
    kb: &mut dyn KernelBundle,
    sketch: &SketchHandle,
    segments: &[Segment],
) -> Result<Vec<CurveHandle>, KernelError> {
    segments
        .iter()
        .map(|s| match s {
            Segment::Line(l) => kb.add_line(sketch, l.start, l.end),
            Segment::Arc(a) => kb.add_arc(sketch, a.center, a.start, a.signed_sweep()),
        })
        .collect()
}

/// Sketch a rounded rectangle and return its curves in walk order.
pub fn emit_rail(
    kb: &mut dyn KernelBundle,
    rail: &RoundedRect,
) -> Result<Vec<CurveHandle>, KernelError> {
    let sketch = kb.create_sketch(rail.plane)?;
    add_segments(kb, &sketch, rail.rail().segments())
}

/// Sketch a closed loop and return the region it bounds.
pub fn emit_loop_profile(
    kb: &mut dyn KernelBundle,
    profile: &PlanarLoop,
) -> Result<ProfileHandle, KernelError> {
    let sketch = kb.create_sketch(profile.plane)?;
    add_segments(kb, &sketch, profile.curve.segments())?;
    kb.loop_profile(&sketch)
}

pub fn emit_rect(kb: &mut dyn KernelBundle, rect: &PlanarRect) -> Result<ProfileHandle, KernelError> {
    let sketch = kb.create_sketch(rect.plane)?;
    kb.add_rectangle(&sketch, rect.min, rect.max)
}

/// One profile per circle, all on the same sketch.
pub fn emit_circles(
    kb: &mut dyn KernelBundle,
    plane: SketchPlane,
    centres: &[Point2],
    radius: f64,
) -> Result<Vec<ProfileHandle>, KernelError> {
    let sketch = kb.create_sketch(plane)?;
    centres
        .iter()
        .map(|c| kb.add_circle(&sketch, *c, radius))
        .collect()
}
