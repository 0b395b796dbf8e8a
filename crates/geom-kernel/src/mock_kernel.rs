//! MockKernel: deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Bodies are bounding-box topologies (see `mock_topology`). Every mutating
//! operation re-identifies all entities of the affected body, so ids held
//! across operations go stale exactly as they do in a real kernel. An
//! operation log lets tests inspect what a pipeline asked for.

use std::collections::HashMap;

use container_types::{BoundingBox, CurveLoop, Point2, Segment, Winding};
use tracing::debug;

use crate::mock_topology::{chain_unordered, circle, orient_walk, Draft, DraftFace, DraftEdge, Outline};
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;

/// Kind of operation recorded in the mock's log.
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    Extrude { mode: OpMode, distance: f64 },
    Sweep { mode: OpMode, rail_len: usize },
    Pattern { copies: usize },
    Join { tools: usize },
    Fillet {
        seed_edges: usize,
        filleted_edges: usize,
        radius: f64,
        rolling_ball: bool,
    },
    Name { name: String },
}

/// One completed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpRecord {
    pub kind: OpKind,
    pub body: u64,
    /// Bounds of the geometry the operation generated, before combining.
    pub tool_bounds: Option<BoundingBox>,
    /// Bounds of the affected body after the operation.
    pub bounds: BoundingBox,
    pub faces: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Face(usize),
    Edge(usize),
}

#[derive(Debug)]
struct MockSketch {
    plane: SketchPlane,
    curves: Vec<u64>,
}

#[derive(Debug)]
struct MockCurve {
    sketch: u64,
    segment: Segment,
}

/// A body with the ids currently assigned to its entities.
#[derive(Debug)]
struct MockBody {
    draft: Draft,
    face_ids: Vec<KernelId>,
    edge_ids: Vec<KernelId>,
    name: Option<String>,
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    next_chain: u64,
    tolerance: f64,
    sketches: HashMap<u64, MockSketch>,
    curves: HashMap<u64, MockCurve>,
    profiles: HashMap<u64, Outline>,
    bodies: HashMap<u64, MockBody>,
    index: HashMap<KernelId, (u64, Entity)>,
    log: Vec<OpRecord>,
}

impl MockKernel {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    pub fn new() -> Self {
        Self::with_tolerance(Self::DEFAULT_TOLERANCE)
    }

    /// Coincidence tolerance for merging and walking curves. Keep it below
    /// the selection epsilon of the model under test.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            next_chain: 1,
            tolerance,
            sketches: HashMap::new(),
            curves: HashMap::new(),
            profiles: HashMap::new(),
            bodies: HashMap::new(),
            index: HashMap::new(),
            log: Vec::new(),
        }
    }

    /// Every operation performed so far, oldest first.
    pub fn log(&self) -> &[OpRecord] {
        &self.log
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Insert a body made of bare boxes. `faces` pairs a face box with the
    /// indices of its edges in `edges`.
    pub fn insert_synthetic_body(
        &mut self,
        edges: Vec<BoundingBox>,
        faces: Vec<(BoundingBox, Vec<usize>)>,
    ) -> BodyHandle {
        let draft = Draft {
            edges: edges
                .into_iter()
                .map(|bbox| DraftEdge { bbox, chain: None })
                .collect(),
            faces: faces
                .into_iter()
                .map(|(bbox, edges)| DraftFace {
                    bbox,
                    edges,
                    outline: None,
                    inner: None,
                })
                .collect(),
        };
        let handle = self.alloc_handle();
        self.store(&handle, draft, None);
        handle
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> BodyHandle {
        let h = BodyHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn alloc_raw(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }

    /// Drop the ids of a body from the index.
    fn forget(&mut self, body: u64) {
        if let Some(b) = self.bodies.get(&body) {
            for id in b.face_ids.iter().chain(b.edge_ids.iter()) {
                self.index.remove(id);
            }
        }
    }

    /// Store a draft under `handle` with freshly allocated ids.
    fn store(&mut self, handle: &BodyHandle, draft: Draft, name: Option<String>) {
        self.forget(handle.0);
        let face_ids: Vec<KernelId> = (0..draft.faces.len()).map(|_| self.alloc_id()).collect();
        let edge_ids: Vec<KernelId> = (0..draft.edges.len()).map(|_| self.alloc_id()).collect();
        for (i, id) in face_ids.iter().enumerate() {
            self.index.insert(*id, (handle.0, Entity::Face(i)));
        }
        for (i, id) in edge_ids.iter().enumerate() {
            self.index.insert(*id, (handle.0, Entity::Edge(i)));
        }
        self.bodies.insert(
            handle.0,
            MockBody {
                draft,
                face_ids,
                edge_ids,
                name,
            },
        );
    }

    fn body(&self, handle: &BodyHandle) -> Result<&MockBody, KernelError> {
        self.bodies
            .get(&handle.0)
            .ok_or(KernelError::BodyNotFound { handle: handle.0 })
    }

    fn record(&mut self, kind: OpKind, handle: &BodyHandle, tool_bounds: Option<BoundingBox>) {
        if let Some(b) = self.bodies.get(&handle.0) {
            let record = OpRecord {
                kind,
                body: handle.0,
                tool_bounds,
                bounds: b.draft.bounds(),
                faces: b.draft.faces.len(),
                edges: b.draft.edges.len(),
            };
            debug!(?record.kind, body = handle.0, faces = record.faces, edges = record.edges, "mock op");
            self.log.push(record);
        }
    }

    /// Place `tool` according to `op` and return the resulting body.
    fn apply(&mut self, tool: Draft, op: FeatureOp<'_>) -> Result<BodyHandle, KernelError> {
        match op {
            FeatureOp::NewBody => {
                let handle = self.alloc_handle();
                self.store(&handle, tool, None);
                Ok(handle)
            }
            FeatureOp::Join(target) | FeatureOp::Cut(target) => {
                let mut body = self
                    .bodies
                    .remove(&target.0)
                    .ok_or(KernelError::BodyNotFound { handle: target.0 })?;
                for id in body.face_ids.iter().chain(body.edge_ids.iter()) {
                    self.index.remove(id);
                }
                body.draft.merge(tool, op.mode(), self.tolerance);
                self.store(target, body.draft, body.name);
                Ok(target.clone())
            }
        }
    }

    fn take_profile(&mut self, profile: ProfileHandle) -> Result<Outline, KernelError> {
        self.profiles
            .remove(&profile.0)
            .ok_or(KernelError::ProfileNotFound { handle: profile.0 })
    }

    fn sketch_plane(&self, sketch: &SketchHandle) -> Result<SketchPlane, KernelError> {
        self.sketches
            .get(&sketch.0)
            .map(|s| s.plane)
            .ok_or(KernelError::SketchNotFound { handle: sketch.0 })
    }

    fn add_curve(&mut self, sketch: &SketchHandle, segment: Segment) -> Result<CurveHandle, KernelError> {
        self.sketch_plane(sketch)?;
        let raw = self.alloc_raw();
        self.curves.insert(
            raw,
            MockCurve {
                sketch: sketch.0,
                segment,
            },
        );
        if let Some(s) = self.sketches.get_mut(&sketch.0) {
            s.curves.push(raw);
        }
        Ok(CurveHandle(raw))
    }

    fn new_profile(&mut self, plane: SketchPlane, segments: Vec<Segment>) -> ProfileHandle {
        let raw = self.alloc_raw();
        self.profiles.insert(raw, Outline { plane, segments });
        ProfileHandle(raw)
    }

    fn entity(&self, id: KernelId) -> Result<(&MockBody, Entity), KernelError> {
        let (body, entity) = self
            .index
            .get(&id)
            .ok_or(KernelError::EntityNotFound { id })?;
        let b = self
            .bodies
            .get(body)
            .ok_or(KernelError::EntityNotFound { id })?;
        Ok((b, *entity))
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn create_sketch(&mut self, plane: SketchPlane) -> Result<SketchHandle, KernelError> {
        let raw = self.alloc_raw();
        self.sketches.insert(
            raw,
            MockSketch {
                plane,
                curves: Vec::new(),
            },
        );
        Ok(SketchHandle(raw))
    }

    fn add_line(
        &mut self,
        sketch: &SketchHandle,
        start: Point2,
        end: Point2,
    ) -> Result<CurveHandle, KernelError> {
        if start.distance_to(&end) < self.tolerance {
            return Err(KernelError::InvalidProfile {
                reason: "zero-length line".to_string(),
            });
        }
        self.add_curve(sketch, Segment::line(start, end))
    }

    fn add_arc(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        start: Point2,
        sweep_angle: f64,
    ) -> Result<CurveHandle, KernelError> {
        if center.distance_to(&start) < self.tolerance || sweep_angle.abs() < 1e-12 {
            return Err(KernelError::InvalidProfile {
                reason: "degenerate arc".to_string(),
            });
        }
        let direction = if sweep_angle > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        };
        self.add_curve(sketch, Segment::arc(center, start, sweep_angle.abs(), direction))
    }

    fn add_circle(
        &mut self,
        sketch: &SketchHandle,
        center: Point2,
        radius: f64,
    ) -> Result<ProfileHandle, KernelError> {
        let plane = self.sketch_plane(sketch)?;
        if radius <= 0.0 {
            return Err(KernelError::InvalidProfile {
                reason: format!("circle radius {radius} must be positive"),
            });
        }
        Ok(self.new_profile(plane, vec![circle(center, radius)]))
    }

    fn add_rectangle(
        &mut self,
        sketch: &SketchHandle,
        corner_a: Point2,
        corner_b: Point2,
    ) -> Result<ProfileHandle, KernelError> {
        let plane = self.sketch_plane(sketch)?;
        let (x0, x1) = (corner_a.x.min(corner_b.x), corner_a.x.max(corner_b.x));
        let (y0, y1) = (corner_a.y.min(corner_b.y), corner_a.y.max(corner_b.y));
        if x1 - x0 < self.tolerance || y1 - y0 < self.tolerance {
            return Err(KernelError::InvalidProfile {
                reason: "degenerate rectangle".to_string(),
            });
        }
        let pts = [
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ];
        let segments = (0..4).map(|i| Segment::line(pts[i], pts[(i + 1) % 4])).collect();
        Ok(self.new_profile(plane, segments))
    }

    fn loop_profile(&mut self, sketch: &SketchHandle) -> Result<ProfileHandle, KernelError> {
        let (plane, curve_ids) = {
            let s = self
                .sketches
                .get(&sketch.0)
                .ok_or(KernelError::SketchNotFound { handle: sketch.0 })?;
            (s.plane, s.curves.clone())
        };
        let segments: Vec<Segment> = curve_ids
            .iter()
            .filter_map(|c| self.curves.get(c).map(|c| c.segment))
            .collect();
        let chained = chain_unordered(&segments, self.tolerance).ok_or_else(|| {
            KernelError::InvalidProfile {
                reason: "sketch curves do not form a single chain".to_string(),
            }
        })?;
        let closed = CurveLoop::new(chained, self.tolerance).map_err(|e| {
            KernelError::InvalidProfile {
                reason: e.to_string(),
            }
        })?;
        Ok(self.new_profile(plane, closed.segments().to_vec()))
    }

    fn face_profile(&mut self, face: KernelId) -> Result<ProfileHandle, KernelError> {
        let outline = {
            let (body, entity) = self.entity(face)?;
            match entity {
                Entity::Face(i) => body.draft.faces[i].outline.clone(),
                Entity::Edge(_) => None,
            }
        };
        let outline = outline.ok_or_else(|| KernelError::InvalidProfile {
            reason: format!("{face:?} is not a planar face"),
        })?;
        Ok(self.new_profile(outline.plane, outline.segments))
    }

    fn extrude(
        &mut self,
        profile: ProfileHandle,
        distance: f64,
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError> {
        if !distance.is_finite() || distance.abs() < self.tolerance {
            return Err(KernelError::ExtrudeFailed {
                reason: format!("distance {distance} is degenerate"),
            });
        }
        let outline = self.take_profile(profile)?;
        let tool = Draft::prism(&outline, distance);
        let tool_bounds = tool.bounds();
        let handle = self.apply(tool, op)?;
        self.record(
            OpKind::Extrude {
                mode: op.mode(),
                distance,
            },
            &handle,
            Some(tool_bounds),
        );
        Ok(handle)
    }

    fn sweep(
        &mut self,
        profile: ProfileHandle,
        rail: &[CurveHandle],
        op: FeatureOp<'_>,
    ) -> Result<BodyHandle, KernelError> {
        let mut segments = Vec::with_capacity(rail.len());
        let mut rail_sketch = None;
        for c in rail {
            let curve = self
                .curves
                .get(&c.0)
                .ok_or(KernelError::CurveNotFound { handle: c.0 })?;
            if *rail_sketch.get_or_insert(curve.sketch) != curve.sketch {
                return Err(KernelError::InvalidRail {
                    reason: "rail curves come from different sketches".to_string(),
                });
            }
            segments.push(curve.segment);
        }
        let plane = match rail_sketch {
            Some(s) => self
                .sketches
                .get(&s)
                .map(|s| s.plane)
                .ok_or(KernelError::SketchNotFound { handle: s })?,
            None => {
                return Err(KernelError::InvalidRail {
                    reason: "empty rail".to_string(),
                })
            }
        };
        if plane.is_vertical() {
            return Err(KernelError::InvalidRail {
                reason: "rail must lie on a horizontal plane".to_string(),
            });
        }
        let walked = orient_walk(&segments, self.tolerance).map_err(|i| KernelError::InvalidRail {
            reason: format!("curve {i} does not continue the walk"),
        })?;
        let rail_loop = CurveLoop::new(walked, self.tolerance).map_err(|e| KernelError::InvalidRail {
            reason: e.to_string(),
        })?;

        let outline = self.take_profile(profile)?;
        let tool = Draft::sweep(&outline, &rail_loop, &mut self.next_chain, self.tolerance)
            .map_err(|reason| KernelError::SweepFailed { reason })?;
        let tool_bounds = tool.bounds();
        let handle = self.apply(tool, op)?;
        self.record(
            OpKind::Sweep {
                mode: op.mode(),
                rail_len: rail.len(),
            },
            &handle,
            Some(tool_bounds),
        );
        Ok(handle)
    }

    fn rectangular_pattern(
        &mut self,
        body: &BodyHandle,
        count_x: u32,
        spacing_x: f64,
        count_y: u32,
        spacing_y: f64,
    ) -> Result<Vec<BodyHandle>, KernelError> {
        if count_x == 0 || count_y == 0 {
            return Err(KernelError::PatternFailed {
                reason: "pattern counts must be at least 1".to_string(),
            });
        }
        let source = self.body(body)?.draft.clone();
        let mut copies = Vec::new();
        for j in 0..count_y {
            for i in 0..count_x {
                if i == 0 && j == 0 {
                    continue;
                }
                let offset = [i as f64 * spacing_x, j as f64 * spacing_y, 0.0];
                let handle = self.alloc_handle();
                self.store(&handle, source.translate(offset), None);
                copies.push(handle);
            }
        }
        self.record(OpKind::Pattern { copies: copies.len() }, body, None);
        Ok(copies)
    }

    fn boolean_join(
        &mut self,
        target: &BodyHandle,
        tools: Vec<BodyHandle>,
    ) -> Result<(), KernelError> {
        self.body(target)?;
        let count = tools.len();
        for tool in tools {
            if tool == *target {
                return Err(KernelError::BooleanFailed {
                    reason: "a body cannot be joined with itself".to_string(),
                });
            }
            self.forget(tool.0);
            let draft = self
                .bodies
                .remove(&tool.0)
                .ok_or(KernelError::BodyNotFound { handle: tool.0 })?
                .draft;
            self.apply(draft, FeatureOp::Join(target))?;
        }
        self.record(OpKind::Join { tools: count }, target, None);
        Ok(())
    }

    fn fillet(
        &mut self,
        body: &BodyHandle,
        edges: &[KernelId],
        spec: &FilletSpec,
    ) -> Result<(), KernelError> {
        if spec.radius <= 0.0 || !spec.radius.is_finite() {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        if edges.is_empty() {
            return Err(KernelError::FilletFailed {
                reason: "no edges given".to_string(),
            });
        }
        let mut seeds = Vec::with_capacity(edges.len());
        for id in edges {
            match self.index.get(id) {
                Some(&(owner, Entity::Edge(i))) if owner == body.0 => seeds.push(i),
                _ => {
                    return Err(KernelError::FilletFailed {
                        reason: format!("edge {id:?} not found in {body}"),
                    })
                }
            }
        }
        seeds.sort_unstable();
        seeds.dedup();

        let mut b = self
            .bodies
            .remove(&body.0)
            .ok_or(KernelError::BodyNotFound { handle: body.0 })?;
        for id in b.face_ids.iter().chain(b.edge_ids.iter()) {
            self.index.remove(id);
        }
        let targets = if spec.tangent_chain {
            b.draft.expand_chains(&seeds)
        } else {
            seeds.clone()
        };
        b.draft.fillet(&targets, spec.radius);
        self.store(body, b.draft, b.name);
        self.record(
            OpKind::Fillet {
                seed_edges: seeds.len(),
                filleted_edges: targets.len(),
                radius: spec.radius,
                rolling_ball: spec.rolling_ball_corner,
            },
            body,
            None,
        );
        Ok(())
    }

    fn set_name(&mut self, body: &BodyHandle, name: &str) -> Result<(), KernelError> {
        let b = self
            .bodies
            .get_mut(&body.0)
            .ok_or(KernelError::BodyNotFound { handle: body.0 })?;
        b.name = Some(name.to_string());
        self.record(
            OpKind::Name {
                name: name.to_string(),
            },
            body,
            None,
        );
        Ok(())
    }

    fn release(&mut self, body: BodyHandle) {
        self.forget(body.0);
        self.bodies.remove(&body.0);
    }
}

impl KernelIntrospect for MockKernel {
    fn edges(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError> {
        Ok(self.body(body)?.edge_ids.clone())
    }

    fn faces(&self, body: &BodyHandle) -> Result<Vec<KernelId>, KernelError> {
        Ok(self.body(body)?.face_ids.clone())
    }

    fn face_edges(&self, face: KernelId) -> Result<Vec<KernelId>, KernelError> {
        match self.entity(face)? {
            (b, Entity::Face(i)) => Ok(b.draft.faces[i]
                .edges
                .iter()
                .map(|&e| b.edge_ids[e])
                .collect()),
            (_, Entity::Edge(_)) => Err(KernelError::EntityNotFound { id: face }),
        }
    }

    fn bounding_box(&self, entity: KernelId) -> Result<BoundingBox, KernelError> {
        match self.entity(entity)? {
            (b, Entity::Face(i)) => Ok(b.draft.faces[i].bbox),
            (b, Entity::Edge(i)) => Ok(b.draft.edges[i].bbox),
        }
    }

    fn body_bounding_box(&self, body: &BodyHandle) -> Result<BoundingBox, KernelError> {
        Ok(self.body(body)?.draft.bounds())
    }

    fn body_name(&self, body: &BodyHandle) -> Result<Option<String>, KernelError> {
        Ok(self.body(body)?.name.clone())
    }
}
