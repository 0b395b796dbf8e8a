//! Bounding-box topology used by `MockKernel`.
//!
//! Every face and edge is reduced to its axis-aligned box. This is enough to
//! drive predicate-based re-selection deterministically without real B-rep math.

use container_types::{BoundingBox, CurveLoop, Point2, Point3, Segment, Winding};

use crate::types::{OpMode, SketchPlane};

/// A closed planar loop placed on a sketch plane.
#[derive(Debug, Clone)]
pub(crate) struct Outline {
    pub plane: SketchPlane,
    pub segments: Vec<Segment>,
}

impl Outline {
    pub fn bounds(&self) -> BoundingBox {
        self.segments
            .iter()
            .fold(BoundingBox::empty(), |bb, s| bb.union(&segment_bounds(self.plane, s)))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DraftEdge {
    pub bbox: BoundingBox,
    /// Edges swept from the same profile vertex share a chain. Tangent-chain
    /// fillets propagate along it.
    pub chain: Option<u64>,
}

#[derive(Debug, Clone)]
pub(crate) struct DraftFace {
    pub bbox: BoundingBox,
    pub edges: Vec<usize>,
    /// Boundary of a planar cap; usable as a profile.
    pub outline: Option<Outline>,
    /// Inner boundary of a flat annular strip swept around a rail. Joining
    /// the strip onto a cap shrinks the cap to this loop.
    pub inner: Option<Outline>,
}

/// Faces and edges of one body, addressed by index.
#[derive(Debug, Clone, Default)]
pub(crate) struct Draft {
    pub faces: Vec<DraftFace>,
    pub edges: Vec<DraftEdge>,
}

pub(crate) fn segment_bounds(plane: SketchPlane, segment: &Segment) -> BoundingBox {
    let (min, max) = segment.bounds();
    plane.bounds(min, max)
}

fn flat_box(min: Point2, max: Point2, z: f64) -> BoundingBox {
    BoundingBox::new(Point3::new(min.x, min.y, z), Point3::new(max.x, max.y, z))
}

impl Draft {
    fn push_edge(&mut self, bbox: BoundingBox, chain: Option<u64>) -> usize {
        self.edges.push(DraftEdge { bbox, chain });
        self.edges.len() - 1
    }

    pub fn bounds(&self) -> BoundingBox {
        let faces = self.faces.iter().map(|f| f.bbox);
        let edges = self.edges.iter().map(|e| e.bbox);
        faces
            .chain(edges)
            .fold(BoundingBox::empty(), |bb, b| bb.union(&b))
    }

    pub fn translate(&self, offset: [f64; 3]) -> Self {
        let mut out = self.clone();
        for e in &mut out.edges {
            e.bbox = e.bbox.translate(offset);
        }
        for f in &mut out.faces {
            f.bbox = f.bbox.translate(offset);
            f.outline = f.outline.take().map(|o| translate_outline(&o, offset));
            f.inner = f.inner.take().map(|o| translate_outline(&o, offset));
        }
        out
    }

    /// Solid swept by moving `outline` `distance` along its plane normal.
    pub fn prism(outline: &Outline, distance: f64) -> Self {
        let bottom = outline.plane;
        let top = bottom.shifted(distance);
        let n = outline.segments.len();
        let mut draft = Draft::default();

        let lower: Vec<usize> = outline
            .segments
            .iter()
            .map(|s| draft.push_edge(segment_bounds(bottom, s), None))
            .collect();
        let upper: Vec<usize> = outline
            .segments
            .iter()
            .map(|s| draft.push_edge(segment_bounds(top, s), None))
            .collect();
        let seams: Vec<usize> = outline
            .segments
            .iter()
            .map(|s| {
                let p = s.start();
                let bb = BoundingBox::from_points(&[bottom.to_world(p), top.to_world(p)]);
                draft.push_edge(bb, None)
            })
            .collect();

        for i in 0..n {
            let mut edges = vec![lower[i], upper[i], seams[i]];
            if n > 1 {
                edges.push(seams[(i + 1) % n]);
            }
            draft.faces.push(DraftFace {
                bbox: draft.edges[lower[i]].bbox.union(&draft.edges[upper[i]].bbox),
                edges,
                outline: None,
                inner: None,
            });
        }

        for (plane, edges) in [(bottom, lower), (top, upper)] {
            let cap = Outline {
                plane,
                segments: outline.segments.clone(),
            };
            draft.faces.push(DraftFace {
                bbox: cap.bounds(),
                edges,
                outline: Some(cap),
                inner: None,
            });
        }
        draft
    }

    /// Closed sweep of a vertical profile around a horizontal rail.
    ///
    /// Profile points become (inset, height) pairs: the inset is measured from
    /// the first rail segment toward the rail interior, the height is world Z.
    /// Every (profile vertex, rail segment) pair yields one edge.
    pub fn sweep(
        profile: &Outline,
        rail: &CurveLoop,
        next_chain: &mut u64,
        eps: f64,
    ) -> Result<Self, String> {
        if !profile.plane.is_vertical() {
            return Err("profile must lie on a vertical plane".to_string());
        }
        let winding = rail.winding();
        let first = rail.segments()[0];
        let origin = first.start();
        let shifted = first.offset(1.0, winding).start();
        let normal = (shifted.x - origin.x, shifted.y - origin.y);

        let uv: Vec<(f64, f64)> = profile
            .segments
            .iter()
            .map(|s| {
                let p = profile.plane.to_world(s.start());
                let u = (p.x - origin.x) * normal.0 + (p.y - origin.y) * normal.1;
                (u, p.z)
            })
            .collect();

        let mut draft = Draft::default();
        let rail_len = rail.len();
        // grid[j][i]: edge of profile vertex j along rail segment i
        let mut grid: Vec<Vec<usize>> = Vec::with_capacity(uv.len());
        for &(u, v) in &uv {
            let chain = *next_chain;
            *next_chain += 1;
            let row = rail
                .segments()
                .iter()
                .map(|s| {
                    let (min, max) = s.offset(u, winding).bounds();
                    draft.push_edge(flat_box(min, max, v), Some(chain))
                })
                .collect();
            grid.push(row);
        }

        let m = uv.len();
        for j in 0..m {
            let k = (j + 1) % m;
            let inner = if (uv[j].1 - uv[k].1).abs() < eps {
                let inset = uv[j].0.max(uv[k].0);
                Some(Outline {
                    plane: SketchPlane::Xy { z: uv[j].1 },
                    segments: rail
                        .segments()
                        .iter()
                        .map(|s| s.offset(inset, winding))
                        .collect(),
                })
            } else {
                None
            };
            for i in 0..rail_len {
                let (a, b) = (grid[j][i], grid[k][i]);
                draft.faces.push(DraftFace {
                    bbox: draft.edges[a].bbox.union(&draft.edges[b].bbox),
                    edges: vec![a, b],
                    outline: None,
                    inner: inner.clone(),
                });
            }
        }
        Ok(draft)
    }

    /// Combine `tool` into this draft.
    ///
    /// Coincident edges are shared. A tool face lying on the same plane as an
    /// existing face and touching it is absorbed: a join grows the existing
    /// face, a cut removes it when the tool covers it entirely. Cuts discard
    /// tool geometry that does not reach the target.
    pub fn merge(&mut self, tool: Draft, mode: OpMode, eps: f64) {
        let target_bounds = self.bounds();
        let cutting = mode == OpMode::Cut;

        let mut edge_map: Vec<Option<usize>> = Vec::with_capacity(tool.edges.len());
        for edge in tool.edges {
            if cutting && !edge.bbox.intersects(&target_bounds, eps) {
                edge_map.push(None);
                continue;
            }
            let existing = self
                .edges
                .iter()
                .position(|e| e.bbox.approx_eq(&edge.bbox, eps));
            match existing {
                Some(idx) => edge_map.push(Some(idx)),
                None => {
                    self.edges.push(edge);
                    edge_map.push(Some(self.edges.len() - 1));
                }
            }
        }

        let original_faces = self.faces.len();
        let mut removed = vec![false; original_faces];
        for face in tool.faces {
            if cutting && !face.bbox.intersects(&target_bounds, eps) {
                continue;
            }
            let edges: Vec<usize> = face.edges.iter().filter_map(|&e| edge_map[e]).collect();
            let coplanar = (0..original_faces)
                .find(|&i| !removed[i] && coplanar_overlap(&self.faces[i].bbox, &face.bbox, eps));

            match (coplanar, cutting) {
                (Some(i), true) => {
                    // A swept strip is a ring; whatever lies inside its hole survives.
                    if face.inner.is_none() && covers(&face.bbox, &self.faces[i].bbox, eps) {
                        removed[i] = true;
                    }
                }
                (Some(i), false) => {
                    let target = &mut self.faces[i];
                    let is_cap = target.outline.is_some();
                    match face.inner {
                        Some(inner) if is_cap => {
                            target.bbox = inner.bounds();
                            target.outline = Some(inner);
                        }
                        _ => target.bbox = target.bbox.union(&face.bbox),
                    }
                    for e in edges {
                        if !target.edges.contains(&e) {
                            target.edges.push(e);
                        }
                    }
                }
                (None, _) => self.faces.push(DraftFace { edges, ..face }),
            }
        }

        let mut idx = 0;
        self.faces.retain(|_| {
            let keep = idx >= original_faces || !removed[idx];
            idx += 1;
            keep
        });
    }

    /// Replace each listed edge by a rounded face bounded by two new edges.
    pub fn fillet(&mut self, edges: &[usize], radius: f64) {
        let mut replacement = std::collections::HashMap::new();
        for &e in edges {
            let bbox = self.edges[e].bbox;
            let side_a = self.push_edge(bbox, None);
            let side_b = self.push_edge(bbox, None);
            replacement.insert(e, side_a);
            let grown = BoundingBox::new(
                bbox.min.translate([-radius, -radius, -radius]),
                bbox.max.translate([radius, radius, radius]),
            );
            self.faces.push(DraftFace {
                bbox: grown,
                edges: vec![side_a, side_b],
                outline: None,
                inner: None,
            });
        }
        for face in &mut self.faces {
            for e in &mut face.edges {
                if let Some(&r) = replacement.get(e) {
                    *e = r;
                }
            }
        }
        // Drop the consumed edges and compact indices.
        let mut remap = vec![None; self.edges.len()];
        let mut kept = Vec::with_capacity(self.edges.len());
        for (i, edge) in self.edges.drain(..).enumerate() {
            if !replacement.contains_key(&i) {
                remap[i] = Some(kept.len());
                kept.push(edge);
            }
        }
        self.edges = kept;
        for face in &mut self.faces {
            face.edges = face.edges.iter().filter_map(|&e| remap[e]).collect();
        }
    }

    /// Indices of every edge sharing a chain with one of `seeds`.
    pub fn expand_chains(&self, seeds: &[usize]) -> Vec<usize> {
        let chains: Vec<u64> = seeds.iter().filter_map(|&e| self.edges[e].chain).collect();
        let mut out: Vec<usize> = seeds.to_vec();
        for (i, edge) in self.edges.iter().enumerate() {
            if let Some(c) = edge.chain {
                if chains.contains(&c) && !out.contains(&i) {
                    out.push(i);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

fn translate_outline(outline: &Outline, offset: [f64; 3]) -> Outline {
    let (dx, dy, along) = match outline.plane {
        SketchPlane::Xy { .. } => (offset[0], offset[1], offset[2]),
        SketchPlane::Xz { .. } => (offset[0], offset[2], offset[1]),
        SketchPlane::Yz { .. } => (offset[1], offset[2], offset[0]),
    };
    Outline {
        plane: outline.plane.shifted(along),
        segments: outline.segments.iter().map(|s| s.translate(dx, dy)).collect(),
    }
}

fn coplanar_overlap(a: &BoundingBox, b: &BoundingBox, eps: f64) -> bool {
    match (a.flat_axis(eps), b.flat_axis(eps)) {
        (Some(x), Some(y)) if x == y => {
            (a.min.coord(x) - b.min.coord(x)).abs() < eps && a.intersects(b, eps)
        }
        _ => false,
    }
}

fn covers(outer: &BoundingBox, inner: &BoundingBox, eps: f64) -> bool {
    container_types::Axis::ALL.into_iter().all(|a| {
        outer.min.coord(a) <= inner.min.coord(a) + eps
            && outer.max.coord(a) >= inner.max.coord(a) - eps
    })
}

/// Orient `segments` head to tail in the given order.
///
/// The first segment is flipped if needed to meet the second; every later
/// segment must then continue from the previous end. Returns the index of the
/// first segment that breaks the walk.
pub(crate) fn orient_walk(segments: &[Segment], eps: f64) -> Result<Vec<Segment>, usize> {
    let n = segments.len();
    if n < 2 {
        return Err(0);
    }
    let touches = |p: Point2, s: &Segment| {
        p.distance_to(&s.start()) < eps || p.distance_to(&s.end()) < eps
    };
    let first = if touches(segments[0].end(), &segments[1]) {
        segments[0]
    } else if touches(segments[0].start(), &segments[1]) {
        segments[0].reversed()
    } else {
        return Err(1);
    };
    let mut out = vec![first];
    for (i, seg) in segments.iter().enumerate().skip(1) {
        let at = out[i - 1].end();
        if at.distance_to(&seg.start()) < eps {
            out.push(*seg);
        } else if at.distance_to(&seg.end()) < eps {
            out.push(seg.reversed());
        } else {
            return Err(i);
        }
    }
    Ok(out)
}

/// Chain unordered segments into one loop, starting from the first.
pub(crate) fn chain_unordered(segments: &[Segment], eps: f64) -> Option<Vec<Segment>> {
    let mut pool: Vec<Segment> = segments.to_vec();
    if pool.is_empty() {
        return None;
    }
    let mut out = vec![pool.remove(0)];
    while !pool.is_empty() {
        let at = out[out.len() - 1].end();
        let next = pool.iter().position(|s| {
            at.distance_to(&s.start()) < eps || at.distance_to(&s.end()) < eps
        })?;
        let seg = pool.remove(next);
        if at.distance_to(&seg.start()) < eps {
            out.push(seg);
        } else {
            out.push(seg.reversed());
        }
    }
    Some(out)
}

/// Full circle as a single counter-clockwise arc.
pub(crate) fn circle(center: Point2, radius: f64) -> Segment {
    Segment::arc(
        center,
        center.translate(radius, 0.0),
        std::f64::consts::TAU,
        Winding::CounterClockwise,
    )
}
