//! Grid divider box: base cell, shell, stacking rim, cavity and optional
//! ledge, scoop and dividers.
//!
//! Every stage re-queries the body's current topology; nothing is cached
//! between kernel calls.

use container_types::{Axis, BoxParams, Point2};
use geom_kernel::{BodyHandle, FeatureOp, FilletSpec, SketchPlane, TopoKind};
use modeling_ops::{
    execute_extrude_face, execute_extrude_loop, execute_extrude_rect, execute_fillet,
    execute_pattern_join, execute_sweep, sketch, BoxDimensions, BoxPattern, CurvePathBuilder,
    GeometricSelector, KernelBundle, Predicate, RoundedRect,
};
use tracing::{debug, info, instrument, warn};

use crate::report::BuildReport;
use crate::types::{AtStage, BuildConfig, BuildError, BuildOutcome, Stage};

/// Build a divider box. On failure the partial body is released and the
/// error names the stage that failed.
#[instrument(skip(kb, params, config), fields(name = %params.name))]
pub fn build_box(
    kb: &mut dyn KernelBundle,
    params: &BoxParams,
    config: &BuildConfig,
) -> Result<BuildOutcome, BuildError> {
    config.validate()?;
    let dims = BoxDimensions::derive(params, config.units)?;
    info!(
        width = dims.width,
        depth = dims.depth,
        height = dims.height,
        "derived box dimensions"
    );

    let mut run = BoxRun {
        kb,
        params,
        paths: CurvePathBuilder::new(&config.units),
        selector: GeometricSelector::new(&config.units),
        report: BuildReport::new(&params.name),
        dims,
    };

    let body = run.base()?;
    let result = run.shape(&body).and_then(|()| {
        run.kb.set_name(&body, &params.name).at(Stage::Finish)?;
        Ok(())
    });
    match result {
        Ok(()) => {
            info!(body = %body, build = %run.report.build_id, "box complete");
            Ok(BuildOutcome {
                body,
                name: params.name.clone(),
                report: run.report,
            })
        }
        Err(err) => {
            warn!(stage = ?err.stage(), error = %err, "box build failed, releasing body");
            run.kb.release(body);
            Err(err)
        }
    }
}

struct BoxRun<'a> {
    kb: &'a mut dyn KernelBundle,
    params: &'a BoxParams,
    dims: BoxDimensions,
    paths: CurvePathBuilder,
    selector: GeometricSelector,
    report: BuildReport,
}

impl BoxRun<'_> {
    /// Stages after the base, in order.
    fn shape(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        self.magnet_holes(body)?;
        self.edge_relief(body)?;
        self.grid_pattern(body)?;
        if self.params.base_only {
            self.base_only_shell(body)?;
            for stage in &Stage::BOX[5..] {
                self.report.skipped(*stage, "base-only box");
            }
            return Ok(());
        }
        self.box_shell(body)?;
        self.rim(body)?;
        self.top_fillet(body)?;
        self.hollow(body)?;
        self.indent(body)?;
        self.ledge(body)?;
        self.scoop(body)?;
        self.dividers(body)
    }

    fn cell_rail(&self, stage: Stage) -> Result<RoundedRect, BuildError> {
        let d = &self.dims;
        self.paths
            .rounded_rect(d.cell, d.cell, d.corner_radius, 0.0)
            .at(stage)
    }

    /// Outline of the whole box at height `z`.
    fn box_rail(&self, z: f64, stage: Stage) -> Result<RoundedRect, BuildError> {
        let d = &self.dims;
        self.paths
            .rounded_rect(d.width, d.depth, d.corner_radius, z)
            .at(stage)
    }

    fn base(&mut self) -> Result<BodyHandle, BuildError> {
        let stage = Stage::Base;
        let cell = self.cell_rail(stage)?;
        let body = execute_extrude_loop(
            self.kb,
            &cell.to_loop(),
            self.dims.nesting_depth,
            FeatureOp::NewBody,
        )
        .at(stage)?;
        self.report.completed(
            stage,
            format!("cell {:.3} extruded {:.3}", self.dims.cell, self.dims.nesting_depth),
        );
        Ok(body)
    }

    fn magnet_holes(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::MagnetHoles;
        if !self.params.include_magnets {
            self.report.skipped(stage, "magnets not requested");
            return Ok(());
        }
        let centres: Vec<Point2> = self
            .dims
            .magnet_centres()
            .iter()
            .map(|&(x, y)| Point2::new(x, y))
            .collect();
        let profiles = sketch::emit_circles(
            self.kb,
            SketchPlane::Xy { z: 0.0 },
            &centres,
            self.dims.magnet_radius,
        )
        .at(stage)?;
        for profile in profiles {
            self.kb
                .extrude(profile, self.dims.magnet_depth, FeatureOp::Cut(body))
                .at(stage)?;
        }
        self.report.completed(
            stage,
            format!("{} holes r={:.4}", centres.len(), self.dims.magnet_radius),
        );
        Ok(())
    }

    fn edge_relief(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::EdgeRelief;
        let rail = self.cell_rail(stage)?;
        let profile = self.paths.edge_relief_profile(&self.dims).at(stage)?;
        execute_sweep(self.kb, &profile, &rail, FeatureOp::Cut(body)).at(stage)?;
        self.report.completed(stage, "foot notch swept around the cell");
        Ok(())
    }

    fn grid_pattern(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::GridPattern;
        let (nx, ny) = (self.params.slots_wide, self.params.slots_deep);
        if nx == 1 && ny == 1 {
            self.report.skipped(stage, "single cell");
            return Ok(());
        }
        let copies = execute_pattern_join(self.kb, body, nx, ny, self.dims.cell).at(stage)?;
        self.report
            .completed(stage, format!("{nx} x {ny} grid, {copies} copies joined"));
        Ok(())
    }

    fn base_only_shell(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::BoxShell;
        let outline = self.box_rail(self.dims.nesting_depth, stage)?;
        execute_extrude_loop(
            self.kb,
            &outline.to_loop(),
            self.dims.base_only_height,
            FeatureOp::Join(body),
        )
        .at(stage)?;
        self.report.completed(
            stage,
            format!("base-only plate {:.3}", self.dims.base_only_height),
        );
        Ok(())
    }

    fn box_shell(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::BoxShell;
        let outline = self.box_rail(self.dims.nesting_depth, stage)?;
        execute_extrude_loop(
            self.kb,
            &outline.to_loop(),
            self.dims.shell_height,
            FeatureOp::Join(body),
        )
        .at(stage)?;
        self.report.completed(
            stage,
            format!(
                "{:.3} x {:.3} shell extruded {:.3}",
                self.dims.width, self.dims.depth, self.dims.shell_height
            ),
        );
        Ok(())
    }

    fn rim(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Rim;
        let rail = self.box_rail(self.dims.height, stage)?;
        let profile = self.paths.rim_profile(&self.dims).at(stage)?;
        execute_sweep(self.kb, &profile, &rail, FeatureOp::Join(body)).at(stage)?;
        self.report.completed(stage, "stacking rim swept");
        Ok(())
    }

    fn top_fillet(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::TopFillet;
        // The rim crest runs all the way round; pick the run on the left wall
        // and let the tangent chain carry the fillet around.
        let left = Predicate::from(BoxPattern::new().at(Axis::X, 0.0));
        let edge = self
            .selector
            .select_topmost_edge(self.kb.topology(), body, &left)
            .at(stage)?;
        let spec = FilletSpec {
            radius: self.dims.top_fillet,
            rolling_ball_corner: true,
            is_g2: false,
            tangent_chain: true,
        };
        execute_fillet(self.kb, body, &[edge], &spec).at(stage)?;
        self.report.fillet(stage, vec![1]);
        self.report
            .completed(stage, format!("rim crest r={:.3}", self.dims.top_fillet));
        Ok(())
    }

    fn hollow(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Hollow;
        let top = Predicate::from(BoxPattern::new().at(Axis::Z, self.dims.height));
        let face = self
            .selector
            .select_unique(self.kb.topology(), body, TopoKind::Face, &top)
            .at(stage)?;
        execute_extrude_face(self.kb, face, -self.dims.hollow_depth, FeatureOp::Cut(body))
            .at(stage)?;
        self.report.completed(
            stage,
            format!(
                "cavity cut {:.3} down to floor {:.3}",
                self.dims.hollow_depth, self.dims.floor_height
            ),
        );
        Ok(())
    }

    fn indent(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Indent;
        let rail = self.box_rail(self.dims.height, stage)?;
        let profile = self.paths.indent_profile(&self.dims).at(stage)?;
        execute_sweep(self.kb, &profile, &rail, FeatureOp::Cut(body)).at(stage)?;
        self.report.completed(stage, "stepped indent swept");
        Ok(())
    }

    fn ledge(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Ledge;
        if !self.params.include_ledge {
            self.report.skipped(stage, "ledge not requested");
            return Ok(());
        }
        if !self.dims.ledge_allowed {
            self.report.skipped(
                stage,
                format!("{} slots is too short for a ledge", self.params.slots_high),
            );
            return Ok(());
        }
        let profile = self.paths.ledge_profile(&self.dims).at(stage)?;
        execute_extrude_loop(self.kb, &profile, self.dims.usable_span, FeatureOp::Join(body))
            .at(stage)?;
        self.report.completed(
            stage,
            format!("ledge extruded {:.3}", self.dims.usable_span),
        );
        Ok(())
    }

    fn scoop(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Scoop;
        if !self.params.include_scoop {
            self.report.skipped(stage, "scoop not requested");
            return Ok(());
        }
        let d = &self.dims;
        let floor_edge = Predicate::from(
            BoxPattern::new()
                .span(Axis::X, d.corner_radius, d.width - d.corner_radius)
                .at(Axis::Y, d.scoop_y)
                .at(Axis::Z, d.floor_height),
        );
        let edge = self
            .selector
            .select_unique(self.kb.topology(), body, TopoKind::Edge, &floor_edge)
            .at(stage)?;
        let spec = FilletSpec {
            radius: d.scoop_radius,
            rolling_ball_corner: false,
            is_g2: false,
            tangent_chain: false,
        };
        execute_fillet(self.kb, body, &[edge], &spec).at(stage)?;
        self.report.fillet(stage, vec![1]);
        self.report
            .completed(stage, format!("front scoop r={:.3}", self.dims.scoop_radius));
        Ok(())
    }

    fn dividers(&mut self, body: &BodyHandle) -> Result<(), BuildError> {
        let stage = Stage::Dividers;
        let count = self.params.divider_count;
        if count == 0 {
            self.report.skipped(stage, "no dividers");
            return Ok(());
        }
        let plan = self.dims.divider_plan(count);
        debug!(positions = ?plan.positions, "divider plan");

        let wall = self.dims.wall;
        let spec = FilletSpec {
            radius: self.dims.top_fillet,
            rolling_ball_corner: true,
            is_g2: false,
            tangent_chain: true,
        };
        for &x in &plan.positions {
            let profile = self.paths.divider_profile(&self.dims, x).at(stage)?;
            execute_extrude_rect(self.kb, &profile, wall, FeatureOp::Join(body)).at(stage)?;

            let mut edges = Vec::new();
            let mut groups = Vec::with_capacity(2);
            for plane_x in [x, x + wall] {
                let face = Predicate::from(BoxPattern::new().at(Axis::X, plane_x));
                let group = self
                    .selector
                    .edges_of_face(self.kb.topology(), body, &face)
                    .at(stage)?;
                groups.push(group.len());
                edges.extend(group);
            }
            execute_fillet(self.kb, body, &edges, &spec).at(stage)?;
            self.report.fillet(stage, groups);
        }

        self.report.completed(stage, format!("{count} dividers"));
        self.report.dividers = Some(plan);
        Ok(())
    }
}
