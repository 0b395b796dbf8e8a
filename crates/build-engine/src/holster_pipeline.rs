//! Device holster: a block with a pocket, a lowered front and a thumb slot,
//! rounded over on every edge.

use container_types::HolsterParams;
use geom_kernel::{BodyHandle, FeatureOp, FilletSpec};
use modeling_ops::{
    execute_extrude_rect, execute_fillet, CurvePathBuilder, HolsterDimensions, KernelBundle,
};
use tracing::{info, instrument, warn};

use crate::report::BuildReport;
use crate::types::{AtStage, BuildConfig, BuildError, BuildOutcome, Stage};

#[instrument(skip(kb, params, config), fields(name = %params.name))]
pub fn build_holster(
    kb: &mut dyn KernelBundle,
    params: &HolsterParams,
    config: &BuildConfig,
) -> Result<BuildOutcome, BuildError> {
    config.validate()?;
    let dims = HolsterDimensions::derive(params, config.units)?;
    info!(
        width = dims.body_width,
        depth = dims.body_depth,
        height = dims.body_height,
        "derived holster dimensions"
    );
    let paths = CurvePathBuilder::new(&config.units);
    let mut report = BuildReport::new(&params.name);

    let base = paths.holster_base_rect(&dims).at(Stage::HolsterBase)?;
    let body = execute_extrude_rect(kb, &base, dims.body_height, FeatureOp::NewBody)
        .at(Stage::HolsterBase)?;
    report.completed(
        Stage::HolsterBase,
        format!(
            "{:.3} x {:.3} block extruded {:.3}",
            base.width(),
            base.height(),
            dims.body_height
        ),
    );

    let result = cut_and_round(kb, &paths, &dims, &body, &mut report)
        .and_then(|()| kb.set_name(&body, &params.name).at(Stage::Finish));
    match result {
        Ok(()) => {
            info!(body = %body, build = %report.build_id, "holster complete");
            Ok(BuildOutcome {
                body,
                name: params.name.clone(),
                report,
            })
        }
        Err(err) => {
            warn!(stage = ?err.stage(), error = %err, "holster build failed, releasing body");
            kb.release(body);
            Err(err)
        }
    }
}

fn cut_and_round(
    kb: &mut dyn KernelBundle,
    paths: &CurvePathBuilder,
    dims: &HolsterDimensions,
    body: &BodyHandle,
    report: &mut BuildReport,
) -> Result<(), BuildError> {
    let pocket = paths.pocket_rect(dims).at(Stage::Pocket)?;
    execute_extrude_rect(kb, &pocket, -dims.pocket_depth, FeatureOp::Cut(body))
        .at(Stage::Pocket)?;
    report.completed(
        Stage::Pocket,
        format!("{:.3} x {:.3} pocket", pocket.width(), pocket.height()),
    );

    let front = paths.front_cut_rect(dims).at(Stage::FrontCut)?;
    execute_extrude_rect(kb, &front, -dims.front_cut_depth, FeatureOp::Cut(body))
        .at(Stage::FrontCut)?;
    report.completed(
        Stage::FrontCut,
        format!("front lowered {:.3}", dims.front_cut_depth),
    );

    let slot = paths.slot_rect(dims).at(Stage::Slot)?;
    execute_extrude_rect(kb, &slot, dims.slot_depth, FeatureOp::Cut(body)).at(Stage::Slot)?;
    report.completed(
        Stage::Slot,
        format!("slot {:.3} wide at x={:.3}", dims.slot_width, dims.slot_x),
    );

    let edges = kb.edges(body).at(Stage::EdgeFillet)?;
    let spec = FilletSpec {
        radius: dims.fillet,
        rolling_ball_corner: true,
        is_g2: false,
        tangent_chain: false,
    };
    execute_fillet(kb, body, &edges, &spec).at(Stage::EdgeFillet)?;
    report.fillet(Stage::EdgeFillet, vec![edges.len()]);
    report.completed(
        Stage::EdgeFillet,
        format!("{} edges r={:.3}", edges.len(), dims.fillet),
    );
    Ok(())
}
