/*
 * Call-edge transfer function
 *
 * Turns the taint known at a callee port into the taint the caller sees at
 * the call instruction. Shared by CallPositionFrames and Taint, which both
 * store one FrameSet per kind.
 *
 * Per kind, frames split in two:
 *
 *   ordinary frames ──► merged into ONE frame
 *                       distance = 1 + min(distance), capped
 *                       origins ∪, features ⊔ (+ via-port features)
 *
 *   CRTEX producers ──► ONE frame per input frame
 *                       canonical names instantiated against the callee
 *                       callee port canonicalized, distance = 0
 *
 * Frames of different kinds never interact.
 */

use tracing::trace;

use crate::features::taint_domain::domain::frame::{Frame, FrameBuilder};
use crate::features::taint_domain::domain::frame_set::FrameSet;
use crate::features::taint_domain::ports::{CallSite, Context, PropagationDiagnostic};
use crate::shared::models::{CanonicalNameSet, Feature, FeatureMayAlwaysSet, Kind};
use crate::shared::ports::lattice::{AbstractDomain, Lattice};

use super::materialize::{materialize_via_type_of_ports, materialize_via_value_of_ports};

/// Frame produced by merging ordinary frames, plus the via-type-of features
/// materialized on the way (needed for canonical name instantiation)
struct Propagated {
    frame: Frame,
    via_type_of_features: Vec<Feature>,
}

/// Propagate every frame of `frames` (one kind) across the call edge
pub(crate) fn propagate_frame_set(
    frames: &FrameSet,
    call_site: &CallSite<'_>,
    context: &mut Context,
) -> FrameSet {
    let kind = frames.kind();
    let (crtex_frames, ordinary_frames): (Vec<&Frame>, Vec<&Frame>) = frames
        .iter()
        .partition(|frame| frame.is_crtex_producer_declaration());

    let mut result = FrameSet::new(kind.clone());

    for frame in crtex_frames {
        if let Some(propagated) = propagate_crtex_frame(frame, call_site, context) {
            result.add(propagated);
        }
    }

    if let Some(propagated) = propagate_ordinary_frames(
        kind,
        &ordinary_frames,
        call_site,
        call_site.source_constant_arguments,
        context,
    ) {
        result.add(propagated.frame);
    }

    trace!(
        kind = %kind,
        input = frames.len(),
        output = result.len(),
        "propagated frames"
    );
    result
}

/// Merge `frames` into a single frame at the call site.
///
/// Frames already at the maximum distance are skipped; `None` when none
/// remain.
fn propagate_ordinary_frames(
    kind: &Kind,
    frames: &[&Frame],
    call_site: &CallSite<'_>,
    constant_arguments: &[Option<String>],
    context: &mut Context,
) -> Option<Propagated> {
    let mut distance: Option<u32> = None;
    let mut origins = Vec::new();
    let mut field_origins = Vec::new();
    let mut inferred_features = FeatureMayAlwaysSet::bottom();
    let mut via_type_of_features = Vec::new();

    for frame in frames {
        debug_assert_eq!(frame.kind(), kind);
        if frame.distance() >= call_site.maximum_source_sink_distance {
            continue;
        }

        distance = Some(distance.map_or(frame.distance(), |d| d.min(frame.distance())));
        origins.extend(frame.origins().iter().cloned());
        field_origins.extend(frame.field_origins().iter().cloned());

        // Each frame's features hold on its own path only; join across paths.
        let mut contribution = frame.features();
        via_type_of_features.extend(materialize_via_type_of_ports(
            frame,
            call_site,
            context,
            &mut contribution,
        ));
        materialize_via_value_of_ports(
            frame,
            call_site,
            constant_arguments,
            context,
            &mut contribution,
        );
        inferred_features.join_with(&contribution);
    }

    let distance = distance? + 1;
    let frame = FrameBuilder::new(kind.clone(), call_site.callee_port.clone())
        .callee(call_site.callee.clone())
        .call_position(call_site.call_position.clone())
        .distance(distance)
        .origins(origins)
        .field_origins(field_origins)
        .inferred_features(inferred_features)
        .build();

    Some(Propagated {
        frame,
        via_type_of_features,
    })
}

fn propagate_crtex_frame(
    frame: &Frame,
    call_site: &CallSite<'_>,
    context: &mut Context,
) -> Option<Frame> {
    // Constant arguments are not materialized for CRTEX frames.
    let propagated =
        propagate_ordinary_frames(frame.kind(), &[frame], call_site, &[], context)?;

    if frame.canonical_names().is_empty() {
        context.report(PropagationDiagnostic::CrtexFrameWithoutCanonicalNames {
            kind: frame.kind().clone(),
            frame: frame.to_string(),
        });
        return None;
    }

    let instantiated: CanonicalNameSet = frame
        .canonical_names()
        .iter()
        .filter_map(|name| {
            name.instantiate(
                &call_site.callee,
                &propagated.via_type_of_features,
                &context.features,
            )
        })
        .collect();
    if instantiated.is_empty() {
        trace!(frame = %frame, "no canonical name instantiated");
        return None;
    }

    let mut result = propagated.frame;
    result.callee_port = result.callee_port.canonicalize_for_method(&call_site.callee);
    result.distance = 0;
    result.canonical_names = instantiated;
    Some(result)
}
