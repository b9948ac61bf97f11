/*
 * Via-port materialization
 *
 * A frame may ask that the concrete type (via-type-of) or constant value
 * (via-value-of) of some call argument become a feature when the frame
 * crosses a call edge. The materialized feature always holds on the
 * propagated frame.
 *
 * Ports that are not arguments, or point past the registers/constants the
 * caller observed, are reported and skipped.
 */

use crate::features::taint_domain::domain::frame::Frame;
use crate::features::taint_domain::ports::{CallSite, Context, PropagationDiagnostic};
use crate::shared::models::{Feature, FeatureMayAlwaysSet, Root};

/// Argument index of `port` if it addresses one of `available` arguments
fn argument_index(port: &Root, available: usize) -> Option<usize> {
    let position = port.parameter_position()? as usize;
    (position < available).then_some(position)
}

/// Add one always-feature per valid via-type-of port to `features`.
///
/// Returns the materialized features, in port order.
pub(crate) fn materialize_via_type_of_ports(
    frame: &Frame,
    call_site: &CallSite<'_>,
    context: &mut Context,
    features: &mut FeatureMayAlwaysSet,
) -> Vec<Feature> {
    let mut added = Vec::new();
    let register_types = call_site.source_register_types;

    for port in frame.via_type_of_ports() {
        let Some(index) = argument_index(port, register_types.len()) else {
            context.report(PropagationDiagnostic::InvalidViaTypeOfPort {
                port: *port,
                callee: call_site.callee.clone(),
                register_count: register_types.len(),
            });
            continue;
        };
        let feature = context
            .features
            .via_type_of_feature(register_types[index].as_ref());
        features.add_always(feature.clone());
        added.push(feature);
    }
    added
}

/// Add one always-feature per valid via-value-of port to `features`
pub(crate) fn materialize_via_value_of_ports(
    frame: &Frame,
    call_site: &CallSite<'_>,
    constant_arguments: &[Option<String>],
    context: &mut Context,
    features: &mut FeatureMayAlwaysSet,
) {
    for port in frame.via_value_of_ports() {
        let Some(index) = argument_index(port, constant_arguments.len()) else {
            context.report(PropagationDiagnostic::InvalidViaValueOfPort {
                port: *port,
                callee: call_site.callee.clone(),
                argument_count: constant_arguments.len(),
            });
            continue;
        };
        let feature = context
            .features
            .via_value_of_feature(constant_arguments[index].as_deref());
        features.add_always(feature);
    }
}
