/*
 * JSON model for frames and taint
 *
 * Frame:
 *   {
 *     "kind": "Sink1",
 *     "callee_port": "Argument(1).x",
 *     "callee": "LFoo;.bar:(I)V",               (omitted for leaves)
 *     "field_callee": "LFoo;.f:I",              (optional)
 *     "call_position": {"path": "Foo.java", "line": 3},
 *     "distance": 1,
 *     "origins": [...], "field_origins": [...],
 *     "inferred_features": {"may": [...], "always": [...]},
 *     "locally_inferred_features": {...},
 *     "user_features": [...],
 *     "via_type_of": ["Argument(1)"], "via_value_of": [...],
 *     "local_positions": [...],
 *     "canonical_names": [{"template": "%programmatic_leaf_name%"}]
 *   }
 *
 * Empty sets and bottom feature sets are omitted. An empty (non-bottom)
 * feature set is written out so that it survives the round trip.
 *
 * Taint: array of frames, sorted for stable output.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{Result, TaintError};
use crate::features::taint_domain::domain::frame::Frame;
use crate::features::taint_domain::domain::taint::Taint;
use crate::shared::models::{
    AccessPath, CanonicalNameSet, FeatureMayAlwaysSet, FeatureSet, Field, FieldSet, Kind,
    LocalPositionSet, Method, MethodSet, Position, RootSet,
};
use crate::shared::ports::lattice::Lattice;

fn is_bottom(features: &FeatureMayAlwaysSet) -> bool {
    features.is_bottom()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrameJson {
    kind: Kind,
    callee_port: AccessPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callee: Option<Method>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field_callee: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    call_position: Option<Position>,
    #[serde(default)]
    distance: u32,
    #[serde(default, skip_serializing_if = "MethodSet::is_empty")]
    origins: MethodSet,
    #[serde(default, skip_serializing_if = "FieldSet::is_empty")]
    field_origins: FieldSet,
    #[serde(default, skip_serializing_if = "is_bottom")]
    inferred_features: FeatureMayAlwaysSet,
    #[serde(default, skip_serializing_if = "is_bottom")]
    locally_inferred_features: FeatureMayAlwaysSet,
    #[serde(default, skip_serializing_if = "FeatureSet::is_empty")]
    user_features: FeatureSet,
    #[serde(default, rename = "via_type_of", skip_serializing_if = "RootSet::is_empty")]
    via_type_of_ports: RootSet,
    #[serde(default, rename = "via_value_of", skip_serializing_if = "RootSet::is_empty")]
    via_value_of_ports: RootSet,
    #[serde(default, skip_serializing_if = "LocalPositionSet::is_empty")]
    local_positions: LocalPositionSet,
    #[serde(default, skip_serializing_if = "CanonicalNameSet::is_empty")]
    canonical_names: CanonicalNameSet,
}

impl From<&Frame> for FrameJson {
    fn from(frame: &Frame) -> Self {
        Self {
            kind: frame.kind.clone(),
            callee_port: frame.callee_port.clone(),
            callee: frame.callee.clone(),
            field_callee: frame.field_callee.clone(),
            call_position: frame.call_position.clone(),
            distance: frame.distance,
            origins: frame.origins.clone(),
            field_origins: frame.field_origins.clone(),
            inferred_features: frame.inferred_features.clone(),
            locally_inferred_features: frame.locally_inferred_features.clone(),
            user_features: frame.user_features.clone(),
            via_type_of_ports: frame.via_type_of_ports.clone(),
            via_value_of_ports: frame.via_value_of_ports.clone(),
            local_positions: frame.local_positions.clone(),
            canonical_names: frame.canonical_names.clone(),
        }
    }
}

impl From<FrameJson> for Frame {
    fn from(json: FrameJson) -> Self {
        Frame {
            kind: json.kind,
            callee_port: json.callee_port,
            callee: json.callee,
            field_callee: json.field_callee,
            call_position: json.call_position,
            distance: json.distance,
            origins: json.origins,
            field_origins: json.field_origins,
            inferred_features: json.inferred_features,
            locally_inferred_features: json.locally_inferred_features,
            user_features: json.user_features,
            via_type_of_ports: json.via_type_of_ports,
            via_value_of_ports: json.via_value_of_ports,
            local_positions: json.local_positions,
            canonical_names: json.canonical_names,
        }
    }
}

/// Non-argument via ports are kept; propagation reports and skips them.
fn warn_non_argument_ports(kind: &Kind, ports: &RootSet, field: &str) {
    for port in ports.iter().filter(|port| !port.is_argument()) {
        warn!(kind = %kind, port = %port, field, "via port is not an argument");
    }
}

impl Frame {
    pub fn to_json(&self) -> Value {
        // Plain data with string keys: serialization cannot fail.
        serde_json::to_value(FrameJson::from(self)).unwrap_or(Value::Null)
    }

    pub fn from_json(value: &Value) -> Result<Frame> {
        if !value.is_object() {
            return Err(TaintError::invalid_json("frame", "expected an object"));
        }
        let json = FrameJson::deserialize(value)?;
        warn_non_argument_ports(&json.kind, &json.via_type_of_ports, "via_type_of");
        warn_non_argument_ports(&json.kind, &json.via_value_of_ports, "via_value_of");
        Ok(Frame::from(json))
    }
}

impl Taint {
    pub fn to_json(&self) -> Value {
        let mut frames: Vec<Value> = self.frames().map(Frame::to_json).collect();
        frames.sort_by_cached_key(|frame| frame.to_string());
        Value::Array(frames)
    }

    pub fn from_json(value: &Value) -> Result<Taint> {
        let frames = value
            .as_array()
            .ok_or_else(|| TaintError::invalid_json("taint", "expected an array of frames"))?;
        frames.iter().map(Frame::from_json).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{CanonicalName, Feature, PathElement, Root};
    use serde_json::json;

    fn full_frame() -> Frame {
        Frame::builder(
            Kind::named("JsonSink"),
            "Argument(1).payload".parse().unwrap(),
        )
        .callee(Method::named("LJson;.callee:(Ljava/lang/String;)V"))
        .call_position(Position::new(Some("Json.java"), 7))
        .distance(2)
        .origins([Method::named("LJson;.origin:()V")])
        .field_origins([Field::named("LJson;.field:I")])
        .inferred_features(FeatureMayAlwaysSet::make_may([Feature::named("json-may")]))
        .locally_inferred_features(FeatureMayAlwaysSet::empty())
        .user_features([Feature::named("json-user")])
        .via_type_of_ports([Root::Argument(1)])
        .via_value_of_ports([Root::Argument(0)])
        .local_positions([Position::new(Some("Json.java"), 8)])
        .canonical_names([CanonicalName::instantiated("json-name")])
        .build()
    }

    #[test]
    fn test_frame_roundtrip_keeps_every_field() {
        let frame = full_frame();
        let back = Frame::from_json(&frame.to_json()).unwrap();
        assert_eq!(back, frame);
        assert!(!back.locally_inferred_features().is_bottom());
    }

    #[test]
    fn test_leaf_frame_is_compact() {
        let frame = Frame::leaf(Kind::named("JsonLeaf"), AccessPath::new(Root::Leaf));
        assert_eq!(
            frame.to_json(),
            json!({"kind": "JsonLeaf", "callee_port": "Leaf", "distance": 0})
        );
    }

    #[test]
    fn test_frame_json_field_names() {
        let json = full_frame().to_json();
        assert_eq!(json["callee_port"], "Argument(1).payload");
        assert_eq!(json["call_position"], json!({"path": "Json.java", "line": 7}));
        assert_eq!(json["via_type_of"], json!(["Argument(1)"]));
        assert_eq!(json["inferred_features"], json!({"may": ["json-may"], "always": []}));
        assert_eq!(json["canonical_names"], json!([{"instantiated": "json-name"}]));
    }

    #[test]
    fn test_non_argument_via_port_roundtrips() {
        let taint = Taint::new([Frame::builder(
            Kind::named("JsonViaReturn"),
            AccessPath::new(Root::Leaf),
        )
        .via_type_of_ports([Root::Return])
        .via_value_of_ports([Root::Anchor])
        .build()]);

        let json = taint.to_json();
        assert_eq!(json[0]["via_type_of"], json!(["Return"]));
        let back = Taint::from_json(&json).unwrap();
        assert!(back.equals(&taint));
        assert!(back.frames().next().unwrap().via_type_of_ports().contains(&Root::Return));
    }

    #[test]
    fn test_appended_special_elements_roundtrip() {
        let mut taint = Taint::new([Frame::leaf(
            Kind::named("JsonDotted"),
            "Argument(1).payload".parse().unwrap(),
        )]);
        taint.append_callee_port(&PathElement::field("a.b"), |_| true);
        taint.append_callee_port(&PathElement::field(""), |_| true);

        let json = taint.to_json();
        assert_eq!(json[0]["callee_port"], json!("Argument(1).payload.\"a.b\".\"\""));
        let back = Taint::from_json(&json).unwrap();
        assert!(back.equals(&taint));
        let port = back.frames().next().unwrap().callee_port().clone();
        assert_eq!(port.path().len(), 3);
        assert_eq!(port.path()[1].as_str(), "a.b");
        assert_eq!(port.path()[2].as_str(), "");
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            Frame::from_json(&json!("frame")),
            Err(TaintError::InvalidJson { .. })
        ));
        assert!(matches!(
            Frame::from_json(&json!({"callee_port": "Leaf"})),
            Err(TaintError::Json(_))
        ));
        assert!(matches!(
            Frame::from_json(&json!({"kind": "K", "callee_port": "Nowhere"})),
            Err(TaintError::Json(_))
        ));
        assert!(matches!(
            Taint::from_json(&json!({})),
            Err(TaintError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_taint_roundtrip() {
        let taint = Taint::new([
            full_frame(),
            Frame::leaf(Kind::named("JsonOther"), AccessPath::new(Root::Return)),
        ]);
        let json = taint.to_json();
        assert_eq!(json.as_array().unwrap().len(), 2);
        let back = Taint::from_json(&json).unwrap();
        assert!(back.equals(&taint));
        assert_eq!(back.to_json(), json);
    }
}
