//! Frame: one taint fact
//!
//! A frame says "taint of `kind` reaches `callee_port` of `callee`, called at
//! `call_position`, `distance` hops away from a declared source or sink".
//! Leaf frames (no callee) come straight from source/sink declarations.

use std::fmt;

use super::group_hashed_set::GroupElement;
use crate::shared::models::{
    AccessPath, CanonicalName, CanonicalNameSet, Feature, FeatureMayAlwaysSet, FeatureSet, Field,
    FieldSet, Kind, LocalPositionSet, Method, MethodSet, PathElement, Position, Root, RootSet,
};
use crate::shared::ports::lattice::Lattice;

/// Identity of a frame inside its kind's group. Frames with the same key
/// merge on join; CRTEX and non-CRTEX frames never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub callee_port: AccessPath,
    pub callee: Option<Method>,
    pub field_callee: Option<Field>,
    pub call_position: Option<Position>,
    pub is_crtex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub(crate) kind: Kind,
    pub(crate) callee_port: AccessPath,
    pub(crate) callee: Option<Method>,
    pub(crate) field_callee: Option<Field>,
    pub(crate) call_position: Option<Position>,
    pub(crate) distance: u32,
    pub(crate) origins: MethodSet,
    pub(crate) field_origins: FieldSet,
    pub(crate) inferred_features: FeatureMayAlwaysSet,
    pub(crate) locally_inferred_features: FeatureMayAlwaysSet,
    pub(crate) user_features: FeatureSet,
    pub(crate) via_type_of_ports: RootSet,
    pub(crate) via_value_of_ports: RootSet,
    pub(crate) local_positions: LocalPositionSet,
    pub(crate) canonical_names: CanonicalNameSet,
}

impl Frame {
    pub fn builder(kind: Kind, callee_port: AccessPath) -> FrameBuilder {
        FrameBuilder::new(kind, callee_port)
    }

    /// Declared source/sink with no callee
    pub fn leaf(kind: Kind, callee_port: AccessPath) -> Self {
        FrameBuilder::new(kind, callee_port).build()
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn callee_port(&self) -> &AccessPath {
        &self.callee_port
    }

    pub fn callee(&self) -> Option<&Method> {
        self.callee.as_ref()
    }

    pub fn field_callee(&self) -> Option<&Field> {
        self.field_callee.as_ref()
    }

    pub fn call_position(&self) -> Option<&Position> {
        self.call_position.as_ref()
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn origins(&self) -> &MethodSet {
        &self.origins
    }

    pub fn field_origins(&self) -> &FieldSet {
        &self.field_origins
    }

    pub fn inferred_features(&self) -> &FeatureMayAlwaysSet {
        &self.inferred_features
    }

    pub fn locally_inferred_features(&self) -> &FeatureMayAlwaysSet {
        &self.locally_inferred_features
    }

    pub fn user_features(&self) -> &FeatureSet {
        &self.user_features
    }

    pub fn via_type_of_ports(&self) -> &RootSet {
        &self.via_type_of_ports
    }

    pub fn via_value_of_ports(&self) -> &RootSet {
        &self.via_value_of_ports
    }

    pub fn local_positions(&self) -> &LocalPositionSet {
        &self.local_positions
    }

    pub fn canonical_names(&self) -> &CanonicalNameSet {
        &self.canonical_names
    }

    pub fn is_leaf(&self) -> bool {
        self.callee.is_none()
    }

    pub fn is_crtex(&self) -> bool {
        !self.canonical_names.is_empty()
    }

    /// A leaf anchored for cross-artifact traceability, not yet propagated
    pub fn is_crtex_producer_declaration(&self) -> bool {
        self.is_leaf() && (self.callee_port.root() == Root::Anchor || self.is_crtex())
    }

    /// All features of this frame: inferred, then locally inferred, with
    /// user features always holding.
    pub fn features(&self) -> FeatureMayAlwaysSet {
        let mut features = self.inferred_features.clone();
        features.add(&self.locally_inferred_features);
        features.add_always_set(&self.user_features);
        features
    }

    pub fn key(&self) -> FrameKey {
        FrameKey {
            callee_port: self.callee_port.clone(),
            callee: self.callee.clone(),
            field_callee: self.field_callee.clone(),
            call_position: self.call_position.clone(),
            is_crtex: self.is_crtex(),
        }
    }

    pub fn with_kind(&self, kind: Kind) -> Frame {
        Frame {
            kind,
            ..self.clone()
        }
    }

    pub fn add_inferred_features(&mut self, features: &FeatureMayAlwaysSet) {
        self.locally_inferred_features.add(features);
    }

    pub fn add_local_position(&mut self, position: Position) {
        self.local_positions.insert(position);
    }

    pub fn set_local_positions(&mut self, positions: LocalPositionSet) {
        self.local_positions = positions;
    }

    pub fn append_callee_port(&mut self, element: PathElement) {
        self.callee_port.append(element);
    }
}

impl Lattice for Frame {
    fn is_bottom(&self) -> bool {
        false
    }

    fn leq(&self, other: &Self) -> bool {
        self.distance >= other.distance
            && self.origins.is_subset(&other.origins)
            && self.field_origins.is_subset(&other.field_origins)
            && self.inferred_features.leq(&other.inferred_features)
            && self
                .locally_inferred_features
                .leq(&other.locally_inferred_features)
            && self.user_features.is_subset(&other.user_features)
            && self.via_type_of_ports.is_subset(&other.via_type_of_ports)
            && self.via_value_of_ports.is_subset(&other.via_value_of_ports)
            && self.local_positions.is_subset(&other.local_positions)
            && self.canonical_names.is_subset(&other.canonical_names)
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn join_with(&mut self, other: &Self) {
        debug_assert_eq!(self.kind, other.kind);
        self.distance = self.distance.min(other.distance);
        self.origins.extend(other.origins.iter().cloned());
        self.field_origins.extend(other.field_origins.iter().cloned());
        self.inferred_features.join_with(&other.inferred_features);
        self.locally_inferred_features
            .join_with(&other.locally_inferred_features);
        self.user_features.union_with(&other.user_features);
        self.via_type_of_ports
            .extend(other.via_type_of_ports.iter().copied());
        self.via_value_of_ports
            .extend(other.via_value_of_ports.iter().copied());
        self.local_positions
            .extend(other.local_positions.iter().cloned());
        self.canonical_names
            .extend(other.canonical_names.iter().cloned());
    }

    fn meet_with(&mut self, other: &Self) {
        debug_assert_eq!(self.kind, other.kind);
        self.distance = self.distance.max(other.distance);
        self.origins.retain(|origin| other.origins.contains(origin));
        self.field_origins
            .retain(|origin| other.field_origins.contains(origin));
        self.inferred_features.meet_with(&other.inferred_features);
        self.locally_inferred_features
            .meet_with(&other.locally_inferred_features);
        self.user_features.intersection_with(&other.user_features);
        self.via_type_of_ports
            .retain(|port| other.via_type_of_ports.contains(port));
        self.via_value_of_ports
            .retain(|port| other.via_value_of_ports.contains(port));
        self.local_positions
            .retain(|position| other.local_positions.contains(position));
        self.canonical_names
            .retain(|name| other.canonical_names.contains(name));
    }
}

impl GroupElement for Frame {
    type Key = FrameKey;

    fn group_key(&self) -> FrameKey {
        self.key()
    }
}

fn write_set<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    let items: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if !items.is_empty() {
        write!(f, ", {}={{{}}}", label, items.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame(kind=`{}`, callee_port={}",
            self.kind, self.callee_port
        )?;
        if let Some(callee) = &self.callee {
            write!(f, ", callee=`{}`", callee)?;
        }
        if let Some(field_callee) = &self.field_callee {
            write!(f, ", field_callee=`{}`", field_callee)?;
        }
        if let Some(position) = &self.call_position {
            write!(f, ", call_position={}", position)?;
        }
        write!(f, ", distance={}", self.distance)?;
        write_set(f, "origins", &self.origins)?;
        write_set(f, "field_origins", &self.field_origins)?;
        write_set(f, "may_features", self.features().may().iter())?;
        write_set(f, "always_features", self.features().always().iter())?;
        write_set(f, "via_type_of", &self.via_type_of_ports)?;
        write_set(f, "via_value_of", &self.via_value_of_ports)?;
        write_set(f, "local_positions", &self.local_positions)?;
        write_set(f, "canonical_names", &self.canonical_names)?;
        f.write_str(")")
    }
}

/// Builder for frames; unspecified fields start empty
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    pub fn new(kind: Kind, callee_port: AccessPath) -> Self {
        Self {
            frame: Frame {
                kind,
                callee_port,
                callee: None,
                field_callee: None,
                call_position: None,
                distance: 0,
                origins: MethodSet::new(),
                field_origins: FieldSet::new(),
                inferred_features: FeatureMayAlwaysSet::default(),
                locally_inferred_features: FeatureMayAlwaysSet::default(),
                user_features: FeatureSet::new(),
                via_type_of_ports: RootSet::new(),
                via_value_of_ports: RootSet::new(),
                local_positions: LocalPositionSet::new(),
                canonical_names: CanonicalNameSet::new(),
            },
        }
    }

    pub fn callee(mut self, callee: Method) -> Self {
        self.frame.callee = Some(callee);
        self
    }

    pub fn field_callee(mut self, field: Field) -> Self {
        self.frame.field_callee = Some(field);
        self
    }

    pub fn call_position(mut self, position: Position) -> Self {
        self.frame.call_position = Some(position);
        self
    }

    pub fn distance(mut self, distance: u32) -> Self {
        self.frame.distance = distance;
        self
    }

    pub fn origins(mut self, origins: impl IntoIterator<Item = Method>) -> Self {
        self.frame.origins.extend(origins);
        self
    }

    pub fn field_origins(mut self, origins: impl IntoIterator<Item = Field>) -> Self {
        self.frame.field_origins.extend(origins);
        self
    }

    pub fn inferred_features(mut self, features: FeatureMayAlwaysSet) -> Self {
        self.frame.inferred_features = features;
        self
    }

    pub fn locally_inferred_features(mut self, features: FeatureMayAlwaysSet) -> Self {
        self.frame.locally_inferred_features = features;
        self
    }

    pub fn user_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        for feature in features {
            self.frame.user_features.add(feature);
        }
        self
    }

    pub fn via_type_of_ports(mut self, ports: impl IntoIterator<Item = Root>) -> Self {
        self.frame.via_type_of_ports.extend(ports);
        self
    }

    pub fn via_value_of_ports(mut self, ports: impl IntoIterator<Item = Root>) -> Self {
        self.frame.via_value_of_ports.extend(ports);
        self
    }

    pub fn local_positions(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.frame.local_positions.extend(positions);
        self
    }

    pub fn canonical_names(mut self, names: impl IntoIterator<Item = CanonicalName>) -> Self {
        self.frame.canonical_names.extend(names);
        self
    }

    pub fn build(self) -> Frame {
        self.frame
    }
}
