//! Test data builders

use codegraph_taint::{
    AccessPath, CanonicalName, Frame, Kind, Method, Position, Root, Taint,
};

pub fn kind(name: &str) -> Kind {
    Kind::named(name)
}

pub fn method(signature: &str) -> Method {
    Method::named(signature)
}

pub fn position(line: i32) -> Position {
    Position::new(Some("Scenario.java"), line)
}

pub fn port(text: &str) -> AccessPath {
    text.parse().expect("valid access path in test")
}

/// Frame at `callee`/`position` reached through `callee_port`
pub fn call_frame(kind_name: &str, callee_port: &str, distance: u32, origin: &str) -> Frame {
    Frame::builder(kind(kind_name), port(callee_port))
        .callee(method("LScenario;.inner:(Ljava/lang/Object;)V"))
        .call_position(position(1))
        .distance(distance)
        .origins([method(origin)])
        .build()
}

/// Declared source/sink
pub fn leaf_frame(kind_name: &str, origin: &str) -> Frame {
    Frame::builder(kind(kind_name), AccessPath::new(Root::Leaf))
        .origins([method(origin)])
        .build()
}

/// CRTEX producer declaration carrying `templates`
pub fn crtex_frame(kind_name: &str, distance: u32, templates: &[&str]) -> Frame {
    Frame::builder(kind(kind_name), AccessPath::new(Root::Anchor))
        .distance(distance)
        .origins([method("LScenario;.crtexOrigin:()V")])
        .canonical_names(templates.iter().map(|t| CanonicalName::template(*t)))
        .build()
}

pub fn only_frame(taint: &Taint) -> &Frame {
    let mut frames = taint.frames();
    let frame = frames.next().expect("at least one frame");
    assert!(frames.next().is_none(), "expected exactly one frame");
    frame
}
