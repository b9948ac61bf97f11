//! Recoverable anomalies found while propagating
//!
//! Propagation never fails. Malformed frames degrade to "contributes
//! nothing" and leave a record here for the caller to render.

use serde::Serialize;
use std::fmt;

use crate::shared::models::{Kind, Method, Root};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropagationDiagnostic {
    /// A via-type-of port is not an argument, or is past the last register
    InvalidViaTypeOfPort {
        port: Root,
        callee: Method,
        register_count: usize,
    },

    /// A via-value-of port is not an argument, or is past the last constant
    InvalidViaValueOfPort {
        port: Root,
        callee: Method,
        argument_count: usize,
    },

    /// A CRTEX producer declaration carrying no canonical name; dropped
    CrtexFrameWithoutCanonicalNames { kind: Kind, frame: String },
}

impl PropagationDiagnostic {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::CrtexFrameWithoutCanonicalNames { .. })
    }
}

impl fmt::Display for PropagationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViaTypeOfPort { port, callee, .. } => write!(
                f,
                "Invalid port {} provided for via_type_of ports of method {}.{}",
                port,
                callee.class(),
                callee.name()
            ),
            Self::InvalidViaValueOfPort { port, callee, .. } => write!(
                f,
                "Invalid port {} provided for via_value_of ports of method {}.{}",
                port,
                callee.class(),
                callee.name()
            ),
            Self::CrtexFrameWithoutCanonicalNames { frame, .. } => write!(
                f,
                "Encountered crtex frame without canonical names. Frame: `{}`",
                frame
            ),
        }
    }
}
