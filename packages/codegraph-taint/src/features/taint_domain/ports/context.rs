//! Propagation context
//!
//! One per worker. Carries the options, the feature factory and the
//! diagnostics collected since the last `take_diagnostics`.

use tracing::{error, warn};

use super::call_site::CallSite;
use super::diagnostics::PropagationDiagnostic;
use crate::config::PropagationConfig;
use crate::shared::models::{AccessPath, FeatureFactory, Method, Position};

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub options: PropagationConfig,
    pub features: FeatureFactory,
    diagnostics: Vec<PropagationDiagnostic>,
}

impl Context {
    pub fn new(options: PropagationConfig) -> Self {
        Self {
            options,
            features: FeatureFactory::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Call site using the configured maximum distance
    pub fn call_site<'a>(
        &self,
        callee: Method,
        callee_port: &'a AccessPath,
        call_position: Position,
    ) -> CallSite<'a> {
        CallSite::new(
            callee,
            callee_port,
            call_position,
            self.options.maximum_source_sink_distance,
        )
    }

    /// Log the anomaly and keep it if diagnostics are collected
    pub fn report(&mut self, diagnostic: PropagationDiagnostic) {
        if diagnostic.is_error() {
            error!(diagnostic = %diagnostic, "propagation anomaly");
        } else {
            warn!(diagnostic = %diagnostic, "propagation anomaly");
        }
        if self.options.collect_diagnostics {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn diagnostics(&self) -> &[PropagationDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<PropagationDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
