//! Inputs describing one call edge

use crate::shared::models::{AccessPath, DexType, Method, Position};

/// What the caller knows about the call instruction being crossed
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub callee: Method,
    pub callee_port: &'a AccessPath,
    pub call_position: Position,
    pub maximum_source_sink_distance: u32,
    /// Concrete type of each argument register, `None` when unknown
    pub source_register_types: &'a [Option<DexType>],
    /// Constant value of each argument, `None` when not a constant
    pub source_constant_arguments: &'a [Option<String>],
}

impl<'a> CallSite<'a> {
    pub fn new(
        callee: Method,
        callee_port: &'a AccessPath,
        call_position: Position,
        maximum_source_sink_distance: u32,
    ) -> Self {
        Self {
            callee,
            callee_port,
            call_position,
            maximum_source_sink_distance,
            source_register_types: &[],
            source_constant_arguments: &[],
        }
    }

    pub fn with_register_types(mut self, types: &'a [Option<DexType>]) -> Self {
        self.source_register_types = types;
        self
    }

    pub fn with_constant_arguments(mut self, constants: &'a [Option<String>]) -> Self {
        self.source_constant_arguments = constants;
        self
    }
}
