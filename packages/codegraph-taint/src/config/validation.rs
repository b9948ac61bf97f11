//! Configuration validation

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;
}
