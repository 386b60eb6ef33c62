//! Error type shared by the whole crate.
//!
//! Configuration problems are detected before the time march and abort it;
//! a singular influence matrix aborts the march at the offending step.
//! The kernel's singularity cutoff is not an error and never appears here.

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid physical, kinematic or numerical parameter.
    #[error("configuration error: {field}: {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },

    /// Influence matrix not invertible, or too ill-conditioned to trust.
    #[error("singular influence matrix at step {step} (condition estimate {condition:.3e})")]
    SingularSystem { step: usize, condition: f64 },

    /// Block or vector sizes that do not agree with the system layout.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl SimError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::Configuration {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, SimError::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_system_message_carries_step() {
        let err = SimError::SingularSystem {
            step: 7,
            condition: 1.0e15,
        };
        let msg = err.to_string();
        assert!(msg.contains("step 7"), "{msg}");
        assert!(msg.contains("1.000e15"), "{msg}");
    }

    #[test]
    fn config_helper_builds_configuration_variant() {
        let err = SimError::config("p", "must be >= 4");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "configuration error: p: must be >= 4");
    }
}
