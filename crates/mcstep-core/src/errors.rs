//! Structured error types shared across mcstep crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SamplerError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (parameter names, sizes, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " (")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Canonical error type for the mcstep sampler.
///
/// Configuration errors are fatal and only occur while assembling a
/// proposal set; validation and state-mismatch errors surface immediately
/// from the offending call and are never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SamplerError {
    /// The supplied proposal set cannot form a valid partition.
    #[error("configuration error: {0}")]
    Configuration(ErrorInfo),
    /// An argument mapping is inconsistent with the parameter partition.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// A snapshot does not correspond to the live proposal structure.
    #[error("state mismatch: {0}")]
    StateMismatch(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
    /// Serialization and snapshot I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl SamplerError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SamplerError::Configuration(info)
            | SamplerError::Validation(info)
            | SamplerError::StateMismatch(info)
            | SamplerError::Rng(info)
            | SamplerError::Serde(info) => info,
        }
    }
}
