//! Typed result of vendor format sniffing
//!
//! Format detection (unit markers, preambles, device signatures) is kept
//! separate from row mapping so each check can be tested on its own.

use crate::app::models::Provider;
use crate::{Error, Result};

/// Outcome of a format check
#[derive(Debug, Clone, PartialEq)]
pub enum Detection<T> {
    /// The input matches; carries what was learned
    Detected(T),
    /// The input does not look like this provider's format
    Unrecognized(String),
}

impl<T> Detection<T> {
    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }

    /// Convert to a result, mapping a failed check to `UnknownFormat`
    pub fn into_result(self, provider: Provider) -> Result<T> {
        match self {
            Detection::Detected(value) => Ok(value),
            Detection::Unrecognized(reason) => Err(Error::unknown_format(provider, reason)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Detection<U> {
        match self {
            Detection::Detected(value) => Detection::Detected(f(value)),
            Detection::Unrecognized(reason) => Detection::Unrecognized(reason),
        }
    }
}
