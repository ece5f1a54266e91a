// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors raised when a scale is given unusable stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScaleError {
    /// The domain holds fewer than two stops.
    #[error("a scale domain needs at least two stops, got {0}")]
    DomainTooShort(usize),
    /// The range holds fewer than two stops.
    #[error("a scale range needs at least two stops, got {0}")]
    RangeTooShort(usize),
    /// Domain and range disagree in length.
    #[error("domain has {domain} stops but range has {range}")]
    LengthMismatch {
        /// Domain length.
        domain: usize,
        /// Range length.
        range: usize,
    },
}

impl ScaleError {
    pub(crate) fn check(domain: usize, range: usize) -> Result<(), Self> {
        if domain < 2 {
            return Err(Self::DomainTooShort(domain));
        }
        if range < 2 {
            return Err(Self::RangeTooShort(range));
        }
        if domain != range {
            return Err(Self::LengthMismatch { domain, range });
        }
        Ok(())
    }
}
