// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for event metadata construction

use crate::type_descriptor::{TypeParseError, TypeViolation};
use thiserror::Error;

/// Errors that can occur while building event metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("invalid event type {ty}: {reason}")]
    InvalidType {
        ty: String,
        #[source]
        reason: TypeViolation,
    },
    #[error("invalid qualifier {qualifier}: {reason}")]
    InvalidQualifier {
        qualifier: String,
        #[source]
        reason: TypeViolation,
    },
    #[error("invalid injection point {injection_point}: {reason}")]
    InvalidInjectionPoint {
        injection_point: String,
        #[source]
        reason: TypeViolation,
    },
    #[error("event metadata has no type")]
    MissingType,
    #[error("parse error: {0}")]
    Parse(#[from] TypeParseError),
}
