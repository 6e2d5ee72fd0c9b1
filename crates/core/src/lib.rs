// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! beacon-core: Event metadata for dependency-injection event observers
//!
//! This crate provides:
//! - `EventMetadata` - immutable description of a single event firing
//! - `TypeDescriptor` - structural static types, with a parser for their rendered form
//! - `Qualifier` / `QualifierSet` - value-comparable qualifier tokens
//! - `InjectionPoint` - where an event source was declared

pub mod error;
pub mod injection_point;
pub mod metadata;
pub mod qualifier;
pub mod type_descriptor;

// Re-exports
pub use error::MetadataError;
pub use injection_point::{InjectionPoint, Member};
pub use metadata::EventMetadata;
pub use qualifier::{MemberValue, Qualifier, QualifierSet};
pub use type_descriptor::{
    TypeDescriptor, TypeParseError, TypeParseErrorKind, TypeViolation, WildcardBound,
    MAX_NESTING,
};
