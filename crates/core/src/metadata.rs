// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event metadata
//!
//! `EventMetadata` describes one firing of an event: the static type it was
//! fired under, the injection point that fired it (if any), and the event's
//! qualifiers. The qualifier set always contains `@Any`, so events fired
//! without explicit qualifiers still reach untargeted observers.
//!
//! A value is built once per firing and handed unchanged to every matching
//! observer. It has no setters and can be shared freely between threads.

use crate::error::MetadataError;
use crate::injection_point::InjectionPoint;
use crate::qualifier::{Qualifier, QualifierSet};
use crate::type_descriptor::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Metadata of a single event firing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEventMetadata")]
pub struct EventMetadata {
    #[serde(rename = "type")]
    ty: TypeDescriptor,
    injection_point: Option<Arc<InjectionPoint>>,
    qualifiers: QualifierSet,
}

impl EventMetadata {
    /// Build metadata from any collection of qualifiers.
    ///
    /// The resulting qualifier set is the supplied qualifiers plus `@Any`.
    /// Fails with [`MetadataError::InvalidType`] if the type is malformed,
    /// and with `InvalidQualifier` / `InvalidInjectionPoint` if a type
    /// descriptor embedded in a qualifier member or the injection point is.
    pub fn new<I>(
        ty: TypeDescriptor,
        injection_point: Option<Arc<InjectionPoint>>,
        qualifiers: I,
    ) -> Result<Self, MetadataError>
    where
        I: IntoIterator<Item = Qualifier>,
    {
        if let Err(reason) = ty.validate() {
            tracing::warn!(event_type = %ty, error = %reason, "rejected event metadata");
            return Err(MetadataError::InvalidType {
                ty: ty.to_string(),
                reason,
            });
        }

        if let Some(ip) = &injection_point {
            if let Err(reason) = ip.validate() {
                tracing::warn!(
                    event_type = %ty,
                    injection_point = %ip,
                    error = %reason,
                    "rejected event metadata"
                );
                return Err(MetadataError::InvalidInjectionPoint {
                    injection_point: ip.to_string(),
                    reason,
                });
            }
        }

        let supplied: QualifierSet = qualifiers.into_iter().collect();
        for qualifier in &supplied {
            if let Err(reason) = qualifier.validate() {
                tracing::warn!(
                    event_type = %ty,
                    %qualifier,
                    error = %reason,
                    "rejected event metadata"
                );
                return Err(MetadataError::InvalidQualifier {
                    qualifier: qualifier.to_string(),
                    reason,
                });
            }
        }
        let any = Qualifier::any();
        if supplied.contains(&any) {
            tracing::debug!(event_type = %ty, "explicit @Any folded into implicit qualifier");
        }
        let qualifiers = supplied.with(any);

        tracing::trace!(
            event_type = %ty,
            qualifiers = qualifiers.len(),
            injection_point = injection_point.is_some(),
            "event metadata created"
        );

        Ok(Self {
            ty,
            injection_point,
            qualifiers,
        })
    }

    /// Build metadata from a fixed array of qualifiers
    pub fn from_array(
        ty: TypeDescriptor,
        injection_point: Option<Arc<InjectionPoint>>,
        qualifiers: &[Qualifier],
    ) -> Result<Self, MetadataError> {
        Self::new(ty, injection_point, qualifiers.iter().cloned())
    }

    /// Build metadata from a textual type such as `Event<com.shop.Order>`
    pub fn from_type_name<I>(
        ty: &str,
        injection_point: Option<Arc<InjectionPoint>>,
        qualifiers: I,
    ) -> Result<Self, MetadataError>
    where
        I: IntoIterator<Item = Qualifier>,
    {
        Self::new(ty.parse()?, injection_point, qualifiers)
    }

    /// Static type the event was fired under
    pub fn event_type(&self) -> &TypeDescriptor {
        &self.ty
    }

    /// Injection point that fired the event, `None` for programmatic firings
    pub fn injection_point(&self) -> Option<&Arc<InjectionPoint>> {
        self.injection_point.as_ref()
    }

    /// All event qualifiers, including `@Any`
    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EventMetadata(type: {}, qualifiers: {}, injection point: ",
            self.ty, self.qualifiers
        )?;
        match &self.injection_point {
            Some(ip) => write!(f, "{})", ip),
            None => write!(f, "none)"),
        }
    }
}

/// Wire form accepted on deserialization; goes back through `EventMetadata::new`
#[derive(Deserialize)]
struct RawEventMetadata {
    #[serde(rename = "type", default)]
    ty: Option<TypeDescriptor>,
    #[serde(default)]
    injection_point: Option<InjectionPoint>,
    #[serde(default)]
    qualifiers: Vec<Qualifier>,
}

impl TryFrom<RawEventMetadata> for EventMetadata {
    type Error = MetadataError;

    fn try_from(raw: RawEventMetadata) -> Result<Self, Self::Error> {
        let ty = raw.ty.ok_or(MetadataError::MissingType)?;
        Self::new(ty, raw.injection_point.map(Arc::new), raw.qualifiers)
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
