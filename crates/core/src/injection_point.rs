// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injection points
//!
//! An injection point is the place in consuming code where an event source
//! was declared: a field, a method parameter, or a constructor parameter.

use crate::qualifier::{Qualifier, QualifierSet};
use crate::type_descriptor::{TypeDescriptor, TypeViolation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declaration an injection point belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Field {
        declaring_type: String,
        name: String,
    },
    Parameter {
        declaring_type: String,
        method: String,
        position: usize,
    },
    Constructor {
        declaring_type: String,
        position: usize,
    },
}

impl Member {
    pub fn declaring_type(&self) -> &str {
        match self {
            Member::Field { declaring_type, .. }
            | Member::Parameter { declaring_type, .. }
            | Member::Constructor { declaring_type, .. } => declaring_type,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Member::Field { .. } => "field",
            Member::Parameter { .. } => "parameter",
            Member::Constructor { .. } => "constructor",
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field {
                declaring_type,
                name,
            } => write!(f, "{}.{}", declaring_type, name),
            Member::Parameter {
                declaring_type,
                method,
                position,
            } => write!(f, "{}.{}(#{})", declaring_type, method, position),
            Member::Constructor {
                declaring_type,
                position,
            } => write!(f, "{}(#{})", declaring_type, position),
        }
    }
}

/// Where an event source was declared, with its required type and qualifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectionPoint {
    #[serde(rename = "type")]
    ty: TypeDescriptor,
    #[serde(default)]
    qualifiers: QualifierSet,
    member: Member,
    #[serde(default)]
    delegate: bool,
}

impl InjectionPoint {
    pub fn new(ty: TypeDescriptor, member: Member) -> Self {
        Self {
            ty,
            qualifiers: QualifierSet::default(),
            member,
            delegate: false,
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers = self.qualifiers.with(qualifier);
        self
    }

    /// Mark this as a decorator delegate injection point
    pub fn as_delegate(mut self) -> Self {
        self.delegate = true;
        self
    }

    /// Declared type of the injection point
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn is_delegate(&self) -> bool {
        self.delegate
    }

    /// Check the declared type and the type descriptors inside its qualifiers
    pub fn validate(&self) -> Result<(), TypeViolation> {
        self.ty.validate()?;
        self.qualifiers.iter().try_for_each(Qualifier::validate)
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.member.kind())?;
        if self.delegate {
            write!(f, " @Delegate")?;
        }
        for qualifier in &self.qualifiers {
            write!(f, " {}", qualifier)?;
        }
        write!(f, " {} {}", self.ty, self.member)
    }
}

#[cfg(test)]
#[path = "injection_point_tests.rs"]
mod tests;
