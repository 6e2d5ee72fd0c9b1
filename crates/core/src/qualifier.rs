// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Qualifier tokens
//!
//! A qualifier narrows which observers receive an event beyond its type.
//! Qualifiers are plain values: two qualifiers are the same qualifier when
//! their names and ordered member values are equal.

use crate::type_descriptor::{TypeDescriptor, TypeViolation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Value of a single qualifier member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Enum constant, e.g. `RetentionPolicy.RUNTIME`
    Enum { ty: String, constant: String },
    /// Class literal
    Class(TypeDescriptor),
    Array(Vec<MemberValue>),
}

impl MemberValue {
    /// Check every class literal held by this value
    pub fn validate(&self) -> Result<(), TypeViolation> {
        match self {
            MemberValue::Class(ty) => ty.validate(),
            MemberValue::Array(values) => values.iter().try_for_each(MemberValue::validate),
            MemberValue::Bool(_)
            | MemberValue::Int(_)
            | MemberValue::Str(_)
            | MemberValue::Enum { .. } => Ok(()),
        }
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Bool(b) => write!(f, "{}", b),
            MemberValue::Int(n) => write!(f, "{}", n),
            MemberValue::Str(s) => write!(f, "{:?}", s),
            MemberValue::Enum { ty, constant } => write!(f, "{}.{}", ty, constant),
            MemberValue::Class(ty) => write!(f, "{}.class", ty),
            MemberValue::Array(values) => {
                write!(f, "{{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for MemberValue {
    fn from(b: bool) -> Self {
        MemberValue::Bool(b)
    }
}

impl From<i64> for MemberValue {
    fn from(n: i64) -> Self {
        MemberValue::Int(n)
    }
}

impl From<i32> for MemberValue {
    fn from(n: i32) -> Self {
        MemberValue::Int(i64::from(n))
    }
}

impl From<&str> for MemberValue {
    fn from(s: &str) -> Self {
        MemberValue::Str(s.to_string())
    }
}

impl From<String> for MemberValue {
    fn from(s: String) -> Self {
        MemberValue::Str(s)
    }
}

impl From<TypeDescriptor> for MemberValue {
    fn from(ty: TypeDescriptor) -> Self {
        MemberValue::Class(ty)
    }
}

/// A qualifier: the qualifier type's name plus its declared member values
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qualifier {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    members: Vec<(String, MemberValue)>,
}

impl Qualifier {
    /// Name of the universal qualifier carried by every event
    pub const ANY: &'static str = "Any";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// The universal qualifier, matching every observer
    pub fn any() -> Self {
        Self::new(Self::ANY)
    }

    /// Append a member value; declaration order is significant for equality
    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<MemberValue>) -> Self {
        self.members.push((name.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[(String, MemberValue)] {
        &self.members
    }

    /// Look up a member value by name
    pub fn member(&self, name: &str) -> Option<&MemberValue> {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| value)
    }

    pub fn is_any(&self) -> bool {
        self.name == Self::ANY && self.members.is_empty()
    }

    /// Check the type descriptors embedded in member values
    pub fn validate(&self) -> Result<(), TypeViolation> {
        self.members
            .iter()
            .try_for_each(|(_, value)| value.validate())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.members.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, (name, value)) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}

/// Immutable set of distinct qualifiers.
///
/// There is no way to insert or remove qualifiers once a set is built;
/// build a new set from an iterator instead. Iteration order is sorted but
/// only membership is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifierSet(BTreeSet<Qualifier>);

impl QualifierSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.0.contains(qualifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.0.iter()
    }

    /// True if every qualifier in `other` is also in this set
    pub fn is_superset(&self, other: &QualifierSet) -> bool {
        self.0.is_superset(&other.0)
    }

    /// Consume the set, adding one qualifier
    pub(crate) fn with(mut self, qualifier: Qualifier) -> Self {
        self.0.insert(qualifier);
        self
    }
}

impl FromIterator<Qualifier> for QualifierSet {
    fn from_iter<I: IntoIterator<Item = Qualifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Qualifier>> for QualifierSet {
    fn from(qualifiers: Vec<Qualifier>) -> Self {
        qualifiers.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a QualifierSet {
    type Item = &'a Qualifier;
    type IntoIter = std::collections::btree_set::Iter<'a, Qualifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for QualifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, qualifier) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", qualifier)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
#[path = "qualifier_tests.rs"]
mod tests;
