// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static type descriptors for fired events
//!
//! A `TypeDescriptor` is a closed structural representation of the static
//! type an event was fired under. It covers:
//!   - Named types: `java.lang.String`, `int`, `T`
//!   - Parameterized types: `java.util.List<java.lang.String>`
//!   - Arrays: `int[]`, `java.util.List<T>[]`
//!   - Wildcards (type arguments only): `?`, `? extends Number`, `? super Integer`
//!
//! The `Display` rendering and the `FromStr` parser share the same syntax.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters that can never appear inside a type name
const RESERVED: &[char] = &['<', '>', ',', '[', ']', '?'];

/// Deepest structure a descriptor may have, counting every type argument,
/// wildcard bound and array dimension as one level
pub const MAX_NESTING: usize = 64;

/// Structural descriptor of a static type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Simple or fully qualified type name
    Named { name: String },
    /// Generic type applied to an ordered, non-empty argument list
    Parameterized {
        raw: String,
        arguments: Vec<TypeDescriptor>,
    },
    /// Array of the component type
    Array { component: Box<TypeDescriptor> },
    /// Wildcard type argument
    Wildcard { bound: WildcardBound },
}

/// Bound of a wildcard type argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardBound {
    /// `?`
    Unbounded,
    /// `? extends U`
    Upper(Box<TypeDescriptor>),
    /// `? super L`
    Lower(Box<TypeDescriptor>),
}

/// Structural problems that make a descriptor unusable as an event type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeViolation {
    #[error("type name is empty")]
    EmptyName,
    #[error("type name {0:?} contains whitespace or a reserved character")]
    IllegalName(String),
    #[error("parameterized type {0} has no type arguments")]
    NoTypeArguments(String),
    #[error("wildcard outside of a type argument")]
    MisplacedWildcard,
    #[error("type is nested deeper than {} levels", MAX_NESTING)]
    TooDeep,
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named { name: name.into() }
    }

    pub fn parameterized(raw: impl Into<String>, arguments: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Parameterized {
            raw: raw.into(),
            arguments,
        }
    }

    pub fn array(component: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            component: Box::new(component),
        }
    }

    pub fn wildcard() -> Self {
        TypeDescriptor::Wildcard {
            bound: WildcardBound::Unbounded,
        }
    }

    pub fn wildcard_extends(upper: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard {
            bound: WildcardBound::Upper(Box::new(upper)),
        }
    }

    pub fn wildcard_super(lower: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard {
            bound: WildcardBound::Lower(Box::new(lower)),
        }
    }

    /// Name of the raw type, for named and parameterized types
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Named { name } => Some(name),
            TypeDescriptor::Parameterized { raw, .. } => Some(raw),
            TypeDescriptor::Array { .. } | TypeDescriptor::Wildcard { .. } => None,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, TypeDescriptor::Parameterized { .. })
    }

    /// Type arguments, empty unless parameterized
    pub fn arguments(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Parameterized { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Check that the descriptor is well formed as the type of an event.
    ///
    /// Every name must be non-empty and free of whitespace and reserved
    /// characters, parameterized types need at least one argument, and
    /// wildcards may only appear directly as type arguments. Nesting is
    /// capped at [`MAX_NESTING`] levels.
    pub fn validate(&self) -> Result<(), TypeViolation> {
        self.validate_at(false, 1)
    }

    fn validate_at(&self, in_arguments: bool, depth: usize) -> Result<(), TypeViolation> {
        if depth > MAX_NESTING {
            return Err(TypeViolation::TooDeep);
        }
        match self {
            TypeDescriptor::Named { name } => validate_name(name),
            TypeDescriptor::Parameterized { raw, arguments } => {
                validate_name(raw)?;
                if arguments.is_empty() {
                    return Err(TypeViolation::NoTypeArguments(raw.clone()));
                }
                arguments
                    .iter()
                    .try_for_each(|arg| arg.validate_at(true, depth + 1))
            }
            TypeDescriptor::Array { component } => component.validate_at(false, depth + 1),
            TypeDescriptor::Wildcard { bound } => {
                if !in_arguments {
                    return Err(TypeViolation::MisplacedWildcard);
                }
                match bound {
                    WildcardBound::Unbounded => Ok(()),
                    WildcardBound::Upper(t) | WildcardBound::Lower(t) => {
                        t.validate_at(false, depth + 1)
                    }
                }
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !RESERVED.contains(&c)
}

fn validate_name(name: &str) -> Result<(), TypeViolation> {
    if name.is_empty() {
        return Err(TypeViolation::EmptyName);
    }
    if !name.chars().all(is_name_char) {
        return Err(TypeViolation::IllegalName(name.to_string()));
    }
    Ok(())
}

impl TypeDescriptor {
    /// Levels past `MAX_NESTING` are elided as `...`
    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if depth > MAX_NESTING {
            return write!(f, "...");
        }
        match self {
            TypeDescriptor::Named { name } => write!(f, "{}", name),
            TypeDescriptor::Parameterized { raw, arguments } => {
                write!(f, "{}<", raw)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.render(f, depth + 1)?;
                }
                write!(f, ">")
            }
            TypeDescriptor::Array { component } => {
                component.render(f, depth + 1)?;
                write!(f, "[]")
            }
            TypeDescriptor::Wildcard { bound } => match bound {
                WildcardBound::Unbounded => write!(f, "?"),
                WildcardBound::Upper(t) => {
                    write!(f, "? extends ")?;
                    t.render(f, depth + 1)
                }
                WildcardBound::Lower(t) => {
                    write!(f, "? super ")?;
                    t.render(f, depth + 1)
                }
            },
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 1)
    }
}

/// Error produced when parsing a type descriptor from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type at offset {offset}: {kind}")]
pub struct TypeParseError {
    /// Byte offset into the input where parsing stopped
    pub offset: usize,
    pub kind: TypeParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseErrorKind {
    #[error("empty input")]
    Empty,
    #[error("expected a type name")]
    ExpectedName,
    #[error("expected `{0}`")]
    Expected(char),
    #[error("empty type argument list")]
    EmptyArguments,
    #[error("wildcard is only allowed as a type argument")]
    WildcardOutsideArguments,
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("type is nested deeper than {} levels", MAX_NESTING)]
    TooDeep,
}

impl FromStr for TypeDescriptor {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input: s, pos: 0 };
        parser.skip_whitespace();
        if parser.at_end() {
            return Err(parser.error(TypeParseErrorKind::Empty));
        }
        if parser.peek() == Some(b'?') {
            return Err(parser.error(TypeParseErrorKind::WildcardOutsideArguments));
        }
        let (ty, _) = parser.parse_type(1)?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error(TypeParseErrorKind::TrailingInput));
        }
        Ok(ty)
    }
}

/// Recursive descent parser over the rendered syntax.
///
/// Delimiters are all ASCII, so byte offsets at delimiters are always
/// char boundaries. Each parse step takes the depth of the node it parses
/// and returns the height of what it built, so recursion stops at
/// `MAX_NESTING` and accepted input always validates.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn error(&self, kind: TypeParseErrorKind) -> TypeParseError {
        TypeParseError {
            offset: self.pos,
            kind,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, expected: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), TypeParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(TypeParseErrorKind::Expected(expected as char)))
        }
    }

    fn name(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !is_name_char(c))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error(TypeParseErrorKind::ExpectedName));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Fail if a node of `height` placed at `depth` exceeds the nesting cap
    fn check_height(&self, depth: usize, height: usize) -> Result<(), TypeParseError> {
        if depth - 1 + height > MAX_NESTING {
            return Err(self.error(TypeParseErrorKind::TooDeep));
        }
        Ok(())
    }

    /// type := name [ '<' argument { ',' argument } '>' ] { '[' ']' }
    fn parse_type(&mut self, depth: usize) -> Result<(TypeDescriptor, usize), TypeParseError> {
        if depth > MAX_NESTING {
            return Err(self.error(TypeParseErrorKind::TooDeep));
        }
        let name = self.name()?;
        let (mut ty, mut height) = if self.eat(b'<') {
            if self.eat(b'>') {
                return Err(self.error(TypeParseErrorKind::EmptyArguments));
            }
            let (first, mut tallest) = self.parse_argument(depth + 1)?;
            let mut arguments = vec![first];
            while self.eat(b',') {
                let (arg, height) = self.parse_argument(depth + 1)?;
                tallest = tallest.max(height);
                arguments.push(arg);
            }
            self.expect(b'>')?;
            (TypeDescriptor::parameterized(name, arguments), tallest + 1)
        } else {
            (TypeDescriptor::named(name), 1)
        };
        self.check_height(depth, height)?;
        while self.eat(b'[') {
            self.expect(b']')?;
            ty = TypeDescriptor::array(ty);
            height += 1;
            self.check_height(depth, height)?;
        }
        Ok((ty, height))
    }

    /// argument := '?' [ ( 'extends' | 'super' ) type ] | type
    fn parse_argument(&mut self, depth: usize) -> Result<(TypeDescriptor, usize), TypeParseError> {
        if !self.eat(b'?') {
            return self.parse_type(depth);
        }
        self.skip_whitespace();
        match self.peek() {
            Some(b',') | Some(b'>') => Ok((TypeDescriptor::wildcard(), 1)),
            _ => {
                let keyword_at = self.pos;
                match self.name()? {
                    "extends" => {
                        let (bound, height) = self.parse_bound(depth + 1)?;
                        Ok((TypeDescriptor::wildcard_extends(bound), height + 1))
                    }
                    "super" => {
                        let (bound, height) = self.parse_bound(depth + 1)?;
                        Ok((TypeDescriptor::wildcard_super(bound), height + 1))
                    }
                    _ => {
                        self.pos = keyword_at;
                        Err(self.error(TypeParseErrorKind::Expected('>')))
                    }
                }
            }
        }
    }

    fn parse_bound(&mut self, depth: usize) -> Result<(TypeDescriptor, usize), TypeParseError> {
        self.skip_whitespace();
        if self.peek() == Some(b'?') {
            return Err(self.error(TypeParseErrorKind::WildcardOutsideArguments));
        }
        self.parse_type(depth)
    }
}

#[cfg(test)]
#[path = "type_descriptor_tests.rs"]
mod tests;
