//! Searchable fields, comparison operators and their compatibility table.
//!
//! A field only accepts the operator/value combinations listed in
//! [`COMPATIBILITY`]. Adding a searchable attribute means adding a [`Field`]
//! variant, its token, and one row in the table.

use std::fmt;

use crate::clause::ValueKind;

/// A file attribute that can appear on the left side of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Parents,
    Name,
    MimeType,
    Trashed,
    FullText,
    Starred,
}

/// A comparison between a field and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `in` (membership test)
    In,
    /// `contains`
    Contains,
}

/// Operator/value combinations accepted by each field.
pub static COMPATIBILITY: &[(Field, &[(Operator, ValueKind)])] = &[
    (Field::Parents, &[(Operator::In, ValueKind::Str)]),
    (Field::Name, &[(Operator::Eq, ValueKind::Str)]),
    (Field::MimeType, &[(Operator::Eq, ValueKind::Str)]),
    (Field::Trashed, &[(Operator::Eq, ValueKind::Bool)]),
    (Field::FullText, &[(Operator::Contains, ValueKind::Str)]),
    (Field::Starred, &[(Operator::Eq, ValueKind::Bool)]),
];

impl Field {
    /// The token used for this field in a rendered filter.
    pub const fn token(self) -> &'static str {
        match self {
            Field::Parents => "parents",
            Field::Name => "name",
            Field::MimeType => "mimeType",
            Field::Trashed => "trashed",
            Field::FullText => "fullText",
            Field::Starred => "starred",
        }
    }

    /// Operator/value combinations this field accepts.
    pub fn allowed(self) -> &'static [(Operator, ValueKind)] {
        COMPATIBILITY
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, allowed)| *allowed)
            .unwrap_or(&[])
    }

    /// Whether `operator` with a value of `kind` may be applied to this field.
    pub fn allows(self, operator: Operator, kind: ValueKind) -> bool {
        self.allowed().contains(&(operator, kind))
    }
}

impl Operator {
    /// The token used for this operator in a rendered filter.
    pub const fn token(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::In => "in",
            Operator::Contains => "contains",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
