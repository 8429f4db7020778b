//! The query builder implementation.

use std::fmt;

use tracing::debug;

use crate::{
    clause::{Clause, Connective, Value},
    error::QueryError,
    field::{Field, Operator},
    state::State,
};

/// A fluent builder for search filter expressions.
///
/// Every method consumes the builder and returns it, so a query is written as
/// one chain and checked once at the end with [`Query::err`]. Grammar
/// violations never panic: the first one is recorded and every later mutating
/// call becomes a no-op until [`Query::reset`].
///
/// # Example
///
/// ```
/// use drivekit_query::Query;
///
/// let query = Query::new()
///     .name()
///     .eq("report.pdf")
///     .and()
///     .trashed_eq(false);
///
/// assert_eq!(query.to_string(), "name = 'report.pdf' and trashed = false");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
    connectives: Vec<Connective>,
    pending_negation: bool,
    pending_field: Option<Field>,
    err: Option<QueryError>,
}

#[allow(clippy::should_implement_trait)]
impl Query {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in the grammar.
    pub fn state(&self) -> State {
        if self.err.is_some() {
            State::Errored
        } else if self.pending_field.is_some() {
            State::ExpectOperator
        } else if self.clauses.len() > self.connectives.len() {
            State::TermComplete
        } else {
            State::Start
        }
    }

    /// Negates the next term.
    pub fn not(mut self) -> Self {
        match self.state() {
            State::Errored => self,
            _ if self.pending_negation => self.fail(QueryError::DoubleNegation),
            State::Start => {
                self.pending_negation = true;
                self
            }
            State::ExpectOperator | State::TermComplete => {
                self.fail(QueryError::MisplacedNegation)
            }
        }
    }

    /// Selects the field of the next term.
    ///
    /// Field selection never fails on operator grounds; compatibility is
    /// checked once an operator is applied.
    pub fn field(mut self, field: Field) -> Self {
        match self.state() {
            State::Errored => self,
            State::Start => {
                self.pending_field = Some(field);
                self
            }
            State::ExpectOperator | State::TermComplete => {
                self.fail(QueryError::MisplacedField {
                    field,
                })
            }
        }
    }

    pub fn parents(self) -> Self {
        self.field(Field::Parents)
    }

    pub fn name(self) -> Self {
        self.field(Field::Name)
    }

    pub fn mime_type(self) -> Self {
        self.field(Field::MimeType)
    }

    pub fn full_text(self) -> Self {
        self.field(Field::FullText)
    }

    /// Completes the pending term with a membership test: `field in 'value'`.
    pub fn is_in(self, value: impl Into<String>) -> Self {
        self.apply(Operator::In, Value::Str(value.into()))
    }

    /// Completes the pending term with an equality test: `field = 'value'`.
    pub fn eq(self, value: impl Into<String>) -> Self {
        self.apply(Operator::Eq, Value::Str(value.into()))
    }

    /// Completes the pending term with a substring test: `field contains 'value'`.
    pub fn contains(self, value: impl Into<String>) -> Self {
        self.apply(Operator::Contains, Value::Str(value.into()))
    }

    /// Adds a complete `trashed = <bool>` term.
    pub fn trashed_eq(self, value: bool) -> Self {
        self.field(Field::Trashed).apply(Operator::Eq, Value::Bool(value))
    }

    /// Adds a complete `starred = <bool>` term.
    pub fn starred_eq(self, value: bool) -> Self {
        self.field(Field::Starred).apply(Operator::Eq, Value::Bool(value))
    }

    pub fn and(self) -> Self {
        self.connective(Connective::And)
    }

    pub fn or(self) -> Self {
        self.connective(Connective::Or)
    }

    /// Discards every clause, connective, pending flag and the recorded error.
    pub fn reset(self) -> Self {
        Self::new()
    }

    /// The first recorded grammar violation, if any.
    pub fn err(&self) -> Option<&QueryError> {
        self.err.as_ref()
    }

    /// `true` if no clause has been completed.
    ///
    /// A selected field or pending negation does not count.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn connectives(&self) -> &[Connective] {
        &self.connectives
    }

    /// Renders the filter, refusing anything that is not a complete expression.
    ///
    /// Unlike [`ToString::to_string`], which renders whatever has been
    /// recorded, this fails on a recorded error, a field without an operator,
    /// a trailing connective or a negation with nothing to negate.
    pub fn build(&self) -> Result<String, QueryError> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if let Some(field) = self.pending_field {
            return Err(QueryError::DanglingField {
                field,
            });
        }
        if !self.clauses.is_empty() && self.state() == State::Start {
            return Err(QueryError::TrailingConnective);
        }
        if self.pending_negation {
            return Err(QueryError::MisplacedNegation);
        }
        Ok(self.to_string())
    }

    fn apply(mut self, operator: Operator, value: Value) -> Self {
        match self.state() {
            State::Errored => self,
            State::Start | State::TermComplete => {
                self.fail(QueryError::MissingField {
                    operator,
                })
            }
            State::ExpectOperator => {
                let Some(field) = self.pending_field else {
                    return self;
                };
                let kind = value.kind();
                if !field.allows(operator, kind) {
                    return self.fail(QueryError::IncompatibleOperand {
                        field,
                        operator,
                        kind,
                    });
                }

                self.pending_field = None;
                self.clauses.push(Clause {
                    negated: std::mem::take(&mut self.pending_negation),
                    field,
                    operator,
                    value,
                });
                self
            }
        }
    }

    fn connective(mut self, connective: Connective) -> Self {
        match self.state() {
            State::Errored => self,
            State::TermComplete => {
                self.connectives.push(connective);
                self
            }
            State::Start => self.fail(QueryError::LeadingConnective),
            State::ExpectOperator => {
                match self.pending_field {
                    Some(field) => {
                        self.fail(QueryError::DanglingField {
                            field,
                        })
                    }
                    None => self,
                }
            }
        }
    }

    fn fail(mut self, err: QueryError) -> Self {
        debug!("query error recorded: {err}");
        self.err = Some(err);
        self
    }
}

impl fmt::Display for Query {
    /// Renders the recorded clauses and connectives in order.
    ///
    /// This is a best-effort rendering: a trailing connective is kept, a
    /// pending field or negation is not shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, clause) in self.clauses.iter().enumerate() {
            if idx > 0 {
                if let Some(connective) = self.connectives.get(idx - 1) {
                    write!(f, " {connective} ")?;
                }
            }
            write!(f, "{clause}")?;
        }

        if !self.clauses.is_empty() && self.connectives.len() == self.clauses.len() {
            if let Some(connective) = self.connectives.last() {
                write!(f, " {connective}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_in() {
        let q = Query::new().parents().is_in("id");
        assert_eq!(q.to_string(), "parents in 'id'");
        assert_eq!(q.state(), State::TermComplete);
        assert!(q.err().is_none());

        let q = q.reset().parents().eq("some id");
        assert!(q.err().is_some());
    }

    #[test]
    fn test_not() {
        let q = Query::new().not().parents().is_in("id");
        assert_eq!(q.to_string(), "not parents in 'id'");

        let q = q
            .reset()
            .parents()
            .is_in("id")
            .and()
            .not()
            .name()
            .eq("name");
        assert_eq!(q.to_string(), "parents in 'id' and not name = 'name'");

        let q = q.reset().not().not().parents().is_in("id");
        assert_eq!(q.err(), Some(&QueryError::DoubleNegation));
    }

    #[test]
    fn test_and() {
        let q = Query::new().parents().is_in("id").and().name().eq("name");
        assert_eq!(q.to_string(), "parents in 'id' and name = 'name'");

        let q = q.reset().and().parents().is_in("id");
        assert_eq!(q.err(), Some(&QueryError::LeadingConnective));
    }

    #[test]
    fn test_or() {
        let q = Query::new().parents().is_in("id").or().name().eq("name");
        assert_eq!(q.to_string(), "parents in 'id' or name = 'name'");

        let q = q.reset().or().parents().is_in("id");
        assert_eq!(q.err(), Some(&QueryError::LeadingConnective));
    }

    #[test]
    fn test_incompatible_operand_appends_nothing() {
        let q = Query::new().parents().eq("x");
        assert_eq!(
            q.err(),
            Some(&QueryError::IncompatibleOperand {
                field: Field::Parents,
                operator: Operator::Eq,
                kind: crate::ValueKind::Str,
            })
        );
        assert!(q.clauses().is_empty());
        assert!(q.is_empty());
        assert_eq!(q.state(), State::Errored);
    }

    #[test]
    fn test_name_rejects_contains() {
        let q = Query::new().name().contains("draft");
        assert_eq!(
            q.err(),
            Some(&QueryError::IncompatibleOperand {
                field: Field::Name,
                operator: Operator::Contains,
                kind: crate::ValueKind::Str,
            })
        );
        assert!(q.clauses().is_empty());
        assert!(q.build().is_err());
    }

    #[test]
    fn test_incompatible_operand_keeps_earlier_clauses() {
        let q = Query::new().name().eq("a").and().mime_type().is_in("b");
        assert_eq!(q.clauses().len(), 1);
        assert_eq!(q.connectives().len(), 1);
        assert_eq!(q.to_string(), "name = 'a' and");
    }

    #[test]
    fn test_trashed_composite() {
        let q = Query::new().trashed_eq(false);
        assert_eq!(q.to_string(), "trashed = false");
        assert_eq!(q.state(), State::TermComplete);

        let q = Query::new().not().starred_eq(true);
        assert_eq!(q.to_string(), "not starred = true");
    }

    #[test]
    fn test_trashed_rejects_string_operand() {
        let q = Query::new().field(Field::Trashed).eq("false");
        assert!(matches!(
            q.err(),
            Some(QueryError::IncompatibleOperand {
                field: Field::Trashed,
                ..
            })
        ));
    }

    #[test]
    fn test_composite_after_complete_term_is_misplaced() {
        let q = Query::new().name().eq("a").trashed_eq(false);
        assert_eq!(
            q.err(),
            Some(&QueryError::MisplacedField {
                field: Field::Trashed,
            })
        );
        assert_eq!(q.clauses().len(), 1);
    }

    #[test]
    fn test_field_after_field_is_misplaced() {
        let q = Query::new().name().parents();
        assert_eq!(
            q.err(),
            Some(&QueryError::MisplacedField {
                field: Field::Parents,
            })
        );
    }

    #[test]
    fn test_operator_without_field() {
        let q = Query::new().eq("x");
        assert_eq!(
            q.err(),
            Some(&QueryError::MissingField {
                operator: Operator::Eq,
            })
        );

        let q = Query::new().name().eq("x").contains("y");
        assert_eq!(
            q.err(),
            Some(&QueryError::MissingField {
                operator: Operator::Contains,
            })
        );
    }

    #[test]
    fn test_connective_after_dangling_field() {
        let q = Query::new().name().and();
        assert_eq!(
            q.err(),
            Some(&QueryError::DanglingField {
                field: Field::Name,
            })
        );
    }

    #[test]
    fn test_double_connective() {
        let q = Query::new().name().eq("a").and().or();
        assert_eq!(q.err(), Some(&QueryError::LeadingConnective));
        assert_eq!(q.connectives(), &[Connective::And]);
    }

    #[test]
    fn test_negation_after_complete_term() {
        let q = Query::new().name().eq("a").not();
        assert_eq!(q.err(), Some(&QueryError::MisplacedNegation));
    }

    #[test]
    fn test_negation_after_field() {
        let q = Query::new().name().not();
        assert_eq!(q.err(), Some(&QueryError::MisplacedNegation));
    }

    #[test]
    fn test_negation_repeated_after_field() {
        let q = Query::new().not().name().not();
        assert_eq!(q.err(), Some(&QueryError::DoubleNegation));
    }

    #[test]
    fn test_negation_then_connective() {
        let q = Query::new().not().and();
        assert_eq!(q.err(), Some(&QueryError::LeadingConnective));
    }

    #[test]
    fn test_negation_is_consumed_by_one_clause() {
        let q = Query::new()
            .not()
            .name()
            .eq("a")
            .and()
            .name()
            .eq("b");
        assert_eq!(q.to_string(), "not name = 'a' and name = 'b'");
        assert!(q.clauses()[0].negated);
        assert!(!q.clauses()[1].negated);
    }

    #[test]
    fn test_error_is_sticky() {
        let q = Query::new().and();
        let rendered = q.to_string();

        let q = q.not().not().parents().eq("x").name().eq("y").or();
        assert_eq!(q.err(), Some(&QueryError::LeadingConnective));
        assert_eq!(q.to_string(), rendered);
        assert!(q.is_empty());
    }

    #[test]
    fn test_error_is_sticky_after_clauses() {
        let q = Query::new().name().eq("a").and().not().not();
        let before = q.to_string();

        let q = q.name().eq("b");
        assert_eq!(q.err(), Some(&QueryError::DoubleNegation));
        assert_eq!(q.to_string(), before);
        assert_eq!(q.clauses().len(), 1);
    }

    #[test]
    fn test_reset_restores_empty_builder() {
        let sequences = [
            Query::new().and(),
            Query::new().not().not(),
            Query::new().parents().eq("x"),
            Query::new().name().eq("a").or().name(),
        ];

        for q in sequences {
            let q = q.reset();
            assert!(q.is_empty());
            assert!(q.err().is_none());
            assert_eq!(q.state(), State::Start);
            assert_eq!(q, Query::new());
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let q = Query::new().parents().is_in("id").and().trashed_eq(false);
        assert_eq!(q.to_string(), q.to_string());
        assert_eq!(q.err(), q.err());

        let q = q.or().or();
        assert_eq!(q.to_string(), q.to_string());
        assert_eq!(q.err(), q.err());
    }

    #[test]
    fn test_is_empty_ignores_pending_parts() {
        assert!(Query::new().not().is_empty());
        assert!(Query::new().not().name().is_empty());
        assert!(!Query::new().name().eq("a").is_empty());
    }

    #[test]
    fn test_pending_field_is_not_rendered() {
        let q = Query::new().name().eq("a").and().not().mime_type();
        assert_eq!(q.to_string(), "name = 'a' and");
        assert_eq!(q.state(), State::ExpectOperator);
    }

    #[test]
    fn test_build_complete_query() {
        let q = Query::new().name().eq("draft").or().full_text().contains("draft");
        assert_eq!(
            q.build().as_deref(),
            Ok("name = 'draft' or fullText contains 'draft'")
        );
        assert_eq!(Query::new().build().as_deref(), Ok(""));
    }

    #[test]
    fn test_build_rejects_incomplete_query() {
        assert_eq!(
            Query::new().name().build(),
            Err(QueryError::DanglingField {
                field: Field::Name,
            })
        );
        assert_eq!(
            Query::new().name().eq("a").and().build(),
            Err(QueryError::TrailingConnective)
        );
        assert_eq!(Query::new().not().build(), Err(QueryError::MisplacedNegation));
        assert_eq!(
            Query::new().or().build(),
            Err(QueryError::LeadingConnective)
        );
    }

    #[test]
    fn test_connective_count_invariant() {
        let q = Query::new()
            .name()
            .eq("a")
            .and()
            .mime_type()
            .eq("b")
            .or()
            .parents()
            .is_in("c");
        assert_eq!(q.connectives().len(), q.clauses().len() - 1);
        assert_eq!(q.state(), State::TermComplete);
    }
}
