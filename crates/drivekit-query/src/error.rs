use miette::Diagnostic;
use thiserror::Error;

use crate::{
    clause::ValueKind,
    field::{Field, Operator},
};

/// A grammar violation recorded while building a query.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Double negation: `not` applied twice to the same term")]
    #[diagnostic(
        code(drivekit_query::double_negation),
        help("Apply `not` at most once before each field")
    )]
    DoubleNegation,

    #[error("Query cannot begin with a connective")]
    #[diagnostic(
        code(drivekit_query::leading_connective),
        help("`and`/`or` must follow a complete term")
    )]
    LeadingConnective,

    #[error("Operand not valid for term: `{field} {operator}` with a {kind} value")]
    #[diagnostic(code(drivekit_query::incompatible_operand))]
    IncompatibleOperand {
        field: Field,
        operator: Operator,
        kind: ValueKind,
    },

    #[error("`not` must come before a field")]
    #[diagnostic(
        code(drivekit_query::misplaced_negation),
        help("Start a new term with `and`/`or` before negating it")
    )]
    MisplacedNegation,

    #[error("Field `{field}` cannot start a term here")]
    #[diagnostic(
        code(drivekit_query::misplaced_field),
        help("Finish the current term and join the next one with `and`/`or`")
    )]
    MisplacedField { field: Field },

    #[error("Operator `{operator}` applied without a field")]
    #[diagnostic(code(drivekit_query::missing_field))]
    MissingField { operator: Operator },

    #[error("Field `{field}` has no operator")]
    #[diagnostic(code(drivekit_query::dangling_field))]
    DanglingField { field: Field },

    #[error("Query cannot end with a connective")]
    #[diagnostic(code(drivekit_query::trailing_connective))]
    TrailingConnective,
}
