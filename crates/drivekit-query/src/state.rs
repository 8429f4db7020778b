//! Builder states.
//!
//! The state is derived from the builder's contents rather than stored, so it
//! can never drift from the clauses that were actually recorded.

use std::fmt;

/// Where a [`crate::Query`] currently sits in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Expecting a field: the builder is empty or the last call was a connective.
    Start,

    /// A field has been selected and awaits an operator and value.
    ExpectOperator,

    /// The last clause is complete; a connective may follow or the query may end.
    TermComplete,

    /// A grammar violation was recorded. Only `reset` leaves this state.
    Errored,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Start => "start",
            State::ExpectOperator => "expect-operator",
            State::TermComplete => "term-complete",
            State::Errored => "errored",
        };
        f.write_str(name)
    }
}
