//! The search-query builder.
//!
//! This crate assembles filter expressions in the Drive search grammar
//! (`field operator value` terms joined by `and`/`or`, each optionally prefixed
//! with `not`) and validates the grammar call by call instead of parsing the
//! finished string.
//!
//! # Overview
//!
//! - [`Query`]: the fluent builder. Every method consumes and returns the
//!   builder, so a whole chain can be written before checking [`Query::err`].
//! - [`Field`] and [`Operator`]: the searchable attributes and comparison
//!   operators, tied together by a static compatibility table.
//! - [`Clause`], [`Value`] and [`Connective`]: the rendered grammar terms.
//! - [`QueryError`]: grammar violations recorded on the builder.
//!
//! # Example
//!
//! ```
//! use drivekit_query::Query;
//!
//! let query = Query::new()
//!     .parents()
//!     .is_in("root")
//!     .and()
//!     .not()
//!     .name()
//!     .eq("notes.txt");
//!
//! assert!(query.err().is_none());
//! assert_eq!(query.to_string(), "parents in 'root' and not name = 'notes.txt'");
//! ```
//!
//! Errors are sticky: once a call violates the grammar, the rest of the chain
//! is ignored and the first error is kept until [`Query::reset`].
//!
//! ```
//! use drivekit_query::{Query, QueryError};
//!
//! let query = Query::new().and().parents().is_in("root");
//! assert_eq!(query.err(), Some(&QueryError::LeadingConnective));
//! assert!(query.is_empty());
//! ```

pub mod builder;
pub mod clause;
pub mod error;
pub mod field;
pub mod state;

pub use builder::Query;
pub use clause::{Clause, Connective, Value, ValueKind};
pub use error::QueryError;
pub use field::{Field, Operator};
pub use state::State;
