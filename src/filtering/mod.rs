//! # Query-String Filtering & Sorting
//!
//! Translates `where__`/`order__` query parameters into a [`QueryDescriptor`](crate::models::QueryDescriptor)
//! that a repository can execute. Every field is checked against the resource's whitelist
//! and every value is coerced to the column's type before anything reaches the database.
//!
//! ## Main Components
//!
//! - **[`split_key`]**: decodes `where__field`, `where__field__op` and `order__field`
//! - **[`OperatorRegistry`]**: maps operator tokens to [`Predicate`] builders
//! - **[`compose`]**: walks a request and builds the full query
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Exact match
//! GET /posts?where__authorId=3
//!
//! // Comparisons
//! GET /posts?where__likes__more_than=10
//! GET /posts?where__likes__between=5,10
//!
//! // Case-insensitive substring
//! GET /posts?where__title__i_like=rust
//!
//! // Sorting (repeatable, applied in order)
//! GET /posts?order__createdAt=DESC&order__title=ASC
//! ```

pub mod compose;
pub mod key;
pub mod operators;

// Re-export commonly used items
pub use compose::compose;
pub use key::{FilterKey, parse_key, split_key};
pub use operators::{Arity, FieldKind, Operator, OperatorRegistry, Predicate};
