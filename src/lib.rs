//! Book collection queries over MongoDB.
//!
//! The [`modules::books`] module holds the operation catalogue: find,
//! update and delete calls, aggregation pipelines, and index requests, each
//! printed to the console as it completes.

pub mod modules;

pub use modules::*;
