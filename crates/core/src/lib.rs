//! Pure domain logic for the portfolio platform.
//!
//! No I/O lives here: composition, subdomain rules, template rating math,
//! and publish preconditions are all plain functions so they can be unit
//! tested without a database or object store.

pub mod composition;
pub mod error;
pub mod publication;
pub mod subdomain;
pub mod template;
pub mod types;
