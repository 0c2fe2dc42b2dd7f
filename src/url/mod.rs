//! URL handling module for Frontier-Bench
//!
//! The crawl target paginates inside a single directory, so the only
//! resolution modelled is same-directory substitution: a discovered link
//! replaces the last path segment of the page it was found on.

mod resolve;

pub use resolve::{directory_of, resolve_link};
