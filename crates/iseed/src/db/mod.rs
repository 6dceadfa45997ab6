//! Database access for reading table snapshots.
//!
//! The [`RowFetcher`] checks that a table exists, resolves its live column list
//! and reads rows into driver-independent [`TableRow`](crate::models::TableRow)s.
//! [`Connections`] opens named connections lazily and keeps them for the run.

mod decode;
mod fetcher;
mod query;
mod source;

pub use fetcher::{FetchOptions, RowFetcher};
pub use query::SelectQuery;
pub use source::{Connections, Dialect, SourcePool};
