use thiserror::Error;

/// Core error type shared across ddlgraph crates.
///
/// Every variant aborts the generation pass; there is no partial output.
#[derive(Debug, Error)]
pub enum Error {
    /// A provider read against the catalog failed.
    #[error("fetch error: {0}")]
    Fetch(String),
    /// A foreign key references a table that is not part of the snapshot.
    #[error("dangling foreign key: {from} references unknown table {to}")]
    DanglingEdge { from: String, to: String },
    /// The foreign key graph cannot be ordered.
    #[error("cyclic dependency between tables: {}", .tables.join(", "))]
    CyclicDependency { tables: Vec<String> },
    /// A default value does not match its declared numeric category.
    #[error("cannot format default {value:?} of {table}.{column} as {data_type}")]
    Formatting {
        table: String,
        column: String,
        data_type: String,
        value: String,
    },
}

/// Convenience alias for results returned by ddlgraph crates.
pub type Result<T> = std::result::Result<T, Error>;
