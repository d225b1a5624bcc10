//! Core contracts and helpers for ddlgraph.
//!
//! This crate defines the metadata snapshot types, the foreign key dependency
//! graph and the DDL statement generator. It never talks to a database; the
//! providers in `ddlgraph-introspect` fill the snapshot.

pub mod columns;
pub mod constraints;
pub mod error;
pub mod graph;
pub mod redaction;
pub mod snapshot;
pub mod statements;

pub use columns::{column_definition, default_clause, is_numeric_type, quote_literal};
pub use constraints::{FkRule, ForeignKeyDependency, KeyColumnUsage};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, Edge, GraphReport, GraphSummary, VertexReport};
pub use redaction::{redact_connection_string, RedactedConnection};
pub use snapshot::{ColumnDefault, ColumnRow, MetadataSnapshot, TableName, TableRow, ViewRow};
pub use statements::{generate, GenerateOptions, SchemaPlan, StatementSet};
