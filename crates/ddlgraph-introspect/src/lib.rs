//! Catalog providers that fill a [`MetadataSnapshot`] from a live database.

pub mod adapter;
pub mod mysql;
pub mod options;
pub mod postgres;
pub mod snapshot;

pub use adapter::SchemaInfoProvider;
pub use mysql::MySqlProvider;
pub use options::SnapshotOptions;
pub use postgres::PostgresProvider;
pub use snapshot::{fetch_snapshot, plan_schema};

pub use ddlgraph_core::MetadataSnapshot;
