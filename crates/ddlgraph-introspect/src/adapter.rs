use async_trait::async_trait;

use ddlgraph_core::{
    ColumnRow, Error, ForeignKeyDependency, KeyColumnUsage, Result, TableRow, ViewRow,
};

/// Catalog capabilities a dialect must provide to build a metadata snapshot.
///
/// Every fetch is an independent read of one schema; callers may run them
/// concurrently.
#[async_trait]
pub trait SchemaInfoProvider: Send + Sync {
    /// Dialect identifier (e.g. `mysql`), used for logging only.
    fn dialect(&self) -> &'static str;

    /// Schema the connection is bound to.
    async fn current_schema(&self) -> Result<String>;

    /// Base tables, views excluded.
    async fn fetch_tables(&self, schema: &str) -> Result<Vec<TableRow>>;

    async fn fetch_views(&self, schema: &str) -> Result<Vec<ViewRow>>;

    /// Columns ordered by table then ordinal position.
    async fn fetch_columns(&self, schema: &str) -> Result<Vec<ColumnRow>>;

    /// Dependencies ordered by referencing then referenced table.
    async fn fetch_foreign_key_dependencies(
        &self,
        schema: &str,
    ) -> Result<Vec<ForeignKeyDependency>>;

    /// Key columns ordered by table, constraint and ordinal position.
    async fn fetch_key_column_usage(&self, schema: &str) -> Result<Vec<KeyColumnUsage>>;
}

/// Map a driver failure into the core fetch error.
pub(crate) fn fetch_error(err: sqlx::Error) -> Error {
    Error::Fetch(err.to_string())
}
