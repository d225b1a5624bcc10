use async_trait::async_trait;
use sqlx::MySqlPool;

use ddlgraph_core::{ColumnRow, ForeignKeyDependency, KeyColumnUsage, Result, TableRow, ViewRow};

use crate::adapter::SchemaInfoProvider;

mod mapper;
mod queries;

/// Provider for MySQL and MariaDB catalogs.
#[derive(Debug, Clone)]
pub struct MySqlProvider {
    pool: MySqlPool,
}

impl MySqlProvider {
    /// Create a new provider using a pre-configured pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaInfoProvider for MySqlProvider {
    fn dialect(&self) -> &'static str {
        "mysql"
    }

    async fn current_schema(&self) -> Result<String> {
        queries::fetch_current_schema(&self.pool).await
    }

    async fn fetch_tables(&self, schema: &str) -> Result<Vec<TableRow>> {
        let tables = mapper::map_tables(queries::list_tables(&self.pool, schema).await?);
        tracing::debug!(event = "tables_fetched", schema, count = tables.len());
        Ok(tables)
    }

    async fn fetch_views(&self, schema: &str) -> Result<Vec<ViewRow>> {
        let views = mapper::map_views(queries::list_views(&self.pool, schema).await?);
        tracing::debug!(event = "views_fetched", schema, count = views.len());
        Ok(views)
    }

    async fn fetch_columns(&self, schema: &str) -> Result<Vec<ColumnRow>> {
        let columns = mapper::map_columns(queries::list_columns(&self.pool, schema).await?)?;
        tracing::debug!(event = "columns_fetched", schema, count = columns.len());
        Ok(columns)
    }

    async fn fetch_foreign_key_dependencies(
        &self,
        schema: &str,
    ) -> Result<Vec<ForeignKeyDependency>> {
        let deps = mapper::map_dependencies(queries::list_dependencies(&self.pool, schema).await?);
        tracing::debug!(event = "dependencies_fetched", schema, count = deps.len());
        Ok(deps)
    }

    async fn fetch_key_column_usage(&self, schema: &str) -> Result<Vec<KeyColumnUsage>> {
        let rows =
            mapper::map_key_columns(queries::list_key_columns(&self.pool, schema).await?)?;
        tracing::debug!(event = "key_columns_fetched", schema, count = rows.len());
        Ok(rows)
    }
}
