//! `information_schema` reads for MySQL and MariaDB.
//!
//! Text columns are converted to utf8 so they decode as strings on servers
//! that report catalog columns as binary.

use sqlx::MySqlPool;

use ddlgraph_core::{Error, Result};

use crate::adapter::fetch_error;

pub async fn fetch_current_schema(pool: &MySqlPool) -> Result<String> {
    let name = sqlx::query_scalar::<_, Option<String>>("SELECT CONVERT(DATABASE() USING utf8)")
        .fetch_one(pool)
        .await
        .map_err(fetch_error)?;
    name.ok_or_else(|| Error::Fetch("no database selected for this connection".to_string()))
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawTable {
    pub table_schema: String,
    pub table_name: String,
}

pub async fn list_tables(pool: &MySqlPool, schema: &str) -> Result<Vec<RawTable>> {
    sqlx::query_as::<_, RawTable>(
        r#"
        SELECT
            CONVERT(TABLE_SCHEMA USING utf8) AS table_schema,
            CONVERT(TABLE_NAME USING utf8) AS table_name
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = ?
          AND TABLE_TYPE <> 'VIEW'
        ORDER BY TABLE_NAME
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawView {
    pub table_schema: String,
    pub table_name: String,
    pub view_definition: Option<String>,
    pub is_updatable: String,
}

pub async fn list_views(pool: &MySqlPool, schema: &str) -> Result<Vec<RawView>> {
    sqlx::query_as::<_, RawView>(
        r#"
        SELECT
            CONVERT(TABLE_SCHEMA USING utf8) AS table_schema,
            CONVERT(TABLE_NAME USING utf8) AS table_name,
            CONVERT(VIEW_DEFINITION USING utf8) AS view_definition,
            CONVERT(IS_UPDATABLE USING utf8) AS is_updatable
        FROM information_schema.VIEWS
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub column_type: String,
    pub data_type: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
    pub extra: Option<String>,
    pub ordinal_position: i64,
}

pub async fn list_columns(pool: &MySqlPool, schema: &str) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        SELECT
            CONVERT(TABLE_SCHEMA USING utf8) AS table_schema,
            CONVERT(TABLE_NAME USING utf8) AS table_name,
            CONVERT(COLUMN_NAME USING utf8) AS column_name,
            CONVERT(COLUMN_TYPE USING utf8) AS column_type,
            CONVERT(DATA_TYPE USING utf8) AS data_type,
            CONVERT(IS_NULLABLE USING utf8) AS is_nullable,
            CONVERT(COLUMN_DEFAULT USING utf8) AS column_default,
            CONVERT(EXTRA USING utf8) AS extra,
            CAST(ORDINAL_POSITION AS SIGNED) AS ordinal_position
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME, ORDINAL_POSITION
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawDependency {
    pub table_schema: String,
    pub table_name: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub constraint_name: String,
    pub delete_rule: Option<String>,
    pub update_rule: Option<String>,
}

pub async fn list_dependencies(pool: &MySqlPool, schema: &str) -> Result<Vec<RawDependency>> {
    sqlx::query_as::<_, RawDependency>(
        r#"
        SELECT
            CONVERT(CONSTRAINT_SCHEMA USING utf8) AS table_schema,
            CONVERT(TABLE_NAME USING utf8) AS table_name,
            CONVERT(UNIQUE_CONSTRAINT_SCHEMA USING utf8) AS referenced_schema,
            CONVERT(REFERENCED_TABLE_NAME USING utf8) AS referenced_table,
            CONVERT(CONSTRAINT_NAME USING utf8) AS constraint_name,
            CONVERT(DELETE_RULE USING utf8) AS delete_rule,
            CONVERT(UPDATE_RULE USING utf8) AS update_rule
        FROM information_schema.REFERENTIAL_CONSTRAINTS
        WHERE CONSTRAINT_SCHEMA = ?
        ORDER BY TABLE_NAME, REFERENCED_TABLE_NAME, CONSTRAINT_NAME
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawKeyColumn {
    pub table_schema: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: i64,
    pub referenced_schema: Option<String>,
    pub referenced_table: Option<String>,
    pub referenced_column: Option<String>,
}

pub async fn list_key_columns(pool: &MySqlPool, schema: &str) -> Result<Vec<RawKeyColumn>> {
    sqlx::query_as::<_, RawKeyColumn>(
        r#"
        SELECT
            CONVERT(TABLE_SCHEMA USING utf8) AS table_schema,
            CONVERT(TABLE_NAME USING utf8) AS table_name,
            CONVERT(CONSTRAINT_NAME USING utf8) AS constraint_name,
            CONVERT(COLUMN_NAME USING utf8) AS column_name,
            CAST(ORDINAL_POSITION AS SIGNED) AS ordinal_position,
            CONVERT(REFERENCED_TABLE_SCHEMA USING utf8) AS referenced_schema,
            CONVERT(REFERENCED_TABLE_NAME USING utf8) AS referenced_table,
            CONVERT(REFERENCED_COLUMN_NAME USING utf8) AS referenced_column
        FROM information_schema.KEY_COLUMN_USAGE
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME, CONSTRAINT_NAME, ORDINAL_POSITION
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}
