use sqlx::PgPool;

use ddlgraph_core::{Error, Result};

use crate::adapter::fetch_error;

pub async fn fetch_current_schema(pool: &PgPool) -> Result<String> {
    let name = sqlx::query_scalar::<_, Option<String>>("select current_schema()")
        .fetch_one(pool)
        .await
        .map_err(fetch_error)?;
    name.ok_or_else(|| Error::Fetch("search_path does not resolve to a schema".to_string()))
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawTable {
    pub schema_name: String,
    pub table_name: String,
}

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<RawTable>> {
    sqlx::query_as::<_, RawTable>(
        r#"
        select
          n.nspname as schema_name,
          c.relname as table_name
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relkind in ('r','p')
          and not c.relispartition
        order by c.relname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawView {
    pub schema_name: String,
    pub table_name: String,
    pub definition: Option<String>,
    pub is_updatable: bool,
}

pub async fn list_views(pool: &PgPool, schema: &str) -> Result<Vec<RawView>> {
    sqlx::query_as::<_, RawView>(
        r#"
        select
          v.table_schema::text as schema_name,
          v.table_name::text as table_name,
          v.view_definition::text as definition,
          (v.is_updatable = 'YES') as is_updatable
        from information_schema.views v
        where v.table_schema = $1
        order by v.table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub declared_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub identity: Option<String>,
    pub is_generated: bool,
    pub ordinal_position: i32,
}

pub async fn list_columns(pool: &PgPool, schema: &str) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
          n.nspname as schema_name,
          c.relname as table_name,
          a.attname as column_name,
          pg_catalog.format_type(a.atttypid, a.atttypmod) as declared_type,
          t.typname as udt_name,
          (not a.attnotnull) as is_nullable,
          pg_get_expr(ad.adbin, ad.adrelid) as column_default,
          case
            when a.attidentity = 'a' then 'ALWAYS'
            when a.attidentity = 'd' then 'BY DEFAULT'
            else null
          end as identity,
          (a.attgenerated <> '') as is_generated,
          a.attnum::int4 as ordinal_position
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_type t on t.oid = a.atttypid
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        where n.nspname = $1
          and c.relkind in ('r','p')
          and not c.relispartition
          and a.attnum > 0
          and not a.attisdropped
        order by c.relname, a.attnum
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawDependency {
    pub schema_name: String,
    pub table_name: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub constraint_name: String,
    pub on_delete_code: String,
    pub on_update_code: String,
}

pub async fn list_dependencies(pool: &PgPool, schema: &str) -> Result<Vec<RawDependency>> {
    sqlx::query_as::<_, RawDependency>(
        r#"
        select
          src_nsp.nspname as schema_name,
          src_rel.relname as table_name,
          ref_nsp.nspname as referenced_schema,
          ref_rel.relname as referenced_table,
          con.conname as constraint_name,
          con.confdeltype::text as on_delete_code,
          con.confupdtype::text as on_update_code
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join pg_class ref_rel on ref_rel.oid = con.confrelid
        join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        where src_nsp.nspname = $1
          and con.contype = 'f'
        order by src_rel.relname, ref_rel.relname, con.conname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawKeyColumn {
    pub schema_name: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: i32,
    pub referenced_schema: Option<String>,
    pub referenced_table: Option<String>,
    pub referenced_column: Option<String>,
}

pub async fn list_key_columns(pool: &PgPool, schema: &str) -> Result<Vec<RawKeyColumn>> {
    sqlx::query_as::<_, RawKeyColumn>(
        r#"
        select
          src_nsp.nspname as schema_name,
          src_rel.relname as table_name,
          con.conname as constraint_name,
          src_att.attname as column_name,
          ord.ordinality::int4 as ordinal_position,
          ref_nsp.nspname as referenced_schema,
          ref_rel.relname as referenced_table,
          ref_att.attname as referenced_column
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join unnest(con.conkey) with ordinality as ord(attnum, ordinality) on true
        join pg_attribute src_att on src_att.attrelid = src_rel.oid and src_att.attnum = ord.attnum
        left join pg_class ref_rel on ref_rel.oid = con.confrelid
        left join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        left join pg_attribute ref_att
          on ref_att.attrelid = con.confrelid
         and ref_att.attnum = con.confkey[ord.ordinality::int4]
        where src_nsp.nspname = $1
          and con.contype in ('p','u','f')
        order by src_rel.relname, con.conname, ord.ordinality
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(fetch_error)
}
