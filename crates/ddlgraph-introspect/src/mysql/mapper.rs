use ddlgraph_core::{
    ColumnDefault, ColumnRow, Error, ForeignKeyDependency, KeyColumnUsage, Result, TableName,
    TableRow, ViewRow,
};

use super::queries::{RawColumn, RawDependency, RawKeyColumn, RawTable, RawView};

pub fn map_tables(raw: Vec<RawTable>) -> Vec<TableRow> {
    raw.into_iter()
        .map(|table| TableRow {
            name: TableName::new(table.table_schema, table.table_name),
        })
        .collect()
}

pub fn map_views(raw: Vec<RawView>) -> Vec<ViewRow> {
    raw.into_iter()
        .map(|view| ViewRow {
            name: TableName::new(view.table_schema, view.table_name),
            definition: view.view_definition,
            is_updatable: is_yes(&view.is_updatable),
        })
        .collect()
}

pub fn map_columns(raw: Vec<RawColumn>) -> Result<Vec<ColumnRow>> {
    raw.into_iter()
        .map(|col| {
            let table = TableName::new(col.table_schema, col.table_name);
            let ordinal_position = ordinal(col.ordinal_position, &table, &col.column_name)?;
            Ok(ColumnRow {
                name: col.column_name,
                declared_type: col.column_type,
                data_type: col.data_type.to_ascii_lowercase(),
                nullable: is_yes(&col.is_nullable),
                default: catalog_default(col.column_default),
                extra: col.extra.unwrap_or_default(),
                ordinal_position,
                table,
            })
        })
        .collect()
}

pub fn map_dependencies(raw: Vec<RawDependency>) -> Vec<ForeignKeyDependency> {
    raw.into_iter()
        .map(|dep| ForeignKeyDependency {
            from_table: TableName::new(dep.table_schema, dep.table_name),
            to_table: TableName::new(dep.referenced_schema, dep.referenced_table),
            constraint_name: Some(dep.constraint_name),
            delete_rule: dep.delete_rule,
            update_rule: dep.update_rule,
        })
        .collect()
}

pub fn map_key_columns(raw: Vec<RawKeyColumn>) -> Result<Vec<KeyColumnUsage>> {
    raw.into_iter()
        .map(|kc| {
            let table = TableName::new(kc.table_schema, kc.table_name);
            let ordinal_position = ordinal(kc.ordinal_position, &table, &kc.column_name)?;
            Ok(KeyColumnUsage {
                referenced_table: match (kc.referenced_schema, kc.referenced_table) {
                    (Some(schema), Some(table)) => Some(TableName::new(schema, table)),
                    _ => None,
                },
                table,
                constraint_name: kc.constraint_name,
                column_name: kc.column_name,
                ordinal_position,
                referenced_column: kc.referenced_column,
            })
        })
        .collect()
}

/// `COLUMN_DEFAULT` as raw default text.
///
/// MariaDB reports defaults as SQL: an explicit null is the bare `NULL`
/// token and string literals keep their quotes. MySQL reports the value
/// itself, or no row value at all for a null default.
fn catalog_default(raw: Option<String>) -> ColumnDefault {
    let Some(raw) = raw else {
        return ColumnDefault::Absent;
    };
    if raw.trim() == "NULL" {
        return ColumnDefault::NullLiteral;
    }
    match raw
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => ColumnDefault::Value(inner.replace("''", "'")),
        None => ColumnDefault::Value(raw),
    }
}

fn is_yes(value: &str) -> bool {
    value.eq_ignore_ascii_case("YES")
}

fn ordinal(value: i64, table: &TableName, column: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|position| *position > 0)
        .ok_or_else(|| {
            Error::Fetch(format!(
                "invalid ordinal position {value} for column {table}.{column}"
            ))
        })
}
