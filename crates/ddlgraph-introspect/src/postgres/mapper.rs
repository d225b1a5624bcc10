use ddlgraph_core::columns::canonical_numeric;
use ddlgraph_core::{
    ColumnDefault, ColumnRow, Error, ForeignKeyDependency, KeyColumnUsage, Result, TableName,
    TableRow, ViewRow,
};

use super::queries::{RawColumn, RawDependency, RawKeyColumn, RawTable, RawView};

pub fn map_tables(raw: Vec<RawTable>) -> Vec<TableRow> {
    raw.into_iter()
        .map(|table| TableRow {
            name: TableName::new(table.schema_name, table.table_name),
        })
        .collect()
}

pub fn map_views(raw: Vec<RawView>) -> Vec<ViewRow> {
    raw.into_iter()
        .map(|view| ViewRow {
            name: TableName::new(view.schema_name, view.table_name),
            definition: view.definition,
            is_updatable: view.is_updatable,
        })
        .collect()
}

pub fn map_columns(raw: Vec<RawColumn>) -> Result<Vec<ColumnRow>> {
    raw.into_iter()
        .map(|col| {
            let table = TableName::new(col.schema_name, col.table_name);
            let ordinal_position = ordinal(col.ordinal_position, &table, &col.column_name)?;
            let mut extra = Vec::new();
            let default = if col.is_generated {
                if let Some(expr) = col.column_default.as_deref() {
                    extra.push(format!("GENERATED ALWAYS AS ({expr}) STORED"));
                }
                ColumnDefault::Absent
            } else {
                match col.column_default.as_deref().map(parse_default) {
                    Some(ParsedDefault::Literal(value)) => value,
                    Some(ParsedDefault::Expression(expr)) => {
                        extra.push(format!("DEFAULT {expr}"));
                        ColumnDefault::Absent
                    }
                    None => ColumnDefault::Absent,
                }
            };
            if let Some(identity) = col.identity.as_deref() {
                extra.push(format!("GENERATED {identity} AS IDENTITY"));
            }

            Ok(ColumnRow {
                table,
                name: col.column_name,
                declared_type: col.declared_type,
                data_type: normalize_udt(&col.udt_name),
                nullable: col.is_nullable,
                default,
                extra: extra.join(" "),
                ordinal_position,
            })
        })
        .collect()
}

pub fn map_dependencies(raw: Vec<RawDependency>) -> Vec<ForeignKeyDependency> {
    raw.into_iter()
        .map(|dep| ForeignKeyDependency {
            from_table: TableName::new(dep.schema_name, dep.table_name),
            to_table: TableName::new(dep.referenced_schema, dep.referenced_table),
            constraint_name: Some(dep.constraint_name),
            delete_rule: rule_from_code(&dep.on_delete_code).map(str::to_string),
            update_rule: rule_from_code(&dep.on_update_code).map(str::to_string),
        })
        .collect()
}

pub fn map_key_columns(raw: Vec<RawKeyColumn>) -> Result<Vec<KeyColumnUsage>> {
    raw.into_iter()
        .map(|kc| {
            let table = TableName::new(kc.schema_name, kc.table_name);
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

/// Column default as reported by `pg_get_expr`.
#[derive(Debug, PartialEq, Eq)]
enum ParsedDefault {
    Literal(ColumnDefault),
    Expression(String),
}

fn parse_default(expr: &str) -> ParsedDefault {
    let trimmed = expr.trim();
    let (value, _cast) = split_cast(trimmed);

    if value.eq_ignore_ascii_case("null") {
        return ParsedDefault::Literal(ColumnDefault::NullLiteral);
    }
    if let Some(text) = unquote(value) {
        return ParsedDefault::Literal(ColumnDefault::Value(text));
    }

    let bare = strip_parens(value);
    if canonical_numeric(bare).is_some() {
        return ParsedDefault::Literal(ColumnDefault::Value(bare.to_string()));
    }

    ParsedDefault::Expression(trimmed.to_string())
}

/// Split a trailing `::type` cast that sits outside any quoted literal.
fn split_cast(expr: &str) -> (&str, Option<&str>) {
    let mut in_quote = false;
    let mut split_at = None;
    let bytes = expr.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\'' => in_quote = !in_quote,
            b':' if !in_quote && bytes.get(idx + 1) == Some(&b':') => {
                split_at = Some(idx);
                break;
            }
            _ => {}
        }
        idx += 1;
    }

    match split_at {
        Some(pos) => (expr[..pos].trim(), Some(expr[pos + 2..].trim())),
        None => (expr, None),
    }
}

fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

fn strip_parens(value: &str) -> &str {
    let mut current = value.trim();
    while let Some(inner) = current
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        current = inner.trim();
    }
    current
}

fn normalize_udt(udt: &str) -> String {
    match udt {
        "int2" => "smallint",
        "int4" => "int",
        "int8" => "bigint",
        "numeric" => "decimal",
        "float4" | "float8" => "float",
        other => other,
    }
    .to_string()
}

fn rule_from_code(code: &str) -> Option<&'static str> {
    match code {
        "a" => Some("NO ACTION"),
        "r" => Some("RESTRICT"),
        "c" => Some("CASCADE"),
        "n" => Some("SET NULL"),
        "d" => Some("SET DEFAULT"),
        _ => None,
    }
}

fn ordinal(value: i32, table: &TableName, column: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|position| *position > 0)
        .ok_or_else(|| {
            Error::Fetch(format!(
                "invalid ordinal position {value} for column {table}.{column}"
            ))
        })
}
