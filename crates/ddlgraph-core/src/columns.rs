//! Column definition clauses for `CREATE TABLE`.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::snapshot::{ColumnDefault, ColumnRow};

/// Type keywords whose defaults render as bare numeric literals.
pub const NUMERIC_TYPES: &[&str] = &[
    "tinyint",
    "smallint",
    "mediumint",
    "int",
    "bigint",
    "decimal",
    "float",
];

pub fn is_numeric_type(data_type: &str) -> bool {
    NUMERIC_TYPES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(data_type.trim()))
}

/// Render `<name> <type> <NULL|NOT NULL> [DEFAULT ...] [extra]`.
pub fn column_definition(column: &ColumnRow) -> Result<String> {
    let nullability = if column.nullable { "NULL" } else { "NOT NULL" };
    let mut clause = format!("{} {} {}", column.name, column.declared_type, nullability);

    if let Some(default) = default_clause(column)? {
        clause.push(' ');
        clause.push_str(&default);
    }

    let extra = column.extra.trim();
    if !extra.is_empty() {
        clause.push(' ');
        clause.push_str(extra);
    }

    Ok(clause)
}

/// Render the `DEFAULT` sub-clause, or `None` when the column has no default.
///
/// A null default is implicit in SQL and never emitted, whether the catalog
/// reported no default or an explicit `NULL`.
pub fn default_clause(column: &ColumnRow) -> Result<Option<String>> {
    let raw = match &column.default {
        ColumnDefault::Absent | ColumnDefault::NullLiteral => return Ok(None),
        ColumnDefault::Value(raw) => raw,
    };

    let literal = if is_numeric_type(&column.data_type) {
        canonical_numeric(raw).ok_or_else(|| Error::Formatting {
            table: column.table.to_string(),
            column: column.name.clone(),
            data_type: column.data_type.clone(),
            value: raw.clone(),
        })?
    } else {
        quote_literal(raw)
    };

    Ok(Some(format!("DEFAULT {literal}")))
}

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Canonical text of a numeric literal: `"007"` is `7`, `"0.50"` is `0.5`,
/// `"1e3"` is `1000`. Returns `None` when the text is not a finite number.
pub fn canonical_numeric(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(integer) = trimmed.parse::<i128>() {
        return Some(integer.to_string());
    }

    if let Ok(decimal) =
        Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))
    {
        return Some(decimal.normalize().to_string());
    }

    // values outside the decimal range, e.g. float limits
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.to_string())
}
