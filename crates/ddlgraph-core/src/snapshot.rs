use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{ForeignKeyDependency, KeyColumnUsage};

/// Schema-qualified table identifier. Used as the graph vertex key.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct TableName {
    pub schema: String,
    pub name: String,
}

impl TableName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// `schema.name` form.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A base table in the catalog. Views are kept apart in [`ViewRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableRow {
    pub name: TableName,
}

/// A view in the catalog, fetched for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewRow {
    pub name: TableName,
    pub definition: Option<String>,
    pub is_updatable: bool,
}

/// Raw column default as reported by the catalog.
///
/// `Absent` means the catalog has no default at all, `NullLiteral` means the
/// default was declared as an explicit `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnDefault {
    #[default]
    Absent,
    NullLiteral,
    Value(String),
}

impl ColumnDefault {
    pub fn is_absent(&self) -> bool {
        matches!(self, ColumnDefault::Absent)
    }
}

impl From<Option<String>> for ColumnDefault {
    fn from(value: Option<String>) -> Self {
        value.map_or(ColumnDefault::Absent, ColumnDefault::Value)
    }
}

/// Column metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnRow {
    /// Owning table.
    pub table: TableName,
    pub name: String,
    /// Full SQL type text, e.g. `varchar(255)`.
    pub declared_type: String,
    /// Bare type keyword, e.g. `varchar` or `int`.
    pub data_type: String,
    pub nullable: bool,
    pub default: ColumnDefault,
    /// Free-text modifiers such as `auto_increment`; empty when none.
    pub extra: String,
    /// 1-based position within the table.
    pub ordinal_position: u32,
}

/// Metadata for one schema, fetched once and immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MetadataSnapshot {
    /// Schema the rows were fetched from.
    pub schema: String,
    /// Tables in fetch order. The order drives topological tie-breaks.
    pub tables: Vec<TableRow>,
    pub views: Vec<ViewRow>,
    /// Columns ordered by table then ordinal position.
    pub columns: Vec<ColumnRow>,
    /// Dependencies ordered by referencing then referenced table.
    pub dependencies: Vec<ForeignKeyDependency>,
    pub key_columns: Vec<KeyColumnUsage>,
}

impl MetadataSnapshot {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Group columns by owning table, each group sorted by ordinal position.
    pub fn columns_by_table(&self) -> BTreeMap<&TableName, Vec<&ColumnRow>> {
        let mut grouped: BTreeMap<&TableName, Vec<&ColumnRow>> = BTreeMap::new();
        for column in &self.columns {
            grouped.entry(&column.table).or_default().push(column);
        }
        for columns in grouped.values_mut() {
            columns.sort_by_key(|column| column.ordinal_position);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(table: &str, name: &str, ordinal: u32) -> ColumnRow {
        ColumnRow {
            table: TableName::new("app", table),
            name: name.to_string(),
            declared_type: "int".to_string(),
            data_type: "int".to_string(),
            nullable: false,
            default: ColumnDefault::Absent,
            extra: String::new(),
            ordinal_position: ordinal,
        }
    }

    #[test]
    fn groups_columns_in_ordinal_order() {
        let mut snapshot = MetadataSnapshot::new("app");
        snapshot.columns = vec![
            column("users", "email", 2),
            column("posts", "id", 1),
            column("users", "id", 1),
        ];

        let grouped = snapshot.columns_by_table();
        let users: Vec<&str> = grouped[&TableName::new("app", "users")]
            .iter()
            .map(|column| column.name.as_str())
            .collect();
        assert_eq!(users, vec!["id", "email"]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn absent_default_differs_from_null_literal() {
        assert_eq!(ColumnDefault::from(None), ColumnDefault::Absent);
        assert_ne!(ColumnDefault::Absent, ColumnDefault::NullLiteral);
        assert_eq!(
            ColumnDefault::from(Some("NULL".to_string())),
            ColumnDefault::Value("NULL".to_string())
        );
    }
}
