//! `CREATE`, `DROP` and foreign key statements derived from a snapshot.

use serde::{Deserialize, Serialize};

use crate::columns::column_definition;
use crate::constraints::KeyColumnUsage;
use crate::error::Result;
use crate::graph::{DependencyGraph, Edge};
use crate::snapshot::{ColumnRow, MetadataSnapshot, TableName};

/// Referenced column assumed when key-column usage has no match.
pub const FALLBACK_KEY_COLUMN: &str = "id";

/// Options that control statement rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Render drops as `DROP TABLE IF EXISTS`.
    pub drop_if_exists: bool,
    /// Render table references as `schema.table`.
    pub qualify_names: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            drop_if_exists: true,
            qualify_names: false,
        }
    }
}

/// Ordered statement lists. `drops` mirrors `creates` in reverse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSet {
    pub creates: Vec<String>,
    pub drops: Vec<String>,
    pub fks: Vec<String>,
}

impl StatementSet {
    /// Drops, creates, then foreign keys as one SQL script.
    pub fn to_script(&self) -> String {
        [&self.drops, &self.creates, &self.fks]
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| section.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
            + "\n"
    }
}

/// Result of one generation pass.
#[derive(Debug, Clone)]
pub struct SchemaPlan {
    pub graph: DependencyGraph,
    pub order: Vec<TableName>,
    pub statements: StatementSet,
}

/// Build the graph, order it and render every statement.
pub fn generate(snapshot: &MetadataSnapshot, options: &GenerateOptions) -> Result<SchemaPlan> {
    let graph = DependencyGraph::from_snapshot(snapshot)?;
    let order = graph.topological_order()?;
    let columns = snapshot.columns_by_table();

    let creates = order
        .iter()
        .map(|table| {
            let table_columns = columns.get(table).map(Vec::as_slice).unwrap_or_default();
            create_table_statement(table, table_columns, options)
        })
        .collect::<Result<Vec<_>>>()?;

    let drops = order
        .iter()
        .rev()
        .map(|table| drop_table_statement(table, options))
        .collect();

    let fks = graph
        .edges()
        .iter()
        .map(|edge| foreign_key_statement(edge, &snapshot.key_columns, options))
        .collect();

    let statements = StatementSet {
        creates,
        drops,
        fks,
    };

    tracing::debug!(
        event = "statements_generated",
        schema = %snapshot.schema,
        creates = statements.creates.len(),
        fks = statements.fks.len()
    );

    Ok(SchemaPlan {
        graph,
        order,
        statements,
    })
}

pub fn create_table_statement(
    table: &TableName,
    columns: &[&ColumnRow],
    options: &GenerateOptions,
) -> Result<String> {
    let definitions = columns
        .iter()
        .map(|column| column_definition(column))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "CREATE TABLE {} ({});",
        table_ref(table, options),
        definitions.join(", ")
    ))
}

pub fn drop_table_statement(table: &TableName, options: &GenerateOptions) -> String {
    let if_exists = if options.drop_if_exists { "IF EXISTS " } else { "" };
    format!("DROP TABLE {if_exists}{};", table_ref(table, options))
}

/// `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` for one edge.
pub fn foreign_key_statement(
    edge: &Edge,
    key_columns: &[KeyColumnUsage],
    options: &GenerateOptions,
) -> String {
    let (from_columns, to_columns) = resolve_key_columns(edge, key_columns);
    let constraint_name = format!(
        "{}__fk__{}_{}",
        edge.from.name,
        edge.to.name,
        to_columns.join("_")
    );

    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {};",
        table_ref(&edge.from, options),
        constraint_name,
        from_columns.join(", "),
        table_ref(&edge.to, options),
        to_columns.join(", "),
        edge.on_delete,
        edge.on_update,
    )
}

/// Referencing and referenced columns of an edge.
///
/// Falls back to `<to>_id → id` when key-column usage has no rows for the
/// edge's constraint.
fn resolve_key_columns(edge: &Edge, key_columns: &[KeyColumnUsage]) -> (Vec<String>, Vec<String>) {
    let mut rows: Vec<&KeyColumnUsage> = match edge.constraint_name.as_deref() {
        Some(constraint) => key_columns
            .iter()
            .filter(|row| {
                row.table == edge.from
                    && row.constraint_name == constraint
                    && row.referenced_table.as_ref() == Some(&edge.to)
            })
            .collect(),
        None => Vec::new(),
    };

    if rows.is_empty() {
        return (
            vec![format!("{}_{FALLBACK_KEY_COLUMN}", edge.to.name)],
            vec![FALLBACK_KEY_COLUMN.to_string()],
        );
    }

    rows.sort_by_key(|row| row.ordinal_position);
    rows.into_iter()
        .map(|row| {
            let referenced = row
                .referenced_column
                .clone()
                .unwrap_or_else(|| FALLBACK_KEY_COLUMN.to_string());
            (row.column_name.clone(), referenced)
        })
        .unzip()
}

fn table_ref(table: &TableName, options: &GenerateOptions) -> String {
    if options.qualify_names {
        table.qualified()
    } else {
        table.name.clone()
    }
}
