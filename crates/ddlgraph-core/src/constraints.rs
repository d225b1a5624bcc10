use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::snapshot::TableName;

/// Referential action emitted in `ON DELETE` / `ON UPDATE` clauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FkRule {
    Restrict,
    Cascade,
    SetNull,
    #[default]
    NoAction,
}

impl FkRule {
    /// Normalize a catalog rule token. Unknown or missing tokens become `NO ACTION`.
    pub fn normalize(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return FkRule::NoAction;
        };
        match token.trim().to_ascii_uppercase().as_str() {
            "RESTRICT" => FkRule::Restrict,
            "CASCADE" => FkRule::Cascade,
            "SET NULL" => FkRule::SetNull,
            _ => FkRule::NoAction,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            FkRule::Restrict => "RESTRICT",
            FkRule::Cascade => "CASCADE",
            FkRule::SetNull => "SET NULL",
            FkRule::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for FkRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One referencing relationship between two tables.
///
/// Rules are kept as the raw catalog tokens and normalized at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKeyDependency {
    pub from_table: TableName,
    pub to_table: TableName,
    pub constraint_name: Option<String>,
    pub delete_rule: Option<String>,
    pub update_rule: Option<String>,
}

impl ForeignKeyDependency {
    pub fn on_delete(&self) -> FkRule {
        FkRule::normalize(self.delete_rule.as_deref())
    }

    pub fn on_update(&self) -> FkRule {
        FkRule::normalize(self.update_rule.as_deref())
    }
}

/// Raw `key_column_usage` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KeyColumnUsage {
    pub table: TableName,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: u32,
    /// Set for foreign key columns only.
    pub referenced_table: Option<TableName>,
    pub referenced_column: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_rules_case_insensitively() {
        assert_eq!(FkRule::normalize(Some("cascade")), FkRule::Cascade);
        assert_eq!(FkRule::normalize(Some("Set Null")), FkRule::SetNull);
        assert_eq!(FkRule::normalize(Some(" RESTRICT ")), FkRule::Restrict);
        assert_eq!(FkRule::normalize(Some("no action")), FkRule::NoAction);
    }

    #[test]
    fn unknown_rules_fall_back_to_no_action() {
        for token in [Some("SET DEFAULT"), Some(""), Some("drop"), None] {
            assert_eq!(FkRule::normalize(token), FkRule::NoAction, "{token:?}");
        }
        assert_eq!(FkRule::NoAction.to_string(), "NO ACTION");
    }
}
