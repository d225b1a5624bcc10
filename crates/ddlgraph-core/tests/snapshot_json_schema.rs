use ddlgraph_core::{
    ColumnDefault, ColumnRow, ForeignKeyDependency, KeyColumnUsage, MetadataSnapshot, TableName,
    TableRow, ViewRow,
};
use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::json;

fn snapshot_fixture() -> MetadataSnapshot {
    let users = TableName::new("shop", "users");
    let orders = TableName::new("shop", "orders");

    MetadataSnapshot {
        schema: "shop".to_string(),
        tables: vec![
            TableRow {
                name: users.clone(),
            },
            TableRow {
                name: orders.clone(),
            },
        ],
        views: vec![ViewRow {
            name: TableName::new("shop", "active_users"),
            definition: Some("select * from users where status = 'active'".to_string()),
            is_updatable: true,
        }],
        columns: vec![
            ColumnRow {
                table: users.clone(),
                name: "note".to_string(),
                declared_type: "text".to_string(),
                data_type: "text".to_string(),
                nullable: true,
                default: ColumnDefault::NullLiteral,
                extra: String::new(),
                ordinal_position: 1,
            },
            ColumnRow {
                table: orders.clone(),
                name: "total".to_string(),
                declared_type: "decimal(10,2)".to_string(),
                data_type: "decimal".to_string(),
                nullable: false,
                default: ColumnDefault::Value("0.00".to_string()),
                extra: String::new(),
                ordinal_position: 1,
            },
        ],
        dependencies: vec![ForeignKeyDependency {
            from_table: orders.clone(),
            to_table: users.clone(),
            constraint_name: Some("orders_user_fk".to_string()),
            delete_rule: Some("RESTRICT".to_string()),
            update_rule: None,
        }],
        key_columns: vec![KeyColumnUsage {
            table: orders,
            constraint_name: "orders_user_fk".to_string(),
            column_name: "user_id".to_string(),
            ordinal_position: 1,
            referenced_table: Some(users),
            referenced_column: Some("id".to_string()),
        }],
    }
}

#[test]
fn snapshot_validates_against_its_json_schema() {
    let schema = serde_json::to_value(schema_for!(MetadataSnapshot)).expect("serialize schema");
    let compiled = JSONSchema::compile(&schema).expect("compile schema");

    let instance = serde_json::to_value(snapshot_fixture()).expect("serialize snapshot");
    assert!(compiled.is_valid(&instance));

    let broken = json!({ "schema": "shop", "tables": "users" });
    assert!(!compiled.is_valid(&broken));
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = snapshot_fixture();
    let encoded = serde_json::to_string_pretty(&snapshot).expect("serialize snapshot");
    let decoded: MetadataSnapshot = serde_json::from_str(&encoded).expect("deserialize snapshot");
    assert_eq!(decoded, snapshot);
}

#[test]
fn column_defaults_serialize_with_explicit_kind() {
    assert_eq!(
        serde_json::to_value(ColumnDefault::Absent).unwrap(),
        json!({ "kind": "absent" })
    );
    assert_eq!(
        serde_json::to_value(ColumnDefault::NullLiteral).unwrap(),
        json!({ "kind": "null_literal" })
    );
    assert_eq!(
        serde_json::to_value(ColumnDefault::Value("0".to_string())).unwrap(),
        json!({ "kind": "value", "value": "0" })
    );
}
