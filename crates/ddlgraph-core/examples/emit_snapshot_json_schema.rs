use ddlgraph_core::MetadataSnapshot;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(MetadataSnapshot);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
