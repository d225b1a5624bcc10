/// Options that control which catalog reads make up a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Schema to read; the connection's current schema when `None`.
    pub schema: Option<String>,
    pub include_views: bool,
    pub include_key_column_usage: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            schema: None,
            include_views: true,
            include_key_column_usage: true,
        }
    }
}

impl SnapshotOptions {
    pub fn for_schema(schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }
}
