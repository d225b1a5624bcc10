use std::time::Instant;

use ddlgraph_core::{generate, GenerateOptions, MetadataSnapshot, Result, SchemaPlan};

use crate::adapter::SchemaInfoProvider;
use crate::options::SnapshotOptions;

/// Fetch every catalog sequence concurrently and assemble a snapshot.
///
/// The first failing read aborts the others; nothing is built from a partial
/// set of rows.
pub async fn fetch_snapshot<P>(provider: &P, opts: &SnapshotOptions) -> Result<MetadataSnapshot>
where
    P: SchemaInfoProvider + ?Sized,
{
    let schema = match &opts.schema {
        Some(schema) => schema.clone(),
        None => provider.current_schema().await?,
    };

    tracing::info!(
        event = "fetch_started",
        dialect = provider.dialect(),
        schema = %schema
    );
    let timer = Instant::now();

    let views = async {
        if opts.include_views {
            provider.fetch_views(&schema).await
        } else {
            Ok(Vec::new())
        }
    };
    let key_columns = async {
        if opts.include_key_column_usage {
            provider.fetch_key_column_usage(&schema).await
        } else {
            Ok(Vec::new())
        }
    };

    let (tables, views, columns, dependencies, key_columns) = tokio::try_join!(
        provider.fetch_tables(&schema),
        views,
        provider.fetch_columns(&schema),
        provider.fetch_foreign_key_dependencies(&schema),
        key_columns,
    )?;

    tracing::info!(
        event = "fetch_finished",
        schema = %schema,
        tables = tables.len(),
        views = views.len(),
        columns = columns.len(),
        dependencies = dependencies.len(),
        key_columns = key_columns.len(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(MetadataSnapshot {
        schema,
        tables,
        views,
        columns,
        dependencies,
        key_columns,
    })
}

/// Fetch a snapshot and run one generation pass over it.
pub async fn plan_schema<P>(
    provider: &P,
    snapshot_opts: &SnapshotOptions,
    generate_opts: &GenerateOptions,
) -> Result<(MetadataSnapshot, SchemaPlan)>
where
    P: SchemaInfoProvider + ?Sized,
{
    let snapshot = fetch_snapshot(provider, snapshot_opts).await?;
    let plan = generate(&snapshot, generate_opts)?;

    tracing::info!(
        event = "plan_generated",
        schema = %snapshot.schema,
        tables = plan.order.len(),
        edges = plan.graph.edge_count()
    );

    Ok((snapshot, plan))
}
