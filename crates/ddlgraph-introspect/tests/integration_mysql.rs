use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use ddlgraph_core::{ColumnDefault, GenerateOptions, TableName};
use ddlgraph_introspect::{plan_schema, MySqlProvider, SnapshotOptions};

const FIXTURE: &[&str] = &[
    "DROP TABLE IF EXISTS ddlgraph_it_comments",
    "DROP TABLE IF EXISTS ddlgraph_it_posts",
    "DROP TABLE IF EXISTS ddlgraph_it_users",
    "CREATE TABLE ddlgraph_it_users (
        id INT NOT NULL PRIMARY KEY,
        nick VARCHAR(32) NOT NULL DEFAULT 'guest',
        karma DECIMAL(6,2) DEFAULT 1.50
    ) ENGINE=InnoDB",
    "CREATE TABLE ddlgraph_it_posts (
        id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        author_id INT NULL,
        CONSTRAINT posts_author FOREIGN KEY (author_id)
            REFERENCES ddlgraph_it_users (id) ON DELETE SET NULL ON UPDATE CASCADE
    ) ENGINE=InnoDB",
    "CREATE TABLE ddlgraph_it_comments (
        id INT NOT NULL PRIMARY KEY,
        post_id INT NOT NULL,
        CONSTRAINT comments_post FOREIGN KEY (post_id)
            REFERENCES ddlgraph_it_posts (id) ON DELETE CASCADE
    ) ENGINE=InnoDB",
];

const TEARDOWN: &[&str] = &[
    "DROP TABLE IF EXISTS ddlgraph_it_comments",
    "DROP TABLE IF EXISTS ddlgraph_it_posts",
    "DROP TABLE IF EXISTS ddlgraph_it_users",
];

async fn run(pool: &MySqlPool, statements: &[&str]) -> Result<()> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("executing fixture statement {statement}"))?;
    }
    Ok(())
}

#[tokio::test]
async fn plans_mysql_schema() -> Result<()> {
    let Ok(db_url) = env::var("TEST_MYSQL_URL") else {
        eprintln!("skipping: TEST_MYSQL_URL not set");
        return Ok(());
    };
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&db_url)
        .await
        .context("connecting to TEST_MYSQL_URL")?;
    run(&pool, FIXTURE).await?;

    let provider = MySqlProvider::new(pool.clone());
    let (snapshot, plan) = plan_schema(
        &provider,
        &SnapshotOptions::default(),
        &GenerateOptions::default(),
    )
    .await?;

    let table = |name: &str| TableName::new(snapshot.schema.clone(), name);
    let position = |name: &str| plan.order.iter().position(|t| *t == table(name));
    let users = position("ddlgraph_it_users").context("users ordered")?;
    let posts = position("ddlgraph_it_posts").context("posts ordered")?;
    let comments = position("ddlgraph_it_comments").context("comments ordered")?;
    assert!(users < posts && posts < comments);

    let nick = snapshot
        .columns
        .iter()
        .find(|col| col.table == table("ddlgraph_it_users") && col.name == "nick")
        .context("users.nick column")?;
    assert_eq!(nick.default, ColumnDefault::Value("guest".to_string()));

    let users_create = plan
        .statements
        .creates
        .iter()
        .find(|stmt| stmt.starts_with("CREATE TABLE ddlgraph_it_users ("))
        .context("users create statement")?;
    assert!(users_create.contains("nick varchar(32) NOT NULL DEFAULT 'guest'"));
    assert!(users_create.contains("karma decimal(6,2) NULL DEFAULT 1.5"));
    assert!(plan.statements.fks.contains(
        &"ALTER TABLE ddlgraph_it_posts ADD CONSTRAINT ddlgraph_it_posts__fk__ddlgraph_it_users_id \
          FOREIGN KEY (author_id) REFERENCES ddlgraph_it_users (id) ON DELETE SET NULL ON UPDATE CASCADE;"
            .to_string()
    ));

    run(&pool, TEARDOWN).await?;
    Ok(())
}
