use ddlgraph_core::{
    generate, ColumnDefault, ColumnRow, Error, ForeignKeyDependency, GenerateOptions,
    MetadataSnapshot, TableName, TableRow,
};

fn name(table: &str) -> TableName {
    TableName::new("blog", table)
}

fn column(
    table: &str,
    ordinal: u32,
    column: &str,
    declared_type: &str,
    data_type: &str,
    nullable: bool,
    default: ColumnDefault,
) -> ColumnRow {
    ColumnRow {
        table: name(table),
        name: column.to_string(),
        declared_type: declared_type.to_string(),
        data_type: data_type.to_string(),
        nullable,
        default,
        extra: String::new(),
        ordinal_position: ordinal,
    }
}

fn dependency(from: &str, to: &str, rule: &str) -> ForeignKeyDependency {
    ForeignKeyDependency {
        from_table: name(from),
        to_table: name(to),
        constraint_name: Some(format!("{from}_{to}_fk")),
        delete_rule: Some(rule.to_string()),
        update_rule: Some(rule.to_string()),
    }
}

fn blog_fixture() -> MetadataSnapshot {
    let mut snapshot = MetadataSnapshot::new("blog");
    snapshot.tables = ["users", "posts", "comments"]
        .into_iter()
        .map(|table| TableRow { name: name(table) })
        .collect();

    let mut id = column("users", 1, "id", "int(11)", "int", false, ColumnDefault::Absent);
    id.extra = "auto_increment".to_string();
    snapshot.columns = vec![
        id,
        column(
            "users",
            2,
            "status",
            "varchar(16)",
            "varchar",
            false,
            ColumnDefault::Value("active".to_string()),
        ),
        column("posts", 2, "users_id", "int(11)", "int", false, ColumnDefault::Absent),
        column("posts", 1, "id", "int(11)", "int", false, ColumnDefault::Absent),
        column(
            "posts",
            3,
            "retries",
            "int(11)",
            "int",
            false,
            ColumnDefault::Value("0".to_string()),
        ),
        column("comments", 1, "id", "int(11)", "int", false, ColumnDefault::Absent),
        column("comments", 2, "posts_id", "int(11)", "int", true, ColumnDefault::Absent),
    ];
    snapshot.dependencies = vec![
        dependency("comments", "posts", "CASCADE"),
        dependency("posts", "users", "cascade"),
    ];
    snapshot
}

#[test]
fn orders_blog_schema() {
    let plan = generate(&blog_fixture(), &GenerateOptions::default()).expect("generate");
    let statements = plan.statements;

    assert_eq!(
        statements.creates,
        vec![
            "CREATE TABLE users (id int(11) NOT NULL auto_increment, status varchar(16) NOT NULL DEFAULT 'active');",
            "CREATE TABLE posts (id int(11) NOT NULL, users_id int(11) NOT NULL, retries int(11) NOT NULL DEFAULT 0);",
            "CREATE TABLE comments (id int(11) NOT NULL, posts_id int(11) NULL);",
        ]
    );
    assert_eq!(
        statements.drops,
        vec![
            "DROP TABLE IF EXISTS comments;",
            "DROP TABLE IF EXISTS posts;",
            "DROP TABLE IF EXISTS users;",
        ]
    );
    assert_eq!(
        statements.fks,
        vec![
            "ALTER TABLE comments ADD CONSTRAINT comments__fk__posts_id FOREIGN KEY (posts_id) REFERENCES posts (id) ON DELETE CASCADE ON UPDATE CASCADE;",
            "ALTER TABLE posts ADD CONSTRAINT posts__fk__users_id FOREIGN KEY (users_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE;",
        ]
    );
}

#[test]
fn drops_reverse_creates_and_fks_match_edges() {
    let plan = generate(&blog_fixture(), &GenerateOptions::default()).unwrap();

    let created: Vec<&str> = plan.order.iter().map(|t| t.name.as_str()).collect();
    let dropped: Vec<String> = plan
        .statements
        .drops
        .iter()
        .map(|stmt| {
            stmt.trim_start_matches("DROP TABLE IF EXISTS ")
                .trim_end_matches(';')
                .to_string()
        })
        .collect();
    let mut reversed = created.clone();
    reversed.reverse();
    assert_eq!(dropped, reversed);
    assert_eq!(plan.statements.fks.len(), plan.graph.edge_count());
}

#[test]
fn every_edge_target_is_created_first() {
    let mut snapshot = MetadataSnapshot::new("blog");
    let tables = ["tags", "post_tags", "comments", "posts", "users", "audit"];
    snapshot.tables = tables
        .into_iter()
        .map(|table| TableRow { name: name(table) })
        .collect();
    snapshot.dependencies = vec![
        dependency("comments", "posts", "CASCADE"),
        dependency("comments", "users", "SET NULL"),
        dependency("post_tags", "posts", "CASCADE"),
        dependency("post_tags", "tags", "CASCADE"),
        dependency("posts", "users", "RESTRICT"),
    ];

    let plan = generate(&snapshot, &GenerateOptions::default()).unwrap();
    let position = |table: &TableName| plan.order.iter().position(|t| t == table).unwrap();
    for edge in plan.graph.edges() {
        assert!(
            position(&edge.to) < position(&edge.from),
            "{} must precede {}",
            edge.to,
            edge.from
        );
    }
    let order: Vec<&str> = plan.order.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        order,
        vec!["tags", "users", "posts", "post_tags", "comments", "audit"]
    );
}

#[test]
fn generation_is_deterministic() {
    let first = generate(&blog_fixture(), &GenerateOptions::default()).unwrap();
    let second = generate(&blog_fixture(), &GenerateOptions::default()).unwrap();
    assert_eq!(first.statements, second.statements);
    assert_eq!(first.statements.to_script(), second.statements.to_script());
}

#[test]
fn cycle_fails_without_partial_output() {
    let mut snapshot = MetadataSnapshot::new("blog");
    snapshot.tables = vec![TableRow { name: name("a") }, TableRow { name: name("b") }];
    snapshot.dependencies = vec![dependency("a", "b", "CASCADE"), dependency("b", "a", "CASCADE")];

    match generate(&snapshot, &GenerateOptions::default()) {
        Err(Error::CyclicDependency { tables }) => {
            assert_eq!(tables, vec!["blog.a", "blog.b"]);
        }
        other => panic!("expected cyclic dependency, got {other:?}"),
    }
}

#[test]
fn unknown_rules_become_no_action() {
    let mut snapshot = blog_fixture();
    snapshot.dependencies = vec![
        dependency("comments", "posts", "SET DEFAULT"),
        ForeignKeyDependency {
            delete_rule: None,
            update_rule: Some("bogus".to_string()),
            ..dependency("posts", "users", "CASCADE")
        },
    ];

    let plan = generate(&snapshot, &GenerateOptions::default()).unwrap();
    for statement in &plan.statements.fks {
        assert!(statement.ends_with("ON DELETE NO ACTION ON UPDATE NO ACTION;"), "{statement}");
    }
}

#[test]
fn dangling_dependency_aborts_generation() {
    let mut snapshot = blog_fixture();
    snapshot
        .dependencies
        .push(dependency("comments", "reactions", "CASCADE"));

    let err = generate(&snapshot, &GenerateOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "dangling foreign key: blog.comments references unknown table blog.reactions"
    );
}
