//! Example: declaring models and running model-aware queries.
//!
//! Run with:
//!   cargo run --example model_query -p myorm
//!
//! The executor here is an in-memory stand-in that prints each statement and
//! answers with canned rows; a real application adapts its MySQL driver to
//! the `Executor` trait instead.

use myorm::prelude::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    id: i64,
    title: String,
    #[serde(rename = "u.name")]
    author: Option<String>,
}

fn registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register(Model::new("users").alias("u").fields(["id", "name"]))
        .register(
            Model::new("posts")
                .alias("p")
                .fields(["id", "title", "status", "user_id"])
                .join("author", |q| {
                    q.left_join("u", "u.id", "=", "p.user_id");
                })
                .filter("published", |q| {
                    q.where_eq("p.status", "published");
                }),
        );
    registry
}

fn executor(sql: &str, params: &[Value], mode: FetchMode) -> OrmResult<QueryOutput> {
    println!("[{}] {sql}", mode.as_str());
    println!("    params: {params:?}");

    let row = serde_json::json!({"id": 1, "title": "Hello, MySQL", "u.name": "alice"});
    let row = match row {
        serde_json::Value::Object(map) => map,
        _ => Row::new(),
    };
    Ok(match mode {
        FetchMode::Execute => QueryOutput::Affected(1),
        FetchMode::FetchOne => QueryOutput::Row(Some(row)),
        FetchMode::FetchMany => QueryOutput::Rows(vec![row]),
    })
}

fn main() -> OrmResult<()> {
    let registry = registry();
    let conn = TracingExecutor::new(executor);

    println!("=== default projection with named join and filter ===");
    let posts: Vec<Post> = registry
        .query("p")?
        .select(["id", "title", "u.name"])
        .where_like("p.title", "%MySQL%")
        .order_by_desc(["p.id"])
        .limit(10)
        .get_as(&conn)?;
    println!("    -> {posts:?}");

    println!("\n=== nested conditions ===");
    let sql = registry
        .query("p")?
        .clear_joins()
        .where_group(|c| {
            c.eq("p.user_id", 1).or_group(|c| {
                c.eq("p.user_id", 2).is_not_null("p.title");
            });
        })
        .sql()?;
    println!("{sql}");

    println!("\n=== mass update: undeclared keys are dropped ===");
    let affected = registry
        .query("p")?
        .mass_update([("title", "Renamed"), ("not_a_column", "ignored")])
        .where_eq("p.id", 1)
        .execute(&conn)?;
    println!("    -> {affected} row(s)");

    println!("\n=== plain table builder ===");
    table("audit_log")
        .insert([("action", Value::from("rename")), ("note", Value::from(""))])
        .execute(&conn)?;

    Ok(())
}
