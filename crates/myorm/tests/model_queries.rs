mod common;

use common::{RecordingExecutor, row};
use myorm::prelude::*;
use serde::Deserialize;
use serde_json::json;

fn blog() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register(
            Model::new("users")
                .alias("u")
                .fields(["id", "name", "email"]),
        )
        .register(
            Model::new("comments")
                .alias("c")
                .fields(["id", "post_id", "body"]),
        )
        .register(
            Model::new("posts")
                .alias("p")
                .fields(["id", "title", "status", "user_id"])
                .custom_field(
                    "comment_count",
                    "(SELECT COUNT(*) FROM comments cc WHERE cc.post_id = p.id)",
                )
                .join("author", |q| {
                    q.left_join("u", "u.id", "=", "p.user_id");
                })
                .join("active_author", |q| {
                    q.inner_join_on("users as au", |c| {
                        c.on("au.id", "=", "p.user_id").eq("au.banned", 0);
                    });
                })
                .filter("published", |q| {
                    q.where_eq("p.status", "published");
                })
                .filter("recent", |q| {
                    q.where_op("p.created_at", ">", "2024-01-01");
                })
                .default_joins(DefaultSet::Only(vec!["author".into()]))
                .default_filters(DefaultSet::None),
        );
    registry
}

#[derive(Debug, Deserialize)]
struct PostWithAuthor {
    id: i64,
    title: String,
    #[serde(rename = "u.name")]
    author: String,
}

#[test]
fn model_get_renders_resolved_statement() {
    let registry = blog();
    let conn = RecordingExecutor::with_rows(vec![row(json!({
        "id": 1,
        "title": "Hello",
        "u.name": "alice",
    }))]);

    let posts: Vec<PostWithAuthor> = registry
        .query("p")
        .unwrap()
        .select(["id", "title", "u.name"])
        .where_eq("p.id", 1)
        .get_as(&conn)
        .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[0].title, "Hello");
    assert_eq!(posts[0].author, "alice");

    let call = conn.last_call();
    assert_eq!(
        call.sql,
        "SELECT `p`.`id` as `id`, `p`.`title` as `title`, `u`.`name` as `u.name` \
         FROM `posts` as `p` LEFT JOIN `users` as `u` ON (`u`.`id` = `p`.`user_id`) \
         WHERE `p`.`id` = ?"
    );
    assert_eq!(call.params, vec![Value::Int(1)]);
}

#[test]
fn named_join_values_bind_before_filter_values() {
    let registry = blog();
    let mut q = registry.query("p").unwrap();
    q.with_joins(["active_author"])
        .with_filters(["published", "recent"])
        .select(["id"])
        .order_by_desc(["p.id"])
        .limit_offset(10, 20);

    let built = q.build().unwrap();
    assert_eq!(
        built.sql,
        "SELECT `p`.`id` as `id` FROM `posts` as `p` \
         INNER JOIN `users` as `au` ON (`au`.`id` = `p`.`user_id` AND `au`.`banned` = ?) \
         WHERE `p`.`status` = ? AND `p`.`created_at` > ? \
         ORDER BY `p`.`id` DESC LIMIT 20, 10"
    );
    assert_eq!(
        built.params,
        vec![
            Value::Int(0),
            Value::from("published"),
            Value::from("2024-01-01"),
        ]
    );
    assert_eq!(built.placeholder_count(), built.params.len());
}

#[test]
fn where_groups_work_inside_model_queries() {
    let registry = blog();
    let sql = registry
        .query("c")
        .unwrap()
        .where_group(|c| {
            c.like("body", "%rust%").or_like("body", "%sql%");
        })
        .where_not_null("post_id")
        .sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT `c`.`id` as `id`, `c`.`post_id` as `post_id`, `c`.`body` as `body` \
         FROM `comments` as `c` WHERE (`body` LIKE ? OR `body` LIKE ?) AND `post_id` IS NOT NULL"
    );
}

#[test]
fn joined_models_add_their_default_fields() {
    let registry = blog();
    let sql = registry
        .query("p")
        .unwrap()
        .clear_joins()
        .left_join("c", "c.post_id", "=", "p.id")
        .sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT `p`.`id` as `id`, `p`.`title` as `title`, `p`.`status` as `status`, \
         `p`.`user_id` as `user_id`, \
         (SELECT COUNT(*) FROM comments cc WHERE cc.post_id = p.id) as `comment_count`, \
         `c`.`id` as `c.id`, `c`.`post_id` as `c.post_id`, `c`.`body` as `c.body` \
         FROM `posts` as `p` LEFT JOIN `comments` as `c` ON (`c`.`post_id` = `p`.`id`)"
    );
}

#[test]
fn mass_writes_execute_with_declared_fields_only() {
    let registry = blog();
    let conn = RecordingExecutor::new().with_affected(1);

    let form = [
        ("title", Value::from("Draft")),
        ("status", Value::from("")),
        ("csrf_token", Value::from("abc")),
    ];
    registry
        .query("p")
        .unwrap()
        .mass_insert(form.clone())
        .execute(&conn)
        .unwrap();
    let call = conn.last_call();
    assert_eq!(call.sql, "INSERT INTO `posts` (`title`, `status`) VALUES (?, ?)");
    assert_eq!(call.params, vec![Value::from("Draft"), Value::Null]);

    registry
        .query("p")
        .unwrap()
        .mass_update(form)
        .where_eq("p.id", 5)
        .execute(&conn)
        .unwrap();
    let call = conn.last_call();
    assert_eq!(
        call.sql,
        "UPDATE `posts` as `p` SET `title` = ?, `status` = ? WHERE `p`.`id` = ?"
    );
    assert_eq!(
        call.params,
        vec![Value::from("Draft"), Value::Null, Value::Int(5)]
    );
}

#[test]
fn model_delete() {
    let registry = blog();
    let conn = RecordingExecutor::new().with_affected(2);

    let affected = registry
        .query("c")
        .unwrap()
        .where_eq("post_id", 3)
        .delete()
        .execute(&conn)
        .unwrap();

    assert_eq!(affected, 2);
    assert_eq!(
        conn.last_call().sql,
        "DELETE FROM `comments` as `c` WHERE `post_id` = ?"
    );
}

#[test]
fn one_or_fail_on_model_query() {
    let registry = blog();
    let conn = RecordingExecutor::new();
    let err = registry
        .query("u")
        .unwrap()
        .where_eq("u.email", "nobody@example.com")
        .one_or_fail(&conn)
        .unwrap_err();
    assert!(err.is_not_found());
}
