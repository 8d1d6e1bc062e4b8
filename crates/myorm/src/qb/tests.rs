//! Tests for the qb module.

use crate::config::BuilderConfig;
use crate::error::OrmError;
use crate::qb::{BuildQuery, Clauses, Query, raw, table};
use crate::value::{ParamKind, Value};

#[test]
fn test_select_basic() {
    assert_eq!(table("users").sql().unwrap(), "SELECT * FROM `users`");
}

#[test]
fn test_select_fields_and_alias() {
    let sql = table("users as u")
        .select(["u.id", "u.name as author", "COUNT(*) as total"])
        .sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `u`.`id`, `u`.`name` as author, COUNT(*) as total FROM `users` as `u`"
    );
}

#[test]
fn test_where_chain_operators() {
    let built = table("users")
        .where_eq("status", "active")
        .where_op("age", ">", 18)
        .or_where_null("deleted_at")
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM `users` WHERE `status` = ? AND `age` > ? OR `deleted_at` IS NULL"
    );
    assert_eq!(built.params, vec![Value::from("active"), Value::Int(18)]);
}

#[test]
fn test_where_in_placeholders() {
    let built = table("t").where_in("x", [1, 2, 3]).build().unwrap();
    assert_eq!(built.sql, "SELECT * FROM `t` WHERE `x` IN (?, ?, ?)");
    assert_eq!(built.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_where_group_nesting() {
    let built = table("users")
        .where_eq("status", "active")
        .where_group(|c| {
            c.eq("role", "admin").or_group(|c| {
                c.eq("role", "editor").not_in("team", [3, 4]);
            });
        })
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM `users` WHERE `status` = ? AND (`role` = ? OR (`role` = ? AND `team` NOT IN (?, ?)))"
    );
    assert_eq!(built.params.len(), 5);
}

#[test]
fn test_where_between_like_raw() {
    let built = table("events")
        .where_between("day", "2024-01-01", "2024-01-31")
        .or_where_like("title", "%launch%")
        .where_raw("FIND_IN_SET(?, tags)", ["release"])
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM `events` WHERE `day` BETWEEN ? AND ? OR `title` LIKE ? AND (FIND_IN_SET(?, tags))"
    );
    assert_eq!(built.params.len(), 4);
    assert_eq!(built.placeholder_count(), built.params.len());
}

#[test]
fn test_where_raw_with_quoted_question_mark() {
    let built = table("notes")
        .where_raw("note <> '?' AND id = ?", [7])
        .build()
        .unwrap();

    assert_eq!(built.sql, "SELECT * FROM `notes` WHERE (note <> '?' AND id = ?)");
    assert_eq!(built.params, vec![Value::Int(7)]);
    assert_eq!(built.placeholder_count(), 1);
}

#[test]
fn test_insert_basic() {
    let built = table("t")
        .insert([("name", Value::from("bob")), ("age", Value::from(5))])
        .build()
        .unwrap();

    assert_eq!(built.sql, "INSERT INTO `t` (`name`, `age`) VALUES (?, ?)");
    assert_eq!(built.params, vec![Value::from("bob"), Value::Int(5)]);
}

#[test]
fn test_insert_uses_bare_table_name() {
    let sql = table("users as u").insert([("name", "x")]).sql().unwrap();
    assert_eq!(sql, "INSERT INTO `users` (`name`) VALUES (?)");
}

#[test]
fn test_insert_keys_stay_unique() {
    let built = table("t")
        .insert([("a", 1), ("b", 2)])
        .insert([("a", 3)])
        .build()
        .unwrap();

    assert_eq!(built.sql, "INSERT INTO `t` (`a`, `b`) VALUES (?, ?)");
    assert_eq!(built.params, vec![Value::Int(3), Value::Int(2)]);
}

#[test]
fn test_insert_blank_becomes_null() {
    let built = table("t")
        .insert([("note", ""), ("title", "  ")])
        .build()
        .unwrap();
    assert_eq!(built.params, vec![Value::Null, Value::Null]);

    let built = Query::with_config("t", BuilderConfig::new().blank_as_null(false))
        .insert([("note", "")])
        .build()
        .unwrap();
    assert_eq!(built.params, vec![Value::from("")]);
}

#[test]
fn test_update_params_precede_where_params() {
    let built = table("t")
        .where_eq("id", 1)
        .update([("name", "x")])
        .build()
        .unwrap();

    assert_eq!(built.sql, "UPDATE `t` SET `name` = ? WHERE `id` = ?");
    assert_eq!(built.params, vec![Value::from("x"), Value::Int(1)]);
}

#[test]
fn test_update_blank_becomes_null() {
    let built = table("t")
        .update([("name", " ")])
        .where_eq("id", 2)
        .build()
        .unwrap();
    assert_eq!(built.params, vec![Value::Null, Value::Int(2)]);
}

#[test]
fn test_delete() {
    let built = table("users")
        .where_eq("id", 7)
        .order_by(["id"])
        .limit_offset(1, 5)
        .delete()
        .build()
        .unwrap();

    assert_eq!(built.sql, "DELETE FROM `users` WHERE `id` = ? ORDER BY `id` LIMIT 1");
    assert_eq!(built.params, vec![Value::Int(7)]);
}

#[test]
fn test_sql_is_idempotent() {
    let mut q = table("users");
    q.where_eq("a", 1).where_in("b", ["x", "y"]).limit(3);

    let first = q.build().unwrap();
    let second = q.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(q.sql().unwrap(), q.sql().unwrap());
}

#[test]
fn test_raw_statement() {
    let built = raw("SELECT * FROM t WHERE id = ?").params([3]).build().unwrap();
    assert_eq!(built.sql, "SELECT * FROM t WHERE id = ?");
    assert_eq!(built.params, vec![Value::Int(3)]);
}

#[test]
fn test_raw_override_ignores_clauses_but_keeps_values() {
    let built = table("users")
        .select(["id"])
        .where_eq("id", 4)
        .order_by(["id"])
        .raw("SELECT name FROM users WHERE id = ?")
        .build()
        .unwrap();

    assert_eq!(built.sql, "SELECT name FROM users WHERE id = ?");
    assert_eq!(built.params, vec![Value::Int(4)]);
}

#[test]
fn test_select_distinct() {
    let sql = table("users").select_distinct(["country"]).sql().unwrap();
    assert_eq!(sql, "SELECT DISTINCT `country` FROM `users`");
}

#[test]
fn test_order_and_limit() {
    let sql = table("posts")
        .order_by_desc(["created_at", "id"])
        .limit(10)
        .sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `posts` ORDER BY `created_at` DESC, `id` DESC LIMIT 10");

    let sql = table("posts").limit_offset(10, 0).sql().unwrap();
    assert_eq!(sql, "SELECT * FROM `posts` LIMIT 0, 10");
}

#[test]
fn test_join_on_columns() {
    let sql = table("posts as p")
        .select(["p.id", "u.name as author"])
        .left_join("users as u", "u.id", "=", "p.user_id")
        .where_eq("p.status", "published")
        .sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT `p`.`id`, `u`.`name` as author FROM `posts` as `p` \
         LEFT JOIN `users` as `u` ON (`u`.`id` = `p`.`user_id`) WHERE `p`.`status` = ?"
    );
}

#[test]
fn test_join_values_bind_before_where_values() {
    let built = table("posts as p")
        .where_eq("p.id", 9)
        .inner_join_on("users as u", |c| {
            c.on("u.id", "=", "p.user_id").eq("u.active", 1);
        })
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM `posts` as `p` INNER JOIN `users` as `u` \
         ON (`u`.`id` = `p`.`user_id` AND `u`.`active` = ?) WHERE `p`.`id` = ?"
    );
    assert_eq!(built.params, vec![Value::Int(1), Value::Int(9)]);
}

#[test]
fn test_having_binds_by_default() {
    let built = table("orders")
        .select(["user_id", "COUNT(id) as total"])
        .where_eq("paid", true)
        .group_by(["user_id"])
        .having_op("COUNT(id)", ">", 5)
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT `user_id`, COUNT(id) as total FROM `orders` WHERE `paid` = ? \
         GROUP BY `user_id` HAVING COUNT(id) > ?"
    );
    assert_eq!(built.params, vec![Value::Bool(true), Value::Int(5)]);
}

#[test]
fn test_inline_clause_values() {
    let config = BuilderConfig::new().inline_clause_values(true);
    let built = Query::with_config("orders as o", config)
        .right_join_on("users as u", |c| {
            c.on("u.id", "=", "o.user_id").eq("u.kind", "vip");
        })
        .where_eq("o.paid", 1)
        .group_by(["o.user_id"])
        .having_op("SUM(o.total)", ">=", 100)
        .build()
        .unwrap();

    assert_eq!(
        built.sql,
        "SELECT * FROM `orders` as `o` RIGHT JOIN `users` as `u` \
         ON (`u`.`id` = `o`.`user_id` AND `u`.`kind` = 'vip') WHERE `o`.`paid` = ? \
         GROUP BY `o`.`user_id` HAVING SUM(o.total) >= 100"
    );
    assert_eq!(built.params, vec![Value::Int(1)]);
}

#[test]
fn test_param_kinds() {
    let built = table("t").where_eq("a", 1).where_eq("b", "x").build().unwrap();
    assert_eq!(built.param_kinds(), vec![ParamKind::Int, ParamKind::Str]);
}

#[test]
fn test_invalid_identifier_surfaces_on_build() {
    let err = table("db.users.id").build().unwrap_err();
    assert!(matches!(err, OrmError::InvalidIdentifier(_)));

    let err = table("t").where_eq("a.b.c", 1).build().unwrap_err();
    assert!(matches!(err, OrmError::InvalidIdentifier(_)));
}

#[test]
fn test_validation_errors() {
    let err = table("t").where_in("id", Vec::<i64>::new()).build().unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));

    let err = table("t")
        .insert(Vec::<(&str, Value)>::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));

    let err = table("t")
        .left_join_on("u", |_| {})
        .build()
        .unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
}
