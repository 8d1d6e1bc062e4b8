//! Statement builder for MySQL.
//!
//! A [`Query`] accumulates clauses into a [`Statement`] and renders one SQL
//! string plus the ordered values for its `?` placeholders.
//!
//! # Usage
//!
//! ```ignore
//! use myorm::prelude::*;
//!
//! // SELECT
//! let users = table("users")
//!     .where_eq("status", "active")
//!     .where_in("role", ["admin", "editor"])
//!     .order_by_desc(["created_at"])
//!     .limit(20)
//!     .get(&conn)?;
//!
//! // INSERT
//! table("users")
//!     .insert([("name", Value::from("alice")), ("age", Value::from(30))])
//!     .execute(&conn)?;
//!
//! // UPDATE: assignment values bind before WHERE values
//! table("users")
//!     .where_eq("id", 7)
//!     .update([("status", "inactive")])
//!     .execute(&conn)?;
//!
//! // DELETE
//! table("users").where_eq("id", 7).delete().execute(&conn)?;
//!
//! // raw
//! raw("SELECT NOW() as now").one(&conn)?;
//! ```

mod clauses;
mod query;
mod statement;
mod traits;

pub use clauses::Clauses;
pub use query::Query;
pub use statement::{Clause, JoinClause, JoinKind, Limit, Statement, StatementKind};
pub use traits::{BuildQuery, BuiltQuery};

/// Create a builder over `table`.
///
/// # Example
/// ```ignore
/// let sql = myorm::table("users as u").where_eq("u.id", 1).sql()?;
/// assert_eq!(sql, "SELECT * FROM `users` as `u` WHERE `u`.`id` = ?");
/// ```
pub fn table(table: &str) -> Query {
    Query::new(table)
}

/// Create a builder that renders `sql` verbatim.
pub fn raw(sql: impl Into<String>) -> Query {
    Query::from_raw(sql)
}

#[cfg(test)]
mod tests;
