//! # myorm
//!
//! A fluent MySQL statement builder with a declarative model layer.
//!
//! ## Features
//!
//! - **Parameterized output**: every builder renders one SQL string plus the
//!   ordered values for its `?` placeholders
//! - **Backtick escaping**: identifiers are quoted, expressions pass through
//! - **Nested conditions**: AND/OR groups via callbacks, BETWEEN/IN/LIKE/NULL
//! - **Models**: declared fields, custom fields, named joins and filters,
//!   resolved when the statement is built
//! - **Pluggable execution**: anything implementing [`Executor`] runs the
//!   statement, closures included
//! - **Statement logging**: [`monitor::TracingExecutor`] logs through `tracing`
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use myorm::prelude::*;
//!
//! // SELECT
//! let users = table("users")
//!     .where_eq("status", "active")
//!     .order_by_desc(["created_at"])
//!     .limit(10)
//!     .get_as::<User, _>(&conn)?;
//!
//! // INSERT
//! table("users")
//!     .insert([("name", "alice"), ("email", "alice@example.com")])
//!     .execute(&conn)?;
//! let id = conn.last_insert_id()?;
//!
//! // UPDATE
//! table("users")
//!     .update([("status", "inactive")])
//!     .where_eq("id", user_id)
//!     .execute(&conn)?;
//! ```
//!
//! ## Models
//!
//! ```ignore
//! use myorm::prelude::*;
//!
//! let mut registry = ModelRegistry::new();
//! registry.register(Model::new("users").alias("u").fields(["id", "name"]));
//!
//! let sql = registry.query("u")?.sql()?;
//! assert_eq!(sql, "SELECT `u`.`id` as `id`, `u`.`name` as `name` FROM `users` as `u`");
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod escape;
pub mod model;
pub mod monitor;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod value;

pub use client::{Executor, FetchMode, QueryOutput, Row};
pub use condition::{BoolOp, Comparison, ConditionList, ConditionToken, Conditions, ValueMode};
pub use config::BuilderConfig;
pub use error::{OrmError, OrmResult};
pub use escape::{escape_field, escape_table, escape_table_name};
pub use model::{AliasFields, DefaultSet, Model, ModelQuery, ModelRegistry, Selection};
pub use monitor::QueryType;
pub use qb::{BuildQuery, BuiltQuery, Clauses, Query, raw, table};
pub use row::{FromRow, RowExt};
pub use value::{ParamKind, Value};

#[cfg(feature = "tracing")]
pub use monitor::TracingExecutor;
