//! Trait definitions for query builders.

use crate::client::{Executor, Row};
use crate::error::{OrmError, OrmResult};
use crate::escape::count_placeholders;
use crate::row::FromRow;
use crate::value::{ParamKind, Value};

/// A rendered statement: SQL text plus the values for its `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Binding type of every parameter, in placeholder order.
    pub fn param_kinds(&self) -> Vec<ParamKind> {
        self.params.iter().map(Value::kind).collect()
    }

    /// Number of `?` placeholders outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }
}

/// Rendering and execution entry points shared by every builder.
///
/// Implementors only provide [`BuildQuery::build`]; everything else renders
/// through it and hands the result to an [`Executor`].
pub trait BuildQuery {
    /// Render the statement. Calling this never changes the builder.
    fn build(&self) -> OrmResult<BuiltQuery>;

    /// Rendered SQL text.
    fn sql(&self) -> OrmResult<String> {
        Ok(self.build()?.sql)
    }

    /// Fetch every row.
    fn get<E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Vec<Row>> {
        let query = self.build()?;
        conn.query(&query.sql, &query.params)
    }

    /// Fetch the first row, if any.
    fn one<E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Option<Row>> {
        let query = self.build()?;
        conn.query_opt(&query.sql, &query.params)
    }

    /// Fetch every row; an empty result is [`OrmError::NotFound`].
    fn get_or_fail<E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Vec<Row>> {
        let rows = self.get(conn)?;
        if rows.is_empty() {
            return Err(OrmError::not_found("query returned no rows"));
        }
        Ok(rows)
    }

    /// Fetch the first row; no row is [`OrmError::NotFound`].
    fn one_or_fail<E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Row> {
        self.one(conn)?
            .ok_or_else(|| OrmError::not_found("query returned no rows"))
    }

    /// Run the statement and return the number of affected rows.
    fn execute<E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<u64> {
        let query = self.build()?;
        conn.execute(&query.sql, &query.params)
    }

    /// Fetch every row mapped to `T`.
    fn get_as<T: FromRow, E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Vec<T>> {
        self.get(conn)?.iter().map(T::from_row).collect()
    }

    /// Fetch the first row mapped to `T`, if any.
    fn one_as<T: FromRow, E: Executor + ?Sized>(&self, conn: &E) -> OrmResult<Option<T>> {
        self.one(conn)?.as_ref().map(T::from_row).transpose()
    }
}
