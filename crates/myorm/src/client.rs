//! Execution bridge between built statements and a database connection.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// One result row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// What the caller expects back from a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Run the statement and report affected rows.
    Execute,
    /// Fetch at most one row.
    FetchOne,
    /// Fetch every row.
    FetchMany,
}

impl FetchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchMode::Execute => "execute",
            FetchMode::FetchOne => "fetch_one",
            FetchMode::FetchMany => "fetch_many",
        }
    }
}

/// Result shape returned by an [`Executor`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Affected(u64),
    Row(Option<Row>),
    Rows(Vec<Row>),
}

impl QueryOutput {
    fn shape(&self) -> &'static str {
        match self {
            QueryOutput::Affected(_) => "affected",
            QueryOutput::Row(_) => "row",
            QueryOutput::Rows(_) => "rows",
        }
    }
}

/// A connection that can run parameterized MySQL statements.
///
/// Implementors bind `params` positionally to the `?` placeholders in `sql`.
/// Drivers that need explicit typing can use [`Value::kind`].
///
/// Closures with the signature of [`Executor::run`] implement the trait, which
/// keeps tests and small adapters short:
///
/// ```ignore
/// let exec = |sql: &str, params: &[Value], mode: FetchMode| -> OrmResult<QueryOutput> {
///     println!("{sql} {params:?}");
///     Ok(QueryOutput::Rows(vec![]))
/// };
/// ```
pub trait Executor {
    /// Run a statement in the given mode.
    fn run(&self, sql: &str, params: &[Value], mode: FetchMode) -> OrmResult<QueryOutput>;

    /// Run a statement and return all rows.
    fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        match self.run(sql, params, FetchMode::FetchMany)? {
            QueryOutput::Rows(rows) => Ok(rows),
            QueryOutput::Row(row) => Ok(row.into_iter().collect()),
            other => Err(OrmError::UnexpectedOutput {
                expected: "rows",
                got: other.shape(),
            }),
        }
    }

    /// Run a statement and return the first row, if any.
    fn query_opt(&self, sql: &str, params: &[Value]) -> OrmResult<Option<Row>> {
        match self.run(sql, params, FetchMode::FetchOne)? {
            QueryOutput::Row(row) => Ok(row),
            QueryOutput::Rows(rows) => Ok(rows.into_iter().next()),
            other => Err(OrmError::UnexpectedOutput {
                expected: "row",
                got: other.shape(),
            }),
        }
    }

    /// Run a statement and return the first row.
    ///
    /// Returns [`OrmError::NotFound`] when no row comes back.
    fn query_one(&self, sql: &str, params: &[Value]) -> OrmResult<Row> {
        self.query_opt(sql, params)?
            .ok_or_else(|| OrmError::not_found("query returned no rows"))
    }

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        match self.run(sql, params, FetchMode::Execute)? {
            QueryOutput::Affected(n) => Ok(n),
            other => Err(OrmError::UnexpectedOutput {
                expected: "affected",
                got: other.shape(),
            }),
        }
    }

    /// Identifier generated by the last INSERT on this connection.
    ///
    /// Connections that cannot report it return `Ok(None)`.
    fn last_insert_id(&self) -> OrmResult<Option<u64>> {
        Ok(None)
    }
}

impl<F> Executor for F
where
    F: Fn(&str, &[Value], FetchMode) -> OrmResult<QueryOutput>,
{
    fn run(&self, sql: &str, params: &[Value], mode: FetchMode) -> OrmResult<QueryOutput> {
        self(sql, params, mode)
    }
}
