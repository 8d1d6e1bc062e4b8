//! Statement logging.
//!
//! [`TracingExecutor`] wraps any [`Executor`](crate::Executor) and emits one
//! `tracing` event per statement, on target `myorm.sql`, before it runs.
//!
//! ```ignore
//! use myorm::monitor::TracingExecutor;
//!
//! let conn = TracingExecutor::new(conn).level(tracing::Level::INFO);
//! myorm::table("users").where_eq("id", 1).one(&conn)?;
//! ```

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other SQL (e.g., DDL, custom)
    Other,
}

impl QueryType {
    /// Detect query type from the leading keyword of a statement.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = sql.trim_start().trim_start_matches('(').trim_start();
        [
            ("SELECT", QueryType::Select),
            ("INSERT", QueryType::Insert),
            ("UPDATE", QueryType::Update),
            ("DELETE", QueryType::Delete),
        ]
        .into_iter()
        .find(|(keyword, _)| starts_with_keyword(trimmed, keyword))
        .map_or(QueryType::Other, |(_, ty)| ty)
    }
}

#[cfg(feature = "tracing")]
pub use self::tracing_executor::TracingExecutor;

#[cfg(feature = "tracing")]
mod tracing_executor {
    use super::{QueryType, truncate_sql_bytes};
    use crate::client::{Executor, FetchMode, QueryOutput};
    use crate::error::OrmResult;
    use crate::value::Value;
    use tracing::Level;

    /// An [`Executor`] wrapper that logs every statement through `tracing`.
    #[derive(Debug, Clone)]
    pub struct TracingExecutor<E> {
        inner: E,
        /// Tracing event level to emit at.
        pub level: Level,
        /// Truncate long SQL strings (in bytes). `None` means no truncation.
        pub max_sql_length: Option<usize>,
    }

    impl<E: Executor> TracingExecutor<E> {
        pub fn new(inner: E) -> Self {
            Self {
                inner,
                level: Level::DEBUG,
                max_sql_length: Some(200),
            }
        }

        /// Override the tracing event level.
        pub fn level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Set maximum SQL length to display.
        pub fn max_sql_length(mut self, len: usize) -> Self {
            self.max_sql_length = Some(len);
            self
        }

        /// Disable SQL truncation.
        pub fn no_truncate(mut self) -> Self {
            self.max_sql_length = None;
            self
        }

        pub fn inner(&self) -> &E {
            &self.inner
        }

        pub fn into_inner(self) -> E {
            self.inner
        }

        fn truncate_sql(&self, sql: &str) -> String {
            match self.max_sql_length {
                Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
                _ => sql.to_string(),
            }
        }

        fn emit(&self, sql: &str, param_count: usize, mode: FetchMode) {
            /// Dispatch a tracing event at a runtime-determined level.
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let query_type = QueryType::from_sql(sql);
            let sql = self.truncate_sql(sql);
            emit_at_level!(
                self.level,
                target: "myorm.sql",
                query_type = ?query_type,
                mode = mode.as_str(),
                param_count,
                sql = %sql,
            );
        }
    }

    impl<E: Executor> Executor for TracingExecutor<E> {
        fn run(&self, sql: &str, params: &[Value], mode: FetchMode) -> OrmResult<QueryOutput> {
            self.emit(sql, params.len(), mode);
            self.inner.run(sql, params, mode).inspect_err(|err| {
                tracing::warn!(
                    target: "myorm.sql",
                    mode = mode.as_str(),
                    error = %err,
                    "statement failed"
                );
            })
        }

        fn last_insert_id(&self) -> OrmResult<Option<u64>> {
            self.inner.last_insert_id()
        }
    }
}
