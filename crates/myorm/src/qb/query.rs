//! Table-level statement builder.

use super::clauses::Clauses;
use super::statement::{Clause, JoinClause, JoinKind, Statement};
use super::traits::{BuildQuery, BuiltQuery};
use crate::condition::Conditions;
use crate::config::BuilderConfig;
use crate::error::OrmResult;

/// Statement builder over a plain table.
///
/// Starts as `SELECT * FROM <table>`; [`Clauses::insert`], [`Clauses::update`]
/// and [`Clauses::delete`] switch the statement kind.
#[derive(Debug, Clone)]
pub struct Query {
    stmt: Statement,
}

impl Query {
    /// Create a builder for `table` (`"users"` or `"users as u"`).
    pub fn new(table: &str) -> Self {
        Self::with_config(table, BuilderConfig::default())
    }

    /// Create a builder for `table` with an explicit configuration.
    pub fn with_config(table: &str, config: BuilderConfig) -> Self {
        Self {
            stmt: Statement::new(table, config),
        }
    }

    /// Create a builder that renders `sql` verbatim.
    ///
    /// Bind values with [`Clauses::params`].
    pub fn from_raw(sql: impl Into<String>) -> Self {
        Self {
            stmt: Statement::raw(sql, BuilderConfig::default()),
        }
    }

    /// Render `sql` verbatim, ignoring every other clause.
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.stmt.set_raw(sql);
        self
    }

    /// Replace the select list. An empty list selects `*`.
    pub fn select<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.stmt.set_distinct(false);
        self.stmt.set_select(fields);
        self
    }

    /// Replace the select list and emit `SELECT DISTINCT`.
    pub fn select_distinct<S: AsRef<str>>(
        &mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.stmt.set_distinct(true);
        self.stmt.set_select(fields);
        self
    }

    // ==================== JOIN ====================

    /// `INNER JOIN target ON (left <op> right)`
    pub fn inner_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.stmt
            .push_join(JoinClause::columns(JoinKind::Inner, target, left, op, right));
        self
    }

    /// `LEFT JOIN target ON (left <op> right)`
    pub fn left_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.stmt
            .push_join(JoinClause::columns(JoinKind::Left, target, left, op, right));
        self
    }

    /// `RIGHT JOIN target ON (left <op> right)`
    pub fn right_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.stmt
            .push_join(JoinClause::columns(JoinKind::Right, target, left, op, right));
        self
    }

    /// `INNER JOIN target ON ( ... )` with conditions written by `f`.
    pub fn inner_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.join_on(JoinKind::Inner, target, f)
    }

    /// `LEFT JOIN target ON ( ... )` with conditions written by `f`.
    pub fn left_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.join_on(JoinKind::Left, target, f)
    }

    /// `RIGHT JOIN target ON ( ... )` with conditions written by `f`.
    pub fn right_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.join_on(JoinKind::Right, target, f)
    }

    fn join_on<F>(&mut self, kind: JoinKind, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        let mode = self.stmt.value_mode(Clause::JoinOn);
        self.stmt.push_join(JoinClause::with(kind, target, mode, f));
        self
    }

    /// The accumulated statement state.
    pub fn statement(&self) -> &Statement {
        &self.stmt
    }
}

impl Clauses for Query {
    fn statement_mut(&mut self) -> &mut Statement {
        &mut self.stmt
    }
}

impl BuildQuery for Query {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.stmt.render()
    }
}
