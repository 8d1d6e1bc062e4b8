//! Clause accumulator and statement renderer.

use crate::condition::{BoolOp, Comparison, ConditionList, Conditions, ValueMode};
use crate::config::BuilderConfig;
use crate::error::{OrmError, OrmResult};
use crate::escape::{escape_field, escape_table, escape_table_name};
use crate::qb::traits::BuiltQuery;
use crate::value::Value;

/// Which statement `build()` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    /// Caller-supplied SQL that bypasses every other clause.
    Raw,
}

/// Clause a condition is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    Having,
    JoinOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// One rendered-on-demand `JOIN <target> ON (<conditions>)`.
#[derive(Debug, Clone)]
pub struct JoinClause {
    kind: JoinKind,
    target: OrmResult<String>,
    on: ConditionList,
}

impl JoinClause {
    /// `JOIN target ON (left <op> right)` over two columns.
    pub fn columns(kind: JoinKind, target: &str, left: &str, op: &str, right: &str) -> Self {
        let mut on = ConditionList::new();
        on.add_columns(BoolOp::And, left, op, right);
        Self {
            kind,
            target: escape_table(target),
            on,
        }
    }

    /// `JOIN target ON (...)` with the conditions written by `f`.
    pub fn with<F>(kind: JoinKind, target: &str, mode: ValueMode, f: F) -> Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        let mut on = ConditionList::new();
        f(&mut Conditions::new(&mut on, mode));
        Self {
            kind,
            target: escape_table(target),
            on,
        }
    }

    fn error(&self) -> Option<&OrmError> {
        self.target.as_ref().err().or_else(|| self.on.error())
    }

    fn render(&self) -> OrmResult<String> {
        let target = self.target.clone()?;
        if self.on.is_empty() {
            return Err(OrmError::validation(format!(
                "join on {target} has no condition"
            )));
        }
        Ok(format!("{} {} ON ({})", self.kind.as_str(), target, self.on.render()))
    }
}

/// `LIMIT [offset, ]count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: u64,
    pub offset: Option<u64>,
}

/// In-progress statement state.
///
/// Every clause keeps its own bound values; `render` concatenates them in the
/// order their placeholders appear in the SQL text.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    kind: StatementKind,
    /// Escaped `table` or `` `table` as `alias` ``.
    table: Option<String>,
    /// Escaped table without alias.
    table_name: Option<String>,
    distinct: bool,
    select_fields: Vec<String>,
    insert: Vec<(String, Value)>,
    update: Vec<(String, Value)>,
    joins: Vec<JoinClause>,
    where_conditions: ConditionList,
    having_conditions: ConditionList,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<Limit>,
    raw: Option<String>,
    /// Values for placeholders the builder did not emit itself.
    explicit_params: Vec<Value>,
    config: BuilderConfig,
    error: Option<OrmError>,
}

impl Statement {
    /// Create a statement over `table` (`"users"` or `"users as u"`).
    pub fn new(table: &str, config: BuilderConfig) -> Self {
        let mut stmt = Self {
            config,
            ..Self::default()
        };
        match escape_table(table).and_then(|t| escape_table_name(table).map(|n| (t, n))) {
            Ok((table, name)) => {
                stmt.table = Some(table);
                stmt.table_name = Some(name);
            }
            Err(err) => stmt.record_error(err),
        }
        stmt
    }

    /// Create a table-less statement for raw SQL.
    pub fn raw(sql: impl Into<String>, config: BuilderConfig) -> Self {
        Self {
            kind: StatementKind::Raw,
            raw: Some(sql.into()),
            config,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> StatementKind {
        if self.raw.is_some() {
            StatementKind::Raw
        } else {
            self.kind
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn where_conditions(&self) -> &ConditionList {
        &self.where_conditions
    }

    pub fn having_conditions(&self) -> &ConditionList {
        &self.having_conditions
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub(crate) fn record_error(&mut self, err: OrmError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Value mode for conditions written into `clause`.
    pub fn value_mode(&self, clause: Clause) -> ValueMode {
        match clause {
            Clause::Where => ValueMode::Bind,
            Clause::Having | Clause::JoinOn => self.config.clause_value_mode(),
        }
    }

    fn conditions_mut(&mut self, clause: Clause) -> Option<&mut ConditionList> {
        match clause {
            Clause::Where => Some(&mut self.where_conditions),
            Clause::Having => Some(&mut self.having_conditions),
            Clause::JoinOn => None,
        }
    }

    /// Append one condition to WHERE or HAVING.
    pub fn add_condition(&mut self, clause: Clause, op: BoolOp, field: &str, cmp: Comparison) {
        let mode = self.value_mode(clause);
        match self.conditions_mut(clause) {
            Some(list) => list.add(op, field, cmp, mode),
            None => self.record_error(OrmError::validation(
                "JOIN ... ON conditions belong to a join call",
            )),
        }
    }

    /// Append a group to WHERE or HAVING.
    pub fn add_group<F>(&mut self, clause: Clause, op: BoolOp, f: F)
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        let mode = self.value_mode(clause);
        match self.conditions_mut(clause) {
            Some(list) => list.group(op, mode, f),
            None => self.record_error(OrmError::validation(
                "JOIN ... ON groups belong to a join call",
            )),
        }
    }

    /// Append a raw `?` fragment to WHERE or HAVING.
    pub fn add_raw(&mut self, clause: Clause, op: BoolOp, sql: &str, values: Vec<Value>) {
        match self.conditions_mut(clause) {
            Some(list) => list.add_raw(op, sql, values),
            None => self.record_error(OrmError::validation(
                "JOIN ... ON fragments belong to a join call",
            )),
        }
    }

    pub fn set_raw(&mut self, sql: impl Into<String>) {
        self.raw = Some(sql.into());
    }

    pub fn set_params(&mut self, values: Vec<Value>) {
        self.explicit_params = values;
    }

    fn escape_all<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> Vec<String> {
        let mut out = Vec::new();
        for field in fields {
            match escape_field(field.as_ref()) {
                Ok(f) => out.push(f),
                Err(err) => self.record_error(err),
            }
        }
        out
    }

    /// Replace the select list; an empty list selects `*`.
    pub fn set_select<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) {
        self.select_fields = self.escape_all(fields);
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    pub fn push_join(&mut self, join: JoinClause) {
        self.joins.push(join);
    }

    pub fn push_group_by<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) {
        let fields = self.escape_all(fields);
        self.group_by.extend(fields);
    }

    pub fn push_order_by<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>, desc: bool) {
        let fields = self.escape_all(fields);
        self.order_by.extend(
            fields
                .into_iter()
                .map(|f| if desc { format!("{f} DESC") } else { f }),
        );
    }

    pub fn set_limit(&mut self, count: u64, offset: Option<u64>) {
        self.limit = Some(Limit { count, offset });
    }

    /// Merge `data` into the insert row, keeping keys unique and in first-seen order.
    pub fn set_insert(&mut self, data: Vec<(String, Value)>) {
        self.kind = StatementKind::Insert;
        merge_unique(&mut self.insert, data);
    }

    /// Merge `data` into the update assignments, keeping keys unique and in first-seen order.
    pub fn set_update(&mut self, data: Vec<(String, Value)>) {
        self.kind = StatementKind::Update;
        merge_unique(&mut self.update, data);
    }

    pub fn set_delete(&mut self) {
        self.kind = StatementKind::Delete;
    }

    fn first_error(&self) -> Option<&OrmError> {
        self.error
            .as_ref()
            .or_else(|| self.where_conditions.error())
            .or_else(|| self.having_conditions.error())
            .or_else(|| self.joins.iter().find_map(JoinClause::error))
    }

    fn require_table(&self) -> OrmResult<&str> {
        self.table
            .as_deref()
            .ok_or_else(|| OrmError::validation("statement has no table"))
    }

    fn normalize(&self, value: &Value) -> Value {
        if self.config.blank_as_null {
            value.clone().blank_to_null()
        } else {
            value.clone()
        }
    }

    /// Render the SQL text and the parameter list.
    ///
    /// Rendering never mutates the statement; calling it twice yields the same output.
    pub fn render(&self) -> OrmResult<BuiltQuery> {
        if let Some(err) = self.first_error() {
            return Err(err.clone());
        }

        if let Some(raw) = &self.raw {
            // Raw SQL keeps every value accumulated so far.
            let params = self
                .joins
                .iter()
                .flat_map(|join| join.on.params())
                .chain(self.where_conditions.params())
                .chain(self.having_conditions.params())
                .chain(&self.explicit_params)
                .cloned()
                .collect();
            return Ok(BuiltQuery::new(raw.clone(), params));
        }

        let mut params = Vec::new();
        let sql = match self.kind {
            StatementKind::Insert => self.render_insert(&mut params)?,
            StatementKind::Update => self.render_update(&mut params)?,
            StatementKind::Delete => self.render_delete(&mut params)?,
            StatementKind::Select | StatementKind::Raw => self.render_select(&mut params)?,
        };
        params.extend(self.explicit_params.iter().cloned());

        Ok(BuiltQuery::new(sql, params))
    }

    fn render_insert(&self, params: &mut Vec<Value>) -> OrmResult<String> {
        let table = self
            .table_name
            .as_deref()
            .ok_or_else(|| OrmError::validation("statement has no table"))?;
        if self.insert.is_empty() {
            return Err(OrmError::validation("INSERT has no columns"));
        }

        let mut columns = Vec::with_capacity(self.insert.len());
        for (column, value) in &self.insert {
            columns.push(escape_field(column)?);
            params.push(self.normalize(value));
        }
        let placeholders = vec!["?"; columns.len()].join(", ");

        Ok(format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        ))
    }

    fn render_update(&self, params: &mut Vec<Value>) -> OrmResult<String> {
        let table = self.require_table()?;
        if self.update.is_empty() {
            return Err(OrmError::validation("UPDATE has no assignments"));
        }

        let mut assignments = Vec::with_capacity(self.update.len());
        for (column, value) in &self.update {
            assignments.push(format!("{} = ?", escape_field(column)?));
            params.push(self.normalize(value));
        }

        let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_conditions.render());
            params.extend(self.where_conditions.params().iter().cloned());
        }
        Ok(sql)
    }

    fn render_delete(&self, params: &mut Vec<Value>) -> OrmResult<String> {
        let table = self.require_table()?;

        let mut sql = format!("DELETE FROM {table}");
        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_conditions.render());
            params.extend(self.where_conditions.params().iter().cloned());
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        // DELETE only accepts a row count.
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit.count));
        }
        Ok(sql)
    }

    fn render_select(&self, params: &mut Vec<Value>) -> OrmResult<String> {
        let table = self.require_table()?;

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(table);

        if !self.joins.is_empty() {
            let mut rendered = Vec::with_capacity(self.joins.len());
            for join in &self.joins {
                rendered.push(join.render()?);
                params.extend(join.on.params().iter().cloned());
            }
            sql.push(' ');
            sql.push_str(&rendered.join(" "));
        }

        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_conditions.render());
            params.extend(self.where_conditions.params().iter().cloned());
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having_conditions.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having_conditions.render());
            params.extend(self.having_conditions.params().iter().cloned());
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        match self.limit {
            Some(Limit {
                count,
                offset: Some(offset),
            }) => sql.push_str(&format!(" LIMIT {offset}, {count}")),
            Some(Limit { count, offset: None }) => sql.push_str(&format!(" LIMIT {count}")),
            None => {}
        }

        Ok(sql)
    }
}

fn merge_unique(target: &mut Vec<(String, Value)>, data: Vec<(String, Value)>) {
    for (key, value) in data {
        match target.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => target.push((key, value)),
        }
    }
}
