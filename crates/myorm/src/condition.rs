//! Boolean condition lists for WHERE, HAVING and JOIN ... ON.
//!
//! A [`ConditionList`] is a flat token stream: comparison fragments, `AND`/`OR`
//! operators, and group markers. Conditions are appended through
//! [`ConditionList::add`] (or the scoped [`Conditions`] writer handed to group
//! callbacks), which takes care of operator placement:
//!
//! - an operator precedes every condition except the first of the list
//! - no operator follows a group opening
//!
//! ```ignore
//! use myorm::prelude::*;
//!
//! let mut q = table("users");
//! q.where_eq("status", "active").where_group(|c| {
//!     c.eq("role", "admin").or_op("karma", ">", 100);
//! });
//! // WHERE `status` = ? AND (`role` = ? OR `karma` > ?)
//! ```

use crate::error::OrmError;
use crate::escape::{count_placeholders, escape_field};
use crate::value::Value;

/// Boolean operator placed between two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

/// One token of a condition list.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionToken {
    Op(BoolOp),
    Open,
    Close,
    Fragment(String),
}

impl ConditionToken {
    fn as_str(&self) -> &str {
        match self {
            ConditionToken::Op(op) => op.as_str(),
            ConditionToken::Open => "(",
            ConditionToken::Close => ")",
            ConditionToken::Fragment(s) => s,
        }
    }
}

/// How comparison values reach the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    /// Emit `?` and bind the value.
    #[default]
    Bind,
    /// Emit the value as an escaped SQL literal.
    Inline,
}

/// The right-hand side of a single condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `field <op> ?`
    Compare { op: String, value: Value },
    /// `field IS [NOT] NULL`
    Null { negated: bool },
    /// `field [NOT] BETWEEN ? AND ?`
    Between {
        from: Value,
        to: Value,
        negated: bool,
    },
    /// `field [NOT] IN (?, ?, ...)`
    In { values: Vec<Value>, negated: bool },
    /// `field LIKE ?`
    Like { pattern: Value },
}

impl Comparison {
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::op("=", value)
    }

    pub fn op(op: impl Into<String>, value: impl Into<Value>) -> Self {
        Comparison::Compare {
            op: op.into(),
            value: value.into(),
        }
    }

    pub fn between(from: impl Into<Value>, to: impl Into<Value>, negated: bool) -> Self {
        Comparison::Between {
            from: from.into(),
            to: to.into(),
            negated,
        }
    }

    pub fn in_list<V: Into<Value>>(values: impl IntoIterator<Item = V>, negated: bool) -> Self {
        Comparison::In {
            values: values.into_iter().map(Into::into).collect(),
            negated,
        }
    }

    pub fn like(pattern: impl Into<Value>) -> Self {
        Comparison::Like {
            pattern: pattern.into(),
        }
    }
}

/// An ordered list of condition tokens plus the values they bind.
#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    tokens: Vec<ConditionToken>,
    params: Vec<Value>,
    error: Option<OrmError>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[ConditionToken] {
        &self.tokens
    }

    /// Values bound by this list, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// First error raised while appending conditions.
    pub fn error(&self) -> Option<&OrmError> {
        self.error.as_ref()
    }

    fn record_error(&mut self, err: OrmError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Push `op` unless this is the first condition of the list or of a group.
    ///
    /// Returns whether an operator token was pushed.
    fn push_operator(&mut self, op: BoolOp) -> bool {
        let pushed = !matches!(self.tokens.last(), None | Some(ConditionToken::Open));
        if pushed {
            self.tokens.push(ConditionToken::Op(op));
        }
        pushed
    }

    fn push_value(&mut self, value: Value, mode: ValueMode) -> String {
        match mode {
            ValueMode::Bind => {
                self.params.push(value);
                "?".to_string()
            }
            ValueMode::Inline => value.to_sql_inline(),
        }
    }

    /// Append one condition on `field`.
    pub fn add(&mut self, op: BoolOp, field: &str, comparison: Comparison, mode: ValueMode) {
        let field = match escape_field(field) {
            Ok(field) => field,
            Err(err) => return self.record_error(err),
        };

        if let Comparison::In { values, .. } = &comparison {
            if values.is_empty() {
                return self.record_error(OrmError::validation(format!(
                    "IN list for {field} is empty"
                )));
            }
        }

        self.push_operator(op);

        let fragment = match comparison {
            Comparison::Compare { op, value } => {
                let placeholder = self.push_value(value, mode);
                format!("{field} {op} {placeholder}")
            }
            Comparison::Null { negated } => {
                let not = if negated { "NOT " } else { "" };
                format!("{field} IS {not}NULL")
            }
            Comparison::Between { from, to, negated } => {
                let not = if negated { "NOT " } else { "" };
                let from = self.push_value(from, mode);
                let to = self.push_value(to, mode);
                format!("{field} {not}BETWEEN {from} AND {to}")
            }
            Comparison::In { values, negated } => {
                let not = if negated { "NOT " } else { "" };
                let placeholders: Vec<String> = values
                    .into_iter()
                    .map(|v| self.push_value(v, mode))
                    .collect();
                format!("{field} {not}IN ({})", placeholders.join(", "))
            }
            Comparison::Like { pattern } => {
                let placeholder = self.push_value(pattern, mode);
                format!("{field} LIKE {placeholder}")
            }
        };

        self.tokens.push(ConditionToken::Fragment(fragment));
    }

    /// Append a column-to-column comparison; both sides are escaped.
    pub fn add_columns(&mut self, op: BoolOp, left: &str, cmp: &str, right: &str) {
        let pair = escape_field(left).and_then(|l| escape_field(right).map(|r| (l, r)));
        match pair {
            Ok((left, right)) => {
                self.push_operator(op);
                self.tokens
                    .push(ConditionToken::Fragment(format!("{left} {cmp} {right}")));
            }
            Err(err) => self.record_error(err),
        }
    }

    /// Append a caller-authored fragment with `?` placeholders.
    ///
    /// The fragment is wrapped in parentheses; `values` are bound in order.
    pub fn add_raw(&mut self, op: BoolOp, sql: &str, values: Vec<Value>) {
        let placeholder_count = count_placeholders(sql);
        if placeholder_count != values.len() {
            return self.record_error(OrmError::validation(format!(
                "raw condition '{sql}' has {placeholder_count} '?', but {} values provided",
                values.len()
            )));
        }

        self.push_operator(op);
        self.params.extend(values);
        self.tokens.push(ConditionToken::Fragment(format!("({sql})")));
    }

    /// Append a parenthesized group filled by `f`.
    ///
    /// A group that ends up empty is removed again, operator included.
    pub fn group<F>(&mut self, op: BoolOp, mode: ValueMode, f: F)
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        let pushed_operator = self.push_operator(op);
        self.tokens.push(ConditionToken::Open);

        f(&mut Conditions {
            list: &mut *self,
            mode,
        });

        if self.tokens.last() == Some(&ConditionToken::Open) {
            self.tokens.pop();
            if pushed_operator {
                self.tokens.pop();
            }
            return;
        }
        self.tokens.push(ConditionToken::Close);
    }

    /// Render the tokens, space separated, with no padding inside parentheses.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            let needs_space =
                !out.is_empty() && !out.ends_with('(') && *token != ConditionToken::Close;
            if needs_space {
                out.push(' ');
            }
            out.push_str(token.as_str());
        }
        out
    }
}

/// Scoped writer into one [`ConditionList`].
///
/// Group callbacks receive this instead of the whole builder, so conditions
/// written inside a HAVING group can only land in HAVING.
pub struct Conditions<'a> {
    list: &'a mut ConditionList,
    mode: ValueMode,
}

impl<'a> Conditions<'a> {
    pub(crate) fn new(list: &'a mut ConditionList, mode: ValueMode) -> Self {
        Self { list, mode }
    }

    fn add(&mut self, op: BoolOp, field: &str, comparison: Comparison) -> &mut Self {
        self.list.add(op, field, comparison, self.mode);
        self
    }

    /// `AND field = value`
    pub fn eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::eq(value))
    }

    /// `AND field <op> value`
    pub fn op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::op(op, value))
    }

    /// `OR field = value`
    pub fn or_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::eq(value))
    }

    /// `OR field <op> value`
    pub fn or_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::op(op, value))
    }

    pub fn is_null(&mut self, field: &str) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::Null { negated: false })
    }

    pub fn is_not_null(&mut self, field: &str) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::Null { negated: true })
    }

    pub fn or_is_null(&mut self, field: &str) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::Null { negated: false })
    }

    pub fn or_is_not_null(&mut self, field: &str) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::Null { negated: true })
    }

    pub fn between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::between(from, to, false))
    }

    pub fn not_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::between(from, to, true))
    }

    pub fn or_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::between(from, to, false))
    }

    pub fn or_not_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::between(from, to, true))
    }

    pub fn in_list<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::in_list(values, false))
    }

    pub fn not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::in_list(values, true))
    }

    pub fn or_in_list<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::in_list(values, false))
    }

    pub fn or_not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::in_list(values, true))
    }

    pub fn like(&mut self, field: &str, pattern: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::And, field, Comparison::like(pattern))
    }

    pub fn or_like(&mut self, field: &str, pattern: impl Into<Value>) -> &mut Self {
        self.add(BoolOp::Or, field, Comparison::like(pattern))
    }

    /// `AND left <op> right`, comparing two columns.
    pub fn on(&mut self, left: &str, op: &str, right: &str) -> &mut Self {
        self.list.add_columns(BoolOp::And, left, op, right);
        self
    }

    /// `OR left <op> right`, comparing two columns.
    pub fn or_on(&mut self, left: &str, op: &str, right: &str) -> &mut Self {
        self.list.add_columns(BoolOp::Or, left, op, right);
        self
    }

    /// `AND (<sql>)` with `?` placeholders bound to `values`.
    pub fn raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.list.add_raw(BoolOp::And, sql, values);
        self
    }

    /// `AND ( ... )`
    pub fn group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.list.group(BoolOp::And, self.mode, f);
        self
    }

    /// `OR ( ... )`
    pub fn or_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.list.group(BoolOp::Or, self.mode, f);
        self
    }
}
