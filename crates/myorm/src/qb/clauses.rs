//! Clause methods shared by [`Query`](super::Query) and
//! [`ModelQuery`](crate::model::ModelQuery).

use super::statement::{Clause, Statement};
use crate::condition::{BoolOp, Comparison, Conditions};
use crate::value::Value;

/// Fluent clause methods over a [`Statement`].
///
/// Every method appends to one clause and returns the builder, so calls can be
/// chained in any order. Errors (a bad identifier, an empty IN list) are
/// recorded and reported by `build()`.
///
/// ```ignore
/// use myorm::prelude::*;
///
/// let mut q = table("posts as p");
/// q.select(["p.id", "COUNT(c.id) as comments"])
///     .left_join("comments as c", "c.post_id", "=", "p.id")
///     .where_eq("p.status", "published")
///     .where_in("p.author_id", [1, 2, 3])
///     .group_by(["p.id"])
///     .having_op("COUNT(c.id)", ">", 5)
///     .order_by_desc(["p.id"])
///     .limit_offset(20, 40);
/// ```
pub trait Clauses {
    /// The statement the clause methods write into.
    fn statement_mut(&mut self) -> &mut Statement;

    // ==================== WHERE ====================

    /// `AND field = value`
    fn where_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::And, field, Comparison::eq(value));
        self
    }

    /// `AND field <op> value`
    fn where_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::And, field, Comparison::op(op, value));
        self
    }

    /// `OR field = value`
    fn or_where_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::Or, field, Comparison::eq(value));
        self
    }

    /// `OR field <op> value`
    fn or_where_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::Or, field, Comparison::op(op, value));
        self
    }

    fn where_null(&mut self, field: &str) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::Null { negated: false },
        );
        self
    }

    fn where_not_null(&mut self, field: &str) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::Null { negated: true },
        );
        self
    }

    fn or_where_null(&mut self, field: &str) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::Null { negated: false },
        );
        self
    }

    fn or_where_not_null(&mut self, field: &str) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::Null { negated: true },
        );
        self
    }

    fn where_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::between(from, to, false),
        );
        self
    }

    fn where_not_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::between(from, to, true),
        );
        self
    }

    fn or_where_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::between(from, to, false),
        );
        self
    }

    fn or_where_not_between(
        &mut self,
        field: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::between(from, to, true),
        );
        self
    }

    /// `AND field IN (?, ?, ...)`, one placeholder per value.
    fn where_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::in_list(values, false),
        );
        self
    }

    fn where_not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::And,
            field,
            Comparison::in_list(values, true),
        );
        self
    }

    fn or_where_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::in_list(values, false),
        );
        self
    }

    fn or_where_not_in<V: Into<Value>>(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Where,
            BoolOp::Or,
            field,
            Comparison::in_list(values, true),
        );
        self
    }

    fn where_like(&mut self, field: &str, pattern: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::And, field, Comparison::like(pattern));
        self
    }

    fn or_where_like(&mut self, field: &str, pattern: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Where, BoolOp::Or, field, Comparison::like(pattern));
        self
    }

    /// `AND ( ... )` filled by `f`.
    fn where_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.statement_mut().add_group(Clause::Where, BoolOp::And, f);
        self
    }

    /// `OR ( ... )` filled by `f`.
    fn or_where_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.statement_mut().add_group(Clause::Where, BoolOp::Or, f);
        self
    }

    /// `AND (<sql>)`, a hand-written predicate with `?` placeholders.
    fn where_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.statement_mut()
            .add_raw(Clause::Where, BoolOp::And, sql, values);
        self
    }

    // ==================== HAVING ====================

    fn having_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Having, BoolOp::And, field, Comparison::eq(value));
        self
    }

    fn having_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Having,
            BoolOp::And,
            field,
            Comparison::op(op, value),
        );
        self
    }

    fn or_having_eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut()
            .add_condition(Clause::Having, BoolOp::Or, field, Comparison::eq(value));
        self
    }

    fn or_having_op(&mut self, field: &str, op: &str, value: impl Into<Value>) -> &mut Self {
        self.statement_mut().add_condition(
            Clause::Having,
            BoolOp::Or,
            field,
            Comparison::op(op, value),
        );
        self
    }

    fn having_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.statement_mut().add_group(Clause::Having, BoolOp::And, f);
        self
    }

    fn or_having_group<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.statement_mut().add_group(Clause::Having, BoolOp::Or, f);
        self
    }

    fn having_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.statement_mut()
            .add_raw(Clause::Having, BoolOp::And, sql, values);
        self
    }

    // ==================== GROUP / ORDER / LIMIT ====================

    fn group_by<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.statement_mut().push_group_by(fields);
        self
    }

    fn order_by<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.statement_mut().push_order_by(fields, false);
        self
    }

    fn order_by_desc<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.statement_mut().push_order_by(fields, true);
        self
    }

    /// `LIMIT count`
    fn limit(&mut self, count: u64) -> &mut Self {
        self.statement_mut().set_limit(count, None);
        self
    }

    /// `LIMIT offset, count`
    fn limit_offset(&mut self, count: u64, offset: u64) -> &mut Self {
        self.statement_mut().set_limit(count, Some(offset));
        self
    }

    // ==================== WRITES ====================

    /// Switch to INSERT and merge `data` into the row.
    ///
    /// Keys stay unique; a repeated key replaces the earlier value in place.
    fn insert<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let data = data.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.statement_mut().set_insert(data);
        self
    }

    /// Switch to UPDATE and merge `data` into the assignments.
    fn update<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let data = data.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.statement_mut().set_update(data);
        self
    }

    /// Switch to DELETE.
    fn delete(&mut self) -> &mut Self {
        self.statement_mut().set_delete();
        self
    }

    /// Replace the explicit parameter list.
    ///
    /// These values bind after every value the clause methods collected, so
    /// `raw(sql).params(values)` binds exactly `values`.
    fn params<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.statement_mut().set_params(values);
        self
    }
}
