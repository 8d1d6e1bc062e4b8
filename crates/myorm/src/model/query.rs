//! Model-aware statement builder.

use super::{DefaultSet, Model, ModelRegistry};
use crate::condition::Conditions;
use crate::error::{OrmError, OrmResult};
use crate::qb::{
    BuildQuery, BuiltQuery, Clause, Clauses, JoinClause, JoinKind, Statement, StatementKind,
};
use crate::value::Value;
use std::sync::Arc;

/// Fields requested for one alias in [`ModelQuery::select_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasFields {
    /// Every declared and custom field (`*`).
    All,
    One(String),
    Many(Vec<String>),
}

impl AliasFields {
    pub fn one(field: impl Into<String>) -> Self {
        AliasFields::One(field.into())
    }

    pub fn many<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        AliasFields::Many(fields.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for AliasFields {
    fn from(field: &str) -> Self {
        if field == "*" {
            AliasFields::All
        } else {
            AliasFields::One(field.to_string())
        }
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for AliasFields {
    fn from(fields: [S; N]) -> Self {
        AliasFields::many(fields)
    }
}

/// An explicit projection directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// `field` (base model) or `alias.field` entries.
    Fields(Vec<String>),
    /// alias -> fields.
    Map(Vec<(String, AliasFields)>),
}

/// Statement builder over a registered [`Model`].
///
/// Directives are recorded as they are called and reconciled when a SELECT
/// is built: active named joins run first, then explicit joins,
/// then active named filters, and the projection is resolved last so it can
/// see every joined model. Building works on a copy, so the builder itself
/// never changes and `sql()` can be called repeatedly.
#[derive(Debug, Clone)]
pub struct ModelQuery<'r> {
    registry: &'r ModelRegistry,
    model: Arc<Model>,
    stmt: Statement,
    selection: Option<Selection>,
    /// Joins added by explicit join calls, rendered after named joins.
    joins: Vec<JoinClause>,
    /// Joined models, by alias, in join order.
    join_models: Vec<Arc<Model>>,
    active_joins: Vec<String>,
    active_filters: Vec<String>,
}

impl<'r> ModelQuery<'r> {
    pub(crate) fn new(registry: &'r ModelRegistry, model: Arc<Model>) -> Self {
        let stmt = Statement::new(&model.table_ref(), *registry.config());
        let mut query = Self {
            registry,
            model: Arc::clone(&model),
            stmt,
            selection: None,
            joins: Vec::new(),
            join_models: Vec::new(),
            active_joins: Vec::new(),
            active_filters: Vec::new(),
        };

        match model.default_join_set() {
            DefaultSet::All => query.active_joins = model.join_names().map(str::to_string).collect(),
            DefaultSet::None => {}
            DefaultSet::Only(names) => {
                query.with_joins(names);
            }
        }
        match model.default_filter_set() {
            DefaultSet::All => {
                query.active_filters = model.filter_names().map(str::to_string).collect()
            }
            DefaultSet::None => {}
            DefaultSet::Only(names) => {
                query.with_filters(names);
            }
        }

        query
    }

    /// The base model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The registry this query resolves join targets against.
    pub fn registry(&self) -> &'r ModelRegistry {
        self.registry
    }

    /// Accumulated statement state, before model resolution.
    pub fn statement(&self) -> &Statement {
        &self.stmt
    }

    /// Named joins that will run on build.
    pub fn active_joins(&self) -> &[String] {
        &self.active_joins
    }

    /// Named filters that will run on build.
    pub fn active_filters(&self) -> &[String] {
        &self.active_filters
    }

    // ==================== SELECT ====================

    /// Project `field` (base model) or `alias.field` entries.
    ///
    /// Declared and custom fields are resolved against their model; anything
    /// else is passed to the escaper as written. An empty list restores the
    /// default projection.
    pub fn select<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        self.stmt.set_distinct(false);
        self.set_selection(fields);
        self
    }

    /// Same as [`ModelQuery::select`], with `SELECT DISTINCT`.
    pub fn select_distinct<S: AsRef<str>>(
        &mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.stmt.set_distinct(true);
        self.set_selection(fields);
        self
    }

    /// Project fields per alias.
    ///
    /// ```ignore
    /// q.select_map([
    ///     ("p", AliasFields::from("*")),
    ///     ("u", AliasFields::from(["name", "email"])),
    /// ]);
    /// ```
    pub fn select_map<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<AliasFields>,
    {
        let entries = entries
            .into_iter()
            .map(|(alias, fields)| (alias.into(), fields.into()))
            .collect();
        self.selection = Some(Selection::Map(entries));
        self
    }

    fn set_selection<S: AsRef<str>>(&mut self, fields: impl IntoIterator<Item = S>) {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        self.selection = if fields.is_empty() {
            None
        } else {
            Some(Selection::Fields(fields))
        };
    }

    // ==================== JOIN ====================

    /// `LEFT JOIN target ON (left <op> right)`.
    ///
    /// When `target` is a registered model token, the model's `table as alias`
    /// is joined and its fields become available to the projection.
    pub fn left_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.columns_join(JoinKind::Left, target, false, left, op, right)
    }

    pub fn inner_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.columns_join(JoinKind::Inner, target, false, left, op, right)
    }

    pub fn right_join(&mut self, target: &str, left: &str, op: &str, right: &str) -> &mut Self {
        self.columns_join(JoinKind::Right, target, false, left, op, right)
    }

    /// Like [`ModelQuery::left_join`], but `token` must name a registered model.
    pub fn left_join_model(
        &mut self,
        token: &str,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        self.columns_join(JoinKind::Left, token, true, left, op, right)
    }

    pub fn inner_join_model(
        &mut self,
        token: &str,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        self.columns_join(JoinKind::Inner, token, true, left, op, right)
    }

    pub fn right_join_model(
        &mut self,
        token: &str,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        self.columns_join(JoinKind::Right, token, true, left, op, right)
    }

    /// `LEFT JOIN target ON ( ... )` with conditions written by `f`.
    pub fn left_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.conditions_join(JoinKind::Left, target, f)
    }

    pub fn inner_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.conditions_join(JoinKind::Inner, target, f)
    }

    pub fn right_join_on<F>(&mut self, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        self.conditions_join(JoinKind::Right, target, f)
    }

    fn columns_join(
        &mut self,
        kind: JoinKind,
        target: &str,
        strict: bool,
        left: &str,
        op: &str,
        right: &str,
    ) -> &mut Self {
        if let Some(target) = self.resolve_join_target(target, strict) {
            self.joins
                .push(JoinClause::columns(kind, &target, left, op, right));
        }
        self
    }

    fn conditions_join<F>(&mut self, kind: JoinKind, target: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Conditions<'_>),
    {
        if let Some(target) = self.resolve_join_target(target, false) {
            let mode = self.stmt.value_mode(Clause::JoinOn);
            self.joins.push(JoinClause::with(kind, &target, mode, f));
        }
        self
    }

    /// Map a join target to the table reference to render.
    fn resolve_join_target(&mut self, target: &str, strict: bool) -> Option<String> {
        match self.registry.get_shared(target) {
            Some(model) => {
                let table_ref = model.table_ref();
                self.remember_join_model(model);
                Some(table_ref)
            }
            None if strict => {
                self.stmt
                    .record_error(OrmError::UnknownModel(target.to_string()));
                None
            }
            None => Some(target.to_string()),
        }
    }

    fn remember_join_model(&mut self, model: Arc<Model>) {
        let alias = model.alias_name();
        match self
            .join_models
            .iter_mut()
            .find(|m| m.alias_name() == alias)
        {
            Some(slot) => *slot = model,
            None => self.join_models.push(model),
        }
    }

    // ==================== NAMED JOINS / FILTERS ====================

    /// Run exactly these named joins.
    pub fn with_joins<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) -> &mut Self {
        self.active_joins.clear();
        for name in names {
            let name = name.as_ref();
            if !self.model.has_join(name) {
                let err = OrmError::UnknownJoin(self.describe(name));
                self.stmt.record_error(err);
            } else if !self.active_joins.iter().any(|n| n == name) {
                self.active_joins.push(name.to_string());
            }
        }
        self
    }

    /// Stop running the given named joins. An empty list stops all of them.
    pub fn without_joins<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let names: Vec<S> = names.into_iter().collect();
        if names.is_empty() {
            return self.clear_joins();
        }
        for name in &names {
            let name = name.as_ref();
            if !self.model.has_join(name) {
                let err = OrmError::UnknownJoin(self.describe(name));
                self.stmt.record_error(err);
            }
            self.active_joins.retain(|n| n != name);
        }
        self
    }

    /// Stop running every named join.
    pub fn clear_joins(&mut self) -> &mut Self {
        self.active_joins.clear();
        self
    }

    /// Run exactly these named filters.
    pub fn with_filters<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.active_filters.clear();
        for name in names {
            let name = name.as_ref();
            if !self.model.has_filter(name) {
                let err = OrmError::UnknownFilter(self.describe(name));
                self.stmt.record_error(err);
            } else if !self.active_filters.iter().any(|n| n == name) {
                self.active_filters.push(name.to_string());
            }
        }
        self
    }

    /// Stop running the given named filters. An empty list stops all of them.
    pub fn without_filters<S: AsRef<str>>(
        &mut self,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let names: Vec<S> = names.into_iter().collect();
        if names.is_empty() {
            return self.clear_filters();
        }
        for name in &names {
            let name = name.as_ref();
            if !self.model.has_filter(name) {
                let err = OrmError::UnknownFilter(self.describe(name));
                self.stmt.record_error(err);
            }
            self.active_filters.retain(|n| n != name);
        }
        self
    }

    /// Stop running every named filter.
    pub fn clear_filters(&mut self) -> &mut Self {
        self.active_filters.clear();
        self
    }

    fn describe(&self, name: &str) -> String {
        format!("'{name}' on model '{}'", self.model.alias_name())
    }

    // ==================== WRITES ====================

    /// INSERT the declared fields found in `data`; other keys are dropped.
    pub fn mass_insert<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let data = self.declared_only(data);
        self.stmt.set_insert(data);
        self
    }

    /// UPDATE the declared fields found in `data`; other keys are dropped.
    pub fn mass_update<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let data = self.declared_only(data);
        self.stmt.set_update(data);
        self
    }

    fn declared_only<K, V>(&self, data: impl IntoIterator<Item = (K, V)>) -> Vec<(String, Value)>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        data.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| self.model.has_field(k))
            .collect()
    }

    // ==================== RESOLUTION ====================

    /// Copy of this query with named joins, filters and the projection applied.
    ///
    /// INSERT, UPDATE and DELETE render no joins, so writes are built as
    /// written: named joins and filters only shape reads.
    fn resolved(&self) -> ModelQuery<'r> {
        if matches!(
            self.stmt.kind(),
            StatementKind::Insert | StatementKind::Update | StatementKind::Delete
        ) {
            return self.clone();
        }

        let mut working = self.clone();
        working.joins.clear();
        working.join_models.clear();

        for name in &self.active_joins {
            if let Some(hook) = self.model.join_hook(name) {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "myorm.model",
                    model = self.model.alias_name(),
                    join = name.as_str(),
                    "applying named join"
                );
                hook(&mut working);
            }
        }
        working.joins.extend(self.joins.iter().cloned());
        for model in &self.join_models {
            working.remember_join_model(Arc::clone(model));
        }

        for name in &self.active_filters {
            if let Some(hook) = self.model.filter_hook(name) {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    target: "myorm.model",
                    model = self.model.alias_name(),
                    filter = name.as_str(),
                    "applying named filter"
                );
                hook(&mut working);
            }
        }

        for join in std::mem::take(&mut working.joins) {
            working.stmt.push_join(join);
        }
        let projection = working.projection();
        working.stmt.set_select(projection);
        working
    }

    fn model_for(&self, alias: &str) -> Option<&Model> {
        if alias == self.model.alias_name() {
            return Some(&self.model);
        }
        self.join_models
            .iter()
            .find(|m| m.alias_name() == alias)
            .map(Arc::as_ref)
    }

    /// Field expressions to select, before escaping.
    fn projection(&self) -> Vec<String> {
        let base_alias = self.model.alias_name();
        let mut out = Vec::new();

        match &self.selection {
            None => {
                out.extend(default_projection(&self.model, true));
                for model in &self.join_models {
                    out.extend(default_projection(model, false));
                }
            }
            Some(Selection::Map(entries)) => {
                for (alias, fields) in entries {
                    let strip = alias == base_alias;
                    match (self.model_for(alias), fields) {
                        (Some(model), AliasFields::All) => {
                            out.extend(default_projection(model, strip));
                        }
                        (Some(model), AliasFields::One(field)) => {
                            out.push(map_field(model, field, strip));
                        }
                        (Some(model), AliasFields::Many(fields)) => {
                            out.extend(fields.iter().map(|f| map_field(model, f, strip)));
                        }
                        (None, AliasFields::All) => out.push(format!("{alias}.*")),
                        (None, AliasFields::One(field)) => out.push(format!("{alias}.{field}")),
                        (None, AliasFields::Many(fields)) => {
                            out.extend(fields.iter().map(|f| format!("{alias}.{f}")));
                        }
                    }
                }
            }
            Some(Selection::Fields(fields)) => {
                for field in fields {
                    let (alias, name, strip) = match field.split_once('.') {
                        Some((alias, name)) => (alias, name, false),
                        None => (base_alias, field.as_str(), true),
                    };
                    let resolved = self
                        .model_for(alias)
                        .and_then(|model| declared_field(model, name, strip));
                    out.push(resolved.unwrap_or_else(|| field.clone()));
                }
            }
        }

        out
    }
}

/// Every declared field, then every custom field.
fn default_projection(model: &Model, strip_prefix: bool) -> Vec<String> {
    let alias = model.alias_name();
    let fields = model
        .declared_fields()
        .iter()
        .map(|field| aliased_field(alias, field, strip_prefix));
    let custom = model
        .custom_fields()
        .iter()
        .map(|(name, sql)| aliased_custom_field(alias, name, sql, strip_prefix));
    fields.chain(custom).collect()
}

/// Resolve a declared or custom field; `None` for anything else.
fn declared_field(model: &Model, field: &str, strip_prefix: bool) -> Option<String> {
    let alias = model.alias_name();
    if model.has_field(field) {
        return Some(aliased_field(alias, field, strip_prefix));
    }
    model
        .custom_field_sql(field)
        .map(|sql| aliased_custom_field(alias, field, sql, strip_prefix))
}

/// Map entries always project through the alias, declared or not.
fn map_field(model: &Model, field: &str, strip_prefix: bool) -> String {
    declared_field(model, field, strip_prefix)
        .unwrap_or_else(|| aliased_field(model.alias_name(), field, strip_prefix))
}

fn aliased_field(alias: &str, field: &str, strip_prefix: bool) -> String {
    if strip_prefix {
        format!("`{alias}`.`{field}` as `{field}`")
    } else {
        format!("`{alias}`.`{field}` as `{alias}.{field}`")
    }
}

fn aliased_custom_field(alias: &str, field: &str, sql: &str, strip_prefix: bool) -> String {
    if strip_prefix {
        format!("{sql} as `{field}`")
    } else {
        format!("{sql} as `{alias}.{field}`")
    }
}

impl Clauses for ModelQuery<'_> {
    fn statement_mut(&mut self) -> &mut Statement {
        &mut self.stmt
    }
}

impl BuildQuery for ModelQuery<'_> {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.resolved().stmt.render()
    }
}
