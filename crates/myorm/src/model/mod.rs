//! Declarative models.
//!
//! A [`Model`] describes one table: its alias, declared fields, computed
//! (custom) fields, and reusable named joins and filters. Models are
//! registered once in a [`ModelRegistry`]; [`ModelRegistry::query`] starts a
//! [`ModelQuery`] that projects the declared fields and applies the active
//! named joins and filters when the statement is built.
//!
//! ```ignore
//! use myorm::prelude::*;
//!
//! let mut registry = ModelRegistry::new();
//! registry
//!     .register(Model::new("users").alias("u").fields(["id", "name"]))
//!     .register(
//!         Model::new("posts")
//!             .alias("p")
//!             .fields(["id", "title", "user_id"])
//!             .custom_field("comment_count", "(SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id)")
//!             .join("author", |q| {
//!                 q.left_join("u", "u.id", "=", "p.user_id");
//!             })
//!             .filter("published", |q| {
//!                 q.where_eq("p.status", "published");
//!             }),
//!     );
//!
//! let posts = registry.query("p")?.where_eq("p.id", 3).get(&conn)?;
//! ```

mod query;
mod registry;

pub use query::{AliasFields, ModelQuery, Selection};
pub use registry::ModelRegistry;

use std::fmt;
use std::sync::Arc;

/// A named join or filter: a callback that writes into a live [`ModelQuery`].
pub type ModelHook = Arc<dyn Fn(&mut ModelQuery<'_>) + Send + Sync>;

/// Which named joins (or filters) a query starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefaultSet {
    /// Every declared entry is active.
    #[default]
    All,
    /// Nothing is active until enabled with `with_joins`/`with_filters`.
    None,
    /// Only the listed entries are active.
    Only(Vec<String>),
}

/// Table descriptor consumed by [`ModelQuery`].
#[derive(Clone)]
pub struct Model {
    table: String,
    alias: Option<String>,
    fields: Vec<String>,
    custom_fields: Vec<(String, String)>,
    joins: Vec<(String, ModelHook)>,
    filters: Vec<(String, ModelHook)>,
    default_joins: DefaultSet,
    default_filters: DefaultSet,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.table)
            .field("alias", &self.alias_name())
            .field("fields", &self.fields)
            .field("custom_fields", &self.custom_fields)
            .field("joins", &self.join_names().collect::<Vec<_>>())
            .field("filters", &self.filter_names().collect::<Vec<_>>())
            .field("default_joins", &self.default_joins)
            .field("default_filters", &self.default_filters)
            .finish()
    }
}

impl Model {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            fields: Vec::new(),
            custom_fields: Vec::new(),
            joins: Vec::new(),
            filters: Vec::new(),
            default_joins: DefaultSet::All,
            default_filters: DefaultSet::All,
        }
    }

    /// Alias used in `FROM`/`JOIN` and as the projection prefix. Defaults to the table name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Declare one column. Declaration order is projection order.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    /// Declare several columns.
    pub fn fields<S: Into<String>>(self, fields: impl IntoIterator<Item = S>) -> Self {
        fields.into_iter().fold(self, |model, field| model.field(field))
    }

    /// Declare a computed field projected as `<sql> as <name>`.
    pub fn custom_field(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let name = name.into();
        let sql = sql.into();
        match self.custom_fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = sql,
            None => self.custom_fields.push((name, sql)),
        }
        self
    }

    /// Declare a named join.
    pub fn join<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut ModelQuery<'_>) + Send + Sync + 'static,
    {
        upsert_hook(&mut self.joins, name.into(), Arc::new(f));
        self
    }

    /// Declare a named filter.
    pub fn filter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut ModelQuery<'_>) + Send + Sync + 'static,
    {
        upsert_hook(&mut self.filters, name.into(), Arc::new(f));
        self
    }

    /// Named joins active on a fresh query.
    pub fn default_joins(mut self, set: DefaultSet) -> Self {
        self.default_joins = set;
        self
    }

    /// Named filters active on a fresh query.
    pub fn default_filters(mut self, set: DefaultSet) -> Self {
        self.default_filters = set;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Alias in effect: the declared alias or the table name.
    pub fn alias_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    /// `table as alias`, the reference used in `FROM` and `JOIN`.
    pub fn table_ref(&self) -> String {
        format!("{} as {}", self.table, self.alias_name())
    }

    pub fn declared_fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn custom_fields(&self) -> &[(String, String)] {
        &self.custom_fields
    }

    /// SQL expression of a custom field.
    pub fn custom_field_sql(&self, name: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sql)| sql.as_str())
    }

    pub fn join_names(&self) -> impl Iterator<Item = &str> {
        self.joins.iter().map(|(name, _)| name.as_str())
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_join(&self, name: &str) -> bool {
        self.joins.iter().any(|(n, _)| n == name)
    }

    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.iter().any(|(n, _)| n == name)
    }

    pub(crate) fn join_hook(&self, name: &str) -> Option<ModelHook> {
        find_hook(&self.joins, name)
    }

    pub(crate) fn filter_hook(&self, name: &str) -> Option<ModelHook> {
        find_hook(&self.filters, name)
    }

    pub(crate) fn default_join_set(&self) -> &DefaultSet {
        &self.default_joins
    }

    pub(crate) fn default_filter_set(&self) -> &DefaultSet {
        &self.default_filters
    }
}

fn upsert_hook(hooks: &mut Vec<(String, ModelHook)>, name: String, hook: ModelHook) {
    match hooks.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = hook,
        None => hooks.push((name, hook)),
    }
}

fn find_hook(hooks: &[(String, ModelHook)], name: &str) -> Option<ModelHook> {
    hooks
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, hook)| Arc::clone(hook))
}
