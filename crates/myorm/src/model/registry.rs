use super::{Model, ModelQuery};
use crate::config::BuilderConfig;
use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of models, looked up by token.
///
/// Build one at startup and share it by reference; every query it starts
/// inherits its [`BuilderConfig`].
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<Model>>,
    config: BuilderConfig,
}

impl ModelRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry whose queries use `config`.
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            models: HashMap::new(),
            config,
        }
    }

    /// Register `model` under its alias.
    pub fn register(&mut self, model: Model) -> &mut Self {
        let token = model.alias_name().to_string();
        self.register_as(token, model)
    }

    /// Register `model` under an explicit token. A previous model with the same token is replaced.
    pub fn register_as(&mut self, token: impl Into<String>, model: Model) -> &mut Self {
        self.models.insert(token.into(), Arc::new(model));
        self
    }

    pub fn get(&self, token: &str) -> Option<&Model> {
        self.models.get(token).map(Arc::as_ref)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.models.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub(crate) fn get_shared(&self, token: &str) -> Option<Arc<Model>> {
        self.models.get(token).cloned()
    }

    /// Start a query over the model registered as `token`.
    pub fn query(&self, token: &str) -> OrmResult<ModelQuery<'_>> {
        let model = self
            .get_shared(token)
            .ok_or_else(|| OrmError::UnknownModel(token.to_string()))?;
        Ok(ModelQuery::new(self, model))
    }
}
