//! Convenient imports for typical `myorm` usage.
//!
//! ```ignore
//! use myorm::prelude::*;
//! ```

pub use crate::{
    AliasFields, BuildQuery, BuilderConfig, Clauses, Conditions, DefaultSet, Executor, FetchMode,
    FromRow, Model, ModelQuery, ModelRegistry, OrmError, OrmResult, Query, QueryOutput, Row,
    RowExt, Value, raw, table,
};

#[cfg(feature = "tracing")]
pub use crate::TracingExecutor;
