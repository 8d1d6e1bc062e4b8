#![allow(dead_code)]

use myorm::{Executor, FetchMode, OrmResult, QueryOutput, Row, Value};
use std::sync::Mutex;

/// One statement seen by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
    pub mode: FetchMode,
}

/// In-memory executor that records every statement and answers with canned rows.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    rows: Vec<Row>,
    affected: u64,
    last_insert_id: Option<u64>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    pub fn with_last_insert_id(mut self, id: u64) -> Self {
        self.last_insert_id = Some(id);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls().pop().expect("no statement was run")
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, sql: &str, params: &[Value], mode: FetchMode) -> OrmResult<QueryOutput> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params: params.to_vec(),
            mode,
        });
        Ok(match mode {
            FetchMode::Execute => QueryOutput::Affected(self.affected),
            FetchMode::FetchOne => QueryOutput::Row(self.rows.first().cloned()),
            FetchMode::FetchMany => QueryOutput::Rows(self.rows.clone()),
        })
    }

    fn last_insert_id(&self) -> OrmResult<Option<u64>> {
        Ok(self.last_insert_id)
    }
}

/// Build a [`Row`] from a JSON object literal.
pub fn row(value: serde_json::Value) -> Row {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
