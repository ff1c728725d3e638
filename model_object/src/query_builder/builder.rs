//! Model query builder
//!
//! This module turns rows returned by a `QueryExecutor` into model instances.

use crate::build_mode::BuildMode;
use crate::errors::ModelResult;
use crate::query_builder::executor::QueryExecutor;
use crate::query_builder::ordering::SortOrder;
use crate::traits::Model;
use std::fmt;
use std::marker::PhantomData;
use type_mapping::ModelValue;

/// Query for instances of `M`
///
/// Conditions are collected first and handed to the executor when the query
/// runs. Rows are built with `Model::from_data` under the query's build mode,
/// `IGNORE_MISSING | IGNORE_EXTRA` unless changed.
pub struct ModelQuery<M: Model> {
    executor: Box<dyn QueryExecutor>,
    conditions: Vec<(String, ModelValue)>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<usize>,
    offset: Option<usize>,
    mode: BuildMode,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> fmt::Debug for ModelQuery<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelQuery")
            .field("model", &M::model_name())
            .field("conditions", &self.conditions)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<M: Model> ModelQuery<M> {
    pub fn new(executor: impl QueryExecutor + 'static) -> Self {
        Self::with_executor(Box::new(executor))
    }

    pub fn with_executor(executor: Box<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            mode: BuildMode::IGNORE_MISSING | BuildMode::IGNORE_EXTRA,
            _model: PhantomData,
        }
    }

    /// Add an equality condition (combined with AND)
    pub fn where_eq(mut self, column: &str, value: impl Into<ModelValue>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order_by.push((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    fn prepare(mut self) -> ModelResult<(Box<dyn QueryExecutor>, BuildMode)> {
        for (column, value) in self.conditions.drain(..) {
            self.executor.where_eq(&column, value);
        }
        for (column, order) in self.order_by.drain(..) {
            self.executor.order_by(&column, order)?;
        }
        if let Some(limit) = self.limit {
            self.executor.limit(limit)?;
        }
        if let Some(offset) = self.offset {
            self.executor.offset(offset)?;
        }
        Ok((self.executor, self.mode))
    }

    /// First matching instance, or `None`
    pub fn first(self) -> ModelResult<Option<M>> {
        let (mut executor, mode) = self.prepare()?;
        executor
            .get()?
            .map(|row| M::from_data(row, mode))
            .transpose()
    }

    /// Every matching instance
    pub fn all(self) -> ModelResult<Vec<M>> {
        let (mut executor, mode) = self.prepare()?;
        let rows = executor.get_all()?.unwrap_or_default();
        crate::trace_log!("{} query returned {} rows", M::model_name(), rows.len());
        rows.into_iter().map(|row| M::from_data(row, mode)).collect()
    }

    pub fn count(self) -> ModelResult<usize> {
        let (mut executor, _) = self.prepare()?;
        Ok(executor.get_all()?.map_or(0, |rows| rows.len()))
    }
}
