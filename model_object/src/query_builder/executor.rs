//! Query executors
//!
//! A `QueryExecutor` is the row source behind a `ModelQuery`. Equality
//! filters are required; ordering and pagination are optional capabilities.

use crate::errors::{ModelError, ModelResult};
use crate::query_builder::ordering::SortOrder;
use crate::record::Record;
use std::cmp::Ordering;
use type_mapping::ModelValue;

/// Row source consumed by `ModelQuery`
pub trait QueryExecutor: Send {
    fn where_eq(&mut self, column: &str, value: ModelValue);

    /// First matching row, or nothing
    fn get(&mut self) -> ModelResult<Option<Record>>;

    /// Every matching row; `None` when the source has nothing to report
    fn get_all(&mut self) -> ModelResult<Option<Vec<Record>>>;

    fn order_by(&mut self, _column: &str, _order: SortOrder) -> ModelResult<()> {
        Err(ModelError::missing_capability("query executor", "order_by"))
    }

    fn limit(&mut self, _limit: usize) -> ModelResult<()> {
        Err(ModelError::missing_capability("query executor", "limit"))
    }

    fn offset(&mut self, _offset: usize) -> ModelResult<()> {
        Err(ModelError::missing_capability("query executor", "offset"))
    }
}

/// In-memory executor over a fixed set of rows
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    rows: Vec<Record>,
    conditions: Vec<(String, ModelValue)>,
    order_by: Vec<(String, SortOrder)>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl RowSet {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    fn matches(&self, row: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }

    fn select(&self) -> Vec<Record> {
        let mut selected: Vec<Record> = self.rows.iter().filter(|r| self.matches(r)).cloned().collect();

        if !self.order_by.is_empty() {
            selected.sort_by(|a, b| {
                self.order_by
                    .iter()
                    .map(|(column, order)| {
                        let ordering = compare_values(a.get(column), b.get(column));
                        match order {
                            SortOrder::Asc => ordering,
                            SortOrder::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        selected
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

impl QueryExecutor for RowSet {
    fn where_eq(&mut self, column: &str, value: ModelValue) {
        self.conditions.push((column.to_string(), value));
    }

    fn get(&mut self) -> ModelResult<Option<Record>> {
        Ok(self.select().into_iter().next())
    }

    fn get_all(&mut self) -> ModelResult<Option<Vec<Record>>> {
        Ok(Some(self.select()))
    }

    fn order_by(&mut self, column: &str, order: SortOrder) -> ModelResult<()> {
        self.order_by.push((column.to_string(), order));
        Ok(())
    }

    fn limit(&mut self, limit: usize) -> ModelResult<()> {
        self.limit = Some(limit);
        Ok(())
    }

    fn offset(&mut self, offset: usize) -> ModelResult<()> {
        self.offset = Some(offset);
        Ok(())
    }
}

/// Order values of the same kind; missing and null values sort first
fn compare_values(a: Option<&ModelValue>, b: Option<&ModelValue>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (ModelValue::Int(x), ModelValue::Int(y)) => x.cmp(y),
            (ModelValue::String(x), ModelValue::String(y)) => x.cmp(y),
            (ModelValue::Bool(x), ModelValue::Bool(y)) => x.cmp(y),
            (ModelValue::Timestamp(x), ModelValue::Timestamp(y)) => x.cmp(y),
            (ModelValue::Uuid(x), ModelValue::Uuid(y)) => x.cmp(y),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => a.to_string().cmp(&b.to_string()),
            },
        },
    }
}
