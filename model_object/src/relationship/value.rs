use crate::errors::ModelResult;
use crate::traits::ModelRecord;
use std::fmt;
use std::sync::Arc;
use type_mapping::ModelValue;

/// Shared handle to a related model instance
pub type RecordRef = Arc<dyn ModelRecord>;

/// Turns a lazy reference id into a record, or nothing
pub type LazyResolver = Arc<dyn Fn(&ModelValue) -> ModelResult<Option<RecordRef>> + Send + Sync>;

/// Identifier of a related record plus the means to fetch it
#[derive(Clone)]
pub struct LazyReference {
    id: ModelValue,
    resolver: LazyResolver,
}

impl LazyReference {
    pub fn new<F>(id: impl Into<ModelValue>, resolver: F) -> Self
    where
        F: Fn(&ModelValue) -> ModelResult<Option<RecordRef>> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn id(&self) -> &ModelValue {
        &self.id
    }

    /// Fetch the referenced record; `None` when it does not exist
    pub fn resolve(&self) -> ModelResult<Option<RecordRef>> {
        (self.resolver)(&self.id)
    }
}

impl fmt::Debug for LazyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyReference").field("id", &self.id).finish()
    }
}

/// Loaded content of a relationship
#[derive(Clone, Default)]
pub enum RelationshipValue {
    #[default]
    Empty,
    One(RecordRef),
    Many(Vec<RecordRef>),
    Lazy(LazyReference),
}

impl RelationshipValue {
    pub fn one<R: ModelRecord>(record: R) -> Self {
        RelationshipValue::One(Arc::new(record))
    }

    pub fn many<R, I>(records: I) -> Self
    where
        R: ModelRecord,
        I: IntoIterator<Item = R>,
    {
        RelationshipValue::Many(
            records
                .into_iter()
                .map(|r| Arc::new(r) as RecordRef)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RelationshipValue::Empty => true,
            RelationshipValue::Many(records) => records.is_empty(),
            _ => false,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            RelationshipValue::Empty => "nothing",
            RelationshipValue::One(_) => "a single record",
            RelationshipValue::Many(_) => "a list of records",
            RelationshipValue::Lazy(_) => "a lazy reference",
        }
    }
}

impl fmt::Debug for RelationshipValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipValue::Empty => f.write_str("Empty"),
            RelationshipValue::One(record) => f.debug_tuple("One").field(record).finish(),
            RelationshipValue::Many(records) => f.debug_tuple("Many").field(records).finish(),
            RelationshipValue::Lazy(reference) => f.debug_tuple("Lazy").field(reference).finish(),
        }
    }
}
