use crate::id_type::UniversalId;
use crate::record::Record;
use crate::traits::Model;
use indexmap::IndexMap;
use signal_system::{ModelEvent, SignalManager};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory repository keyed by primary key
///
/// Stores one record per instance, assigns integer ids to new instances
/// and reports changes through an optional signal manager.
pub struct MemoryRepository<M: Model> {
    pub(crate) rows: RwLock<IndexMap<UniversalId, Record>>,
    pub(crate) next_id: AtomicI64,
    pub(crate) signal_manager: Option<Arc<SignalManager>>,
    pub(crate) _model: PhantomData<fn() -> M>,
}

impl<M: Model> std::fmt::Debug for MemoryRepository<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("model", &M::model_name())
            .field("rows", &self.len())
            .field("has_signals", &self.has_signals())
            .finish()
    }
}

impl<M: Model> MemoryRepository<M> {
    pub fn new(signal_manager: Option<Arc<SignalManager>>) -> Self {
        Self {
            rows: RwLock::new(IndexMap::new()),
            next_id: AtomicI64::new(1),
            signal_manager,
            _model: PhantomData,
        }
    }

    /// Set signal manager for this repository
    pub fn set_signal_manager(&mut self, signal_manager: Arc<SignalManager>) {
        self.signal_manager = Some(signal_manager);
    }

    /// Remove signal manager from this repository
    pub fn remove_signal_manager(&mut self) {
        self.signal_manager = None;
    }

    /// Check if signal manager is set
    pub fn has_signals(&self) -> bool {
        self.signal_manager.is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored record, in insertion order
    pub fn records(&self) -> Vec<Record> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.values().cloned().collect()
    }

    /// Stored record for a primary key value
    pub fn record(&self, id: &UniversalId) -> Option<Record> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.get(id).cloned()
    }

    pub(crate) fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Keep generated ids ahead of explicitly supplied numeric ids
    pub(crate) fn observe_id(&self, id: &UniversalId) {
        if let UniversalId::Numeric(n) = id {
            self.next_id.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
    }

    pub(crate) fn emit_signal(&self, event: ModelEvent) {
        if let Some(signal_manager) = &self.signal_manager {
            let failures = signal_manager.emit(&event);
            if !failures.is_empty() {
                crate::debug_log!("{} callbacks failed for {}", failures.len(), event.hook);
            }
        }
    }
}

impl<M: Model> Default for MemoryRepository<M> {
    fn default() -> Self {
        Self::new(None)
    }
}
