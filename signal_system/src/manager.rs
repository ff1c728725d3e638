use crate::event::ModelEvent;
use crate::types::{EventCallback, EventProcessingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Identifier returned when registering a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(Uuid);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signal manager for model event notifications
pub struct SignalManager {
    callbacks: RwLock<Vec<(CallbackId, EventCallback)>>,
}

impl std::fmt::Debug for SignalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalManager")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl SignalManager {
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Add event callback
    pub fn add_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&ModelEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = CallbackId(Uuid::new_v4());
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push((id, Arc::new(callback)));
        }
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        match self.callbacks.write() {
            Ok(mut callbacks) => {
                let before = callbacks.len();
                callbacks.retain(|(callback_id, _)| *callback_id != id);
                callbacks.len() != before
            }
            Err(_) => false,
        }
    }

    /// Emit event to all subscribers
    ///
    /// Every callback runs even when an earlier one fails; failures are returned.
    pub fn emit(&self, event: &ModelEvent) -> Vec<EventProcessingError> {
        // Snapshot so callbacks may register or remove callbacks
        let callbacks: Vec<(CallbackId, EventCallback)> = match self.callbacks.read() {
            Ok(callbacks) => callbacks.clone(),
            Err(_) => return Vec::new(),
        };

        let mut errors = Vec::new();
        for (callback_id, callback) in callbacks {
            if let Err(error) = callback(event) {
                tracing::warn!(
                    hook = %event.hook,
                    callback = %callback_id,
                    "signal callback failed: {}",
                    error
                );
                errors.push(EventProcessingError { callback_id, error });
            }
        }
        errors
    }

    /// Clear all callbacks
    pub fn clear_callbacks(&self) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.clear();
        }
    }

    /// Get number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_every_callback() {
        let manager = SignalManager::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&seen);
        manager.add_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        manager.add_callback(|event| anyhow::bail!("cannot handle {}", event.hook));
        let counter = Arc::clone(&seen);
        manager.add_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let errors = manager.emit(&ModelEvent::new(EventType::Updated, "order"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].error.to_string().contains("order_updated"));
    }

    #[test]
    fn test_remove_callback() {
        let manager = SignalManager::new();
        let id = manager.add_callback(|_| Ok(()));
        assert_eq!(manager.callback_count(), 1);
        assert!(manager.remove_callback(id));
        assert!(!manager.remove_callback(id));
        assert_eq!(manager.callback_count(), 0);
    }
}
