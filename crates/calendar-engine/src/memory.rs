//! In-memory storage backend.
//!
//! Values are kept in insertion order and ids are random UUID v4 strings.
//! The lock is held only within a single call, never across an await, so
//! the store can be shared between tasks; ordering of whole engine
//! operations is still up to the caller.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::conflict::overlaps_range;
use crate::error::{CalendarError, Result};
use crate::event::{CalendarEvent, EventId, Persisted};
use crate::storage::{EventStore, Store};

/// A store holding every value in a `Vec`, owned by whoever created it.
#[derive(Debug)]
pub struct InMemoryStore<T> {
    entries: RwLock<Vec<Persisted<T>>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// A copy of every stored value, in insertion order.
    pub fn snapshot(&self) -> Result<Vec<Persisted<T>>> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Persisted<T>>>> {
        self.entries
            .read()
            .map_err(|_| CalendarError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Persisted<T>>>> {
        self.entries
            .write()
            .map_err(|_| CalendarError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn filter(&self, keep: impl Fn(&T) -> bool) -> Result<Vec<Persisted<T>>> {
        Ok(self
            .read()?
            .iter()
            .filter(|entry| keep(&entry.value))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<T> Store<T> for InMemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn save(&self, value: T) -> Result<Persisted<T>> {
        let stored = Persisted::new(EventId::new(Uuid::new_v4().to_string()), value);
        self.write()?.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Persisted<T>>> {
        Ok(self.read()?.iter().find(|entry| &entry.id == id).cloned())
    }

    async fn update(&self, id: &EventId, value: T) -> Result<Option<Persisted<T>>> {
        let mut entries = self.write()?;
        match entries.iter_mut().find(|entry| &entry.id == id) {
            Some(entry) => {
                entry.value = value;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &EventId) -> Result<bool> {
        let mut entries = self.write()?;
        let before = entries.len();
        entries.retain(|entry| &entry.id != id);
        Ok(entries.len() != before)
    }
}

#[async_trait]
impl EventStore for InMemoryStore<CalendarEvent> {
    async fn find_overlapping_with_interval(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Persisted<CalendarEvent>>> {
        self.filter(|event| overlaps_range(event, start, end))
    }

    async fn find_by_recurring_event_id(
        &self,
        template_id: &EventId,
    ) -> Result<Vec<Persisted<CalendarEvent>>> {
        self.filter(|event| event.recurring_event_id.as_ref() == Some(template_id))
    }
}
