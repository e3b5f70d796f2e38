use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::ids::{IdSource, slot_ids};
use crate::models::{Class, TimeSlot};
use crate::store::{ClassStore, StoreError};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Class not found")]
    ClassNotFound,
    #[error("Time slot not found")]
    SlotNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Class operations over the injected store. No caching and no transactions:
/// every call goes straight to the store.
#[derive(Clone)]
pub struct Schedule {
    store: Arc<dyn ClassStore>,
    ids: Arc<dyn IdSource>,
}

impl Schedule {
    pub fn new(store: Arc<dyn ClassStore>, ids: Arc<dyn IdSource>) -> Self {
        Self { store, ids }
    }

    pub fn store(&self) -> &Arc<dyn ClassStore> {
        &self.store
    }

    pub async fn list_classes(&self) -> Result<Vec<Class>, ScheduleError> {
        let mut classes = self.store.list().await?;
        classes.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(classes)
    }

    pub async fn get_class(&self, id: i64) -> Result<Class, ScheduleError> {
        self.store
            .get(id)
            .await?
            .ok_or(ScheduleError::ClassNotFound)
    }

    pub async fn create_class(
        &self,
        name: String,
        date: Option<String>,
        labels: Vec<String>,
    ) -> Result<i64, ScheduleError> {
        let id = self.ids.next_id();
        let time_slots = slot_ids(self.ids.as_ref(), labels.len())
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(position, (slot_id, label))| TimeSlot {
                id: slot_id,
                label,
                assigned_to: String::new(),
                position: position as i64,
            })
            .collect();

        let class = Class {
            id,
            name,
            date: date.unwrap_or_default(),
            time_slots,
        };
        self.store.set(&class).await?;
        debug!(class_id = id, slots = class.time_slots.len(), "class created");
        Ok(id)
    }

    /// Copies name, labels and positions into a new class. Assignments and the
    /// date are cleared.
    pub async fn duplicate_class(&self, id: i64) -> Result<i64, ScheduleError> {
        let original = self.get_class(id).await?;
        let new_id = self.ids.next_id();
        let time_slots = slot_ids(self.ids.as_ref(), original.time_slots.len())
            .into_iter()
            .zip(&original.time_slots)
            .map(|(slot_id, slot)| TimeSlot {
                id: slot_id,
                label: slot.label.clone(),
                assigned_to: String::new(),
                position: slot.position,
            })
            .collect();

        let copy = Class {
            id: new_id,
            name: original.name,
            date: String::new(),
            time_slots,
        };
        self.store.set(&copy).await?;
        debug!(source_id = id, class_id = new_id, "class duplicated");
        Ok(new_id)
    }

    pub async fn delete_class(&self, id: i64) -> Result<(), ScheduleError> {
        self.store.delete(id).await?;
        debug!(class_id = id, "class deleted");
        Ok(())
    }

    /// Read-modify-write of the whole record without isolation: a concurrent
    /// assignment on the same class that read the same version is overwritten.
    pub async fn assign_slot(
        &self,
        class_id: i64,
        slot_id: i64,
        assigned_to: String,
    ) -> Result<(), ScheduleError> {
        let mut class = self.get_class(class_id).await?;
        let slot = class
            .time_slots
            .iter_mut()
            .find(|slot| slot.id == slot_id)
            .ok_or(ScheduleError::SlotNotFound)?;
        slot.assigned_to = assigned_to;
        self.store.set(&class).await?;
        debug!(class_id, slot_id, "slot assigned");
        Ok(())
    }
}
