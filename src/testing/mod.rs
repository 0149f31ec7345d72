//! In-memory stand-ins for the Postgres repositories, so services and the
//! whole router can be driven without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::database::models::{Appointment, Location, Pet, Professional, Session, User};
use crate::database::repository::not_found;
use crate::database::{ConflictKind, DatabaseError, Entity, Repository};
use crate::filter::filter_order::FilterOrder;
use crate::filter::Filter;
use crate::state::{AppState, Repositories};

pub struct MemoryRepository<E> {
    rows: Mutex<Vec<E>>,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_many(&self, filter: Filter) -> Result<Vec<E>, DatabaseError> {
        let order = filter.order_info()?;
        let mut rows: Vec<E> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filter.matches(|column| row.column(column)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            FilterOrder::compare(&order, &|column| a.column(column), &|column| b.column(column))
        });
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, DatabaseError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn insert(&self, entity: E) -> Result<E, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(DatabaseError::Conflict {
                kind: ConflictKind::Unique,
                message: format!("{}_pkey", E::TABLE),
            });
        }
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|row| row.id() == entity.id())
            .ok_or_else(not_found::<E>)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(not_found::<E>());
        }
        Ok(())
    }
}

pub fn memory_repositories() -> Repositories {
    Repositories {
        users: Arc::new(MemoryRepository::<User>::new()),
        sessions: Arc::new(MemoryRepository::<Session>::new()),
        pets: Arc::new(MemoryRepository::<Pet>::new()),
        locations: Arc::new(MemoryRepository::<Location>::new()),
        professionals: Arc::new(MemoryRepository::<Professional>::new()),
        appointments: Arc::new(MemoryRepository::<Appointment>::new()),
    }
}

/// Full application state backed by empty in-memory tables.
pub fn memory_state(config: AppConfig) -> AppState {
    AppState::new(Arc::new(config), memory_repositories(), None)
}
