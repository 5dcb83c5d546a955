//! Books of every entity, partitioned and locked per entity.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use folio_core::accounts::Entity;
use folio_core::ledger::{HashChain, ReportingPeriod};
use folio_core::policy::PolicyTable;
use folio_shared::AccountingConfig;
use folio_shared::types::EntityId;

use crate::book::EntityBook;
use crate::error::{StoreError, StoreResult};
use crate::query::View;
use crate::session::Session;

/// Thread-safe books keyed by entity.
///
/// Units of work on different entities run in parallel. Units of work on
/// the same entity queue on that entity's mutex, so the chain tail and the
/// clearance aggregates they read cannot move under them.
#[derive(Debug)]
pub struct Books {
    policy: PolicyTable,
    chain: HashChain,
    entities: DashMap<EntityId, Arc<Mutex<EntityBook>>>,
}

impl Books {
    /// Creates empty books using `config` for every entity.
    #[must_use]
    pub fn new(config: &AccountingConfig) -> Self {
        Self {
            policy: PolicyTable::from_config(config),
            chain: HashChain::from_config(config),
            entities: DashMap::new(),
        }
    }

    /// The policy table shared by every entity.
    #[must_use]
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// The hash chain shared by every entity.
    #[must_use]
    pub fn chain(&self) -> &HashChain {
        &self.chain
    }

    /// Registered entities.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|entry| *entry.key()).collect()
    }

    /// Opens books for `entity` with `period` as the active reporting period.
    ///
    /// # Errors
    ///
    /// - `EntityExists` if the entity already has books
    /// - `WrongEntity` if the period belongs to another entity
    pub fn register_entity(&self, entity: Entity, period: ReportingPeriod) -> StoreResult<EntityId> {
        let id = entity.id;
        if period.entity_id != id {
            return Err(StoreError::WrongEntity {
                expected: id,
                actual: period.entity_id,
            });
        }
        match self.entities.entry(id) {
            Entry::Occupied(_) => Err(StoreError::EntityExists(id)),
            Entry::Vacant(slot) => {
                let book = EntityBook::new(entity, period, self.chain.genesis());
                slot.insert(Arc::new(Mutex::new(book)));
                debug!(entity_id = %id, "Entity registered");
                Ok(id)
            }
        }
    }

    fn handle(&self, entity_id: EntityId) -> StoreResult<Arc<Mutex<EntityBook>>> {
        self.entities
            .get(&entity_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(StoreError::EntityNotFound(entity_id))
    }

    /// Locks the committed books of an entity.
    ///
    /// Units of work only replace the committed book after they succeed, so
    /// a panic inside one leaves the committed book intact and the poison
    /// flag is cleared.
    fn lock(handle: &Mutex<EntityBook>, entity_id: EntityId) -> MutexGuard<'_, EntityBook> {
        handle.lock().unwrap_or_else(|poisoned| {
            warn!(entity_id = %entity_id, "Recovered books after a panicked unit of work");
            handle.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Runs `work` as one unit of work on `entity_id`.
    ///
    /// `work` sees a working copy of the entity's books. The copy is
    /// committed when `work` returns `Ok` and discarded otherwise.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if the entity has no books
    /// - any error returned by `work`
    pub fn unit_of_work<T, F>(&self, entity_id: EntityId, work: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Session<'_>) -> StoreResult<T>,
    {
        let handle = self.handle(entity_id)?;
        let mut committed = Self::lock(&handle, entity_id);

        let started_from = committed.tail.clone();
        let mut session = Session::new(committed.clone(), &self.policy, &self.chain);
        debug!(entity_id = %entity_id, tail = started_from.sequence, "Unit of work started");

        match work(&mut session) {
            Ok(value) => {
                committed.commit(session.book, &started_from)?;
                debug!(entity_id = %entity_id, tail = committed.tail.sequence, "Unit of work committed");
                Ok(value)
            }
            Err(error) => {
                warn!(
                    entity_id = %entity_id,
                    code = error.error_code(),
                    %error,
                    "Unit of work rolled back"
                );
                Err(error)
            }
        }
    }

    /// Reads the committed books of `entity_id`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if the entity has no books.
    pub fn read<T, F>(&self, entity_id: EntityId, read: F) -> StoreResult<T>
    where
        F: FnOnce(View<'_>) -> T,
    {
        let handle = self.handle(entity_id)?;
        let book = Self::lock(&handle, entity_id);
        Ok(read(View::new(&book, &self.policy, &self.chain)))
    }
}
