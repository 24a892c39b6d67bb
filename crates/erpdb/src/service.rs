//! Asynchronous data-access contract.
//!
//! Consumers program against `DataService`; `LocalDataService` answers from
//! an in-process `Db`, and a remote backend can implement the same trait
//! with identical inputs and outputs.

use crate::{erp::Erp, error::Error};
use async_trait::async_trait;
use erpdb_core::{
    db::{
        Db, DeleteManyResult,
        query::{Page, QueryParams},
    },
    record::{Fields, Record},
    types::RecordId,
};
use parking_lot::Mutex;
use std::sync::Arc;

///
/// DataService
///
/// Generic CRUD and query over named collections. Lookups and updates of
/// a missing id resolve to `None`; deletes report whether anything went.
///

#[async_trait]
pub trait DataService: Send + Sync {
    async fn get_all(&self, collection: &str) -> Result<Vec<Record>, Error>;

    async fn get_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Record>, Error>;

    async fn create(&self, collection: &str, fields: Fields) -> Result<Record, Error>;

    async fn update(
        &self,
        collection: &str,
        id: &RecordId,
        patch: Fields,
    ) -> Result<Option<Record>, Error>;

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<bool, Error>;

    async fn delete_many(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> Result<DeleteManyResult, Error>;

    async fn query(&self, collection: &str, params: &QueryParams) -> Result<Page<Record>, Error>;
}

///
/// LocalDataService
///
/// Serves a shared in-process `Db`. Each call holds the lock for its whole
/// operation, so calls are serialized and observe each other's effects.
///

#[derive(Clone)]
pub struct LocalDataService {
    db: Arc<Mutex<Db>>,
}

impl LocalDataService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::from_shared(Arc::new(Mutex::new(db)))
    }

    #[must_use]
    pub const fn from_shared(db: Arc<Mutex<Db>>) -> Self {
        Self { db }
    }

    /// Handle to the underlying store, shared with this service.
    #[must_use]
    pub fn shared(&self) -> Arc<Mutex<Db>> {
        Arc::clone(&self.db)
    }
}

impl From<Erp> for LocalDataService {
    fn from(erp: Erp) -> Self {
        Self::new(erp.into_db())
    }
}

#[async_trait]
impl DataService for LocalDataService {
    async fn get_all(&self, collection: &str) -> Result<Vec<Record>, Error> {
        Ok(self.db.lock().get_all(collection))
    }

    async fn get_by_id(&self, collection: &str, id: &RecordId) -> Result<Option<Record>, Error> {
        Ok(self.db.lock().get_by_id(collection, id))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Record, Error> {
        Ok(self.db.lock().create(collection, fields)?)
    }

    async fn update(
        &self,
        collection: &str,
        id: &RecordId,
        patch: Fields,
    ) -> Result<Option<Record>, Error> {
        Ok(self.db.lock().update(collection, id, patch)?)
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<bool, Error> {
        Ok(self.db.lock().delete(collection, id))
    }

    async fn delete_many(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> Result<DeleteManyResult, Error> {
        Ok(self.db.lock().delete_many(collection, ids))
    }

    async fn query(&self, collection: &str, params: &QueryParams) -> Result<Page<Record>, Error> {
        Ok(self.db.lock().query(collection, params)?)
    }
}
