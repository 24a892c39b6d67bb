pub mod aggregate;
pub mod direction;
pub mod persist;
pub mod query;
pub mod store;


use crate::{
    config::DbConfig,
    db::{
        persist::{LoadStatus, MemorySlot, Persistence, StorageSlot},
        query::{Page, QueryParams},
        store::RecordStore,
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
    obs::{EventReport, EventSink, ExecKind, MetricsEvent, MetricsSink, Span},
    record::{Fields, Record, strip_reserved},
    schema::Schema,
    traits::{EntityKind, to_fields},
    types::{Clock, Generator, RecordId, Stamper, SystemClock},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

/// Fresh ids drawn before giving up on finding one unused in a collection.
const MAX_ID_ATTEMPTS: usize = 16;

///
/// DeleteManyResult
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResult {
    /// True iff at least one record was removed.
    pub success: bool,
    pub deleted_count: usize,
}

///
/// DbBuilder
///

pub struct DbBuilder {
    config: DbConfig,
    defaults: RecordStore,
    slot: Option<Box<dyn StorageSlot>>,
    clock: Option<Box<dyn Clock>>,
    sink: Option<Arc<dyn MetricsSink>>,
    schemas: Vec<&'static Schema>,
    seed: Option<u64>,
}

impl DbBuilder {
    #[must_use]
    pub fn config(mut self, config: DbConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn slot(mut self, slot: impl StorageSlot + 'static) -> Self {
        self.slot = Some(Box::new(slot));
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: &'static Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Fix the id generator's random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the config, then load persisted state over the defaults.
    pub fn open(self) -> Result<Db, InternalError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let seed = self.seed.unwrap_or_else(|| clock.now_millis());
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(EventSink::new()) as Arc<dyn MetricsSink>);
        let slot = self.slot.unwrap_or_else(|| Box::new(MemorySlot::new()));
        let persistence = Persistence::new(slot, self.config.storage_key.clone());

        let schemas: BTreeMap<_, _> = self
            .schemas
            .into_iter()
            .map(|schema| (schema.collection, schema))
            .collect();

        let (mut store, mut load_status) = persistence.load(self.defaults.clone());
        if load_status == LoadStatus::Restored
            && let Err(err) = validate_store(&schemas, &store)
        {
            tracing::error!(key = %persistence.key(), error = %err, "persisted store fails its schemas");
            store = self.defaults.clone();
            load_status = LoadStatus::Rejected;
        }
        match load_status {
            LoadStatus::Restored => sink.record(MetricsEvent::PersistLoad { restored: true }),
            LoadStatus::Rejected => sink.record(MetricsEvent::PersistLoad { restored: false }),
            LoadStatus::Empty => {}
        }
        tracing::debug!(key = %persistence.key(), status = ?load_status, "opened store");

        Ok(Db {
            config: self.config,
            store,
            defaults: self.defaults,
            schemas,
            ids: Generator::seeded(seed),
            stamper: Stamper::new(clock),
            persistence,
            sink,
            load_status,
        })
    }
}

///
/// Db
///
/// An explicitly constructed record store instance: authoritative in-memory
/// collections plus the schemas, id generator, stamper, persistence adapter,
/// and metrics sink that operate on them.
///
/// Not-found is never an error here: lookups and updates return `Option`,
/// deletes return `bool`.
///

pub struct Db {
    config: DbConfig,
    store: RecordStore,
    defaults: RecordStore,
    schemas: BTreeMap<&'static str, &'static Schema>,
    ids: Generator,
    stamper: Stamper,
    persistence: Persistence,
    sink: Arc<dyn MetricsSink>,
    load_status: LoadStatus,
}

impl Db {
    /// Start building a `Db` seeded from `defaults`.
    #[must_use]
    pub fn builder(defaults: RecordStore) -> DbBuilder {
        DbBuilder {
            config: DbConfig::default(),
            defaults,
            slot: None,
            clock: None,
            sink: None,
            schemas: Vec::new(),
            seed: None,
        }
    }

    /// Open with the system clock and the default metrics sink.
    pub fn open(
        config: DbConfig,
        slot: impl StorageSlot + 'static,
        defaults: RecordStore,
    ) -> Result<Self, InternalError> {
        Self::builder(defaults).config(config).slot(slot).open()
    }

    /// Registered schema for a collection.
    pub fn schema(&self, collection: &str) -> Result<&'static Schema, InternalError> {
        self.schemas
            .get(collection)
            .copied()
            .ok_or_else(|| InternalError::unknown_collection(collection))
    }

    #[must_use]
    pub const fn config(&self) -> &DbConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// What happened to persisted state when this instance was opened.
    #[must_use]
    pub const fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    #[must_use]
    pub fn metrics_report(&self) -> EventReport {
        self.sink.report()
    }

    pub fn metrics_reset(&self) {
        self.sink.reset();
    }

    /// Current clock reading in epoch milliseconds.
    #[must_use]
    pub fn now_millis(&self) -> u64 {
        self.stamper.now_millis()
    }

    // ─────────────────────────────────────────────
    // GENERIC CRUD
    // ─────────────────────────────────────────────

    /// Copy of every record in a collection; absent collections are empty.
    #[must_use]
    pub fn get_all(&self, collection: &str) -> Vec<Record> {
        let mut span = Span::new(self.sink.as_ref(), ExecKind::Load, collection);
        let records = self.store.snapshot(collection);
        span.set_rows(records.len() as u64);

        records
    }

    #[must_use]
    pub fn get_by_id(&self, collection: &str, id: &RecordId) -> Option<Record> {
        let mut span = Span::new(self.sink.as_ref(), ExecKind::Load, collection);
        let record = self.store.find(collection, id).cloned();
        span.set_rows(u64::from(record.is_some()));

        record
    }

    /// Validate, assign an id and timestamps, append, persist.
    pub fn create(&mut self, collection: &str, fields: Fields) -> Result<Record, InternalError> {
        let schema = self.schema(collection)?;

        self.create_in(schema, fields)
    }

    /// Shallow-merge `patch` over an existing record and refresh `updatedAt`.
    /// Returns `None` when the id does not exist; nothing is persisted then.
    /// Patches to a registered collection are checked against its schema first.
    pub fn update(
        &mut self,
        collection: &str,
        id: &RecordId,
        patch: Fields,
    ) -> Result<Option<Record>, InternalError> {
        let schema = self.schemas.get(collection).copied();

        self.update_in(collection, schema, id, patch)
    }

    /// Remove one record. Returns whether anything was removed.
    pub fn delete(&mut self, collection: &str, id: &RecordId) -> bool {
        let sink = Arc::clone(&self.sink);
        let mut span = Span::new(sink.as_ref(), ExecKind::Delete, collection);

        if self.store.remove(collection, id).is_none() {
            return false;
        }

        span.set_rows(1);
        self.persist();
        tracing::debug!(collection, id = %id, "deleted record");

        true
    }

    /// Remove every existing record whose id is listed, in one pass.
    pub fn delete_many(&mut self, collection: &str, ids: &[RecordId]) -> DeleteManyResult {
        let sink = Arc::clone(&self.sink);
        let mut span = Span::new(sink.as_ref(), ExecKind::Delete, collection);

        let deleted_count = self.store.remove_many(collection, ids);
        if deleted_count > 0 {
            span.set_rows(deleted_count as u64);
            self.persist();
            tracing::debug!(collection, deleted_count, "deleted records");
        }

        DeleteManyResult {
            success: deleted_count > 0,
            deleted_count,
        }
    }

    /// Filtered, searched, sorted page of a registered collection.
    pub fn query(
        &self,
        collection: &str,
        params: &QueryParams,
    ) -> Result<Page<Record>, InternalError> {
        let schema = self.schema(collection)?;

        self.query_in(schema, params)
    }

    // ─────────────────────────────────────────────
    // TYPED
    // ─────────────────────────────────────────────

    pub fn all<E: EntityKind>(&self) -> Result<Vec<E>, InternalError> {
        self.get_all(E::SCHEMA.collection)
            .iter()
            .map(E::from_record)
            .collect()
    }

    pub fn find<E: EntityKind>(&self, id: &RecordId) -> Result<Option<E>, InternalError> {
        self.get_by_id(E::SCHEMA.collection, id)
            .as_ref()
            .map(E::from_record)
            .transpose()
    }

    /// Create from any serializable payload; the entity schema need not be
    /// registered.
    pub fn insert<E: EntityKind>(&mut self, payload: &impl Serialize) -> Result<E, InternalError> {
        let fields = to_fields(payload)?;
        let record = self.create_in(E::SCHEMA, fields)?;

        E::from_record(&record)
    }

    pub fn patch<E: EntityKind>(
        &mut self,
        id: &RecordId,
        patch: &impl Serialize,
    ) -> Result<Option<E>, InternalError> {
        let patch = to_fields(patch)?;

        self.update_in(E::SCHEMA.collection, Some(E::SCHEMA), id, patch)?
            .as_ref()
            .map(E::from_record)
            .transpose()
    }

    pub fn remove<E: EntityKind>(&mut self, id: &RecordId) -> bool {
        self.delete(E::SCHEMA.collection, id)
    }

    pub fn query_as<E: EntityKind>(&self, params: &QueryParams) -> Result<Page<E>, InternalError> {
        self.query_in(E::SCHEMA, params)?.try_map(|r| E::from_record(&r))
    }

    // ─────────────────────────────────────────────
    // STORE LIFECYCLE
    // ─────────────────────────────────────────────

    /// Discard persisted state, reseed from the defaults, save.
    pub fn reset(&mut self) {
        if let Err(err) = self.persistence.clear() {
            tracing::warn!(key = %self.persistence.key(), error = %err, "failed to clear persisted store");
        }
        self.store = self.defaults.clone();
        self.persist();
        tracing::debug!("reset store to defaults");
    }

    /// Pretty-printed JSON of the whole store.
    pub fn export_all(&self) -> Result<String, InternalError> {
        Ok(persist::export(&self.store)?)
    }

    /// Replace the whole store with a previously exported blob.
    /// Returns `false` and leaves state untouched if the blob is malformed or
    /// a record fails its collection's schema.
    pub fn import_all(&mut self, text: &str) -> bool {
        let decoded = persist::decode(text)
            .map_err(InternalError::from)
            .and_then(|store| validate_store(&self.schemas, &store).map(|()| store));

        match decoded {
            Ok(store) => {
                self.store = store;
                self.persist();
                tracing::debug!("imported store");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "rejected store import");
                false
            }
        }
    }

    // ─────────────────────────────────────────────
    // INTERNAL
    // ─────────────────────────────────────────────

    fn create_in(
        &mut self,
        schema: &'static Schema,
        fields: Fields,
    ) -> Result<Record, InternalError> {
        let collection = schema.collection;
        let fields = strip_reserved(fields);
        schema.validate_create(&fields)?;

        let sink = Arc::clone(&self.sink);
        let mut span = Span::new(sink.as_ref(), ExecKind::Save, collection);

        let id = self.next_id(collection)?;
        let stamp = self.stamper.next().to_iso()?;
        let record = Record::assemble(id, fields, &stamp);
        self.store.insert(collection, record.clone())?;

        span.set_rows(1);
        self.persist();
        tracing::debug!(collection, id = %record.id(), "created record");

        Ok(record)
    }

    fn update_in(
        &mut self,
        collection: &str,
        schema: Option<&Schema>,
        id: &RecordId,
        patch: Fields,
    ) -> Result<Option<Record>, InternalError> {
        let patch = strip_reserved(patch);
        if let Some(schema) = schema {
            schema.validate_patch(&patch)?;
        }

        let sink = Arc::clone(&self.sink);
        let mut span = Span::new(sink.as_ref(), ExecKind::Save, collection);

        let Some(record) = self.store.find_mut(collection, id) else {
            return Ok(None);
        };
        let stamp = self
            .stamper
            .next_after(record.updated_at_timestamp())
            .to_iso()?;
        record.merge(patch, &stamp);
        let updated = record.clone();

        span.set_rows(1);
        self.persist();
        tracing::debug!(collection, id = %id, "updated record");

        Ok(Some(updated))
    }

    fn query_in(
        &self,
        schema: &'static Schema,
        params: &QueryParams,
    ) -> Result<Page<Record>, InternalError> {
        let collection = schema.collection;
        let mut span = Span::new(self.sink.as_ref(), ExecKind::Query, collection);

        let records = self.store.snapshot(collection);
        self.sink.record(MetricsEvent::RowsScanned {
            collection,
            rows_scanned: records.len() as u64,
        });

        let page = query::execute(records, schema, params, self.config.page_limits())?;
        span.set_rows(page.len() as u64);

        Ok(page)
    }

    // Re-draw on collision so ids stay unique even against imported data.
    fn next_id(&mut self, collection: &str) -> Result<RecordId, InternalError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = RecordId::from(self.ids.generate(self.stamper.now_millis())?);
            if !self.store.contains(collection, &id) {
                return Ok(id);
            }
        }

        Err(InternalError::store_internal(format!(
            "could not allocate a unique id in '{collection}'"
        )))
    }

    // Write failures are logged and counted; in-memory state stays authoritative.
    fn persist(&mut self) -> bool {
        match self.persistence.save(&self.store) {
            Ok(bytes) => {
                self.sink.record(MetricsEvent::PersistSave {
                    bytes: bytes as u64,
                });
                true
            }
            Err(err) => {
                tracing::warn!(key = %self.persistence.key(), error = %err, "failed to persist store");
                self.sink.record(MetricsEvent::PersistFailure);
                false
            }
        }
    }
}

// Every record of a registered collection must satisfy its schema.
fn validate_store(
    schemas: &BTreeMap<&'static str, &'static Schema>,
    store: &RecordStore,
) -> Result<(), InternalError> {
    for (collection, schema) in schemas {
        for record in store.records(collection) {
            schema.validate_record(record).map_err(|err| {
                InternalError::new(
                    ErrorClass::Validation,
                    ErrorOrigin::Schema,
                    format!("record {}: {err}", record.id()),
                )
            })?;
        }
    }

    Ok(())
}
