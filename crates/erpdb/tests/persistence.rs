//! Persistence through the facade: reopen, partial state, rejection, quota.

mod common;

use common::{NOW, erp, erp_on, fields};
use erpdb::{
    Erp,
    core::{
        config::DbConfig,
        db::persist::{FileSlot, LoadStatus, MemorySlot},
        types::{ManualClock, RecordId},
    },
    entity::{Buyer, Factory},
};
use proptest::prelude::*;
use serde_json::json;

const KEY: &str = "erp_data";

#[test]
fn file_slot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut erp = Erp::open(DbConfig::default(), FileSlot::new(dir.path())).unwrap();
    assert_eq!(erp.load_status(), LoadStatus::Empty);
    let created = erp
        .create_buyer(fields(json!({ "buyerName": "Persisted Ltd", "country": "Peru" })))
        .unwrap();

    let reopened = Erp::open(DbConfig::default(), FileSlot::new(dir.path())).unwrap();
    assert_eq!(reopened.load_status(), LoadStatus::Restored);
    assert_eq!(reopened.buyers().unwrap().len(), 13);
    assert_eq!(reopened.find::<Buyer>(&created.id).unwrap(), Some(created));
}

#[test]
fn configured_storage_key_is_used() {
    let slot = MemorySlot::new();
    let config = DbConfig::from_toml_str("storage_key = \"tenant_a\"\ndefault_page_size = 5").unwrap();

    let mut erp = Erp::open(config, slot.clone()).unwrap();
    assert!(erp.delete::<Buyer>(&RecordId::Int(1)));

    assert!(slot.get("tenant_a").is_some());
    assert!(slot.get(KEY).is_none());
    assert_eq!(erp.query_buyers(&Default::default()).unwrap().page_size, 5);
}

#[test]
fn persisted_collections_overlay_defaults() {
    let slot = MemorySlot::new();
    slot.seed(KEY, r#"{ "buyers": [] }"#);

    let erp = erp_on(slot, &ManualClock::at(NOW));

    assert_eq!(erp.load_status(), LoadStatus::Restored);
    assert!(erp.buyers().unwrap().is_empty());
    assert_eq!(erp.factories().unwrap().len(), 5);
}

#[test]
fn malformed_state_falls_back_to_defaults() {
    for blob in ["{ not json", r#"{ "buyers": [{ "buyerName": "no id" }] }"#, "[1, 2]"] {
        let slot = MemorySlot::new();
        slot.seed(KEY, blob);

        let erp = erp_on(slot, &ManualClock::at(NOW));

        assert_eq!(erp.load_status(), LoadStatus::Rejected, "{blob}");
        assert_eq!(erp.buyers().unwrap().len(), 12);
    }
}

#[test]
fn write_failures_keep_in_memory_changes() {
    let slot = MemorySlot::with_quota(64);
    let mut erp = erp_on(slot.clone(), &ManualClock::at(NOW));

    let factory = erp
        .create_factory(fields(json!({ "factoryName": "PT Quota" })))
        .unwrap();

    assert_eq!(erp.find::<Factory>(&factory.id).unwrap(), Some(factory));
    assert!(slot.get(KEY).is_none());
    assert_eq!(erp.metrics_report().ops.persist_failures, 1);
}

#[test]
fn reset_restores_seed_data() {
    let slot = MemorySlot::new();
    let mut erp = erp_on(slot.clone(), &ManualClock::at(NOW));
    erp.delete_many::<Buyer>(&[RecordId::Int(1), RecordId::Int(2)]);
    assert_eq!(erp.buyers().unwrap().len(), 10);

    erp.reset();

    assert_eq!(erp.buyers().unwrap().len(), 12);
    let reopened = erp_on(slot, &ManualClock::at(NOW));
    assert_eq!(reopened.buyers().unwrap().len(), 12);
}

#[test]
fn export_import_replaces_everything() {
    let mut source = erp();
    source
        .create_product(fields(json!({ "productName": "Exported", "category": "Cap" })))
        .unwrap();
    let blob = source.export_all().unwrap();
    assert!(blob.starts_with("{\n  \""));

    let mut target = erp();
    assert!(target.import_all(&blob));
    assert_eq!(target.db().store(), source.db().store());

    assert!(!target.import_all("{ \"buyers\": 3 }"));
    assert_eq!(target.db().store(), source.db().store());
}

proptest! {
    #[test]
    fn reopen_reproduces_the_store(deletes in proptest::collection::vec(1_u64..=14, 0..8), names in proptest::collection::vec("[a-z]{1,8}", 0..4)) {
        let slot = MemorySlot::new();
        let clock = ManualClock::at(NOW);
        let mut erp = erp_on(slot.clone(), &clock);

        for name in &names {
            clock.advance(1);
            erp.create_buyer(fields(json!({ "buyerName": name }))).unwrap();
        }
        for id in &deletes {
            erp.delete::<Buyer>(&RecordId::Int(*id));
        }

        let reopened = erp_on(slot, &clock);
        if names.is_empty() && !deletes.iter().any(|id| *id <= 12) {
            prop_assert_eq!(reopened.load_status(), LoadStatus::Empty);
        } else {
            prop_assert_eq!(reopened.load_status(), LoadStatus::Restored);
        }
        prop_assert_eq!(reopened.db().store(), erp.db().store());
    }
}
