#![allow(dead_code)]

use erpdb::{
    Erp,
    core::{db::persist::MemorySlot, record::Fields, types::ManualClock},
};
use serde_json::Value;

/// 2024-03-09T16:00:00.000Z
pub const NOW: u64 = 1_710_000_000_000;

pub fn erp() -> Erp {
    erp_on(MemorySlot::new(), &ManualClock::at(NOW))
}

pub fn erp_on(slot: MemorySlot, clock: &ManualClock) -> Erp {
    init_tracing();
    let db = Erp::builder()
        .unwrap()
        .slot(slot)
        .clock(clock.clone())
        .seed(11)
        .open()
        .unwrap();

    Erp::new(db)
}

pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("test fields must be an object"),
    }
}

/// Route store logs through the test harness; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
