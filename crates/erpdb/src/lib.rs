//! ## Crate layout
//! - `core`: record store, query and aggregation engines, persistence, and
//!   observability.
//! - `entity`: typed views over the ERP collections.
//! - `erp`: the domain facade (defaults, lookups, statistics).
//! - `error`: public error type with a stable kind taxonomy.
//! - `seed`: embedded default data.
//! - `service`: asynchronous CRUD contract and its in-process implementation.
//! - `stats`: derived statistics snapshots.
//!
//! The `prelude` module carries the vocabulary most callers need.

pub use erpdb_core as core;

pub mod entity;
pub mod erp;
pub mod error;
pub mod seed;
pub mod service;
pub mod stats;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use erp::Erp;
pub use error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Erp, Error,
        entity::{
            Buyer, Decoration, Factory, HourlyOutputReport, HourlyProduction, Order, OrderRecap,
            Product,
        },
        service::{DataService, LocalDataService},
        stats::Dashboard,
    };
    pub use erpdb_core::{
        config::DbConfig,
        db::persist::{FileSlot, MemorySlot},
        prelude::*,
    };
}
