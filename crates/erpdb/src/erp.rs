//! `Erp`: the domain facade over one explicitly constructed `Db`.
//!
//! Lookups return `Option`, deletes return `bool`; nothing here raises a
//! not-found error. Creates apply the domain defaults on top of the caller's
//! fields, so a default always wins over a caller-supplied value.

use crate::{
    entity::{
        Buyer, Decoration, Factory, FarmOut, HourlyOutputReport, HourlyProduction, ORDERS, Order,
        OrderRecap, PRODUCTS, Product, QC_FAILED, QC_REWORK, QcInspection, SCHEMAS,
        STATUS_PENDING,
    },
    error::Error,
    seed::default_collections,
    stats::{
        BuyerStats, Dashboard, DecorationStats, FactoryStats, FarmOutStats, HourlyOutputStats,
        HourlyProductionStats, OrderRecapStats, OrderStats, ProductStats, QcStats,
    },
};
use chrono::{DateTime, Datelike, Utc};
use erpdb_core::{
    config::DbConfig,
    db::{
        Db, DbBuilder, DeleteManyResult,
        aggregate::{Groups, group_by, unique_sorted},
        persist::{LoadStatus, StorageSlot},
        query::{Page, QueryParams},
    },
    error::InternalError,
    obs::EventReport,
    record::Fields,
    traits::EntityKind,
    types::{RecordId, Timestamp},
};
use serde_json::{Value, json};

///
/// Erp
///

pub struct Erp {
    db: Db,
}

impl Erp {
    /// `Db` builder preloaded with every ERP schema and the embedded seeds.
    pub fn builder() -> Result<DbBuilder, Error> {
        let builder = Db::builder(default_collections()?);

        Ok(SCHEMAS.into_iter().fold(builder, DbBuilder::schema))
    }

    /// Open against a storage slot, restoring whatever it holds.
    pub fn open(config: DbConfig, slot: impl StorageSlot + 'static) -> Result<Self, Error> {
        let db = Self::builder()?.config(config).slot(slot).open()?;

        Ok(Self::new(db))
    }

    /// Seeded instance backed by a private in-memory slot.
    pub fn in_memory() -> Result<Self, Error> {
        Ok(Self::new(Self::builder()?.open()?))
    }

    #[must_use]
    pub const fn new(db: Db) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &Db {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut Db {
        &mut self.db
    }

    #[must_use]
    pub fn into_db(self) -> Db {
        self.db
    }

    #[must_use]
    pub const fn load_status(&self) -> LoadStatus {
        self.db.load_status()
    }

    #[must_use]
    pub fn metrics_report(&self) -> EventReport {
        self.db.metrics_report()
    }

    // ─────────────────────────────────────────────
    // TYPED CRUD
    // ─────────────────────────────────────────────

    pub fn all<E: EntityKind>(&self) -> Result<Vec<E>, Error> {
        Ok(self.db.all::<E>()?)
    }

    pub fn find<E: EntityKind>(&self, id: &RecordId) -> Result<Option<E>, Error> {
        Ok(self.db.find::<E>(id)?)
    }

    /// Shallow-merge `patch` into an existing record.
    pub fn update<E: EntityKind>(
        &mut self,
        id: &RecordId,
        patch: Fields,
    ) -> Result<Option<E>, Error> {
        Ok(self.db.patch::<E>(id, &patch)?)
    }

    pub fn delete<E: EntityKind>(&mut self, id: &RecordId) -> bool {
        self.db.remove::<E>(id)
    }

    pub fn delete_many<E: EntityKind>(&mut self, ids: &[RecordId]) -> DeleteManyResult {
        self.db.delete_many(E::SCHEMA.collection, ids)
    }

    pub fn query<E: EntityKind>(&self, params: &QueryParams) -> Result<Page<E>, Error> {
        Ok(self.db.query_as::<E>(params)?)
    }

    // ─────────────────────────────────────────────
    // CREATE WITH DEFAULTS
    // ─────────────────────────────────────────────

    pub fn create_buyer(&mut self, fields: Fields) -> Result<Buyer, Error> {
        let fields = with_defaults(
            fields,
            [
                ("totalOrders", json!(0)),
                ("totalValue", json!(0)),
                ("rating", json!(0)),
            ],
        );

        self.insert(&fields)
    }

    pub fn create_factory(&mut self, fields: Fields) -> Result<Factory, Error> {
        let fields = with_defaults(
            fields,
            [
                ("totalProduction", json!(0)),
                ("onTimeDelivery", json!(100)),
                ("qualityScore", json!(4.0)),
                ("rating", json!(4.0)),
            ],
        );

        self.insert(&fields)
    }

    /// The product code is only generated when a text `category` is given;
    /// without one the create fails validation anyway.
    pub fn create_product(&mut self, fields: Fields) -> Result<Product, Error> {
        let code = fields
            .get("category")
            .and_then(Value::as_str)
            .map(|category| self.next_product_code(category));

        let mut fields = with_defaults(fields, [("totalSold", json!(0)), ("rating", json!(4.0))]);
        if let Some(code) = code {
            tracing::debug!(code = %code, "assigned product code");
            fields.insert("productCode".to_string(), Value::String(code));
        }

        self.insert(&fields)
    }

    pub fn create_order(&mut self, fields: Fields) -> Result<Order, Error> {
        let order_number = self.next_order_number()?;
        tracing::debug!(order_number = %order_number, "assigned order number");
        let fields = with_defaults(
            fields,
            [
                ("orderNumber", Value::String(order_number)),
                ("paymentStatus", json!(STATUS_PENDING)),
            ],
        );

        self.insert(&fields)
    }

    pub fn create_decoration(&mut self, fields: Fields) -> Result<Decoration, Error> {
        let fields = with_defaults(fields, [("totalJobs", json!(0)), ("rating", json!(4.0))]);

        self.insert(&fields)
    }

    pub fn create_order_recap(&mut self, fields: Fields) -> Result<OrderRecap, Error> {
        self.insert(&fields)
    }

    pub fn create_hourly_output(&mut self, fields: Fields) -> Result<HourlyOutputReport, Error> {
        self.insert(&fields)
    }

    pub fn create_hourly_production(&mut self, fields: Fields) -> Result<HourlyProduction, Error> {
        self.insert(&fields)
    }

    pub fn create_farm_out(&mut self, fields: Fields) -> Result<FarmOut, Error> {
        self.insert(&fields)
    }

    pub fn create_qc_inspection(&mut self, fields: Fields) -> Result<QcInspection, Error> {
        self.insert(&fields)
    }

    /// `PRE-NNN`: the first three characters of the category upper-cased,
    /// then the category's current product count plus one.
    #[must_use]
    pub fn next_product_code(&self, category: &str) -> String {
        let prefix = category.chars().take(3).collect::<String>().to_uppercase();
        let count = self
            .db
            .store()
            .records(PRODUCTS)
            .iter()
            .filter(|r| r.text("category") == Some(category))
            .count();

        format!("{prefix}-{:03}", count + 1)
    }

    /// `ORD-YYYY-NNN` from the current year and the order count plus one.
    pub fn next_order_number(&self) -> Result<String, Error> {
        let year = self.now()?.year();
        let count = self.db.store().len(ORDERS);

        Ok(format!("ORD-{year}-{:03}", count + 1))
    }

    /// Current instant on the store's clock.
    pub fn now(&self) -> Result<DateTime<Utc>, Error> {
        let now = Timestamp::from_millis(self.db.now_millis())
            .to_datetime()
            .map_err(InternalError::from)?;

        Ok(now)
    }

    // ─────────────────────────────────────────────
    // BUYERS
    // ─────────────────────────────────────────────

    pub fn buyers(&self) -> Result<Vec<Buyer>, Error> {
        self.all()
    }

    pub fn active_buyers(&self) -> Result<Vec<Buyer>, Error> {
        self.select(Buyer::is_active)
    }

    /// Paged buyer listing with search, filters, and sort.
    pub fn query_buyers(&self, params: &QueryParams) -> Result<Page<Buyer>, Error> {
        self.query(params)
    }

    /// Case-insensitive match on name, contact, email, or country.
    /// A blank query matches every buyer.
    pub fn search_buyers(&self, text: &str) -> Result<Vec<Buyer>, Error> {
        let needle = text.trim().to_lowercase();
        let schema = Buyer::SCHEMA;

        self.db
            .store()
            .records(schema.collection)
            .iter()
            .filter(|r| needle.is_empty() || schema.search_matches(r, &needle))
            .map(|r| Buyer::from_record(r).map_err(Error::from))
            .collect()
    }

    pub fn unique_countries(&self) -> Result<Vec<String>, Error> {
        let buyers = self.buyers()?;

        Ok(unique_sorted(&buyers, |b| b.country.clone()))
    }

    pub fn buyer_stats(&self) -> Result<BuyerStats, Error> {
        Ok(BuyerStats::compute(&self.buyers()?))
    }

    // ─────────────────────────────────────────────
    // FACTORIES
    // ─────────────────────────────────────────────

    pub fn factories(&self) -> Result<Vec<Factory>, Error> {
        self.all()
    }

    pub fn active_factories(&self) -> Result<Vec<Factory>, Error> {
        self.select(Factory::is_active)
    }

    pub fn unique_locations(&self) -> Result<Vec<String>, Error> {
        let factories = self.factories()?;

        Ok(unique_sorted(&factories, |f| f.location.clone()))
    }

    pub fn factory_stats(&self) -> Result<FactoryStats, Error> {
        Ok(FactoryStats::compute(&self.factories()?))
    }

    // ─────────────────────────────────────────────
    // PRODUCTS
    // ─────────────────────────────────────────────

    pub fn products(&self) -> Result<Vec<Product>, Error> {
        self.all()
    }

    pub fn active_products(&self) -> Result<Vec<Product>, Error> {
        self.select(Product::is_active)
    }

    pub fn products_by_category(&self, category: &str) -> Result<Vec<Product>, Error> {
        self.select(|p: &Product| p.category == category)
    }

    pub fn low_stock_products(&self) -> Result<Vec<Product>, Error> {
        self.select(Product::is_low_stock)
    }

    pub fn unique_categories(&self) -> Result<Vec<String>, Error> {
        let products = self.products()?;

        Ok(unique_sorted(&products, |p| p.category.clone()))
    }

    pub fn product_stats(&self) -> Result<ProductStats, Error> {
        Ok(ProductStats::compute(&self.products()?))
    }

    // ─────────────────────────────────────────────
    // ORDERS
    // ─────────────────────────────────────────────

    pub fn orders(&self) -> Result<Vec<Order>, Error> {
        self.all()
    }

    pub fn orders_by_status(&self, status: &str) -> Result<Vec<Order>, Error> {
        self.select(|o: &Order| o.status == status)
    }

    pub fn orders_by_buyer(&self, buyer_id: &RecordId) -> Result<Vec<Order>, Error> {
        self.select(|o: &Order| &o.buyer_id == buyer_id)
    }

    pub fn orders_grouped_by_status(&self) -> Result<Groups<String, Order>, Error> {
        let orders = self.orders()?;

        Ok(group_by(&orders, |o| o.status.clone()))
    }

    pub fn order_stats(&self) -> Result<OrderStats, Error> {
        Ok(OrderStats::compute(&self.orders()?))
    }

    // ─────────────────────────────────────────────
    // DECORATIONS
    // ─────────────────────────────────────────────

    pub fn decorations(&self) -> Result<Vec<Decoration>, Error> {
        self.all()
    }

    pub fn active_decorations(&self) -> Result<Vec<Decoration>, Error> {
        self.select(Decoration::is_active)
    }

    pub fn decorations_by_type(&self, decoration_type: &str) -> Result<Vec<Decoration>, Error> {
        self.select(|d: &Decoration| d.decoration_type == decoration_type)
    }

    pub fn decorations_grouped_by_category(&self) -> Result<Groups<String, Decoration>, Error> {
        let decorations = self.decorations()?;

        Ok(group_by(&decorations, |d| d.category.clone()))
    }

    pub fn decorations_grouped_by_type(&self) -> Result<Groups<String, Decoration>, Error> {
        let decorations = self.decorations()?;

        Ok(group_by(&decorations, |d| d.decoration_type.clone()))
    }

    pub fn decoration_stats(&self) -> Result<DecorationStats, Error> {
        Ok(DecorationStats::compute(&self.decorations()?))
    }

    // ─────────────────────────────────────────────
    // ORDER RECAP
    // ─────────────────────────────────────────────

    pub fn order_recaps(&self) -> Result<Vec<OrderRecap>, Error> {
        self.all()
    }

    pub fn order_recaps_by_buyer(&self, buyer: &str) -> Result<Vec<OrderRecap>, Error> {
        self.select(|r: &OrderRecap| r.buyer == buyer)
    }

    pub fn order_recaps_by_factory(&self, factory: &str) -> Result<Vec<OrderRecap>, Error> {
        self.select(|r: &OrderRecap| r.factory == factory)
    }

    /// Recaps whose first quality check is missing or blank.
    pub fn pending_qc(&self) -> Result<Vec<OrderRecap>, Error> {
        self.select(OrderRecap::is_qc_pending)
    }

    pub fn completed_qc(&self) -> Result<Vec<OrderRecap>, Error> {
        self.select(|r: &OrderRecap| !r.is_qc_pending())
    }

    pub fn order_recaps_grouped_by_buyer(&self) -> Result<Groups<String, OrderRecap>, Error> {
        let recaps = self.order_recaps()?;

        Ok(group_by(&recaps, |r| r.buyer.clone()))
    }

    pub fn order_recaps_grouped_by_factory(&self) -> Result<Groups<String, OrderRecap>, Error> {
        let recaps = self.order_recaps()?;

        Ok(group_by(&recaps, |r| r.factory.clone()))
    }

    pub fn order_recap_stats(&self) -> Result<OrderRecapStats, Error> {
        Ok(OrderRecapStats::compute(&self.order_recaps()?))
    }

    // ─────────────────────────────────────────────
    // HOURLY OUTPUT
    // ─────────────────────────────────────────────

    pub fn hourly_output_reports(&self) -> Result<Vec<HourlyOutputReport>, Error> {
        self.all()
    }

    pub fn hourly_output_by_date(&self, date: &str) -> Result<Vec<HourlyOutputReport>, Error> {
        self.select(|r: &HourlyOutputReport| r.date == date)
    }

    pub fn hourly_output_by_shift(&self, shift: &str) -> Result<Vec<HourlyOutputReport>, Error> {
        self.select(|r: &HourlyOutputReport| r.shift == shift)
    }

    /// Reports dated `start..=end`; dates are `YYYY-MM-DD` text.
    pub fn hourly_output_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<HourlyOutputReport>, Error> {
        self.select(|r: &HourlyOutputReport| (start..=end).contains(&r.date.as_str()))
    }

    pub fn hourly_output_grouped_by_date(
        &self,
    ) -> Result<Groups<String, HourlyOutputReport>, Error> {
        let reports = self.hourly_output_reports()?;

        Ok(group_by(&reports, |r| r.date.clone()))
    }

    pub fn hourly_output_stats(&self) -> Result<HourlyOutputStats, Error> {
        Ok(HourlyOutputStats::compute(&self.hourly_output_reports()?))
    }

    // ─────────────────────────────────────────────
    // HOURLY PRODUCTION
    // ─────────────────────────────────────────────

    pub fn hourly_productions(&self) -> Result<Vec<HourlyProduction>, Error> {
        self.all()
    }

    pub fn hourly_production_by_team(&self, team: &str) -> Result<Vec<HourlyProduction>, Error> {
        self.select(|p: &HourlyProduction| p.team == team)
    }

    pub fn hourly_production_by_style(&self, style: &str) -> Result<Vec<HourlyProduction>, Error> {
        self.select(|p: &HourlyProduction| p.style == style)
    }

    pub fn hourly_production_grouped_by_team(
        &self,
    ) -> Result<Groups<String, HourlyProduction>, Error> {
        let productions = self.hourly_productions()?;

        Ok(group_by(&productions, |p| p.team.clone()))
    }

    pub fn hourly_production_stats(&self) -> Result<HourlyProductionStats, Error> {
        Ok(HourlyProductionStats::compute(&self.hourly_productions()?))
    }

    // ─────────────────────────────────────────────
    // FARM OUT
    // ─────────────────────────────────────────────

    pub fn farm_outs(&self) -> Result<Vec<FarmOut>, Error> {
        self.all()
    }

    /// Every batch that has not been cancelled.
    pub fn active_farm_outs(&self) -> Result<Vec<FarmOut>, Error> {
        self.select(FarmOut::is_active)
    }

    pub fn farm_outs_by_status(&self, status: &str) -> Result<Vec<FarmOut>, Error> {
        self.select(|f: &FarmOut| f.status == status)
    }

    pub fn farm_outs_by_subcontractor(&self, subcontractor: &str) -> Result<Vec<FarmOut>, Error> {
        self.select(|f: &FarmOut| f.subcontractor == subcontractor)
    }

    /// Open batches whose expected date has passed on the store's clock.
    pub fn overdue_farm_outs(&self) -> Result<Vec<FarmOut>, Error> {
        let now = self.now()?;

        self.select(|f: &FarmOut| f.is_overdue(now))
    }

    pub fn farm_outs_grouped_by_status(&self) -> Result<Groups<String, FarmOut>, Error> {
        let farm_outs = self.farm_outs()?;

        Ok(group_by(&farm_outs, |f| f.status.clone()))
    }

    pub fn farm_outs_grouped_by_subcontractor(&self) -> Result<Groups<String, FarmOut>, Error> {
        let farm_outs = self.farm_outs()?;

        Ok(group_by(&farm_outs, |f| f.subcontractor.clone()))
    }

    pub fn farm_out_stats(&self) -> Result<FarmOutStats, Error> {
        Ok(FarmOutStats::compute(&self.farm_outs()?, self.now()?))
    }

    // ─────────────────────────────────────────────
    // QC INSPECTIONS
    // ─────────────────────────────────────────────

    pub fn qc_inspections(&self) -> Result<Vec<QcInspection>, Error> {
        self.all()
    }

    pub fn passed_inspections(&self) -> Result<Vec<QcInspection>, Error> {
        self.select(QcInspection::is_passed)
    }

    pub fn failed_inspections(&self) -> Result<Vec<QcInspection>, Error> {
        self.select(|i: &QcInspection| i.qc_status == QC_FAILED)
    }

    pub fn rework_inspections(&self) -> Result<Vec<QcInspection>, Error> {
        self.select(|i: &QcInspection| i.qc_status == QC_REWORK)
    }

    /// Inspections dated `date` (`YYYY-MM-DD`).
    pub fn inspections_on(&self, date: &str) -> Result<Vec<QcInspection>, Error> {
        self.select(|i: &QcInspection| i.inspection_date == date)
    }

    /// Inspections dated today, UTC, on the store's clock.
    pub fn todays_inspections(&self) -> Result<Vec<QcInspection>, Error> {
        let today = self.now()?.format("%Y-%m-%d").to_string();

        self.inspections_on(&today)
    }

    pub fn qc_stats(&self) -> Result<QcStats, Error> {
        Ok(QcStats::compute(&self.qc_inspections()?))
    }

    // ─────────────────────────────────────────────
    // DASHBOARD
    // ─────────────────────────────────────────────

    pub fn dashboard(&self) -> Result<Dashboard, Error> {
        Ok(Dashboard {
            buyers: self.buyer_stats()?,
            factories: self.factory_stats()?,
            products: self.product_stats()?,
            orders: self.order_stats()?,
            decorations: self.decoration_stats()?,
            order_recap: self.order_recap_stats()?,
            hourly_output: self.hourly_output_stats()?,
            hourly_production: self.hourly_production_stats()?,
            farm_out: self.farm_out_stats()?,
            qc: self.qc_stats()?,
        })
    }

    // ─────────────────────────────────────────────
    // STORE LIFECYCLE
    // ─────────────────────────────────────────────

    /// Drop persisted state and return to the seed data.
    pub fn reset(&mut self) {
        self.db.reset();
    }

    pub fn export_all(&self) -> Result<String, Error> {
        Ok(self.db.export_all()?)
    }

    /// Replace everything with an exported blob; `false` leaves state as is.
    pub fn import_all(&mut self, text: &str) -> bool {
        self.db.import_all(text)
    }

    // ─────────────────────────────────────────────
    // INTERNAL
    // ─────────────────────────────────────────────

    fn insert<E: EntityKind>(&mut self, fields: &Fields) -> Result<E, Error> {
        Ok(self.db.insert::<E>(fields)?)
    }

    fn select<E: EntityKind>(&self, mut pred: impl FnMut(&E) -> bool) -> Result<Vec<E>, Error> {
        let mut items = self.all::<E>()?;
        items.retain(|item| pred(item));

        Ok(items)
    }
}

// Domain defaults are applied last and overwrite caller values.
fn with_defaults<const N: usize>(mut fields: Fields, defaults: [(&str, Value); N]) -> Fields {
    for (key, value) in defaults {
        fields.insert(key.to_string(), value);
    }

    fields
}

///
/// TESTS
///
