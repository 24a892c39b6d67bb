use crate::entity::{Buyer, Decoration, Factory, Product, STATUS_INACTIVE};
use erpdb_core::db::aggregate::{
    average_by, count_where, distinct_count, percent_of, round_to, sum_by,
};
use serde::Serialize;

///
/// BuyerStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,

    /// Distinct countries.
    pub countries: usize,

    pub total_value: f64,
    pub total_orders: u64,
}

impl BuyerStats {
    #[must_use]
    pub fn compute(buyers: &[Buyer]) -> Self {
        Self {
            total: buyers.len(),
            active: count_where(buyers, Buyer::is_active),
            inactive: count_where(buyers, |b| b.status == STATUS_INACTIVE),
            countries: distinct_count(buyers, |b| b.country.as_str()),
            total_value: sum_by(buyers, |b| b.total_value),
            total_orders: buyers.iter().map(|b| b.total_orders).sum(),
        }
    }
}

///
/// FactoryStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStats {
    pub total: usize,
    pub active: usize,
    pub total_capacity: f64,
    pub total_production: f64,

    /// One decimal place.
    pub average_rating: f64,

    /// Mean on-time delivery percentage, one decimal place.
    pub average_on_time: f64,

    /// `round(totalProduction / totalCapacity * 100)`, 0 with no capacity.
    pub capacity_utilization: f64,
}

impl FactoryStats {
    #[must_use]
    pub fn compute(factories: &[Factory]) -> Self {
        let total_capacity = sum_by(factories, |f| f.capacity);
        let total_production = sum_by(factories, |f| f.total_production);

        Self {
            total: factories.len(),
            active: count_where(factories, Factory::is_active),
            total_capacity,
            total_production,
            average_rating: round_to(average_by(factories, |f| f.rating), 1),
            average_on_time: round_to(average_by(factories, |f| f.on_time_delivery), 1),
            capacity_utilization: percent_of(total_production, total_capacity),
        }
    }
}

///
/// ProductStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub active: usize,
    pub low_stock: usize,

    /// Distinct categories.
    pub categories: usize,

    pub total_stock: f64,

    /// Sum of `stock * price`.
    pub total_value: f64,
}

impl ProductStats {
    #[must_use]
    pub fn compute(products: &[Product]) -> Self {
        Self {
            total: products.len(),
            active: count_where(products, Product::is_active),
            low_stock: count_where(products, Product::is_low_stock),
            categories: distinct_count(products, |p| p.category.as_str()),
            total_stock: sum_by(products, |p| p.stock),
            total_value: sum_by(products, |p| p.stock * p.price),
        }
    }
}

///
/// DecorationStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationStats {
    pub total: usize,
    pub active: usize,

    /// Distinct decoration types.
    pub types: usize,

    /// Whole minutes.
    pub average_setup_time: f64,

    /// Two decimal places.
    pub average_cost_per_unit: f64,

    pub high_complexity: usize,
}

impl DecorationStats {
    #[must_use]
    pub fn compute(decorations: &[Decoration]) -> Self {
        Self {
            total: decorations.len(),
            active: count_where(decorations, Decoration::is_active),
            types: distinct_count(decorations, |d| d.decoration_type.as_str()),
            average_setup_time: round_to(average_by(decorations, |d| d.setup_time), 0),
            average_cost_per_unit: round_to(average_by(decorations, |d| d.cost_per_unit), 2),
            high_complexity: count_where(decorations, Decoration::is_high_complexity),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn factory(capacity: f64, production: f64, rating: f64, on_time: f64) -> Factory {
        serde_json::from_value(json!({
            "id": 1,
            "factoryName": "F",
            "status": "active",
            "capacity": capacity,
            "totalProduction": production,
            "rating": rating,
            "onTimeDelivery": on_time,
        }))
        .unwrap()
    }

    #[test]
    fn empty_collections_yield_zeroes() {
        assert_eq!(BuyerStats::compute(&[]), BuyerStats::default());
        assert_eq!(FactoryStats::compute(&[]), FactoryStats::default());
        assert_eq!(ProductStats::compute(&[]), ProductStats::default());
        assert_eq!(DecorationStats::compute(&[]), DecorationStats::default());
    }

    #[test]
    fn factory_utilization_rounds_to_whole_percent() {
        let stats = FactoryStats::compute(&[
            factory(300.0, 100.0, 4.0, 90.0),
            factory(0.0, 0.0, 4.5, 95.6),
        ]);

        assert_eq!(stats.total_capacity, 300.0);
        assert_eq!(stats.capacity_utilization, 33.0);
        assert_eq!(stats.average_rating, 4.3);
        assert_eq!(stats.average_on_time, 92.8);
    }

    #[test]
    fn zero_capacity_means_zero_utilization() {
        let stats = FactoryStats::compute(&[factory(0.0, 50.0, 4.0, 100.0)]);

        assert_eq!(stats.capacity_utilization, 0.0);
    }

    #[test]
    fn low_stock_excludes_sold_out_products() {
        let products: Vec<Product> = [(0.0, 10.0), (5.0, 10.0), (10.0, 10.0), (11.0, 10.0)]
            .into_iter()
            .map(|(stock, min_order)| {
                serde_json::from_value(json!({
                    "id": stock as u64,
                    "productName": "P",
                    "category": "T-Shirt",
                    "stock": stock,
                    "minOrder": min_order,
                    "price": 2.0,
                }))
                .unwrap()
            })
            .collect();
        let stats = ProductStats::compute(&products);

        assert_eq!(stats.low_stock, 2);
        assert_eq!(stats.categories, 1);
        assert_eq!(stats.total_value, 52.0);
    }
}
