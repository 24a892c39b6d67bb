use super::*;
use crate::{
    record::Record,
    test_support::{BUYERS, buyer},
    types::RecordId,
};
use proptest::prelude::*;

fn limits() -> PageLimits {
    PageLimits::default()
}

/// 12 buyers, 8 of them active, alternating between two countries.
fn twelve_buyers() -> Vec<Record> {
    (1..=12)
        .map(|id| {
            let status = if id <= 8 { "active" } else { "inactive" };
            let country = if id % 2 == 0 { "Indonesia" } else { "Vietnam" };
            buyer(id, &format!("Buyer {id:02}"), status, country)
        })
        .collect()
}

fn ids(page: &Page<Record>) -> Vec<RecordId> {
    page.data.iter().map(|r| r.id().clone()).collect()
}

#[test]
fn status_filter_counts_before_pagination() {
    let params = QueryParams::new().status("active").page(1).page_size(5);
    let page = execute(twelve_buyers(), &BUYERS, &params, limits()).unwrap();

    assert_eq!(page.data.len(), 5);
    assert_eq!(page.total, 8);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.page_size, 5);
}

#[test]
fn all_sentinel_disables_the_filter() {
    let active = execute(
        twelve_buyers(),
        &BUYERS,
        &QueryParams::new().status("active").page_size(100),
        limits(),
    )
    .unwrap();
    let all = execute(
        twelve_buyers(),
        &BUYERS,
        &QueryParams::new().status(ALL).page_size(100),
        limits(),
    )
    .unwrap();

    assert_eq!(all.total, 12);
    let all_ids = ids(&all);
    assert!(ids(&active).iter().all(|id| all_ids.contains(id)));
}

#[test]
fn filters_combine_with_and() {
    let params = QueryParams::new()
        .status("active")
        .filter("country", "Indonesia")
        .page_size(100);
    let page = execute(twelve_buyers(), &BUYERS, &params, limits()).unwrap();

    assert_eq!(page.total, 4);
    assert!(page.data.iter().all(|r| r.text("country") == Some("Indonesia")));
}

#[test]
fn search_is_case_insensitive_across_declared_fields() {
    let by_name = QueryParams::new().search("BUYER 03");
    let by_email = QueryParams::new().search("buyer11@EXAMPLE");
    let by_country = QueryParams::new().search("viet");

    assert_eq!(execute(twelve_buyers(), &BUYERS, &by_name, limits()).unwrap().total, 1);
    assert_eq!(execute(twelve_buyers(), &BUYERS, &by_email, limits()).unwrap().total, 1);
    assert_eq!(execute(twelve_buyers(), &BUYERS, &by_country, limits()).unwrap().total, 6);
}

#[test]
fn empty_search_is_ignored() {
    let page = execute(twelve_buyers(), &BUYERS, &QueryParams::new().search(""), limits()).unwrap();

    assert_eq!(page.total, 12);
}

#[test]
fn default_sort_is_created_at_descending() {
    let page = execute(twelve_buyers(), &BUYERS, &QueryParams::new().page_size(3), limits()).unwrap();

    assert_eq!(ids(&page), vec![RecordId::Int(12), RecordId::Int(11), RecordId::Int(10)]);
}

#[test]
fn explicit_sort_ascending_and_descending() {
    let asc = QueryParams::new()
        .sort_by("totalValue", Direction::Asc)
        .page_size(2);
    let desc = QueryParams::new()
        .sort_by("buyerName", Direction::Desc)
        .page_size(2);

    assert_eq!(
        ids(&execute(twelve_buyers(), &BUYERS, &asc, limits()).unwrap()),
        vec![RecordId::Int(1), RecordId::Int(2)]
    );
    assert_eq!(
        ids(&execute(twelve_buyers(), &BUYERS, &desc, limits()).unwrap()),
        vec![RecordId::Int(12), RecordId::Int(11)]
    );
}

#[test]
fn computed_sort_key_reads_nested_value() {
    // metrics.score = 100 - id, so ascending score is descending id
    let params = QueryParams::new()
        .sort_by("metrics.score", Direction::Asc)
        .page_size(1);
    let page = execute(twelve_buyers(), &BUYERS, &params, limits()).unwrap();

    assert_eq!(ids(&page), vec![RecordId::Int(12)]);
}

#[test]
fn pages_past_the_end_are_empty() {
    let params = QueryParams::new().page(9).page_size(5);
    let page = execute(twelve_buyers(), &BUYERS, &params, limits()).unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_next());
}

#[test]
fn page_zero_is_clamped_to_first_page() {
    let page = execute(twelve_buyers(), &BUYERS, &QueryParams::new().page(0).page_size(4), limits())
        .unwrap();

    assert_eq!(page.current_page, 1);
    assert_eq!(page.data.len(), 4);
}

#[test]
fn zero_page_size_is_rejected() {
    let err = execute(twelve_buyers(), &BUYERS, &QueryParams::new().page_size(0), limits())
        .unwrap_err();

    assert_eq!(err, QueryError::InvalidPageSize);
}

#[test]
fn oversized_page_size_is_clamped() {
    let limits = PageLimits {
        default_page_size: 10,
        max_page_size: 5,
    };
    let page = execute(twelve_buyers(), &BUYERS, &QueryParams::new().page_size(50), limits).unwrap();

    assert_eq!(page.page_size, 5);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn empty_collection_has_zero_pages() {
    let page = execute(Vec::new(), &BUYERS, &QueryParams::new(), limits()).unwrap();

    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.page_size, 10);
}

#[test]
fn unknown_filter_and_sort_keys_are_rejected() {
    let filter = execute(
        twelve_buyers(),
        &BUYERS,
        &QueryParams::new().filter("email", "x"),
        limits(),
    );
    let sort = execute(
        twelve_buyers(),
        &BUYERS,
        &QueryParams::new().sort_by("metrics", Direction::Asc),
        limits(),
    );

    assert!(matches!(filter, Err(QueryError::UnknownFilterField { .. })));
    assert!(matches!(sort, Err(QueryError::UnknownSortKey { .. })));
}

#[test]
fn params_deserialize_from_camel_case() {
    let params: QueryParams = serde_json::from_str(
        r#"{
            "page": 2,
            "pageSize": 5,
            "query": "acme",
            "filters": [{ "field": "status", "value": "active" }],
            "sort": { "key": "buyerName", "direction": "asc" }
        }"#,
    )
    .unwrap();

    assert_eq!(
        params,
        QueryParams::new()
            .page(2)
            .page_size(5)
            .search("acme")
            .status("active")
            .sort_by("buyerName", Direction::Asc)
    );
}

proptest! {
    #[test]
    fn pagination_partitions_the_filtered_set(total in 0_u64..60, page_size in 1_u32..12) {
        let records: Vec<Record> = (1..=total)
            .map(|id| buyer(id, &format!("B{id}"), "active", "Vietnam"))
            .collect();
        let pages = Page::<Record>::page_count(records.len(), page_size);
        let expected_pages = (total as usize).div_ceil(page_size as usize);
        prop_assert_eq!(pages as usize, expected_pages);

        let mut seen = Vec::new();
        for page in 1..=pages + 1 {
            let params = QueryParams::new().page(page).page_size(page_size);
            let result = execute(records.clone(), &BUYERS, &params, limits()).unwrap();
            prop_assert_eq!(result.total, total as usize);
            prop_assert!(result.data.len() <= page_size as usize);
            if page > pages {
                prop_assert!(result.data.is_empty());
            }
            seen.extend(ids(&result));
        }

        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), total as usize);
    }
}
